//! Location permission and watch wrapper.
//!
//! Thin layer over a [`LocationPlatform`]: it orders the permission calls the
//! way native and browser platforms expect, normalises positions to
//! [`LocationFix`] and reports failures to the caller's error callback. It
//! never retries or queues.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::{LocationPlatform, WatchId, WatchSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached position the platform may return.
    pub maximum_age: Duration,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

impl LocationOptions {
    /// Defaults for continuous watches.
    pub fn watch() -> Self {
        Self {
            maximum_age: Duration::from_secs(1),
            ..Self::default()
        }
    }
}

/// Position as a platform reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub altitude: Option<f64>,
    pub heading: Option<f64>,
    pub speed: Option<f64>,
    /// Milliseconds since the unix epoch.
    pub timestamp_ms: i64,
}

impl PlatformPosition {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64, timestamp_ms: i64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            altitude: None,
            heading: None,
            speed: None,
            timestamp_ms,
        }
    }
}

/// Normalised device position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters.
    pub accuracy: f64,
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// A fix pinned at `position` with perfect accuracy, stamped now.
    pub fn fixed_at(position: (f64, f64)) -> Self {
        Self {
            latitude: position.0,
            longitude: position.1,
            accuracy: 0.0,
            timestamp: Utc::now(),
        }
    }
}

impl From<PlatformPosition> for LocationFix {
    fn from(position: PlatformPosition) -> Self {
        Self {
            latitude: position.latitude,
            longitude: position.longitude,
            accuracy: position.accuracy,
            timestamp: DateTime::from_timestamp_millis(position.timestamp_ms).unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    PermissionDenied,
    Unavailable,
    Timeout,
    Unsupported,
    Platform(String),
}

impl LocationError {
    /// Geolocation API error code (1 denied, 2 unavailable, 3 timeout).
    pub fn code(&self) -> u8 {
        match self {
            LocationError::PermissionDenied => 1,
            LocationError::Unavailable => 2,
            LocationError::Timeout => 3,
            LocationError::Unsupported | LocationError::Platform(_) => 0,
        }
    }

    /// Banner text shown when tracking fails.
    pub fn user_message(&self) -> String {
        let hint = match self.code() {
            1 => "Please allow location access in your browser.",
            2 => "Location information is unavailable.",
            3 => "Location request timed out. Please try again.",
            _ => "Please check your GPS settings and try again.",
        };
        format!("Unable to get your location. {}", hint)
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::PermissionDenied => write!(f, "location permission denied"),
            LocationError::Unavailable => write!(f, "location unavailable"),
            LocationError::Timeout => write!(f, "location request timed out"),
            LocationError::Unsupported => write!(f, "geolocation is not supported on this platform"),
            LocationError::Platform(reason) => write!(f, "location platform error: {}", reason),
        }
    }
}

impl std::error::Error for LocationError {}

pub struct LocationService<P: LocationPlatform> {
    platform: P,
    watch: Option<WatchId>,
    permission: Option<PermissionState>,
}

impl<P: LocationPlatform> LocationService<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            watch: None,
            permission: None,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Last permission state seen from the platform.
    pub fn permission_status(&self) -> Option<PermissionState> {
        self.permission
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    pub fn check_permissions(&mut self) -> bool {
        match self.platform.check_permission() {
            Ok(state) => {
                self.permission = Some(state);
                state == PermissionState::Granted
            }
            Err(err) => {
                tracing::warn!(error = %err, "checking location permission failed");
                false
            }
        }
    }

    pub fn request_permissions(&mut self) -> bool {
        match self.platform.request_permission() {
            Ok(state) => {
                self.permission = Some(state);
                tracing::info!(?state, "location permission requested");
                state == PermissionState::Granted
            }
            Err(err) => {
                tracing::warn!(error = %err, "requesting location permission failed");
                false
            }
        }
    }

    fn ensure_permission(&mut self) -> bool {
        self.check_permissions() || self.request_permissions()
    }

    /// Single position read. Failures are logged and come back as `None`.
    pub fn current_position(&mut self, options: &LocationOptions) -> Option<LocationFix> {
        if self.platform.is_native() && !self.ensure_permission() {
            tracing::warn!("location permission denied, no position");
            return None;
        }

        match self.platform.current_position(options) {
            Ok(position) => Some(position.into()),
            Err(err) => {
                tracing::warn!(error = %err, "reading current position failed");
                None
            }
        }
    }

    /// Start a continuous watch.
    ///
    /// Returns `false` (after calling `on_error`) when the permission is not
    /// granted or the platform refuses the watch. Any previous watch is
    /// released first.
    pub fn watch_position<F, E>(&mut self, mut on_fix: F, mut on_error: E, options: &LocationOptions) -> bool
    where
        F: FnMut(LocationFix) + Send + 'static,
        E: FnMut(LocationError) + Send + 'static,
    {
        self.clear_watch();

        let granted = if self.platform.is_native() {
            self.ensure_permission()
        } else {
            self.request_permissions()
        };
        if !granted {
            on_error(LocationError::PermissionDenied);
            return false;
        }

        let on_error = Arc::new(Mutex::new(on_error));
        let watch_errors = Arc::clone(&on_error);
        let sink: WatchSink = Box::new(move |event: Result<PlatformPosition, LocationError>| match event {
            Ok(position) => on_fix(position.into()),
            Err(err) => {
                tracing::warn!(error = %err, "location watch error");
                let mut report = watch_errors.lock().unwrap_or_else(PoisonError::into_inner);
                (*report)(err);
            }
        });

        match self.platform.watch_position(options, sink) {
            Ok(id) => {
                tracing::info!(watch = id.0, "location watch started");
                self.watch = Some(id);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "starting location watch failed");
                let mut report = on_error.lock().unwrap_or_else(PoisonError::into_inner);
                (*report)(err);
                false
            }
        }
    }

    pub fn clear_watch(&mut self) {
        if let Some(id) = self.watch.take() {
            self.platform.clear_watch(id);
            tracing::info!(watch = id.0, "location watch cleared");
        }
    }
}

/// Platform stand-in driven by the caller: permissions are set directly and
/// positions are pushed with [`SimulatedPlatform::emit`].
#[derive(Default)]
pub struct SimulatedPlatform {
    pub native: bool,
    /// State reported by `check_permission`.
    pub permission: Option<PermissionState>,
    /// State a `request_permission` call moves to.
    pub grant_on_request: bool,
    pub position: Option<PlatformPosition>,
    /// Error returned by `watch_position` even when permitted, if set.
    pub watch_failure: Option<LocationError>,
    pub requests: u32,
    pub next_watch: u64,
    pub active: Option<(WatchId, WatchSink)>,
    pub cleared: Vec<WatchId>,
}

impl SimulatedPlatform {
    pub fn granted() -> Self {
        Self {
            permission: Some(PermissionState::Granted),
            grant_on_request: true,
            ..Self::default()
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: Some(PermissionState::Denied),
            grant_on_request: false,
            ..Self::default()
        }
    }

    /// Deliver an event to the active watch. Returns `false` when none is active.
    pub fn emit(&mut self, event: Result<PlatformPosition, LocationError>) -> bool {
        match self.active.as_mut() {
            Some((_, sink)) => {
                sink(event);
                true
            }
            None => false,
        }
    }

    pub fn active_watch(&self) -> Option<WatchId> {
        self.active.as_ref().map(|(id, _)| *id)
    }
}

impl LocationPlatform for SimulatedPlatform {
    fn is_native(&self) -> bool {
        self.native
    }

    fn check_permission(&mut self) -> Result<PermissionState, LocationError> {
        self.permission.ok_or(LocationError::Unsupported)
    }

    fn request_permission(&mut self) -> Result<PermissionState, LocationError> {
        self.requests += 1;
        let state = if self.grant_on_request {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };
        self.permission = Some(state);
        Ok(state)
    }

    fn current_position(&mut self, _options: &LocationOptions) -> Result<PlatformPosition, LocationError> {
        if self.permission != Some(PermissionState::Granted) {
            return Err(LocationError::PermissionDenied);
        }
        self.position.clone().ok_or(LocationError::Unavailable)
    }

    fn watch_position(&mut self, _options: &LocationOptions, sink: WatchSink) -> Result<WatchId, LocationError> {
        if self.permission != Some(PermissionState::Granted) {
            return Err(LocationError::PermissionDenied);
        }
        if let Some(err) = &self.watch_failure {
            return Err(err.clone());
        }
        self.next_watch += 1;
        let id = WatchId(self.next_watch);
        self.active = Some((id, sink));
        Ok(id)
    }

    fn clear_watch(&mut self, id: WatchId) {
        if self.active_watch() == Some(id) {
            self.active = None;
        }
        self.cleared.push(id);
    }
}
