//! Live map controller.
//!
//! Owns a [`MapSurface`] and keeps it in step with the active filter, the
//! entity lists, the planned route and the user's location. Every call runs
//! on the host's UI thread; location updates arrive on a channel and are
//! applied when the host calls [`MapView::pump_location`].

use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crate::bounds::{route_display_bounds, ROUTE_PADDING};
use crate::data::UJJAIN_CENTER;
use crate::location::{LocationError, LocationFix, LocationOptions, LocationService};
use crate::markers::{
    route_endpoint_marker, user_marker, user_popup, visible_entries, InfoPopup, MapFilter, MarkerKind,
    PolylineSpec,
};
use crate::model::EntitySet;
use crate::polyline::RoutePath;
use crate::traits::{LineHandle, LocationPlatform, MapSurface, MarkerHandle};

/// How often the host should call [`MapView::tick_blink`].
pub const BLINK_INTERVAL: Duration = Duration::from_millis(800);

/// Fitted routes never zoom in past this.
pub const MAX_ROUTE_ZOOM: f64 = 15.0;

/// Zoom used when centring on the user.
pub const USER_ZOOM: f64 = 16.0;

const PERMISSION_DENIED_MESSAGE: &str =
    "Location permission denied. Please allow location access in your browser settings and try again.";
const TRACKING_FAILED_MESSAGE: &str = "Failed to start location tracking.";

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center: (f64, f64),
    pub zoom: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: UJJAIN_CENTER,
            zoom: 15.0,
        }
    }
}

/// What the host should render instead of (or on top of) the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    /// SDK failed to load; offer a retry.
    MapError(String),
    /// Ask the user to enable location.
    PermissionPrompt,
    /// Tracking failed; offer a retry.
    LocationError(String),
    Ready,
}

enum LocationEvent {
    Fix(LocationFix),
    Error(LocationError),
}

struct DisplayedMarker {
    handle: MarkerHandle,
    blinking: bool,
    visible: bool,
    popup: InfoPopup,
}

struct RouteOverlay {
    line: LineHandle,
    start: MarkerHandle,
    end: MarkerHandle,
}

pub struct MapView<S: MapSurface> {
    surface: S,
    options: MapOptions,
    loaded: bool,
    map_error: Option<String>,
    filter: MapFilter,
    entities: EntitySet,
    markers: Vec<DisplayedMarker>,
    route: Option<RoutePath>,
    overlay: Option<RouteOverlay>,
    user_marker: Option<MarkerHandle>,
    user_fix: Option<LocationFix>,
    location_override: Option<(f64, f64)>,
    permission_prompt: bool,
    location_error: Option<String>,
    updates: Option<Receiver<LocationEvent>>,
}

impl<S: MapSurface> MapView<S> {
    pub fn new(surface: S, options: MapOptions) -> Self {
        Self {
            surface,
            options,
            loaded: false,
            map_error: None,
            filter: MapFilter::default(),
            entities: EntitySet::default(),
            markers: Vec::new(),
            route: None,
            overlay: None,
            user_marker: None,
            user_fix: None,
            location_override: None,
            permission_prompt: false,
            location_error: None,
            updates: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn filter(&self) -> MapFilter {
        self.filter
    }

    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    pub fn route(&self) -> Option<&RoutePath> {
        self.route.as_ref()
    }

    pub fn displayed_marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Last position the "you are here" marker was placed at.
    pub fn user_location(&self) -> Option<&LocationFix> {
        self.user_fix.as_ref()
    }

    pub fn user_marker(&self) -> Option<MarkerHandle> {
        self.user_marker
    }

    pub fn is_tracking(&self) -> bool {
        self.updates.is_some()
    }

    pub fn view_state(&self) -> ViewState {
        if let Some(message) = &self.map_error {
            return ViewState::MapError(message.clone());
        }
        if !self.loaded {
            return ViewState::Loading;
        }
        if self.permission_prompt {
            return ViewState::PermissionPrompt;
        }
        if let Some(message) = &self.location_error {
            return ViewState::LocationError(message.clone());
        }
        ViewState::Ready
    }

    /// Load the SDK, create the map and draw whatever state is already set.
    pub fn load(&mut self) {
        let result = self
            .surface
            .load()
            .and_then(|_| self.surface.create_map(self.options.center, self.options.zoom));

        match result {
            Ok(()) => {
                tracing::info!(center = ?self.options.center, zoom = self.options.zoom, "map loaded");
                self.loaded = true;
                self.map_error = None;
                self.refresh_markers();
                self.draw_route();
                if let Some(position) = self.location_override {
                    self.apply_override(position);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "map failed to load");
                self.loaded = false;
                self.map_error = Some(format!(
                    "Failed to load the map ({}). Check your connection and API key, then try again.",
                    err
                ));
            }
        }
    }

    /// Manual retry after a load failure. No-op once loaded.
    pub fn retry_load(&mut self) {
        if self.loaded {
            return;
        }
        self.map_error = None;
        self.load();
    }

    pub fn set_filter(&mut self, filter: MapFilter) {
        self.filter = filter;
        self.refresh_markers();
    }

    pub fn set_entities(&mut self, entities: EntitySet) {
        self.entities = entities;
        self.refresh_markers();
    }

    /// Recentre the base map.
    pub fn set_center(&mut self, center: (f64, f64)) {
        self.options.center = center;
        if self.loaded {
            self.surface.set_center(center);
        }
    }

    fn clear_markers(&mut self) {
        for marker in self.markers.drain(..) {
            self.surface.remove_marker(marker.handle);
        }
    }

    /// Drop every entity marker and rebuild from the filter and entity lists.
    pub fn refresh_markers(&mut self) {
        if !self.loaded {
            return;
        }
        self.clear_markers();

        for entry in visible_entries(self.filter, &self.entities) {
            let handle = self.surface.add_marker(&entry.spec);
            self.markers.push(DisplayedMarker {
                handle,
                blinking: entry.spec.blinking,
                visible: true,
                popup: entry.popup,
            });
        }

        tracing::debug!(filter = ?self.filter, markers = self.markers.len(), "markers refreshed");
    }

    /// Flip visibility of every blinking marker.
    pub fn tick_blink(&mut self) {
        for marker in self.markers.iter_mut().filter(|marker| marker.blinking) {
            marker.visible = !marker.visible;
            self.surface.set_marker_visible(marker.handle, marker.visible);
        }
    }

    /// Open and return the popup for a clicked marker.
    pub fn click_marker(&mut self, handle: MarkerHandle) -> Option<InfoPopup> {
        let popup = if Some(handle) == self.user_marker {
            let accuracy = match self.location_override {
                Some(_) => None,
                None => self.user_fix.map(|fix| fix.accuracy),
            };
            user_popup(accuracy)
        } else {
            self.markers
                .iter()
                .find(|marker| marker.handle == handle)
                .map(|marker| marker.popup.clone())?
        };

        self.surface.open_info(handle, &popup);
        Some(popup)
    }

    /// Show a route, or clear it with `None`.
    pub fn set_route(&mut self, route: Option<RoutePath>) {
        self.route = route;
        self.draw_route();
    }

    fn clear_route_overlay(&mut self) {
        if let Some(overlay) = self.overlay.take() {
            self.surface.remove_polyline(overlay.line);
            self.surface.remove_marker(overlay.start);
            self.surface.remove_marker(overlay.end);
        }
    }

    fn draw_route(&mut self) {
        if !self.loaded {
            return;
        }
        self.clear_route_overlay();

        let Some((origin, destination)) = self.route.as_ref().and_then(RoutePath::endpoints) else {
            return;
        };

        let line = self.surface.add_polyline(&PolylineSpec::route(origin, destination));
        let start = self
            .surface
            .add_marker(&route_endpoint_marker(MarkerKind::RouteStart, origin));
        let end = self
            .surface
            .add_marker(&route_endpoint_marker(MarkerKind::RouteEnd, destination));
        self.overlay = Some(RouteOverlay { line, start, end });

        let bounds = route_display_bounds(origin, destination);
        self.surface.fit_bounds(&bounds, ROUTE_PADDING);
        if self.surface.zoom() > MAX_ROUTE_ZOOM {
            self.surface.set_zoom(MAX_ROUTE_ZOOM);
        }
        tracing::debug!(?bounds, "route drawn");
    }

    /// Pin the user marker to `position` instead of the device location, or
    /// go back to live tracking (from the next mount) with `None`. Clearing
    /// drops the pinned position and its marker.
    pub fn set_user_location_override(&mut self, position: Option<(f64, f64)>) {
        let was_pinned = self.location_override.is_some();
        self.location_override = position;
        match position {
            Some(position) => self.apply_override(position),
            None if was_pinned => self.clear_user(),
            None => {}
        }
    }

    fn clear_user(&mut self) {
        self.user_fix = None;
        if let Some(handle) = self.user_marker.take() {
            self.surface.remove_marker(handle);
        }
    }

    fn apply_override(&mut self, position: (f64, f64)) {
        self.permission_prompt = false;
        self.location_error = None;
        let fix = LocationFix::fixed_at(position);
        self.show_user(&fix);
    }

    fn show_user(&mut self, fix: &LocationFix) {
        self.user_fix = Some(*fix);
        if !self.loaded {
            return;
        }
        let position = fix.position();
        match self.user_marker {
            Some(handle) => self.surface.move_marker(handle, position),
            None => self.user_marker = Some(self.surface.add_marker(&user_marker(position))),
        }
        self.surface.set_center(position);
        self.surface.set_zoom(USER_ZOOM);
    }

    /// Start location handling once the map is up: the override if one is
    /// set, otherwise tracking when already permitted, otherwise the prompt.
    pub fn mount_location<P: LocationPlatform>(&mut self, service: &mut LocationService<P>) {
        if !self.loaded {
            return;
        }
        if let Some(position) = self.location_override {
            self.apply_override(position);
            return;
        }
        if service.check_permissions() {
            self.start_tracking(service);
        } else {
            self.permission_prompt = true;
        }
    }

    /// The user accepted the permission prompt.
    pub fn request_permission<P: LocationPlatform>(&mut self, service: &mut LocationService<P>) {
        self.location_error = None;
        self.permission_prompt = false;
        if service.request_permissions() {
            self.start_tracking(service);
        } else {
            self.location_error = Some(PERMISSION_DENIED_MESSAGE.to_string());
        }
    }

    /// The user pressed retry on the location error banner.
    pub fn retry_location<P: LocationPlatform>(&mut self, service: &mut LocationService<P>) {
        self.location_error = None;
        self.start_tracking(service);
    }

    fn start_tracking<P: LocationPlatform>(&mut self, service: &mut LocationService<P>) {
        let (tx, rx) = mpsc::channel();
        let error_tx = tx.clone();
        self.updates = Some(rx);

        let options = LocationOptions {
            maximum_age: Duration::from_secs(5),
            ..LocationOptions::watch()
        };
        let started = service.watch_position(
            move |fix| {
                let _ = tx.send(LocationEvent::Fix(fix));
            },
            move |err| {
                let _ = error_tx.send(LocationEvent::Error(err));
            },
            &options,
        );

        if !started {
            self.pump_location();
            self.updates = None;
            if self.location_error.is_none() {
                self.location_error = Some(TRACKING_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// Apply queued location updates in delivery order. Returns how many
    /// events were applied.
    pub fn pump_location(&mut self) -> usize {
        let events: Vec<LocationEvent> = match &self.updates {
            Some(rx) => rx.try_iter().collect(),
            None => return 0,
        };

        let count = events.len();
        for event in events {
            match event {
                LocationEvent::Fix(fix) => {
                    if self.location_override.is_none() {
                        self.show_user(&fix);
                    }
                }
                LocationEvent::Error(err) => {
                    self.location_error = Some(err.user_message());
                }
            }
        }
        count
    }

    /// Release the location watch and everything drawn on the surface.
    pub fn unmount<P: LocationPlatform>(&mut self, service: &mut LocationService<P>) {
        service.clear_watch();
        self.updates = None;
        self.clear_markers();
        self.clear_route_overlay();
        if let Some(handle) = self.user_marker.take() {
            self.surface.remove_marker(handle);
        }
        tracing::debug!("map view unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{PlatformPosition, SimulatedPlatform};
    use crate::surface::{HeadlessSurface, MapError};

    fn loaded_view() -> MapView<HeadlessSurface> {
        let mut view = MapView::new(HeadlessSurface::new(), MapOptions::default());
        view.load();
        view
    }

    #[test]
    fn test_loading_until_loaded() {
        let view = MapView::new(HeadlessSurface::new(), MapOptions::default());
        assert_eq!(view.view_state(), ViewState::Loading);
    }

    #[test]
    fn test_load_failure_waits_for_retry() {
        let surface = HeadlessSurface::failing(MapError::SdkLoad("network".to_string()));
        let mut view = MapView::new(surface, MapOptions::default());
        view.load();
        assert!(matches!(view.view_state(), ViewState::MapError(_)));
        assert_eq!(view.surface().load_attempts, 1);

        view.surface_mut().load_failure = None;
        view.retry_load();
        assert_eq!(view.view_state(), ViewState::Ready);
        assert_eq!(view.surface().load_attempts, 2);
    }

    #[test]
    fn test_state_before_load_is_drawn_on_load() {
        let mut view = MapView::new(HeadlessSurface::new(), MapOptions::default());
        view.set_route(Some(RoutePath::new(vec![(23.1837, 75.7924), (23.1765, 75.7885)])));
        assert_eq!(view.surface().lines().len(), 0);
        view.load();
        assert_eq!(view.surface().lines().len(), 1);
    }

    #[test]
    fn test_route_zoom_clamped() {
        let mut view = loaded_view();
        view.set_route(Some(RoutePath::new(vec![(23.1765, 75.7885), (23.1766, 75.7885)])));
        assert!(view.surface().fitted().is_some());
        assert!(view.surface().zoom() <= MAX_ROUTE_ZOOM);
    }

    #[test]
    fn test_click_unknown_marker() {
        let mut view = loaded_view();
        assert!(view.click_marker(MarkerHandle(999)).is_none());
        assert!(view.surface().opened_popups().is_empty());
    }

    #[test]
    fn test_override_ignores_live_fixes() {
        let mut view = loaded_view();
        let mut service = LocationService::new(SimulatedPlatform::granted());
        view.mount_location(&mut service);
        view.set_user_location_override(Some((23.1794, 75.7886)));

        service.platform_mut().emit(Ok(PlatformPosition::new(23.0, 75.0, 4.0, 0)));
        view.pump_location();
        assert_eq!(view.user_location().map(|fix| fix.position()), Some((23.1794, 75.7886)));
    }

    #[test]
    fn test_clearing_override_drops_pinned_marker() {
        let mut view = loaded_view();
        view.set_user_location_override(Some((23.1794, 75.7886)));
        let pinned = view.user_marker().unwrap();

        view.set_user_location_override(None);

        assert!(view.user_location().is_none());
        assert!(view.user_marker().is_none());
        assert!(view.surface().marker(pinned).is_none());
        assert!(view.click_marker(pinned).is_none());
    }

    #[test]
    fn test_watch_error_becomes_banner() {
        let mut view = loaded_view();
        let mut service = LocationService::new(SimulatedPlatform::granted());
        view.mount_location(&mut service);
        service.platform_mut().emit(Err(LocationError::Timeout));
        view.pump_location();
        assert_eq!(
            view.view_state(),
            ViewState::LocationError("Unable to get your location. Location request timed out. Please try again.".to_string())
        );
    }
}
