//! Seams between the core and its host.
//!
//! The core never talks to a map SDK, a geolocation API or device storage
//! directly. Hosts implement these traits for whatever they run on.

use crate::bounds::{Bounds, Padding};
use crate::location::{LocationError, LocationOptions, PermissionState, PlatformPosition};
use crate::markers::{InfoPopup, MarkerSpec, PolylineSpec};
use crate::model::{Alert, CrowdReading, ERickshaw, EntitySet, GarbageVehicle, ParkingLot};
use crate::session::StorageError;
use crate::surface::MapError;

/// Handle to a marker owned by a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

/// Handle to a polyline owned by a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineHandle(pub u64);

/// Handle to an active platform location watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// Source of the entity lists shown on the map.
///
/// The static mock lists implement this today; a live backend can replace
/// them without touching rendering code.
pub trait DataProvider {
    fn rickshaws(&self) -> Vec<ERickshaw>;

    fn parking_lots(&self) -> Vec<ParkingLot>;

    fn alerts(&self) -> Vec<Alert>;

    fn garbage_vehicles(&self) -> Vec<GarbageVehicle> {
        Vec::new()
    }

    fn crowd_readings(&self) -> Vec<CrowdReading> {
        Vec::new()
    }

    /// The three lists the live map draws from.
    fn entity_set(&self) -> EntitySet {
        EntitySet {
            rickshaws: self.rickshaws(),
            parking_lots: self.parking_lots(),
            alerts: self.alerts(),
        }
    }
}

/// A map SDK surface: base map, markers, lines and viewport.
pub trait MapSurface {
    /// Load the SDK. Called once per mount (and again on manual retry).
    fn load(&mut self) -> Result<(), MapError>;

    /// Create the map instance with points-of-interest labels hidden.
    fn create_map(&mut self, center: (f64, f64), zoom: f64) -> Result<(), MapError>;

    fn add_marker(&mut self, spec: &MarkerSpec) -> MarkerHandle;

    fn move_marker(&mut self, marker: MarkerHandle, position: (f64, f64));

    fn set_marker_visible(&mut self, marker: MarkerHandle, visible: bool);

    fn remove_marker(&mut self, marker: MarkerHandle);

    fn add_polyline(&mut self, spec: &PolylineSpec) -> LineHandle;

    fn remove_polyline(&mut self, line: LineHandle);

    fn open_info(&mut self, marker: MarkerHandle, popup: &InfoPopup);

    fn set_center(&mut self, center: (f64, f64));

    fn set_zoom(&mut self, zoom: f64);

    fn zoom(&self) -> f64;

    fn fit_bounds(&mut self, bounds: &Bounds, padding: Padding);
}

/// Receives every position (or error) a platform watch produces.
pub type WatchSink = Box<dyn FnMut(Result<PlatformPosition, LocationError>) + Send>;

/// Host geolocation API (native plugin or browser).
pub trait LocationPlatform {
    /// Native platforms must check before reading; browsers prompt on read.
    fn is_native(&self) -> bool;

    fn check_permission(&mut self) -> Result<PermissionState, LocationError>;

    fn request_permission(&mut self) -> Result<PermissionState, LocationError>;

    fn current_position(&mut self, options: &LocationOptions) -> Result<PlatformPosition, LocationError>;

    fn watch_position(&mut self, options: &LocationOptions, sink: WatchSink) -> Result<WatchId, LocationError>;

    fn clear_watch(&mut self, id: WatchId);
}

/// String key/value device storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
