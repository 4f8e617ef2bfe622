//! Map surface errors and an in-memory surface.
//!
//! [`HeadlessSurface`] keeps every marker, line and viewport change in plain
//! collections. It backs the tests and any host that runs without a map.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::bounds::{Bounds, Padding};
use crate::markers::{InfoPopup, MarkerKind, MarkerSpec, PolylineSpec};
use crate::traits::{LineHandle, MapSurface, MarkerHandle};

/// Deepest zoom a surface will fit to.
const MAX_SURFACE_ZOOM: f64 = 21.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The SDK script or plugin could not be loaded.
    SdkLoad(String),
    /// The SDK was reachable but rejected the request (bad key, quota).
    Rejected(String),
    /// Map creation was attempted before a successful load.
    NotLoaded,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::SdkLoad(reason) => write!(f, "map SDK failed to load: {}", reason),
            MapError::Rejected(reason) => write!(f, "map SDK rejected the request: {}", reason),
            MapError::NotLoaded => write!(f, "map SDK not loaded"),
        }
    }
}

impl std::error::Error for MapError {}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMarker {
    pub spec: MarkerSpec,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    /// Error returned by the next `load` calls, if set.
    pub load_failure: Option<MapError>,
    pub load_attempts: u32,
    loaded: bool,
    map_created: bool,
    center: (f64, f64),
    zoom: f64,
    next_handle: u64,
    markers: BTreeMap<MarkerHandle, HeadlessMarker>,
    lines: HashMap<LineHandle, PolylineSpec>,
    opened: Vec<(MarkerHandle, InfoPopup)>,
    fitted: Option<(Bounds, Padding)>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose loads fail until `load_failure` is cleared.
    pub fn failing(error: MapError) -> Self {
        Self {
            load_failure: Some(error),
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    pub fn is_map_created(&self) -> bool {
        self.map_created
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&HeadlessMarker> {
        self.markers.get(&handle)
    }

    pub fn markers(&self) -> impl Iterator<Item = (&MarkerHandle, &HeadlessMarker)> {
        self.markers.iter()
    }

    pub fn markers_of(&self, kind: MarkerKind) -> Vec<&HeadlessMarker> {
        self.markers.values().filter(|marker| marker.spec.kind == kind).collect()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn lines(&self) -> Vec<&PolylineSpec> {
        self.lines.values().collect()
    }

    pub fn opened_popups(&self) -> &[(MarkerHandle, InfoPopup)] {
        &self.opened
    }

    pub fn fitted(&self) -> Option<&(Bounds, Padding)> {
        self.fitted.as_ref()
    }
}

impl MapSurface for HeadlessSurface {
    fn load(&mut self) -> Result<(), MapError> {
        self.load_attempts += 1;
        if let Some(error) = &self.load_failure {
            return Err(error.clone());
        }
        self.loaded = true;
        Ok(())
    }

    fn create_map(&mut self, center: (f64, f64), zoom: f64) -> Result<(), MapError> {
        if !self.loaded {
            return Err(MapError::NotLoaded);
        }
        self.map_created = true;
        self.center = center;
        self.zoom = zoom;
        Ok(())
    }

    fn add_marker(&mut self, spec: &MarkerSpec) -> MarkerHandle {
        let handle = MarkerHandle(self.next_id());
        self.markers.insert(
            handle,
            HeadlessMarker {
                spec: spec.clone(),
                visible: true,
            },
        );
        handle
    }

    fn move_marker(&mut self, marker: MarkerHandle, position: (f64, f64)) {
        if let Some(entry) = self.markers.get_mut(&marker) {
            entry.spec.position = position;
        }
    }

    fn set_marker_visible(&mut self, marker: MarkerHandle, visible: bool) {
        if let Some(entry) = self.markers.get_mut(&marker) {
            entry.visible = visible;
        }
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.markers.remove(&marker);
    }

    fn add_polyline(&mut self, spec: &PolylineSpec) -> LineHandle {
        let handle = LineHandle(self.next_id());
        self.lines.insert(handle, spec.clone());
        handle
    }

    fn remove_polyline(&mut self, line: LineHandle) {
        self.lines.remove(&line);
    }

    fn open_info(&mut self, marker: MarkerHandle, popup: &InfoPopup) {
        self.opened.push((marker, popup.clone()));
    }

    fn set_center(&mut self, center: (f64, f64)) {
        self.center = center;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding: Padding) {
        let span = bounds.lat_span().max(bounds.lng_span());
        self.center = bounds.center();
        self.zoom = if span <= 0.0 {
            MAX_SURFACE_ZOOM
        } else {
            (360.0 / span).log2().floor().clamp(0.0, MAX_SURFACE_ZOOM)
        };
        self.fitted = Some((*bounds, padding));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::user_marker;

    #[test]
    fn test_create_before_load_fails() {
        let mut surface = HeadlessSurface::new();
        assert_eq!(surface.create_map((23.0, 75.0), 15.0), Err(MapError::NotLoaded));
        surface.load().unwrap();
        assert!(surface.create_map((23.0, 75.0), 15.0).is_ok());
    }

    #[test]
    fn test_failing_surface() {
        let mut surface = HeadlessSurface::failing(MapError::SdkLoad("offline".to_string()));
        assert!(surface.load().is_err());
        assert!(surface.load().is_err());
        assert_eq!(surface.load_attempts, 2);
    }

    #[test]
    fn test_marker_lifecycle() {
        let mut surface = HeadlessSurface::new();
        let handle = surface.add_marker(&user_marker((23.0, 75.0)));
        surface.move_marker(handle, (23.1, 75.1));
        surface.set_marker_visible(handle, false);
        let marker = surface.marker(handle).unwrap();
        assert_eq!(marker.spec.position, (23.1, 75.1));
        assert!(!marker.visible);
        surface.remove_marker(handle);
        assert_eq!(surface.marker_count(), 0);
    }

    #[test]
    fn test_fit_bounds_zoom_from_span() {
        let mut surface = HeadlessSurface::new();
        let bounds = Bounds::from_points(&[(23.17, 75.78), (23.18, 75.79)]).unwrap();
        surface.fit_bounds(&bounds, crate::bounds::ROUTE_PADDING);
        // 360 / 0.01 = 36000, log2 ~ 15.1
        assert_eq!(surface.zoom(), 15.0);
    }
}
