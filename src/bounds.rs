//! Viewport bounds for fitting a route on screen.

use serde::{Deserialize, Serialize};

use crate::haversine::haversine_m;

/// Routes shorter than this get a synthetically widened viewport.
pub const MIN_ROUTE_SPAN_M: f64 = 1000.0;

/// Degrees added around each endpoint of a short route (roughly 500 m).
pub const CLOSE_ROUTE_EXPANSION_DEG: f64 = 0.005;

/// Pixel padding kept clear around a fitted route. The bottom leaves room for
/// the route options sheet.
pub const ROUTE_PADDING: Padding = Padding {
    top: 80,
    right: 50,
    bottom: 200,
    left: 50,
};

/// Screen-space padding in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// Axis-aligned lat/lng box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Degenerate box around a single point.
    pub fn around(point: (f64, f64)) -> Self {
        Self {
            south: point.0,
            west: point.1,
            north: point.0,
            east: point.1,
        }
    }

    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::around(*first);
        for point in rest {
            bounds.extend(*point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: (f64, f64)) {
        self.south = self.south.min(point.0);
        self.north = self.north.max(point.0);
        self.west = self.west.min(point.1);
        self.east = self.east.max(point.1);
    }

    pub fn contains(&self, point: (f64, f64)) -> bool {
        point.0 >= self.south && point.0 <= self.north && point.1 >= self.west && point.1 <= self.east
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

/// Bounds to fit for a route between `origin` and `destination`.
///
/// When the endpoints are closer than [`MIN_ROUTE_SPAN_M`], each endpoint is
/// widened by [`CLOSE_ROUTE_EXPANSION_DEG`] in every direction.
pub fn route_display_bounds(origin: (f64, f64), destination: (f64, f64)) -> Bounds {
    let mut bounds = Bounds::around(origin);
    bounds.extend(destination);

    let distance = haversine_m(origin, destination);
    if distance < MIN_ROUTE_SPAN_M {
        tracing::debug!(distance_m = distance, "short route, widening viewport");
        for (lat, lng) in [origin, destination] {
            bounds.extend((lat + CLOSE_ROUTE_EXPANSION_DEG, lng + CLOSE_ROUTE_EXPANSION_DEG));
            bounds.extend((lat - CLOSE_ROUTE_EXPANSION_DEG, lng - CLOSE_ROUTE_EXPANSION_DEG));
        }
    }

    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bounds = Bounds::from_points(&[(23.18, 75.79), (23.17, 75.80), (23.175, 75.785)]).unwrap();
        assert_eq!(bounds.south, 23.17);
        assert_eq!(bounds.north, 23.18);
        assert_eq!(bounds.west, 75.785);
        assert_eq!(bounds.east, 75.80);
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_close_endpoints_expand() {
        let origin = (23.1765, 75.7885);
        let destination = (23.1770, 75.7885);
        let raw = Bounds::from_points(&[origin, destination]).unwrap();
        let display = route_display_bounds(origin, destination);

        assert!(display.lat_span() > raw.lat_span());
        assert!(display.lng_span() > raw.lng_span());
        assert!(display.lat_span() >= 0.01);
        assert!(display.lng_span() >= 0.01);
        assert!(display.contains(origin) && display.contains(destination));
    }

    #[test]
    fn test_distant_endpoints_not_expanded() {
        let origin = (23.1837, 75.7924);
        let destination = (23.1600, 75.7700);
        let raw = Bounds::from_points(&[origin, destination]).unwrap();
        assert_eq!(route_display_bounds(origin, destination), raw);
    }

    #[test]
    fn test_center() {
        let bounds = Bounds::from_points(&[(0.0, 0.0), (2.0, 4.0)]).unwrap();
        assert_eq!(bounds.center(), (1.0, 2.0));
    }
}
