//! Route lookup between known Ujjain places.
//!
//! A fixed table of hand-authored waypoints per place pair, with straight-line
//! interpolation for pairs the table does not cover. There is no graph and no
//! shortest-path search.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::haversine::{haversine_km, round_to};
use crate::polyline::RoutePath;

/// Walking pace used for duration estimates.
pub const WALK_MINUTES_PER_KM: f64 = 12.0;

/// A rickshaw ride takes a third of the walking time.
pub const RIDE_SPEEDUP: f64 = 3.0;

/// Below this coordinate delta (degrees, either axis) no midpoints are added.
const INTERPOLATION_MIN_DELTA_DEG: f64 = 0.001;

/// Jitter amplitude applied to interpolated midpoints (degrees, full width).
const JITTER_WIDTH_DEG: f64 = 0.001;

/// Known places, in the order the planner suggests them.
pub const PLACES: &[(&str, (f64, f64))] = &[
    ("Railway Station", (23.1837, 75.7924)),
    ("Ramghat", (23.1794, 75.7886)),
    ("Mahakaleshwar Temple", (23.1765, 75.7885)),
    ("Kal Bhairav Temple", (23.1756, 75.7863)),
    ("Bus Station", (23.1798, 75.7845)),
    ("Dewas Road", (23.1812, 75.7932)),
    ("Parking Zone A", (23.1789, 75.7901)),
    ("Parking Zone B", (23.1771, 75.7868)),
];

type WaypointEntry = (&'static str, &'static str, &'static [(f64, f64)]);

/// Intermediate waypoints for a directed place pair.
const WAYPOINTS: &[WaypointEntry] = &[
    ("Railway Station", "Mahakaleshwar Temple", &[(23.1800, 75.7900), (23.1780, 75.7890), (23.1770, 75.7880)]),
    ("Railway Station", "Ramghat", &[(23.1800, 75.7900), (23.1790, 75.7895)]),
    ("Railway Station", "Kal Bhairav Temple", &[(23.1800, 75.7900), (23.1780, 75.7885), (23.1760, 75.7875)]),
    ("Mahakaleshwar Temple", "Railway Station", &[(23.1770, 75.7880), (23.1780, 75.7890), (23.1800, 75.7900)]),
    ("Mahakaleshwar Temple", "Ramghat", &[(23.1770, 75.7880), (23.1775, 75.7885)]),
    ("Mahakaleshwar Temple", "Bus Station", &[(23.1770, 75.7880), (23.1755, 75.7870)]),
    ("Ramghat", "Mahakaleshwar Temple", &[(23.1780, 75.7890), (23.1775, 75.7885)]),
    ("Ramghat", "Railway Station", &[(23.1785, 75.7895), (23.1800, 75.7905)]),
    ("Ramghat", "Kal Bhairav Temple", &[(23.1785, 75.7895), (23.1770, 75.7885), (23.1760, 75.7875)]),
    ("Bus Station", "Mahakaleshwar Temple", &[(23.1745, 75.7865), (23.1755, 75.7870), (23.1765, 75.7880)]),
    ("Bus Station", "Railway Station", &[(23.1745, 75.7865), (23.1780, 75.7890), (23.1810, 75.7905)]),
    ("Parking Zone A", "Mahakaleshwar Temple", &[(23.1785, 75.7895), (23.1775, 75.7885)]),
    ("Parking Zone B", "Ramghat", &[(23.1775, 75.7865), (23.1780, 75.7885)]),
];

pub fn place_coordinates(name: &str) -> Option<(f64, f64)> {
    PLACES
        .iter()
        .find(|(place, _)| *place == name)
        .map(|(_, coords)| *coords)
}

/// Hand-authored waypoints for `from -> to`, reversed from `to -> from` when
/// only the opposite direction is listed.
pub fn lookup_waypoints(from: &str, to: &str) -> Option<Vec<(f64, f64)>> {
    if let Some((_, _, points)) = WAYPOINTS.iter().find(|(a, b, _)| *a == from && *b == to) {
        return Some(points.to_vec());
    }
    WAYPOINTS
        .iter()
        .find(|(a, b, _)| *a == to && *b == from)
        .map(|(_, _, points)| points.iter().rev().copied().collect())
}

/// Walking minutes for a distance under the fixed-pace model.
pub fn walking_minutes(distance_km: f64) -> u32 {
    (distance_km * WALK_MINUTES_PER_KM).round() as u32
}

/// Source of the small offsets that keep interpolated routes from looking ruled.
pub trait Jitter {
    /// Offset in `[-0.5, 0.5)`; callers scale it.
    fn next_offset(&mut self) -> f64;
}

/// Deterministic splitmix64 jitter.
#[derive(Debug, Clone)]
pub struct SeededJitter {
    state: u64,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl Default for SeededJitter {
    fn default() -> Self {
        Self::new(0x5EED_1A1A_2028)
    }
}

impl Jitter for SeededJitter {
    fn next_offset(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64 - 0.5
    }
}

/// Straight interpolation with no offsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn next_offset(&mut self) -> f64 {
        0.0
    }
}

/// One end of a route.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// A place from [`PLACES`].
    Named(String),
    /// An arbitrary coordinate, e.g. the device's current location.
    Coordinates { label: String, position: (f64, f64) },
}

impl Endpoint {
    pub fn named(name: impl Into<String>) -> Self {
        Endpoint::Named(name.into())
    }

    /// The current-location endpoint, labelled with its coordinates.
    pub fn current_location(position: (f64, f64)) -> Self {
        Endpoint::Coordinates {
            label: format!("Current Location ({:.4}, {:.4})", position.0, position.1),
            position,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Endpoint::Named(name) => name,
            Endpoint::Coordinates { label, .. } => label,
        }
    }

    fn resolve(&self) -> Result<(f64, f64), RouteError> {
        match self {
            Endpoint::Named(name) => {
                place_coordinates(name).ok_or_else(|| RouteError::UnknownPlace(name.clone()))
            }
            Endpoint::Coordinates { position, .. } => Ok(*position),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walking,
    Rickshaw,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    UnknownPlace(String),
    SameEndpoints,
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::UnknownPlace(name) => {
                write!(f, "unknown place '{}', pick one of the suggested locations", name)
            }
            RouteError::SameEndpoints => write!(f, "origin and destination are the same place"),
        }
    }
}

impl std::error::Error for RouteError {}

/// A planned route with display figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub from: String,
    pub to: String,
    pub path: RoutePath,
    /// Straight-line distance between the endpoints, 2 decimals.
    pub distance_km: f64,
    pub walk_minutes: u32,
    pub ride_minutes: u32,
    pub mode: TravelMode,
    /// Midpoint of the endpoints, where the map centres.
    pub center: (f64, f64),
}

impl RoutePlan {
    pub fn duration_minutes(&self) -> u32 {
        match self.mode {
            TravelMode::Walking => self.walk_minutes,
            TravelMode::Rickshaw => self.ride_minutes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoutePlanner<J: Jitter = SeededJitter> {
    jitter: J,
}

impl Default for RoutePlanner<SeededJitter> {
    fn default() -> Self {
        Self::new(SeededJitter::default())
    }
}

impl<J: Jitter> RoutePlanner<J> {
    pub fn new(jitter: J) -> Self {
        Self { jitter }
    }

    pub fn plan(&mut self, from: &Endpoint, to: &Endpoint, mode: TravelMode) -> Result<RoutePlan, RouteError> {
        let from_coords = from.resolve()?;
        let to_coords = to.resolve()?;
        if from.label() == to.label() {
            return Err(RouteError::SameEndpoints);
        }

        let path = self.route_path(from_coords, to_coords, from.label(), to.label());
        let distance = haversine_km(from_coords, to_coords);
        let walk_minutes = walking_minutes(distance);
        let ride_minutes = (walk_minutes as f64 / RIDE_SPEEDUP).round() as u32;

        tracing::info!(
            from = from.label(),
            to = to.label(),
            points = path.len(),
            distance_km = distance,
            "planned route"
        );

        Ok(RoutePlan {
            from: from.label().to_string(),
            to: to.label().to_string(),
            path,
            distance_km: round_to(distance, 2),
            walk_minutes,
            ride_minutes,
            mode,
            center: ((from_coords.0 + to_coords.0) / 2.0, (from_coords.1 + to_coords.1) / 2.0),
        })
    }

    /// Origin, waypoints (table or interpolated), destination.
    pub fn route_path(&mut self, from: (f64, f64), to: (f64, f64), from_label: &str, to_label: &str) -> RoutePath {
        let mut points = vec![from];

        if let Some(waypoints) = lookup_waypoints(from_label, to_label) {
            points.extend(waypoints);
        } else {
            let lat_diff = to.0 - from.0;
            let lng_diff = to.1 - from.1;
            if lat_diff.abs() > INTERPOLATION_MIN_DELTA_DEG || lng_diff.abs() > INTERPOLATION_MIN_DELTA_DEG {
                for fraction in [0.33, 0.67] {
                    points.push((
                        from.0 + lat_diff * fraction + self.jitter.next_offset() * JITTER_WIDTH_DEG,
                        from.1 + lng_diff * fraction + self.jitter.next_offset() * JITTER_WIDTH_DEG,
                    ));
                }
            }
        }

        points.push(to);
        RoutePath::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_lookup() {
        let mut planner = RoutePlanner::new(NoJitter);
        let plan = planner
            .plan(&Endpoint::named("Railway Station"), &Endpoint::named("Ramghat"), TravelMode::Walking)
            .unwrap();
        assert_eq!(
            plan.path.points(),
            &[(23.1837, 75.7924), (23.1800, 75.7900), (23.1790, 75.7895), (23.1794, 75.7886)]
        );
    }

    #[test]
    fn test_reverse_lookup_reverses_waypoints() {
        let waypoints = lookup_waypoints("Kal Bhairav Temple", "Railway Station").unwrap();
        assert_eq!(waypoints, vec![(23.1760, 75.7875), (23.1780, 75.7885), (23.1800, 75.7900)]);
    }

    #[test]
    fn test_interpolation_adds_two_jittered_midpoints() {
        let mut planner = RoutePlanner::new(SeededJitter::new(7));
        let from = place_coordinates("Dewas Road").unwrap();
        let to = place_coordinates("Kal Bhairav Temple").unwrap();
        let path = planner.route_path(from, to, "Dewas Road", "Kal Bhairav Temple");
        assert_eq!(path.len(), 4);

        let first = path.points()[1];
        let expected = (from.0 + (to.0 - from.0) * 0.33, from.1 + (to.1 - from.1) * 0.33);
        assert!((first.0 - expected.0).abs() <= 0.0005);
        assert!((first.1 - expected.1).abs() <= 0.0005);
    }

    #[test]
    fn test_tiny_span_has_no_midpoints() {
        let mut planner = RoutePlanner::new(NoJitter);
        let path = planner.route_path((23.1765, 75.7885), (23.1768, 75.7887), "a", "b");
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_unknown_place() {
        let mut planner = RoutePlanner::default();
        let err = planner
            .plan(&Endpoint::named("Nowhere"), &Endpoint::named("Ramghat"), TravelMode::Walking)
            .unwrap_err();
        assert_eq!(err, RouteError::UnknownPlace("Nowhere".to_string()));
    }

    #[test]
    fn test_same_endpoints_rejected() {
        let mut planner = RoutePlanner::default();
        let err = planner
            .plan(&Endpoint::named("Ramghat"), &Endpoint::named("Ramghat"), TravelMode::Walking)
            .unwrap_err();
        assert_eq!(err, RouteError::SameEndpoints);
    }

    #[test]
    fn test_duration_follows_fixed_pace() {
        let mut planner = RoutePlanner::new(NoJitter);
        let plan = planner
            .plan(
                &Endpoint::named("Railway Station"),
                &Endpoint::named("Mahakaleshwar Temple"),
                TravelMode::Rickshaw,
            )
            .unwrap();
        let distance = haversine_km((23.1837, 75.7924), (23.1765, 75.7885));
        assert_eq!(plan.walk_minutes, (distance * 12.0).round() as u32);
        assert_eq!(plan.duration_minutes(), plan.ride_minutes);
        assert_eq!(plan.center, ((23.1837 + 23.1765) / 2.0, (75.7924 + 75.7885) / 2.0));
    }

    #[test]
    fn test_walking_minutes_monotonic() {
        let mut previous = 0;
        for step in 0..200 {
            let minutes = walking_minutes(step as f64 * 0.05);
            assert!(minutes >= previous);
            previous = minutes;
        }
    }

    #[test]
    fn test_seeded_jitter_range() {
        let mut jitter = SeededJitter::default();
        for _ in 0..1000 {
            let offset = jitter.next_offset();
            assert!((-0.5..0.5).contains(&offset));
        }
    }

    #[test]
    fn test_current_location_label() {
        let endpoint = Endpoint::current_location((23.17654, 75.78851));
        assert_eq!(endpoint.label(), "Current Location (23.1765, 75.7885)");
    }
}
