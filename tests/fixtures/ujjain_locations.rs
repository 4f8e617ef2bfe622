//! Ujjain landmarks used across the tests.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

pub const RAILWAY_STATION: Location = Location::new("Railway Station", 23.1837, 75.7924);
pub const RAMGHAT: Location = Location::new("Ramghat", 23.1794, 75.7886);
pub const MAHAKALESHWAR: Location = Location::new("Mahakaleshwar Temple", 23.1765, 75.7885);
pub const KAL_BHAIRAV: Location = Location::new("Kal Bhairav Temple", 23.1756, 75.7863);
pub const BUS_STATION: Location = Location::new("Bus Station", 23.1798, 75.7845);
pub const DEWAS_ROAD: Location = Location::new("Dewas Road", 23.1812, 75.7932);
pub const PARKING_ZONE_A: Location = Location::new("Parking Zone A", 23.1789, 75.7901);
pub const PARKING_ZONE_B: Location = Location::new("Parking Zone B", 23.1771, 75.7868);

pub const ALL_PLACES: &[Location] = &[
    RAILWAY_STATION,
    RAMGHAT,
    MAHAKALESHWAR,
    KAL_BHAIRAV,
    BUS_STATION,
    DEWAS_ROAD,
    PARKING_ZONE_A,
    PARKING_ZONE_B,
];
