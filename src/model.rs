//! Display records for everything the map and list views show.
//!
//! Positions are `(lat, lng)` tuples in degrees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RickshawStatus {
    Available,
    Busy,
    Offline,
}

impl RickshawStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RickshawStatus::Available => "available",
            RickshawStatus::Busy => "busy",
            RickshawStatus::Offline => "offline",
        }
    }
}

/// A battery-powered passenger rickshaw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ERickshaw {
    pub id: String,
    pub position: (f64, f64),
    pub status: RickshawStatus,
    pub driver: String,
    /// Distance from the user in km, as last annotated.
    pub distance_km: f64,
    /// Estimated pickup time in minutes.
    pub eta_min: u32,
    pub fare: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarbageVehicleStatus {
    Active,
    Inactive,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarbageVehicle {
    pub id: String,
    pub position: (f64, f64),
    pub status: GarbageVehicleStatus,
    pub vehicle_no: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParkingTrend {
    Filling,
    Stable,
    Emptying,
}

/// Occupancy band used for colouring lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyLevel {
    Normal,
    High,
    Critical,
}

/// Availability band used for the summary counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityBand {
    Plenty,
    Limited,
    Scarce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingLot {
    pub id: String,
    pub name: String,
    pub position: (f64, f64),
    pub capacity: u32,
    pub occupied: u32,
    pub distance_km: f64,
    /// Assigned by hand, not computed from history.
    pub trend: ParkingTrend,
}

impl ParkingLot {
    pub fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.occupied)
    }

    pub fn occupancy_percent(&self) -> u32 {
        if self.capacity == 0 {
            return 0;
        }
        (self.occupied as f64 / self.capacity as f64 * 100.0).round() as u32
    }

    pub fn occupancy_level(&self) -> OccupancyLevel {
        match self.occupancy_percent() {
            p if p >= 90 => OccupancyLevel::Critical,
            p if p >= 75 => OccupancyLevel::High,
            _ => OccupancyLevel::Normal,
        }
    }

    pub fn availability_band(&self) -> AvailabilityBand {
        match self.available() {
            a if a > 50 => AvailabilityBand::Plenty,
            a if a > 10 => AvailabilityBand::Limited,
            _ => AvailabilityBand::Scarce,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Vip,
    Roadblock,
    Emergency,
    Crowd,
    Weather,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// A time-bounded notice about something happening in an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub category: AlertCategory,
    pub title: String,
    pub description: String,
    pub area: String,
    pub severity: Severity,
    pub position: (f64, f64),
    pub active: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrowdReading {
    pub position: (f64, f64),
    pub density: Severity,
    pub area: String,
}

/// The three entity lists the map draws from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySet {
    pub rickshaws: Vec<ERickshaw>,
    pub parking_lots: Vec<ParkingLot>,
    pub alerts: Vec<Alert>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot(capacity: u32, occupied: u32) -> ParkingLot {
        ParkingLot {
            id: "p".to_string(),
            name: "Lot".to_string(),
            position: (23.0, 75.0),
            capacity,
            occupied,
            distance_km: 0.0,
            trend: ParkingTrend::Stable,
        }
    }

    #[test]
    fn test_available_is_derived() {
        assert_eq!(lot(500, 425).available(), 75);
        assert_eq!(lot(10, 12).available(), 0);
    }

    #[test]
    fn test_occupancy_bands() {
        assert_eq!(lot(300, 290).occupancy_level(), OccupancyLevel::Critical);
        assert_eq!(lot(500, 425).occupancy_level(), OccupancyLevel::High);
        assert_eq!(lot(800, 320).occupancy_level(), OccupancyLevel::Normal);
        assert_eq!(lot(0, 0).occupancy_percent(), 0);
    }

    #[test]
    fn test_availability_bands() {
        assert_eq!(lot(800, 320).availability_band(), AvailabilityBand::Plenty);
        assert_eq!(lot(100, 60).availability_band(), AvailabilityBand::Limited);
        assert_eq!(lot(300, 290).availability_band(), AvailabilityBand::Scarce);
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        let json = serde_json::to_string(&AlertCategory::Roadblock).unwrap();
        assert_eq!(json, "\"roadblock\"");
        let status: RickshawStatus = serde_json::from_str("\"busy\"").unwrap();
        assert_eq!(status, RickshawStatus::Busy);
    }
}
