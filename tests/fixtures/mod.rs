//! Test fixtures for simhastha-emove.
//!
//! Provides:
//! - Real Ujjain landmark coordinates
//! - Builders for rickshaws, parking lots and alerts with sensible defaults

#![allow(dead_code)]

pub mod ujjain_locations;

pub use ujjain_locations::*;

use chrono::Utc;

use simhastha_emove::model::{
    Alert, AlertCategory, ERickshaw, EntitySet, ParkingLot, ParkingTrend, RickshawStatus, Severity,
};

/// Builder for test rickshaws.
#[derive(Clone, Debug)]
pub struct TestRickshaw(ERickshaw);

impl TestRickshaw {
    pub fn new(id: &str) -> Self {
        Self(ERickshaw {
            id: id.to_string(),
            position: MAHAKALESHWAR.coords(),
            status: RickshawStatus::Available,
            driver: format!("Driver {}", id),
            distance_km: 0.0,
            eta_min: 0,
            fare: None,
        })
    }

    pub fn at(mut self, location: &Location) -> Self {
        self.0.position = location.coords();
        self
    }

    pub fn status(mut self, status: RickshawStatus) -> Self {
        self.0.status = status;
        self
    }

    pub fn build(self) -> ERickshaw {
        self.0
    }
}

/// Builder for test parking lots.
#[derive(Clone, Debug)]
pub struct TestLot(ParkingLot);

impl TestLot {
    pub fn new(id: &str) -> Self {
        Self(ParkingLot {
            id: id.to_string(),
            name: format!("Lot {}", id),
            position: RAMGHAT.coords(),
            capacity: 100,
            occupied: 40,
            distance_km: 0.0,
            trend: ParkingTrend::Stable,
        })
    }

    pub fn at(mut self, location: &Location) -> Self {
        self.0.position = location.coords();
        self
    }

    pub fn occupancy(mut self, capacity: u32, occupied: u32) -> Self {
        self.0.capacity = capacity;
        self.0.occupied = occupied;
        self
    }

    pub fn build(self) -> ParkingLot {
        self.0
    }
}

/// Builder for test alerts. Active by default.
#[derive(Clone, Debug)]
pub struct TestAlert(Alert);

impl TestAlert {
    pub fn new(id: &str) -> Self {
        Self(Alert {
            id: id.to_string(),
            category: AlertCategory::Crowd,
            title: format!("Alert {}", id),
            description: "Heavy crowd".to_string(),
            area: "Ramghat".to_string(),
            severity: Severity::High,
            position: RAMGHAT.coords(),
            active: true,
            timestamp: Utc::now(),
        })
    }

    pub fn inactive(mut self) -> Self {
        self.0.active = false;
        self
    }

    pub fn category(mut self, category: AlertCategory) -> Self {
        self.0.category = category;
        self
    }

    pub fn build(self) -> Alert {
        self.0
    }
}

/// 3 rickshaws, 2 lots, 1 active and 1 inactive alert.
pub fn small_entity_set() -> EntitySet {
    EntitySet {
        rickshaws: vec![
            TestRickshaw::new("r1").at(&RAILWAY_STATION).build(),
            TestRickshaw::new("r2").at(&BUS_STATION).status(RickshawStatus::Busy).build(),
            TestRickshaw::new("r3").at(&DEWAS_ROAD).status(RickshawStatus::Offline).build(),
        ],
        parking_lots: vec![
            TestLot::new("p1").at(&PARKING_ZONE_A).build(),
            TestLot::new("p2").at(&PARKING_ZONE_B).occupancy(300, 290).build(),
        ],
        alerts: vec![
            TestAlert::new("a1").category(AlertCategory::Vip).build(),
            TestAlert::new("a2").category(AlertCategory::Emergency).inactive().build(),
        ],
    }
}
