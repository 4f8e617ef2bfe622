//! Static Ujjain mock data and list queries over it.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::model::{
    Alert, AlertCategory, CrowdReading, ERickshaw, GarbageVehicle, GarbageVehicleStatus, ParkingLot,
    ParkingTrend, RickshawStatus, Severity,
};
use crate::traits::DataProvider;

/// Mahakaleshwar temple area, the default map centre.
pub const UJJAIN_CENTER: (f64, f64) = (23.1765, 75.7885);

/// In-memory provider backed by hand-authored lists.
///
/// Alert and vehicle timestamps are relative to `now` so the lists read as
/// recent whenever they are built.
#[derive(Debug, Clone)]
pub struct StaticDataProvider {
    now: DateTime<Utc>,
}

impl Default for StaticDataProvider {
    fn default() -> Self {
        Self { now: Utc::now() }
    }
}

impl StaticDataProvider {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    fn minutes_ago(&self, minutes: i64) -> DateTime<Utc> {
        self.now - Duration::minutes(minutes)
    }
}

fn rickshaw(
    id: &str,
    position: (f64, f64),
    status: RickshawStatus,
    driver: &str,
    distance_km: f64,
    eta_min: u32,
    fare: Option<u32>,
) -> ERickshaw {
    ERickshaw {
        id: id.to_string(),
        position,
        status,
        driver: driver.to_string(),
        distance_km,
        eta_min,
        fare,
    }
}

fn lot(
    id: &str,
    name: &str,
    position: (f64, f64),
    capacity: u32,
    occupied: u32,
    distance_km: f64,
    trend: ParkingTrend,
) -> ParkingLot {
    ParkingLot {
        id: id.to_string(),
        name: name.to_string(),
        position,
        capacity,
        occupied,
        distance_km,
        trend,
    }
}

impl DataProvider for StaticDataProvider {
    fn rickshaws(&self) -> Vec<ERickshaw> {
        use RickshawStatus::*;
        vec![
            rickshaw("rick_001", (23.1780, 75.7890), Available, "राहुल शर्मा", 0.3, 4, Some(50)),
            rickshaw("rick_002", (23.1750, 75.7870), Available, "अमित कुमार", 0.8, 8, Some(60)),
            rickshaw("rick_003", (23.1790, 75.7910), Busy, "विकास गुप्ता", 1.2, 12, None),
            rickshaw("rick_004", (23.1740, 75.7860), Available, "संजय पटेल", 1.5, 15, Some(80)),
            rickshaw("rick_005", (23.1800, 75.7920), Offline, "रवि यादव", 2.1, 20, None),
            rickshaw("rick_006", (23.1820, 75.7930), Available, "अजय सिंह", 1.8, 18, Some(70)),
            rickshaw("rick_007", (23.1760, 75.7880), Available, "मनोज कुमार", 1.0, 10, Some(55)),
            rickshaw("rick_008", (23.1770, 75.7900), Busy, "सुरेश गुप्ता", 0.9, 9, None),
            rickshaw("rick_009", (23.1810, 75.7940), Available, "दीपक शर्मा", 2.0, 20, Some(85)),
            rickshaw("rick_010", (23.1790, 75.7950), Available, "प्रकाश यादव", 1.7, 17, Some(75)),
        ]
    }

    fn parking_lots(&self) -> Vec<ParkingLot> {
        use ParkingTrend::*;
        vec![
            lot("park_001", "Ramghat Parking A", (23.1785, 75.7895), 500, 425, 0.2, Filling),
            lot("park_002", "Railway Station Parking", (23.1827, 75.7908), 800, 320, 1.1, Stable),
            lot("park_003", "Mahakaleshwar Parking B", (23.1828, 75.7681), 300, 290, 0.4, Filling),
            lot("park_004", "Kal Bhairav Parking", (23.1750, 75.7870), 200, 80, 0.8, Emptying),
        ]
    }

    fn alerts(&self) -> Vec<Alert> {
        vec![
            Alert {
                id: "alert_001".to_string(),
                category: AlertCategory::Vip,
                title: "VIP Movement Alert".to_string(),
                description: "मुख्यमंत्री जी का काफिला 30 मिनट में रामघाट से गुजरेगा। वैकल्पिक रास्ता अपनाएं।"
                    .to_string(),
                area: "Ramghat - Mahakaleshwar Route".to_string(),
                severity: Severity::High,
                position: (23.1780, 75.7890),
                active: true,
                timestamp: self.minutes_ago(15),
            },
            Alert {
                id: "alert_002".to_string(),
                category: AlertCategory::Roadblock,
                title: "Road Closure".to_string(),
                description: "Main road to temple blocked due to procession. Use alternate route via Dewas Road."
                    .to_string(),
                area: "Temple Road Junction".to_string(),
                severity: Severity::Medium,
                position: (23.1755, 75.7870),
                active: true,
                timestamp: self.minutes_ago(45),
            },
            Alert {
                id: "alert_003".to_string(),
                category: AlertCategory::Crowd,
                title: "Heavy Crowd Alert".to_string(),
                description: "भारी भीड़ के कारण रामघाट क्षेत्र में आवाजाही धीमी है। कृपया धैर्य रखें।".to_string(),
                area: "Ramghat Ghat Area".to_string(),
                severity: Severity::High,
                position: (23.1790, 75.7910),
                active: true,
                timestamp: self.minutes_ago(30),
            },
            Alert {
                id: "alert_004".to_string(),
                category: AlertCategory::Emergency,
                title: "Medical Emergency".to_string(),
                description: "Ambulance required at Sector 7. Please clear the way.".to_string(),
                area: "Sector 7 - Near Food Court".to_string(),
                severity: Severity::Critical,
                position: (23.1740, 75.7860),
                active: false,
                timestamp: self.minutes_ago(10),
            },
        ]
    }

    fn garbage_vehicles(&self) -> Vec<GarbageVehicle> {
        let vehicle = |id: &str, position, status, vehicle_no: &str, minutes| GarbageVehicle {
            id: id.to_string(),
            position,
            status,
            vehicle_no: vehicle_no.to_string(),
            last_updated: self.minutes_ago(minutes),
        };
        vec![
            vehicle("gv_001", (23.1805, 75.7875), GarbageVehicleStatus::Active, "MP09GA1234", 5),
            vehicle("gv_002", (23.1770, 75.7900), GarbageVehicleStatus::Active, "MP09GB5678", 10),
            vehicle("gv_003", (23.1755, 75.7865), GarbageVehicleStatus::Maintenance, "MP09GC9012", 60),
            vehicle("gv_004", (23.1810, 75.7890), GarbageVehicleStatus::Active, "MP09GD3456", 2),
        ]
    }

    fn crowd_readings(&self) -> Vec<CrowdReading> {
        let reading = |position, density, area: &str| CrowdReading {
            position,
            density,
            area: area.to_string(),
        };
        vec![
            reading((23.1828, 75.7681), Severity::Critical, "Mahakaleshwar Temple"),
            reading((23.1785, 75.7895), Severity::High, "Ramghat"),
            reading((23.1750, 75.7870), Severity::Medium, "Kal Bhairav Temple"),
            reading((23.1827, 75.7908), Severity::Low, "Railway Station"),
            reading((23.1740, 75.7860), Severity::High, "Bus Station"),
            reading((23.1800, 75.7920), Severity::Medium, "Dewas Road"),
        ]
    }
}

pub fn active_alerts(alerts: &[Alert]) -> Vec<&Alert> {
    alerts.iter().filter(|alert| alert.active).collect()
}

/// Alerts of one category, inactive ones included. The alerts list shows
/// both and counts the active ones separately.
pub fn alerts_by_category(alerts: &[Alert], category: AlertCategory) -> Vec<&Alert> {
    alerts.iter().filter(|alert| alert.category == category).collect()
}

/// Alerts the user silenced in the alerts list.
#[derive(Debug, Clone, Default)]
pub struct AlertMutes {
    muted: HashSet<String>,
}

impl AlertMutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the mute state of `alert_id`. Returns `true` when it is now muted.
    pub fn toggle(&mut self, alert_id: &str) -> bool {
        if self.muted.remove(alert_id) {
            false
        } else {
            self.muted.insert(alert_id.to_string());
            true
        }
    }

    pub fn is_muted(&self, alert_id: &str) -> bool {
        self.muted.contains(alert_id)
    }

    pub fn len(&self) -> usize {
        self.muted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.muted.is_empty()
    }
}

/// Lots with at least one free spot, most available first.
pub fn available_parking(lots: &[ParkingLot]) -> Vec<&ParkingLot> {
    let mut available: Vec<&ParkingLot> = lots.iter().filter(|lot| lot.available() > 0).collect();
    available.sort_by(|a, b| b.available().cmp(&a.available()));
    available
}

pub fn total_available_spots(lots: &[ParkingLot]) -> u32 {
    lots.iter().map(ParkingLot::available).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique_within_lists() {
        let provider = StaticDataProvider::default();
        let rickshaw_ids: HashSet<_> = provider.rickshaws().into_iter().map(|r| r.id).collect();
        assert_eq!(rickshaw_ids.len(), 10);
        let lot_ids: HashSet<_> = provider.parking_lots().into_iter().map(|l| l.id).collect();
        assert_eq!(lot_ids.len(), 4);
        let alert_ids: HashSet<_> = provider.alerts().into_iter().map(|a| a.id).collect();
        assert_eq!(alert_ids.len(), 4);
    }

    #[test]
    fn test_active_alerts_excludes_inactive() {
        let alerts = StaticDataProvider::default().alerts();
        let active = active_alerts(&alerts);
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|alert| alert.id != "alert_004"));
    }

    #[test]
    fn test_alerts_by_category_keeps_inactive() {
        let alerts = StaticDataProvider::default().alerts();
        assert_eq!(alerts_by_category(&alerts, AlertCategory::Vip).len(), 1);

        let emergency = alerts_by_category(&alerts, AlertCategory::Emergency);
        assert_eq!(emergency.len(), 1);
        assert_eq!(emergency[0].id, "alert_004");
        assert!(!emergency[0].active);
        assert!(alerts_by_category(&alerts, AlertCategory::Weather).is_empty());
    }

    #[test]
    fn test_alert_mute_toggle() {
        let mut mutes = AlertMutes::new();
        assert!(mutes.toggle("alert_001"));
        assert!(mutes.is_muted("alert_001"));
        assert!(!mutes.is_muted("alert_002"));
        assert!(!mutes.toggle("alert_001"));
        assert!(mutes.is_empty());
    }

    #[test]
    fn test_available_parking_sorted() {
        let lots = StaticDataProvider::default().parking_lots();
        let sorted = available_parking(&lots);
        assert_eq!(sorted[0].id, "park_002");
        assert_eq!(sorted.last().map(|lot| lot.id.as_str()), Some("park_003"));
        assert_eq!(total_available_spots(&lots), 75 + 480 + 10 + 120);
    }

    #[test]
    fn test_timestamps_relative_to_now() {
        let now = Utc::now();
        let alerts = StaticDataProvider::new(now).alerts();
        assert_eq!(alerts[0].timestamp, now - Duration::minutes(15));
    }
}
