//! Marker, popup and line descriptions handed to a map surface.

use serde::{Deserialize, Serialize};

use crate::model::{Alert, ERickshaw, EntitySet, ParkingLot};

/// Z-index for markers that must sit above everything else.
pub const TOP_Z_INDEX: i32 = 1000;

/// Entity categories the live map can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapFilter {
    #[default]
    All,
    Rickshaws,
    Parking,
    Alerts,
    None,
}

impl MapFilter {
    pub fn shows_rickshaws(&self) -> bool {
        matches!(self, MapFilter::All | MapFilter::Rickshaws)
    }

    pub fn shows_parking(&self) -> bool {
        matches!(self, MapFilter::All | MapFilter::Parking)
    }

    pub fn shows_alerts(&self) -> bool {
        matches!(self, MapFilter::All | MapFilter::Alerts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    Rickshaw,
    Parking,
    Alert,
    User,
    RouteStart,
    RouteEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerIcon {
    /// Image icon at `url`, drawn `size` px square.
    Image { url: String, size: u32, centered: bool },
    /// Filled circle with a white outline.
    Dot { scale: u32, fill: String, stroke_weight: u32 },
}

impl MarkerIcon {
    fn image(url: &str, centered: bool) -> Self {
        MarkerIcon::Image {
            url: url.to_string(),
            size: 32,
            centered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub kind: MarkerKind,
    /// Id of the entity this marker stands for, if any.
    pub entity_id: Option<String>,
    pub position: (f64, f64),
    pub title: String,
    pub icon: MarkerIcon,
    pub z_index: Option<i32>,
    /// Toggled on every blink tick while displayed.
    pub blinking: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineSpec {
    pub path: Vec<(f64, f64)>,
    pub geodesic: bool,
    pub color: String,
    pub opacity: f64,
    pub weight: u32,
}

impl PolylineSpec {
    /// Orange route line between two points.
    pub fn route(origin: (f64, f64), destination: (f64, f64)) -> Self {
        Self {
            path: vec![origin, destination],
            geodesic: true,
            color: "#FF6B35".to_string(),
            opacity: 1.0,
            weight: 4,
        }
    }
}

/// Content of a marker's info window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoPopup {
    pub title: String,
    pub lines: Vec<String>,
}

fn coords_line(position: (f64, f64)) -> String {
    format!("{:.6}, {:.6}", position.0, position.1)
}

pub fn rickshaw_marker(rickshaw: &ERickshaw) -> MarkerSpec {
    MarkerSpec {
        kind: MarkerKind::Rickshaw,
        entity_id: Some(rickshaw.id.clone()),
        position: rickshaw.position,
        title: format!("E-Rickshaw - {}", rickshaw.driver),
        icon: MarkerIcon::image("/icons/e-rickshaw.png", true),
        z_index: Some(TOP_Z_INDEX),
        blinking: true,
    }
}

pub fn parking_marker(lot: &ParkingLot) -> MarkerSpec {
    MarkerSpec {
        kind: MarkerKind::Parking,
        entity_id: Some(lot.id.clone()),
        position: lot.position,
        title: format!("Parking - {}", lot.name),
        icon: MarkerIcon::image("/icons/parking-spot.png", false),
        z_index: None,
        blinking: false,
    }
}

pub fn alert_marker(alert: &Alert) -> MarkerSpec {
    MarkerSpec {
        kind: MarkerKind::Alert,
        entity_id: Some(alert.id.clone()),
        position: alert.position,
        title: format!("Alert - {}", alert.title),
        icon: MarkerIcon::image("/icons/alert-pin.png", false),
        z_index: None,
        blinking: false,
    }
}

pub fn user_marker(position: (f64, f64)) -> MarkerSpec {
    MarkerSpec {
        kind: MarkerKind::User,
        entity_id: None,
        position,
        title: "Your Location".to_string(),
        icon: MarkerIcon::Dot {
            scale: 12,
            fill: "#4285F4".to_string(),
            stroke_weight: 3,
        },
        z_index: Some(TOP_Z_INDEX),
        blinking: false,
    }
}

pub fn route_endpoint_marker(kind: MarkerKind, position: (f64, f64)) -> MarkerSpec {
    let (title, url) = match kind {
        MarkerKind::RouteStart => ("Start", "https://maps.google.com/mapfiles/ms/icons/green-dot.png"),
        _ => ("Destination", "https://maps.google.com/mapfiles/ms/icons/red-dot.png"),
    };
    MarkerSpec {
        kind,
        entity_id: None,
        position,
        title: title.to_string(),
        icon: MarkerIcon::image(url, false),
        z_index: None,
        blinking: false,
    }
}

pub fn rickshaw_popup(rickshaw: &ERickshaw) -> InfoPopup {
    InfoPopup {
        title: "E-Rickshaw".to_string(),
        lines: vec![
            format!("Driver: {}", rickshaw.driver),
            format!("Status: {}", rickshaw.status.as_str()),
            coords_line(rickshaw.position),
        ],
    }
}

pub fn parking_popup(lot: &ParkingLot) -> InfoPopup {
    InfoPopup {
        title: format!("Parking: {}", lot.name),
        lines: vec![
            format!("Available: {}/{}", lot.available(), lot.capacity),
            coords_line(lot.position),
        ],
    }
}

pub fn alert_popup(alert: &Alert) -> InfoPopup {
    InfoPopup {
        title: format!("Alert: {}", alert.title),
        lines: vec![
            format!("Area: {}", alert.area),
            format!("Severity: {}", alert.severity.as_str()),
            coords_line(alert.position),
        ],
    }
}

/// Popup for the "you are here" marker. `accuracy` is `None` in override mode.
pub fn user_popup(accuracy: Option<f64>) -> InfoPopup {
    match accuracy {
        Some(meters) => InfoPopup {
            title: "Your Current Location".to_string(),
            lines: vec![format!("Accuracy: {:.0}m", meters)],
        },
        None => InfoPopup {
            title: "Your Navigation Location".to_string(),
            lines: vec!["Navigated to this location".to_string()],
        },
    }
}

/// A marker together with the popup its click opens.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEntry {
    pub spec: MarkerSpec,
    pub popup: InfoPopup,
}

/// Every entity the filter lets through, rickshaws first, then parking, then
/// active alerts.
pub fn visible_entries(filter: MapFilter, entities: &EntitySet) -> Vec<MarkerEntry> {
    let mut entries = Vec::new();
    if filter.shows_rickshaws() {
        entries.extend(entities.rickshaws.iter().map(|rickshaw| MarkerEntry {
            spec: rickshaw_marker(rickshaw),
            popup: rickshaw_popup(rickshaw),
        }));
    }
    if filter.shows_parking() {
        entries.extend(entities.parking_lots.iter().map(|lot| MarkerEntry {
            spec: parking_marker(lot),
            popup: parking_popup(lot),
        }));
    }
    if filter.shows_alerts() {
        entries.extend(entities.alerts.iter().filter(|alert| alert.active).map(|alert| MarkerEntry {
            spec: alert_marker(alert),
            popup: alert_popup(alert),
        }));
    }
    entries
}

pub fn visible_markers(filter: MapFilter, entities: &EntitySet) -> Vec<MarkerSpec> {
    visible_entries(filter, entities)
        .into_iter()
        .map(|entry| entry.spec)
        .collect()
}
