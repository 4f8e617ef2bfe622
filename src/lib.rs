//! simhastha-emove core
//!
//! Headless core of the Simhastha e-Move client: live map marker management,
//! route lookup, location tracking, session and translation lookups. Map SDKs
//! and device geolocation plug in through the traits in [`traits`].

pub mod traits;
pub mod model;
pub mod data;
pub mod haversine;
pub mod polyline;
pub mod bounds;
pub mod route;
pub mod markers;
pub mod surface;
pub mod location;
pub mod map_view;
pub mod maps_api;
pub mod session;
pub mod auth;
pub mod i18n;
