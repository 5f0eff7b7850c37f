// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Spherical-earth geodesics and the display formatting helpers that go
//! with them. All angles are degrees at the API surface, radians inside.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (spherical model).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// The eight compass labels, clockwise from true north.
pub const COMPASS_LABELS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle distance between two points in meters, by the haversine
/// formula. Symmetric; zero for identical points.
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding near the antipode can push h a hair past 1.0; 1 - h must
    // stay non-negative for the roots below.
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing from `a` toward `b`, in degrees clockwise
/// from true north, wrapped into [0, 360). Coincident points yield 0.
pub fn bearing_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lon = (b.lon - a.lon).to_radians();
    let x = d_lon.sin() * b.lat.to_radians().cos();
    let y = a.lat.to_radians().cos() * b.lat.to_radians().sin()
        - a.lat.to_radians().sin() * b.lat.to_radians().cos() * d_lon.cos();
    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

/// Index into [`COMPASS_LABELS`] for a bearing: nearest 45-degree bucket,
/// with north owning both ends of the circle.
pub fn compass_index(bearing_deg: f64) -> usize {
    ((bearing_deg / 45.0).round() as usize) % 8
}

/// Nearest compass label for a bearing in [0, 360).
pub fn compass_label(bearing_deg: f64) -> &'static str {
    COMPASS_LABELS[compass_index(bearing_deg)]
}

/// Human-readable distance: whole meters below one kilometer, otherwise
/// kilometers with one decimal.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters as i64)
    }
}

/// Same thresholds as [`format_distance`] but without the space, for
/// labels packed into the radar grid.
pub fn format_distance_compact(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1}km", meters / 1000.0)
    } else {
        format!("{}m", meters as i64)
    }
}

/// Human-readable duration: "1h 5m" above an hour, otherwise "12 min".
pub fn format_duration(seconds: f64) -> String {
    let hours = (seconds / 3600.0) as i64;
    let minutes = ((seconds % 3600.0) / 60.0) as i64;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{} min", minutes)
    }
}
