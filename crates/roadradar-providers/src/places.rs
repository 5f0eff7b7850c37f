//! Nominatim place search and the coordinate-literal shortcut.

use std::sync::OnceLock;
use std::time::Duration;

use log::debug;
use regex::Regex;
use roadradar_core::GeoPoint;
use serde::Deserialize;

use crate::{ProviderError, USER_AGENT};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(5);
/// Suggestion list length in the search overlay.
const MAX_RESULTS: usize = 6;
/// Half-width in degrees of the bias box around the current position.
const VIEWBOX_SPAN_DEG: f64 = 2.0;
/// Display names get unwieldy; keep the leading part.
const NAME_LIMIT: usize = 50;

/// A named place candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub point: GeoPoint,
}

/// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimRow {
    display_name: String,
    lat: String,
    lon: String,
}

/// Free-text place search against a Nominatim instance.
pub struct NominatimClient {
    url: String,
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NominatimClient {
    pub fn new() -> Self {
        Self {
            url: NOMINATIM_URL.to_string(),
        }
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Search for up to [`MAX_RESULTS`] places, biased toward `near`
    /// when given. Queries shorter than two characters return nothing.
    pub fn search(&self, query: &str, near: Option<GeoPoint>) -> Result<Vec<Place>, ProviderError> {
        let query = query.trim();
        if query.len() < 2 {
            return Ok(Vec::new());
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        let mut params: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("limit", MAX_RESULTS.to_string()),
        ];
        if let Some(p) = near {
            params.push((
                "viewbox",
                format!(
                    "{},{},{},{}",
                    p.lon - VIEWBOX_SPAN_DEG,
                    p.lat + VIEWBOX_SPAN_DEG,
                    p.lon + VIEWBOX_SPAN_DEG,
                    p.lat - VIEWBOX_SPAN_DEG
                ),
            ));
        }

        let rows: Vec<NominatimRow> = client
            .get(&self.url)
            .query(&params)
            .send()?
            .error_for_status()?
            .json()?;

        let places: Vec<Place> = rows.into_iter().filter_map(row_to_place).collect();
        debug!("Place search — query={} results={}", query, places.len());
        Ok(places)
    }
}

/// Rows with unparseable coordinates are dropped, not errors.
fn row_to_place(row: NominatimRow) -> Option<Place> {
    let lat: f64 = row.lat.parse().ok()?;
    let lon: f64 = row.lon.parse().ok()?;
    let name: String = row.display_name.chars().take(NAME_LIMIT).collect();
    Some(Place {
        name,
        point: GeoPoint::new(lat, lon),
    })
}

/// Recognize a raw "lat, lon" literal so coordinates bypass geocoding.
/// Whitespace-tolerant; values outside the valid ranges are rejected.
pub fn parse_coordinates(input: &str) -> Option<GeoPoint> {
    static COORD_RE: OnceLock<Regex> = OnceLock::new();
    let re = COORD_RE.get_or_init(|| {
        Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$").unwrap()
    });

    let caps = re.captures(input)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lon: f64 = caps[2].parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some(GeoPoint::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinates_accepts_literals() {
        assert_eq!(
            parse_coordinates("13.0827, 80.2707"),
            Some(GeoPoint::new(13.0827, 80.2707))
        );
        assert_eq!(
            parse_coordinates("  -33.86,151.21  "),
            Some(GeoPoint::new(-33.86, 151.21))
        );
        assert_eq!(parse_coordinates("51,0"), Some(GeoPoint::new(51.0, 0.0)));
    }

    #[test]
    fn test_parse_coordinates_rejects_garbage() {
        assert_eq!(parse_coordinates("Chennai"), None);
        assert_eq!(parse_coordinates("13.08"), None);
        assert_eq!(parse_coordinates("13.08, 80.27, 5"), None);
        assert_eq!(parse_coordinates("91.0, 10.0"), None);
        assert_eq!(parse_coordinates("45.0, 181.0"), None);
        assert_eq!(parse_coordinates(""), None);
    }

    #[test]
    fn test_row_conversion_truncates_and_parses() {
        let long_name = "a".repeat(80);
        let row = NominatimRow {
            display_name: long_name,
            lat: "12.9716".to_string(),
            lon: "77.5946".to_string(),
        };
        let place = row_to_place(row).unwrap();
        assert_eq!(place.name.len(), NAME_LIMIT);
        assert_eq!(place.point, GeoPoint::new(12.9716, 77.5946));

        let bad = NominatimRow {
            display_name: "X".to_string(),
            lat: "not-a-number".to_string(),
            lon: "77.0".to_string(),
        };
        assert!(row_to_place(bad).is_none());
    }

    #[test]
    fn test_nominatim_rows_decode() {
        let body = r#"[
            {"place_id": 1, "display_name": "Chennai, Tamil Nadu, India",
             "lat": "13.0827", "lon": "80.2707", "importance": 0.7},
            {"place_id": 2, "display_name": "Chennai Central",
             "lat": "13.0694", "lon": "80.2762"}
        ]"#;
        let rows: Vec<NominatimRow> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].display_name, "Chennai, Tamil Nadu, India");
    }
}
