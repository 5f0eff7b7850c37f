//! OSRM route client and its wire-format decoding.

use std::time::Duration;

use log::{debug, info};
use roadradar_core::{GeoPoint, ManeuverKind, ManeuverModifier, Route, RouteStep};
use serde::Deserialize;

use crate::{ProviderError, USER_AGENT};

const OSRM_PUBLIC_URL: &str = "https://router.project-osrm.org";
const ROUTE_TIMEOUT: Duration = Duration::from_secs(10);
/// Stand-in name for unnamed roads.
const UNNAMED_ROAD: &str = "Road";

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

/// GeoJSON geometry: coordinate pairs in [lon, lat] order.
#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    name: String,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    maneuver: OsrmManeuver,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    modifier: String,
    /// [lon, lat] of the maneuver point.
    location: [f64; 2],
}

/// Driving-profile route client against an OSRM HTTP server.
pub struct OsrmClient {
    base_url: String,
}

impl Default for OsrmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OsrmClient {
    pub fn new() -> Self {
        Self {
            base_url: OSRM_PUBLIC_URL.to_string(),
        }
    }

    /// Use a different OSRM instance, e.g. a self-hosted one.
    pub fn with_base_url(url: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            base_url: url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch a driving route between two points.
    pub fn fetch_route(&self, from: GeoPoint, to: GeoPoint) -> Result<Route, ProviderError> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, from.lon, from.lat, to.lon, to.lat
        );
        info!("Fetching route — url={}", url);

        let client = reqwest::blocking::Client::builder()
            .timeout(ROUTE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        let body = client
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("steps", "true"),
            ])
            .send()?
            .error_for_status()?
            .text()?;

        decode_route(&body)
    }
}

/// Decode an OSRM response body into the core route structure. Pure so
/// the wire mapping is testable without a network.
pub fn decode_route(body: &str) -> Result<Route, ProviderError> {
    let resp: OsrmResponse = serde_json::from_str(body)?;
    if resp.code != "Ok" {
        return Err(ProviderError::NoResult(format!("router code {}", resp.code)));
    }
    let Some(osrm) = resp.routes.into_iter().next() else {
        return Err(ProviderError::NoResult("no routes in response".to_string()));
    };

    let polyline: Vec<GeoPoint> = osrm
        .geometry
        .coordinates
        .iter()
        .map(|&[lon, lat]| GeoPoint::new(lat, lon))
        .collect();

    let mut steps = Vec::new();
    for leg in osrm.legs {
        for s in leg.steps {
            let kind = ManeuverKind::from_provider(&s.maneuver.kind);
            let modifier = ManeuverModifier::from_provider(&s.maneuver.modifier);
            let name = if s.name.is_empty() {
                UNNAMED_ROAD.to_string()
            } else {
                s.name
            };
            let [lon, lat] = s.maneuver.location;
            steps.push(RouteStep {
                instruction: describe(kind, modifier, &name),
                name,
                kind,
                modifier,
                location: GeoPoint::new(lat, lon),
                distance_m: s.distance,
                duration_s: s.duration,
            });
        }
    }

    debug!(
        "Route decoded — points={} steps={} distance_m={:.0}",
        polyline.len(),
        steps.len(),
        osrm.distance
    );

    let route = Route {
        total_distance_m: osrm.distance,
        total_duration_s: osrm.duration,
        polyline,
        steps,
    };
    route
        .validate()
        .map_err(|e| ProviderError::NoResult(e.to_string()))?;
    Ok(route)
}

/// Short spoken-style instruction for a step.
fn describe(kind: ManeuverKind, modifier: ManeuverModifier, name: &str) -> String {
    match kind {
        ManeuverKind::Depart => format!("Head out on {}", name),
        ManeuverKind::Arrive => "Arrive at destination".to_string(),
        ManeuverKind::Roundabout => format!("Take the roundabout onto {}", name),
        ManeuverKind::Merge => format!("Merge onto {}", name),
        ManeuverKind::Continue => format!("Continue on {}", name),
        ManeuverKind::Turn | ManeuverKind::Other => match modifier {
            ManeuverModifier::UTurn => format!("Make a u-turn onto {}", name),
            ManeuverModifier::Straight | ManeuverModifier::Unspecified => {
                format!("Continue on {}", name)
            }
            m => format!("Turn {} onto {}", m, name),
        },
    }
}
