//! IP-geolocation position source.

use std::time::Duration;

use log::{debug, warn};
use roadradar_core::{GeoPoint, PositionSample};
use serde::Deserialize;

use crate::{ProviderError, USER_AGENT};

const IP_API_URL: &str = "http://ip-api.com/json/";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(4);
/// IP lookups resolve to city level at best.
const ACCURACY_LABEL: &str = "~10km";

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Coarse position source that needs no sensor: geolocates the public IP
/// of the machine.
pub struct IpLocator {
    url: String,
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IpLocator {
    pub fn new() -> Self {
        Self {
            url: IP_API_URL.to_string(),
        }
    }

    /// Point the locator at a different endpoint (used by tests).
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// One fix. Failures surface as errors so the caller can skip the
    /// cycle and keep the previous position.
    pub fn current_position(&self) -> Result<PositionSample, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        let resp: IpApiResponse = client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .json()?;

        match (resp.status.as_str(), resp.lat, resp.lon) {
            ("success", Some(lat), Some(lon)) => {
                debug!("IP position fix — lat={:.4} lon={:.4}", lat, lon);
                Ok(PositionSample {
                    point: GeoPoint::new(lat, lon),
                    label: ACCURACY_LABEL.to_string(),
                })
            }
            _ => {
                warn!("IP position lookup returned no fix — status={}", resp.status);
                Err(ProviderError::NoResult("IP lookup failed".to_string()))
            }
        }
    }
}
