// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Network collaborators for RoadRadar: IP geolocation, OSRM routing,
//! Nominatim place search, and an offline route simulator.
//!
//! All HTTP is blocking with per-request timeouts; callers run these on
//! worker threads and treat any error as "nothing this cycle".

pub mod places;
pub mod position;
pub mod routing;
pub mod simulate;

use thiserror::Error;

/// User agent sent with every request. Nominatim in particular rejects
/// anonymous clients.
pub const USER_AGENT: &str = concat!("RoadRadar/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no result: {0}")]
    NoResult(String),
}
