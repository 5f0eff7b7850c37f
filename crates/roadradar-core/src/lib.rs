// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Core navigation model for RoadRadar: geodesic math, route data,
//! progress tracking and the character-grid radar rasterizer.
//!
//! Everything in this crate is pure and synchronous. Network providers and
//! the terminal harness live in their own crates and feed data in through
//! the types exported here.

pub mod geo;
pub mod radar;
pub mod route;
pub mod theme;
pub mod tracker;
pub mod view;

pub use geo::GeoPoint;
pub use route::{
    ManeuverKind, ManeuverModifier, PositionSample, Route, RouteError, RouteStep,
};
pub use theme::{Color, Theme};
pub use tracker::{NavPolicy, NavState, NavSummary, NavigationTracker, TrackerEvent};
pub use view::{PanController, ViewState};
