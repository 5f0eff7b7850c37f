//! Route data model shared by the providers, the tracker and the radar.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::GeoPoint;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteError {
    #[error("route has no steps")]
    NoSteps,
    #[error("route polyline has {0} point(s), need at least 2")]
    ShortPolyline(usize),
}

/// Maneuver categories the display distinguishes. Providers map their own
/// vocabulary onto this set; anything unrecognized lands on `Other` so an
/// exotic maneuver never fails a whole route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverKind {
    Depart,
    Turn,
    Continue,
    Merge,
    Roundabout,
    Arrive,
    Other,
}

impl ManeuverKind {
    /// Map a provider's free-form maneuver type string.
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "depart" => Self::Depart,
            "turn" | "end of road" | "fork" => Self::Turn,
            "continue" | "new name" => Self::Continue,
            "merge" | "on ramp" | "off ramp" => Self::Merge,
            "roundabout" | "rotary" | "roundabout turn" | "exit roundabout" | "exit rotary" => {
                Self::Roundabout
            }
            "arrive" => Self::Arrive,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ManeuverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Depart => "depart",
            Self::Turn => "turn",
            Self::Continue => "continue",
            Self::Merge => "merge",
            Self::Roundabout => "roundabout",
            Self::Arrive => "arrive",
            Self::Other => "maneuver",
        };
        f.write_str(text)
    }
}

/// Direction qualifier attached to a maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverModifier {
    Left,
    SlightLeft,
    SharpLeft,
    Right,
    SlightRight,
    SharpRight,
    Straight,
    UTurn,
    Unspecified,
}

impl ManeuverModifier {
    /// Map a provider's modifier string; absent or unknown is `Unspecified`.
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "left" => Self::Left,
            "slight left" => Self::SlightLeft,
            "sharp left" => Self::SharpLeft,
            "right" => Self::Right,
            "slight right" => Self::SlightRight,
            "sharp right" => Self::SharpRight,
            "straight" => Self::Straight,
            "uturn" => Self::UTurn,
            _ => Self::Unspecified,
        }
    }

    /// True for the left/right family, the ones worth announcing.
    pub fn is_directional(&self) -> bool {
        !matches!(self, Self::Straight | Self::Unspecified)
    }
}

impl fmt::Display for ManeuverModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Left => "left",
            Self::SlightLeft => "slight left",
            Self::SharpLeft => "sharp left",
            Self::Right => "right",
            Self::SlightRight => "slight right",
            Self::SharpRight => "sharp right",
            Self::Straight => "straight",
            Self::UTurn => "u-turn",
            Self::Unspecified => "ahead",
        };
        f.write_str(text)
    }
}

/// One maneuver of a route. `distance_m` and `duration_s` are the static
/// estimates fixed at fetch time; the live distance to the maneuver comes
/// from the tracker instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Road name; providers substitute a placeholder for unnamed roads.
    pub name: String,
    /// Spoken-style instruction for the step.
    pub instruction: String,
    pub kind: ManeuverKind,
    pub modifier: ManeuverModifier,
    /// Where the maneuver happens.
    pub location: GeoPoint,
    /// Length of the step in meters.
    pub distance_m: f64,
    /// Expected time to cover the step in seconds.
    pub duration_s: f64,
}

/// A fetched route: the drawn geometry plus the ordered maneuver list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub total_distance_m: f64,
    pub total_duration_s: f64,
    /// Driven path, ordered origin to destination.
    pub polyline: Vec<GeoPoint>,
    /// Ordered maneuvers; the final step is the arrival.
    pub steps: Vec<RouteStep>,
}

impl Route {
    /// A usable route has at least one step and a drawable polyline.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.steps.is_empty() {
            return Err(RouteError::NoSteps);
        }
        if self.polyline.len() < 2 {
            return Err(RouteError::ShortPolyline(self.polyline.len()));
        }
        Ok(())
    }

    /// Final point of the polyline.
    pub fn destination(&self) -> Option<GeoPoint> {
        self.polyline.last().copied()
    }
}

/// A position fix as delivered by a position source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub point: GeoPoint,
    /// Accuracy or provenance label shown in the status pane, e.g. "~10km".
    pub label: String,
}
