// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Route-progress state machine. Owns the installed route and the index of
//! the maneuver the driver is currently heading for; progress moves only
//! on proximity, never on time.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::geo::{self, GeoPoint};
use crate::route::{Route, RouteError, RouteStep};

/// Tunable navigation thresholds, persisted with the user settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavPolicy {
    /// Advance to the next step once the fix is strictly closer than this.
    pub arrival_threshold_m: f64,
    /// Seconds between tracked position refreshes.
    pub poll_interval_s: u64,
}

impl Default for NavPolicy {
    fn default() -> Self {
        Self {
            arrival_threshold_m: 50.0,
            poll_interval_s: 5,
        }
    }
}

/// Where the tracker is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    NoRoute,
    /// Heading for the step at this index.
    EnRoute(usize),
    Arrived,
}

/// Outcome of feeding one position fix to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// No boundary crossed; also returned when there is no route or no fix.
    Unchanged,
    /// Progressed to the step at `index`; `name` is its road name.
    StepAdvanced { index: usize, name: String },
    /// The final step's location was reached.
    Arrived,
}

impl TrackerEvent {
    pub fn advanced(&self) -> bool {
        !matches!(self, TrackerEvent::Unchanged)
    }
}

/// Progress summary for the side panels, derived in one place so every
/// view agrees on the numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct NavSummary {
    /// Live distance to the active maneuver when a fix is available,
    /// otherwise the step's static length. `None` without a route.
    pub distance_to_turn_m: Option<f64>,
    pub current_step_name: Option<String>,
    pub steps_remaining: usize,
    /// Sum of the static lengths of the steps not yet completed.
    pub remaining_distance_m: f64,
    /// Sum of the static durations of the steps not yet completed.
    pub eta_s: f64,
    pub arrived: bool,
}

#[derive(Debug)]
pub struct NavigationTracker {
    policy: NavPolicy,
    route: Option<Route>,
    current_step: usize,
    arrived: bool,
}

impl NavigationTracker {
    pub fn new(policy: NavPolicy) -> Self {
        Self {
            policy,
            route: None,
            current_step: 0,
            arrived: false,
        }
    }

    pub fn policy(&self) -> NavPolicy {
        self.policy
    }

    pub fn state(&self) -> NavState {
        match &self.route {
            None => NavState::NoRoute,
            Some(_) if self.arrived => NavState::Arrived,
            Some(_) => NavState::EnRoute(self.current_step),
        }
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step
    }

    pub fn current_step(&self) -> Option<&RouteStep> {
        self.route
            .as_ref()
            .and_then(|r| r.steps.get(self.current_step))
    }

    pub fn arrived(&self) -> bool {
        self.arrived
    }

    /// Install a new route and restart progress at step 0.
    ///
    /// A route whose only step is the arrival still starts `EnRoute`;
    /// arrival is declared exclusively by a fix inside the threshold.
    /// A route that fails validation is rejected and the previous state
    /// is left untouched.
    pub fn install_route(&mut self, route: Route) -> Result<(), RouteError> {
        route.validate()?;
        info!(
            "Route installed — steps={} distance_m={:.0} duration_s={:.0}",
            route.steps.len(),
            route.total_distance_m,
            route.total_duration_s
        );
        self.route = Some(route);
        self.current_step = 0;
        self.arrived = false;
        Ok(())
    }

    /// Drop the route and all progress.
    pub fn clear(&mut self) {
        if self.route.take().is_some() {
            info!("Route cleared");
        }
        self.current_step = 0;
        self.arrived = false;
    }

    /// Feed a position fix. Only the current step is checked, so one call
    /// crosses at most one step boundary even when several upcoming
    /// maneuvers sit inside the threshold. `None` means no fix this cycle
    /// and leaves the state untouched.
    pub fn update(&mut self, position: Option<GeoPoint>) -> TrackerEvent {
        let Some(position) = position else {
            return TrackerEvent::Unchanged;
        };
        let Some(route) = &self.route else {
            return TrackerEvent::Unchanged;
        };
        if self.arrived {
            return TrackerEvent::Unchanged;
        }

        let step = &route.steps[self.current_step];
        let dist = geo::distance_m(position, step.location);
        if dist >= self.policy.arrival_threshold_m {
            return TrackerEvent::Unchanged;
        }

        if self.current_step + 1 == route.steps.len() {
            self.arrived = true;
            info!("Arrived — step={} dist_m={:.0}", step.name, dist);
            TrackerEvent::Arrived
        } else {
            self.current_step += 1;
            let name = route.steps[self.current_step].name.clone();
            debug!(
                "Step advanced — index={} name={} dist_m={:.0}",
                self.current_step, name, dist
            );
            TrackerEvent::StepAdvanced {
                index: self.current_step,
                name,
            }
        }
    }

    /// Manual skip to the next step. Stops at the final step and never
    /// synthesizes an arrival. Returns whether anything moved.
    pub fn advance_step(&mut self) -> bool {
        match &self.route {
            Some(route) if !self.arrived && self.current_step + 1 < route.steps.len() => {
                self.current_step += 1;
                true
            }
            _ => false,
        }
    }

    /// Manual step back; leaving the arrived state counts as a move.
    pub fn retreat_step(&mut self) -> bool {
        if self.route.is_none() {
            return false;
        }
        if self.arrived {
            self.arrived = false;
            return true;
        }
        if self.current_step > 0 {
            self.current_step -= 1;
            true
        } else {
            false
        }
    }

    /// Remaining (distance, duration) as per-step sums from the current
    /// step onward. Both are zero once arrived or without a route.
    pub fn remaining(&self) -> (f64, f64) {
        if self.arrived {
            return (0.0, 0.0);
        }
        match &self.route {
            Some(route) => route.steps[self.current_step..]
                .iter()
                .fold((0.0, 0.0), |(d, t), s| (d + s.distance_m, t + s.duration_s)),
            None => (0.0, 0.0),
        }
    }

    /// Live distance from `position` to the active maneuver.
    pub fn distance_to_current_step(&self, position: GeoPoint) -> Option<f64> {
        self.current_step()
            .map(|s| geo::distance_m(position, s.location))
    }

    /// Build the panel summary for an optional current fix.
    pub fn summary(&self, position: Option<GeoPoint>) -> NavSummary {
        if self.arrived {
            return NavSummary {
                distance_to_turn_m: None,
                current_step_name: None,
                steps_remaining: 0,
                remaining_distance_m: 0.0,
                eta_s: 0.0,
                arrived: true,
            };
        }

        let (remaining_distance_m, eta_s) = self.remaining();
        let step = self.current_step();
        let distance_to_turn_m = match (position, step) {
            (_, None) => None,
            (Some(p), Some(s)) => Some(geo::distance_m(p, s.location)),
            (None, Some(s)) => Some(s.distance_m),
        };

        NavSummary {
            distance_to_turn_m,
            current_step_name: step.map(|s| s.name.clone()),
            steps_remaining: self
                .route
                .as_ref()
                .map(|r| r.steps.len() - self.current_step)
                .unwrap_or(0),
            remaining_distance_m,
            eta_s,
            arrived: false,
        }
    }
}

impl Default for NavigationTracker {
    fn default() -> Self {
        Self::new(NavPolicy::default())
    }
}
