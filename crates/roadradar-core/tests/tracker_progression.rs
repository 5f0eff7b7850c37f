// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Proximity-driven progression through a route: step advances, the
//! arrival latch, manual overrides and the remaining-work sums.

use roadradar_core::geo::EARTH_RADIUS_M;
use roadradar_core::{
    GeoPoint, ManeuverKind, ManeuverModifier, NavPolicy, NavState, NavigationTracker, Route,
    RouteError, RouteStep, TrackerEvent,
};

/// A point `meters` due north of `p`; exact under the haversine because
/// same-longitude distances degenerate to arc length.
fn offset_north(p: GeoPoint, meters: f64) -> GeoPoint {
    GeoPoint::new(p.lat + (meters / EARTH_RADIUS_M).to_degrees(), p.lon)
}

fn step(name: &str, kind: ManeuverKind, location: GeoPoint, distance_m: f64) -> RouteStep {
    RouteStep {
        name: name.to_string(),
        instruction: format!("Continue on {}", name),
        kind,
        modifier: ManeuverModifier::Unspecified,
        location,
        distance_m,
        duration_s: distance_m / 10.0,
    }
}

/// Three maneuvers heading north along a meridian, roughly 556 m apart.
fn northbound_route() -> Route {
    let a = GeoPoint::new(12.9750, 77.59);
    let b = GeoPoint::new(12.9800, 77.59);
    let c = GeoPoint::new(12.9850, 77.59);
    Route {
        total_distance_m: 1112.0,
        total_duration_s: 111.2,
        polyline: vec![GeoPoint::new(12.9700, 77.59), a, b, c],
        steps: vec![
            step("Cross Street", ManeuverKind::Turn, a, 556.0),
            step("High Street", ManeuverKind::Turn, b, 556.0),
            step("Destination", ManeuverKind::Arrive, c, 0.0),
        ],
    }
}

#[test]
fn test_install_starts_at_first_step() {
    let mut tracker = NavigationTracker::default();
    assert_eq!(tracker.state(), NavState::NoRoute);

    tracker.install_route(northbound_route()).unwrap();
    assert_eq!(tracker.state(), NavState::EnRoute(0));
    assert_eq!(tracker.current_step().unwrap().name, "Cross Street");
}

#[test]
fn test_progression_to_arrival() {
    let mut tracker = NavigationTracker::default();
    let route = northbound_route();
    let locations: Vec<GeoPoint> = route.steps.iter().map(|s| s.location).collect();
    tracker.install_route(route).unwrap();

    // Far from the first maneuver: nothing moves.
    let start = GeoPoint::new(12.9700, 77.59);
    assert_eq!(tracker.update(Some(start)), TrackerEvent::Unchanged);
    assert_eq!(tracker.state(), NavState::EnRoute(0));

    // Within the threshold of each maneuver in turn.
    assert_eq!(
        tracker.update(Some(offset_north(locations[0], 30.0))),
        TrackerEvent::StepAdvanced {
            index: 1,
            name: "High Street".to_string()
        }
    );
    assert_eq!(
        tracker.update(Some(offset_north(locations[1], 30.0))),
        TrackerEvent::StepAdvanced {
            index: 2,
            name: "Destination".to_string()
        }
    );
    assert_eq!(
        tracker.update(Some(offset_north(locations[2], 30.0))),
        TrackerEvent::Arrived
    );
    assert_eq!(tracker.state(), NavState::Arrived);

    // Arrival latches: further fixes change nothing.
    assert_eq!(
        tracker.update(Some(offset_north(locations[2], 1.0))),
        TrackerEvent::Unchanged
    );
    assert_eq!(tracker.state(), NavState::Arrived);
}

#[test]
fn test_threshold_is_strict() {
    let mut tracker = NavigationTracker::default();
    let route = northbound_route();
    let first = route.steps[0].location;
    tracker.install_route(route).unwrap();

    // 51 m away: outside a 50 m threshold.
    assert_eq!(
        tracker.update(Some(offset_north(first, 51.0))),
        TrackerEvent::Unchanged
    );
    assert_eq!(tracker.state(), NavState::EnRoute(0));

    // 49 m away: inside.
    assert!(tracker.update(Some(offset_north(first, 49.0))).advanced());
    assert_eq!(tracker.state(), NavState::EnRoute(1));
}

#[test]
fn test_custom_threshold_policy() {
    let policy = NavPolicy {
        arrival_threshold_m: 100.0,
        poll_interval_s: 5,
    };
    let mut tracker = NavigationTracker::new(policy);
    let route = northbound_route();
    let first = route.steps[0].location;
    tracker.install_route(route).unwrap();

    assert!(tracker.update(Some(offset_north(first, 75.0))).advanced());
}

#[test]
fn test_one_boundary_per_update() {
    // All maneuvers stacked on one point: a single fix near them must
    // still advance one step per update.
    let here = GeoPoint::new(51.5, -0.12);
    let route = Route {
        total_distance_m: 30.0,
        total_duration_s: 3.0,
        polyline: vec![GeoPoint::new(51.499, -0.12), here],
        steps: vec![
            step("First", ManeuverKind::Turn, here, 10.0),
            step("Second", ManeuverKind::Turn, here, 10.0),
            step("Last", ManeuverKind::Arrive, here, 0.0),
        ],
    };
    let mut tracker = NavigationTracker::default();
    tracker.install_route(route).unwrap();

    let fix = Some(offset_north(here, 5.0));
    assert_eq!(
        tracker.update(fix),
        TrackerEvent::StepAdvanced {
            index: 1,
            name: "Second".to_string()
        }
    );
    assert_eq!(
        tracker.update(fix),
        TrackerEvent::StepAdvanced {
            index: 2,
            name: "Last".to_string()
        }
    );
    assert_eq!(tracker.update(fix), TrackerEvent::Arrived);
}

#[test]
fn test_missing_fix_changes_nothing() {
    let mut tracker = NavigationTracker::default();
    tracker.install_route(northbound_route()).unwrap();
    assert_eq!(tracker.update(None), TrackerEvent::Unchanged);
    assert_eq!(tracker.state(), NavState::EnRoute(0));
}

#[test]
fn test_antipodal_fix_stays_en_route() {
    // A fix on the far side of the planet sits where the haversine term
    // rounds past 1.0. The distance must stay a real number, so the fix
    // reads as maximally far, never as inside the threshold.
    let here = GeoPoint::new(9.9999996, 19.999999995);
    let route = Route {
        total_distance_m: 40.0,
        total_duration_s: 4.0,
        polyline: vec![GeoPoint::new(9.9996, 19.9996), here],
        steps: vec![
            step("Harbor Road", ManeuverKind::Turn, here, 20.0),
            step("Quay", ManeuverKind::Arrive, here, 0.0),
        ],
    };
    let mut tracker = NavigationTracker::default();
    tracker.install_route(route).unwrap();

    let far_side = GeoPoint::new(-9.9999996, -160.000000005);
    assert_eq!(tracker.update(Some(far_side)), TrackerEvent::Unchanged);
    assert_eq!(tracker.state(), NavState::EnRoute(0));

    let live = tracker.summary(Some(far_side)).distance_to_turn_m.unwrap();
    assert!(live.is_finite() && live > 2.0e7, "got {}", live);
}

#[test]
fn test_single_step_route_still_needs_proximity() {
    let dest = GeoPoint::new(48.8584, 2.2945);
    let route = Route {
        total_distance_m: 120.0,
        total_duration_s: 20.0,
        polyline: vec![GeoPoint::new(48.8574, 2.2945), dest],
        steps: vec![step("Destination", ManeuverKind::Arrive, dest, 120.0)],
    };
    let mut tracker = NavigationTracker::default();
    tracker.install_route(route).unwrap();
    assert_eq!(tracker.state(), NavState::EnRoute(0));

    assert_eq!(
        tracker.update(Some(offset_north(dest, 200.0))),
        TrackerEvent::Unchanged
    );
    assert_eq!(
        tracker.update(Some(offset_north(dest, 10.0))),
        TrackerEvent::Arrived
    );
}

#[test]
fn test_invalid_route_preserves_previous_state() {
    let mut tracker = NavigationTracker::default();
    tracker.install_route(northbound_route()).unwrap();
    assert!(tracker.advance_step());
    assert_eq!(tracker.state(), NavState::EnRoute(1));

    let empty = Route {
        total_distance_m: 0.0,
        total_duration_s: 0.0,
        polyline: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.1, 0.0)],
        steps: vec![],
    };
    assert_eq!(tracker.install_route(empty), Err(RouteError::NoSteps));

    let short = Route {
        total_distance_m: 0.0,
        total_duration_s: 0.0,
        polyline: vec![GeoPoint::new(0.0, 0.0)],
        steps: vec![step("X", ManeuverKind::Arrive, GeoPoint::new(0.0, 0.0), 0.0)],
    };
    assert_eq!(tracker.install_route(short), Err(RouteError::ShortPolyline(1)));

    // The rejected installs left the old route and progress in place.
    assert_eq!(tracker.state(), NavState::EnRoute(1));
    assert_eq!(tracker.route().unwrap().steps.len(), 3);
}

#[test]
fn test_clear_and_reinstall() {
    let mut tracker = NavigationTracker::default();
    tracker.install_route(northbound_route()).unwrap();
    assert!(tracker.advance_step());

    tracker.clear();
    assert_eq!(tracker.state(), NavState::NoRoute);
    assert_eq!(tracker.update(Some(GeoPoint::new(12.98, 77.59))), TrackerEvent::Unchanged);
    assert_eq!(tracker.remaining(), (0.0, 0.0));

    tracker.install_route(northbound_route()).unwrap();
    assert_eq!(tracker.state(), NavState::EnRoute(0));
}

#[test]
fn test_manual_stepping_bounds() {
    let mut tracker = NavigationTracker::default();
    assert!(!tracker.advance_step());
    assert!(!tracker.retreat_step());

    tracker.install_route(northbound_route()).unwrap();
    assert!(!tracker.retreat_step());
    assert!(tracker.advance_step());
    assert!(tracker.advance_step());
    assert_eq!(tracker.state(), NavState::EnRoute(2));

    // The last step is a wall; manual stepping never declares arrival.
    assert!(!tracker.advance_step());
    assert_eq!(tracker.state(), NavState::EnRoute(2));

    assert!(tracker.retreat_step());
    assert_eq!(tracker.state(), NavState::EnRoute(1));
}

#[test]
fn test_retreat_withdraws_arrival() {
    let mut tracker = NavigationTracker::default();
    let route = northbound_route();
    let last = route.steps[2].location;
    tracker.install_route(route).unwrap();
    tracker.advance_step();
    tracker.advance_step();
    assert_eq!(tracker.update(Some(last)), TrackerEvent::Arrived);

    assert!(tracker.retreat_step());
    assert_eq!(tracker.state(), NavState::EnRoute(2));
}

#[test]
fn test_remaining_sums_follow_progress() {
    let mut tracker = NavigationTracker::default();
    let route = northbound_route();
    let last = route.steps[2].location;
    tracker.install_route(route).unwrap();

    let (d, t) = tracker.remaining();
    assert!((d - 1112.0).abs() < 1e-9);
    assert!((t - 111.2).abs() < 1e-9);

    tracker.advance_step();
    let (d, t) = tracker.remaining();
    assert!((d - 556.0).abs() < 1e-9);
    assert!((t - 55.6).abs() < 1e-9);

    tracker.advance_step();
    tracker.update(Some(last));
    assert_eq!(tracker.remaining(), (0.0, 0.0));
}

#[test]
fn test_summary_prefers_live_distance() {
    let mut tracker = NavigationTracker::default();

    let empty = tracker.summary(None);
    assert_eq!(empty.steps_remaining, 0);
    assert_eq!(empty.current_step_name, None);
    assert_eq!(empty.distance_to_turn_m, None);

    let route = northbound_route();
    let first = route.steps[0].location;
    tracker.install_route(route).unwrap();

    // Without a fix the static step length stands in.
    let static_summary = tracker.summary(None);
    assert_eq!(static_summary.distance_to_turn_m, Some(556.0));
    assert_eq!(static_summary.current_step_name.as_deref(), Some("Cross Street"));
    assert_eq!(static_summary.steps_remaining, 3);
    assert!(!static_summary.arrived);

    let live = tracker.summary(Some(offset_north(first, 120.0)));
    let live_dist = live.distance_to_turn_m.unwrap();
    assert!((live_dist - 120.0).abs() < 0.01, "got {}", live_dist);

    tracker.advance_step();
    tracker.advance_step();
    tracker.update(Some(tracker.current_step().unwrap().location));
    let done = tracker.summary(None);
    assert!(done.arrived);
    assert_eq!(done.steps_remaining, 0);
    assert_eq!(done.eta_s, 0.0);
}
