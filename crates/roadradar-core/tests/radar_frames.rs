// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Frame-level rasterizer checks: layer order, crosshair gaps, clipping
//! and pan displacement, pinned to exact cells.

use roadradar_core::radar::{self, Scene, DEFAULT_SCALE};
use roadradar_core::{Color, GeoPoint, ManeuverKind, ManeuverModifier, Route, RouteStep, Theme, ViewState};

fn glyph(grid: &radar::Grid, x: u16, y: u16) -> char {
    grid.cell(x, y).map(|c| c.glyph).unwrap_or('?')
}

fn color(grid: &radar::Grid, x: u16, y: u16) -> Option<Color> {
    grid.cell(x, y).map(|c| c.color)
}

fn step(name: &str, kind: ManeuverKind, location: GeoPoint) -> RouteStep {
    RouteStep {
        name: name.to_string(),
        instruction: String::new(),
        kind,
        modifier: ManeuverModifier::Unspecified,
        location,
        distance_m: 100.0,
        duration_s: 10.0,
    }
}

/// Short hook south of the reference position at (0.01, 0).
fn hook_route() -> Route {
    let a = GeoPoint::new(0.0075, -0.002);
    let b = GeoPoint::new(0.0050, 0.0);
    Route {
        total_distance_m: 400.0,
        total_duration_s: 60.0,
        polyline: vec![a, b],
        steps: vec![
            step("Main St", ManeuverKind::Turn, GeoPoint::new(0.0075, 0.002)),
            step("Home", ManeuverKind::Arrive, b),
        ],
    }
}

#[test]
fn test_skeleton_frame_without_position() {
    let view = ViewState::new(21, 11);
    let theme = Theme::classic();
    let grid = radar::render(&view, &theme, &Scene::default(), DEFAULT_SCALE);

    assert_eq!((grid.width(), grid.height()), (21, 11));

    // Center marker and compass letters at the edge midpoints.
    assert_eq!(glyph(&grid, 10, 5), '╋');
    assert_eq!(glyph(&grid, 10, 0), 'N');
    assert_eq!(glyph(&grid, 10, 10), 'S');
    assert_eq!(glyph(&grid, 0, 5), 'W');
    assert_eq!(glyph(&grid, 20, 5), 'E');

    // Crosshair fills blank cells only; ring cells keep their dot.
    assert_eq!(glyph(&grid, 1, 5), '─');
    assert_eq!(glyph(&grid, 10, 2), '│');
    assert_eq!(glyph(&grid, 2, 5), '·');
    assert_eq!(color(&grid, 2, 5), Some(Color::DarkGray));

    // No geography without a fix.
    assert!(!grid.to_text().contains('◉'));
    assert!(!grid.to_text().contains('┈'));
}

#[test]
fn test_position_only_marks_center() {
    let view = ViewState::new(31, 15);
    let theme = Theme::classic();
    let scene = Scene {
        position: Some(GeoPoint::new(0.01, 0.0)),
        ..Scene::default()
    };
    let grid = radar::render(&view, &theme, &scene, DEFAULT_SCALE);

    assert_eq!(glyph(&grid, 15, 7), '◉');
    assert_eq!(glyph(&grid, 16, 7), 'Y');
    assert_eq!(glyph(&grid, 17, 7), 'O');
    assert_eq!(glyph(&grid, 18, 7), 'U');
    // No route: neither path nor bearing arrow.
    assert!(!grid.to_text().contains('┈'));
    assert!(!grid.to_text().contains('•'));
}

#[test]
fn test_full_scene_layer_placement() {
    let view = ViewState::new(31, 15);
    let theme = Theme::classic();
    let route = hook_route();
    let scene = Scene {
        position: Some(GeoPoint::new(0.01, 0.0)),
        route: Some(&route),
        active_step: Some(0),
        destination_name: Some("Home"),
    };
    let grid = radar::render(&view, &theme, &scene, DEFAULT_SCALE);

    // Self marker pinned to the grid center, label to its right.
    assert_eq!(glyph(&grid, 15, 7), '◉');
    assert_eq!(glyph(&grid, 16, 7), 'Y');

    // Route start, a surviving path cell, and the turn marker.
    assert_eq!(glyph(&grid, 14, 10), '●');
    assert_eq!(glyph(&grid, 14, 11), '┈');
    assert_eq!(glyph(&grid, 16, 10), '▼');
    assert_eq!(color(&grid, 16, 10), Some(Color::Red));

    // Destination sits due south; the bearing ray runs down the center
    // column, head two cells short of the edge margin allowance.
    assert_eq!(glyph(&grid, 15, 13), '◆');
    assert_eq!(color(&grid, 15, 13), Some(Color::Red));
    assert_eq!(glyph(&grid, 15, 9), '•');
    assert_eq!(glyph(&grid, 15, 12), '↓');

    // Label trails the arrowhead: " Home(555m)".
    assert_eq!(glyph(&grid, 16, 12), ' ');
    assert_eq!(glyph(&grid, 17, 12), 'H');
    assert_eq!(glyph(&grid, 21, 12), '(');
    assert_eq!(glyph(&grid, 25, 12), 'm');
    assert_eq!(glyph(&grid, 26, 12), ')');

    // Compass still painted last over the crosshair ends.
    assert_eq!(glyph(&grid, 15, 0), 'N');
    assert_eq!(glyph(&grid, 15, 14), 'S');
}

#[test]
fn test_pan_displaces_geography_not_the_center() {
    let view = {
        let mut v = ViewState::new(31, 15);
        v.pan_by(-3, -2);
        v
    };
    let theme = Theme::classic();
    let route = hook_route();
    let scene = Scene {
        position: Some(GeoPoint::new(0.01, 0.0)),
        route: Some(&route),
        active_step: Some(0),
        destination_name: Some("Home"),
    };
    let grid = radar::render(&view, &theme, &scene, DEFAULT_SCALE);

    // Geography shifted by the pan delta.
    assert_eq!(glyph(&grid, 11, 8), '●');
    assert_eq!(glyph(&grid, 12, 11), '◆');
    assert_eq!(glyph(&grid, 13, 8), '▼');

    // The tracked position and its bearing arrow stay center-anchored.
    assert_eq!(glyph(&grid, 15, 7), '◉');
    assert_eq!(glyph(&grid, 15, 12), '↓');
}

#[test]
fn test_single_cell_grid_survives_full_scene() {
    let view = ViewState::new(1, 1);
    let theme = Theme::classic();
    let route = hook_route();
    let scene = Scene {
        position: Some(GeoPoint::new(0.0, 0.0)),
        route: Some(&route),
        active_step: Some(0),
        destination_name: Some("Home"),
    };
    let grid = radar::render(&view, &theme, &scene, DEFAULT_SCALE);

    // Every layer funnels through the one cell; the compass east letter
    // is painted last.
    assert_eq!(grid.to_text(), "E");
}

#[test]
fn test_distant_segments_are_culled() {
    let view = ViewState::new(31, 15);
    let theme = Theme::classic();
    let far = Route {
        total_distance_m: 700_000.0,
        total_duration_s: 25_000.0,
        polyline: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(5.0, 5.0)],
        steps: vec![step("Far away", ManeuverKind::Arrive, GeoPoint::new(5.0, 5.0))],
    };
    let scene = Scene {
        position: Some(GeoPoint::new(0.0, 0.0)),
        route: Some(&far),
        active_step: None,
        destination_name: None,
    };
    let grid = radar::render(&view, &theme, &scene, DEFAULT_SCALE);

    // The segment spans thousands of cells; it must be skipped, leaving
    // no path glyphs, while the frame still renders.
    assert!(!grid.to_text().contains('┈'));
    assert_eq!(glyph(&grid, 15, 7), '◉');
}

#[test]
fn test_oversized_scale_renders_without_path() {
    let view = ViewState::new(31, 15);
    let theme = Theme::classic();
    let route = hook_route();
    let scene = Scene {
        position: Some(GeoPoint::new(0.01, 0.0)),
        route: Some(&route),
        active_step: Some(0),
        destination_name: Some("Home"),
    };
    // A scale this large saturates the projected columns at the i32
    // bounds; every segment is culled and the frame still comes out.
    let grid = radar::render(&view, &theme, &scene, 2.0e12);

    assert!(!grid.to_text().contains('┈'));
    assert_eq!(glyph(&grid, 15, 7), '◉');
    // The bearing arrow works from geodesics, not projection.
    assert_eq!(glyph(&grid, 15, 12), '↓');
}

#[test]
fn test_contrast_theme_colors_channels() {
    let view = ViewState::new(21, 11);
    let theme = Theme::contrast();
    let grid = radar::render(&view, &theme, &Scene::default(), DEFAULT_SCALE);

    assert_eq!(color(&grid, 10, 5), Some(Color::Yellow));
    assert_eq!(color(&grid, 1, 5), Some(Color::White));
    assert_eq!(color(&grid, 10, 0), Some(Color::White));
}
