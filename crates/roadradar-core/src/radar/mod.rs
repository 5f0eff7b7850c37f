// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Character-grid radar rasterizer.
//!
//! Rendering is a pure function from a scene snapshot to a [`Grid`] of
//! glyph/color cells. Layers paint in a fixed order and later layers
//! overwrite earlier ones at the same cell, with one exception: the
//! crosshair skips cells that already hold content. Every write is
//! bounds-clipped, so any grid size down to a single cell is safe.

pub mod line;
pub mod project;

use crate::geo::{self, GeoPoint};
use crate::route::Route;
use crate::theme::{Color, Theme};
use crate::view::ViewState;

use line::bresenham;
pub use project::{project, DEFAULT_SCALE};

const RING_RADII: [i32; 3] = [4, 8, 12];
const RING_STEP_DEG: f64 = 10.0;
/// Longest bearing-arrow ray, in cells from the center.
const ARROW_MAX_LEN: i32 = 8;
/// Cells kept free between the arrowhead and the grid edge.
const ARROW_EDGE_MARGIN: i32 = 2;

const GLYPH_RING: char = '·';
const GLYPH_CROSS_H: char = '─';
const GLYPH_CROSS_V: char = '│';
const GLYPH_CENTER: char = '╋';
const GLYPH_PATH: char = '┈';
const GLYPH_START: char = '●';
const GLYPH_DEST: char = '◆';
const GLYPH_TURN: char = '▼';
const GLYPH_SELF: char = '◉';
const GLYPH_RAY: char = '•';
const SELF_LABEL: &str = "YOU";

/// Arrowhead per compass bucket, clockwise from north.
const ARROW_GLYPHS: [char; 8] = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];

/// One character cell of a rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

/// Row-major glyph/color buffer. Out-of-range writes are dropped
/// silently; reads are checked.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    fn new(width: u16, height: u16, background: Color) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let blank = Cell {
            glyph: ' ',
            color: background,
        };
        Self {
            width,
            height,
            cells: vec![blank; usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            None
        } else {
            Some(y as usize * usize::from(self.width) + x as usize)
        }
    }

    fn set(&mut self, x: i32, y: i32, glyph: char, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { glyph, color };
        }
    }

    fn is_blank(&self, x: i32, y: i32) -> bool {
        self.index(x, y)
            .map(|i| self.cells[i].glyph == ' ')
            .unwrap_or(false)
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(i32::from(x), i32::from(y)).map(|i| &self.cells[i])
    }

    /// Rows in top-to-bottom order.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width))
    }

    /// Glyphs only, one line per row. Used by the one-shot CLI renderer
    /// and by tests.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + usize::from(self.height));
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(row.iter().map(|c| c.glyph));
        }
        out
    }
}

/// Snapshot of everything one frame needs. `None` fields skip their
/// layers: no position means no geography at all, no route means rings,
/// crosshair and compass only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scene<'a> {
    pub position: Option<GeoPoint>,
    pub route: Option<&'a Route>,
    /// Index of the step the tracker is heading for, if en route.
    pub active_step: Option<usize>,
    pub destination_name: Option<&'a str>,
}

/// Paint one radar frame.
pub fn render(view: &ViewState, theme: &Theme, scene: &Scene, scale: f64) -> Grid {
    let mut grid = Grid::new(view.grid_width, view.grid_height, theme.background);
    let cx = i32::from(grid.width() / 2);
    let cy = i32::from(grid.height() / 2);

    draw_rings(&mut grid, theme, cx, cy);
    draw_crosshair(&mut grid, theme, cx, cy);

    if let Some(position) = scene.position {
        if let Some(route) = scene.route {
            draw_polyline(&mut grid, theme, view, position, route, scale);
            if let Some(step) = scene.active_step.and_then(|i| route.steps.get(i)) {
                let (x, y) = project(step.location, position, view, scale);
                grid.set(x, y, GLYPH_TURN, theme.turn);
            }
        }

        draw_self_marker(&mut grid, theme, cx, cy);

        if let Some(dest) = scene.route.and_then(|r| r.destination()) {
            let name = scene.destination_name.unwrap_or("");
            draw_destination_arrow(&mut grid, theme, cx, cy, position, dest, name);
        }
    }

    draw_compass(&mut grid, theme, cx, cy);
    grid
}

/// Faint range rings around the center. Vertical radii are halved to
/// counter the cell aspect ratio.
fn draw_rings(grid: &mut Grid, theme: &Theme, cx: i32, cy: i32) {
    for &radius in &RING_RADII {
        let mut deg = 0.0f64;
        while deg < 360.0 {
            let rad = deg.to_radians();
            let x = cx + (f64::from(radius) * rad.cos()).round() as i32;
            let y = cy + (f64::from(radius) * rad.sin() / 2.0).round() as i32;
            grid.set(x, y, GLYPH_RING, theme.ring);
            deg += RING_STEP_DEG;
        }
    }
}

/// Full-width and full-height center lines. Occupied cells are left
/// alone; the center glyph is always placed.
fn draw_crosshair(grid: &mut Grid, theme: &Theme, cx: i32, cy: i32) {
    for x in 0..i32::from(grid.width()) {
        if grid.is_blank(x, cy) {
            grid.set(x, cy, GLYPH_CROSS_H, theme.crosshair);
        }
    }
    for y in 0..i32::from(grid.height()) {
        if grid.is_blank(cx, y) {
            grid.set(cx, y, GLYPH_CROSS_V, theme.crosshair);
        }
    }
    grid.set(cx, cy, GLYPH_CENTER, theme.center);
}

/// Route geometry as dotted segments, with the endpoints re-marked on
/// top so start and destination stay visible.
fn draw_polyline(
    grid: &mut Grid,
    theme: &Theme,
    view: &ViewState,
    reference: GeoPoint,
    route: &Route,
    scale: f64,
) {
    // A span a few times the grid perimeter cannot produce a visible
    // segment; skipping it keeps pathological projections cheap.
    let span_limit = 4 * (i32::from(grid.width()) + i32::from(grid.height()));

    let points: Vec<(i32, i32)> = route
        .polyline
        .iter()
        .map(|&p| project(p, reference, view, scale))
        .collect();

    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if !segment_may_hit(grid, x0, y0, x1, y1, span_limit) {
            continue;
        }
        bresenham(x0, y0, x1, y1, |x, y| grid.set(x, y, GLYPH_PATH, theme.path));
    }

    if let Some(&(x, y)) = points.first() {
        grid.set(x, y, GLYPH_START, theme.start);
    }
    if let Some(&(x, y)) = points.last() {
        grid.set(x, y, GLYPH_DEST, theme.destination);
    }
}

/// Bounding-box cull plus a span sanity bound.
fn segment_may_hit(grid: &Grid, x0: i32, y0: i32, x1: i32, y1: i32, span_limit: i32) -> bool {
    // Endpoints may sit at the i32 bounds, so the span is i64 math.
    let span = (i64::from(x1) - i64::from(x0))
        .abs()
        .max((i64::from(y1) - i64::from(y0)).abs());
    if span > i64::from(span_limit) {
        return false;
    }
    x0.max(x1) >= 0
        && x0.min(x1) < i32::from(grid.width())
        && y0.max(y1) >= 0
        && y0.min(y1) < i32::from(grid.height())
}

/// The tracked position: marker glyph at the center with its label to
/// the right.
fn draw_self_marker(grid: &mut Grid, theme: &Theme, cx: i32, cy: i32) {
    grid.set(cx, cy, GLYPH_SELF, theme.self_marker);
    for (i, ch) in SELF_LABEL.chars().enumerate() {
        grid.set(cx + 1 + i as i32, cy, ch, theme.label);
    }
}

/// Ray from the center toward the destination, tipped with a compass
/// arrowhead and trailed by a name/distance label.
fn draw_destination_arrow(
    grid: &mut Grid,
    theme: &Theme,
    cx: i32,
    cy: i32,
    position: GeoPoint,
    destination: GeoPoint,
    name: &str,
) {
    let bearing = geo::bearing_deg(position, destination);
    let distance = geo::distance_m(position, destination);
    let rad = bearing.to_radians();
    let (dx, dy) = (rad.sin(), -rad.cos());

    let len = arrow_length(grid, cx, cy, dx, dy);
    if len < 1 {
        return;
    }

    for i in 1..len {
        let x = cx + (dx * f64::from(i)).round() as i32;
        let y = cy + (dy * f64::from(i)).round() as i32;
        grid.set(x, y, GLYPH_RAY, theme.arrow);
    }

    let hx = cx + (dx * f64::from(len)).round() as i32;
    let hy = cy + (dy * f64::from(len)).round() as i32;
    grid.set(hx, hy, ARROW_GLYPHS[geo::compass_index(bearing)], theme.arrow);

    let label = format!(" {}({})", name, geo::format_distance_compact(distance));
    for (i, ch) in label.chars().enumerate() {
        grid.set(hx + 1 + i as i32, hy, ch, theme.label);
    }
}

/// Ray length: the fixed maximum, shortened to keep a margin from the
/// nearest grid edge along the ray direction.
fn arrow_length(grid: &Grid, cx: i32, cy: i32, dx: f64, dy: f64) -> i32 {
    let mut edge = f64::INFINITY;
    if dx > 1e-9 {
        edge = edge.min(f64::from(i32::from(grid.width()) - 1 - cx) / dx);
    }
    if dx < -1e-9 {
        edge = edge.min(f64::from(cx) / -dx);
    }
    if dy > 1e-9 {
        edge = edge.min(f64::from(i32::from(grid.height()) - 1 - cy) / dy);
    }
    if dy < -1e-9 {
        edge = edge.min(f64::from(cy) / -dy);
    }

    let edge_cells = if edge.is_finite() {
        edge.floor() as i32 - ARROW_EDGE_MARGIN
    } else {
        i32::MAX
    };
    ARROW_MAX_LEN.min(edge_cells).max(0)
}

/// Cardinal letters at the edge midpoints, painted last.
fn draw_compass(grid: &mut Grid, theme: &Theme, cx: i32, cy: i32) {
    grid.set(cx, 0, 'N', theme.compass);
    grid.set(cx, i32::from(grid.height()) - 1, 'S', theme.compass);
    grid.set(0, cy, 'W', theme.compass);
    grid.set(i32::from(grid.width()) - 1, cy, 'E', theme.compass);
}
