//! Geographic-to-grid projection.

use crate::geo::GeoPoint;
use crate::view::ViewState;

/// Grid cells per degree of longitude. The window spans a few kilometers
/// around the tracked position and does not auto-fit the route.
pub const DEFAULT_SCALE: f64 = 600.0;

/// Project `point` onto grid coordinates relative to `reference`, the
/// tracked position that sits at the (pan-adjusted) grid center.
///
/// Rows grow downward, so latitude enters negated; its factor of 2
/// compensates for character cells being roughly twice as tall as wide.
/// The result may lie outside the grid; writes clip, not this function.
/// Offsets past the `i32` range saturate at its bounds.
pub fn project(point: GeoPoint, reference: GeoPoint, view: &ViewState, scale: f64) -> (i32, i32) {
    // Sums stay in f64 until the saturating cast; no i32 addition may
    // overflow under an oversized scale.
    let col = f64::from(view.grid_width / 2)
        + f64::from(view.pan_x)
        + ((point.lon - reference.lon) * scale).round();
    let row = f64::from(view.grid_height / 2) + f64::from(view.pan_y)
        - ((point.lat - reference.lat) * scale * 2.0).round();
    (col as i32, row as i32)
}
