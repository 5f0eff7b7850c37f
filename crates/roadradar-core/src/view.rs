//! Viewport state and the mouse-drag pan controller.

/// Viewport over the radar: the pan offset in grid cells plus the grid
/// dimensions. The tracked position always projects to the grid center;
/// panning displaces the projected geography around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub pan_x: i32,
    pub pan_y: i32,
    pub grid_width: u16,
    pub grid_height: u16,
}

impl ViewState {
    pub fn new(grid_width: u16, grid_height: u16) -> Self {
        Self {
            pan_x: 0,
            pan_y: 0,
            grid_width: grid_width.max(1),
            grid_height: grid_height.max(1),
        }
    }

    /// Apply a pan delta. Purely additive and unclamped; content pushed
    /// off-grid is clipped per write at render time.
    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Snap back so the tracked position is centered again.
    pub fn recenter(&mut self) {
        self.pan_x = 0;
        self.pan_y = 0;
    }

    /// Adopt new grid dimensions, clamped to at least one cell each way.
    /// The pan offset is preserved.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.grid_width = width.max(1);
        self.grid_height = height.max(1);
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(50, 15)
    }
}

/// Turns a stream of mouse-drag positions into pan deltas. Only the delta
/// between consecutive samples matters; the accumulated offset lives in
/// [`ViewState`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PanController {
    anchor: Option<(i32, i32)>,
}

impl PanController {
    pub fn begin_drag(&mut self, x: i32, y: i32) {
        self.anchor = Some((x, y));
    }

    /// Next sample of an active drag; returns the delta to apply, or
    /// `None` when no drag session is open.
    pub fn drag_to(&mut self, x: i32, y: i32) -> Option<(i32, i32)> {
        let (ax, ay) = self.anchor?;
        self.anchor = Some((x, y));
        Some((x - ax, y - ay))
    }

    pub fn end_drag(&mut self) {
        self.anchor = None;
    }

    pub fn dragging(&self) -> bool {
        self.anchor.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pan_is_additive_and_order_free() {
        let mut a = ViewState::new(40, 20);
        a.pan_by(3, -2);
        a.pan_by(-1, 5);

        let mut b = ViewState::new(40, 20);
        b.pan_by(-1, 5);
        b.pan_by(3, -2);

        assert_eq!((a.pan_x, a.pan_y), (2, 3));
        assert_eq!((a.pan_x, a.pan_y), (b.pan_x, b.pan_y));

        a.recenter();
        assert_eq!((a.pan_x, a.pan_y), (0, 0));
    }

    #[test]
    fn test_resize_clamps_to_one_cell() {
        let mut view = ViewState::new(0, 0);
        assert_eq!((view.grid_width, view.grid_height), (1, 1));
        view.resize(80, 0);
        assert_eq!((view.grid_width, view.grid_height), (80, 1));
    }

    #[test]
    fn test_drag_session_emits_consecutive_deltas() {
        let mut pan = PanController::default();
        assert_eq!(pan.drag_to(5, 5), None);

        pan.begin_drag(10, 10);
        assert!(pan.dragging());
        assert_eq!(pan.drag_to(12, 9), Some((2, -1)));
        assert_eq!(pan.drag_to(12, 9), Some((0, 0)));
        assert_eq!(pan.drag_to(8, 14), Some((-4, 5)));

        pan.end_drag();
        assert!(!pan.dragging());
        assert_eq!(pan.drag_to(1, 1), None);
    }
}
