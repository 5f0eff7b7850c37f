//! Symbolic colors and the radar theme presets.

use serde::{Deserialize, Serialize};

/// Terminal-agnostic color names. The harness maps these onto its own
/// color type; the core never deals in RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    DarkGray,
}

/// One color per semantic channel of the radar. A theme is plain data
/// passed into each render call; nothing process-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub background: Color,
    pub ring: Color,
    pub crosshair: Color,
    pub center: Color,
    pub path: Color,
    pub start: Color,
    pub destination: Color,
    pub turn: Color,
    pub self_marker: Color,
    pub label: Color,
    pub arrow: Color,
    pub compass: Color,
}

impl Theme {
    /// The green-phosphor default.
    pub fn classic() -> Self {
        Self {
            background: Color::Black,
            ring: Color::DarkGray,
            crosshair: Color::Green,
            center: Color::Yellow,
            path: Color::Blue,
            start: Color::Cyan,
            destination: Color::Red,
            turn: Color::Red,
            self_marker: Color::Yellow,
            label: Color::Yellow,
            arrow: Color::Magenta,
            compass: Color::White,
        }
    }

    /// Brighter variant for washed-out terminals.
    pub fn contrast() -> Self {
        Self {
            background: Color::Black,
            ring: Color::Gray,
            crosshair: Color::White,
            center: Color::Yellow,
            path: Color::Cyan,
            start: Color::Green,
            destination: Color::Red,
            turn: Color::Magenta,
            self_marker: Color::Yellow,
            label: Color::White,
            arrow: Color::Magenta,
            compass: Color::White,
        }
    }

    /// Look up a preset by its settings-file name; unknown names fall
    /// back to the classic theme.
    pub fn by_name(name: &str) -> Self {
        match name {
            "contrast" => Self::contrast(),
            _ => Self::classic(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
