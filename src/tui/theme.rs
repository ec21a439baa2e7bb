// Terminal colors for status classes
//
// The status-to-class mapping lives in grouping.rs; this is the one place
// classes become colors.

use crate::grouping::StatusClass;
use ratatui::style::Color;

/// Accent for focused chrome (active tab, focused input border).
pub const ACCENT: Color = Color::Cyan;

pub fn status_color(class: StatusClass) -> Color {
    match class {
        StatusClass::Success => Color::Green,
        StatusClass::Warning => Color::Yellow,
        StatusClass::Danger => Color::Red,
        StatusClass::Info => Color::Cyan,
        StatusClass::Failure => Color::LightRed,
        StatusClass::Todo => Color::DarkGray,
        StatusClass::Neutral => Color::Gray,
    }
}
