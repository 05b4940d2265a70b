//! Colors for GUI widgets. Canvas colors are in `color_scheme::Theme`.

use eframe::egui::Color32;

pub const COLOR_ACTION: Color32 = Color32::GOLD;
pub const COLOR_INFO: Color32 = Color32::LIGHT_BLUE;
pub const COLOR_ERROR: Color32 = Color32::LIGHT_RED;

/// Behind the canvas, outside the drawn alignment.
pub const BACKGROUND_COLOR: Color32 = Color32::from_rgb(0xF9, 0xFA, 0xFB);
