//! Per-view stylesheets. Each view names a TOML theme file; its values are
//! laid over egui's stock light or dark visuals.
//!
//! ```toml
//! corner_radius = 8
//!
//! [light]
//! accent = "#0f766e"
//! panel_fill = "#f4f7f6"
//!
//! [dark]
//! accent = "#2dd4bf"
//! ```

use eframe::egui;
use navigation::StyleHandle;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub accent: Option<String>,
    pub panel_fill: Option<String>,
    pub window_fill: Option<String>,
    pub extreme_bg: Option<String>,
    pub text_color: Option<String>,
}

impl Palette {
    fn overlay(&mut self, other: Palette) {
        fn pick(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }
        pick(&mut self.accent, other.accent);
        pick(&mut self.panel_fill, other.panel_fill);
        pick(&mut self.window_fill, other.window_fill);
        pick(&mut self.extreme_bg, other.extreme_bg);
        pick(&mut self.text_color, other.text_color);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeSheet {
    pub corner_radius: Option<u8>,
    pub light: Palette,
    pub dark: Palette,
}

impl ThemeSheet {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Later sheets win field by field.
    pub fn overlay(&mut self, other: ThemeSheet) {
        if other.corner_radius.is_some() {
            self.corner_radius = other.corner_radius;
        }
        self.light.overlay(other.light);
        self.dark.overlay(other.dark);
    }
}

/// Merge the stylesheets currently applied to the window. A sheet that does
/// not parse is skipped.
pub fn merge_sheets(sheets: &[StyleHandle]) -> ThemeSheet {
    let mut merged = ThemeSheet::default();
    for sheet in sheets {
        match ThemeSheet::parse(sheet.content()) {
            Ok(parsed) => merged.overlay(parsed),
            Err(err) => tracing::warn!(stylesheet = %sheet.id(), error = %err, "ignoring malformed stylesheet"),
        }
    }
    merged
}

pub fn visuals_for(sheet: &ThemeSheet, dark_mode: bool) -> egui::Visuals {
    let (mut visuals, palette) = if dark_mode {
        (egui::Visuals::dark(), &sheet.dark)
    } else {
        (egui::Visuals::light(), &sheet.light)
    };

    if let Some(accent) = palette.accent.as_deref().and_then(parse_color) {
        visuals.hyperlink_color = accent;
        visuals.selection.bg_fill = accent;
        visuals.widgets.active.bg_fill = accent;
        visuals.widgets.hovered.bg_fill = accent.gamma_multiply(0.85);
    }
    if let Some(fill) = palette.panel_fill.as_deref().and_then(parse_color) {
        visuals.panel_fill = fill;
    }
    if let Some(fill) = palette.window_fill.as_deref().and_then(parse_color) {
        visuals.window_fill = fill;
        visuals.faint_bg_color = fill;
    }
    if let Some(fill) = palette.extreme_bg.as_deref().and_then(parse_color) {
        visuals.extreme_bg_color = fill;
    }
    if let Some(text) = palette.text_color.as_deref().and_then(parse_color) {
        visuals.override_text_color = Some(text);
    }
    if let Some(radius) = sheet.corner_radius {
        visuals.window_corner_radius = egui::CornerRadius::same(radius);
        visuals.menu_corner_radius = egui::CornerRadius::same(radius.clamp(4, 16));
    }

    visuals
}

/// `#rrggbb` or `#rrggbbaa`.
pub fn parse_color(value: &str) -> Option<egui::Color32> {
    let hex = value.trim().strip_prefix('#')?;
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(egui::Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(egui::Color32::from_rgba_unmultiplied(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => None,
    }
}
