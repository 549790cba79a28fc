//! Light and dark palettes.

use egui::Color32;
use weather_core::{AqiLevel, ConditionKind, Theme};

/// Series colors shared by both themes.
pub const TEMPERATURE_LINE: Color32 = Color32::from_rgb(124, 58, 237);
pub const POP_LINE: Color32 = Color32::from_rgb(6, 182, 212);
pub const WIND_LINE: Color32 = Color32::from_rgb(34, 197, 94);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub panel: Color32,
    pub card: Color32,
    pub card_border: Color32,
    pub text: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub error: Color32,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color32::from_rgb(11, 18, 32),
                panel: Color32::from_rgb(15, 23, 42),
                card: Color32::from_rgb(17, 26, 46),
                card_border: Color32::from_rgb(30, 41, 59),
                text: Color32::from_rgb(226, 232, 240),
                muted: Color32::from_rgb(148, 163, 184),
                accent: Color32::from_rgb(96, 165, 250),
                error: Color32::from_rgb(248, 113, 113),
            },
            Theme::Light => Self {
                background: Color32::from_rgb(246, 251, 255),
                panel: Color32::from_rgb(255, 255, 255),
                card: Color32::from_rgb(255, 255, 255),
                card_border: Color32::from_rgb(219, 234, 254),
                text: Color32::from_rgb(15, 23, 42),
                muted: Color32::from_rgb(100, 116, 139),
                accent: Color32::from_rgb(37, 99, 235),
                error: Color32::from_rgb(220, 38, 38),
            },
        }
    }
}

pub fn visuals(theme: Theme) -> egui::Visuals {
    let palette = Palette::for_theme(theme);
    let mut visuals = match theme {
        Theme::Dark => egui::Visuals::dark(),
        Theme::Light => egui::Visuals::light(),
    };

    visuals.panel_fill = palette.background;
    visuals.window_fill = palette.panel;
    visuals.extreme_bg_color = palette.panel;
    visuals.override_text_color = Some(palette.text);
    visuals.hyperlink_color = palette.accent;
    visuals.selection.bg_fill = palette.accent.gamma_multiply(0.6);
    visuals.widgets.noninteractive.bg_fill = palette.card;
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, palette.card_border);
    visuals
}

pub fn apply(ctx: &egui::Context, theme: Theme) {
    tracing::debug!("Applying {theme} theme");
    ctx.set_visuals(visuals(theme));
}

pub fn aqi_color(level: Option<AqiLevel>) -> Color32 {
    match level {
        Some(AqiLevel::Good) => Color32::from_rgb(0x2e, 0xcc, 0x71),
        Some(AqiLevel::Fair) => Color32::from_rgb(0xf1, 0xc4, 0x0f),
        Some(AqiLevel::Moderate) => Color32::from_rgb(0xe6, 0x7e, 0x22),
        Some(AqiLevel::Poor) => Color32::from_rgb(0xe7, 0x4c, 0x3c),
        Some(AqiLevel::VeryPoor) => Color32::from_rgb(0x8e, 0x44, 0xad),
        None => NEUTRAL,
    }
}

const NEUTRAL: Color32 = Color32::from_rgb(0x6b, 0x72, 0x80);

pub fn condition_color(kind: Option<ConditionKind>) -> Color32 {
    match kind {
        Some(ConditionKind::Clear) => Color32::from_rgb(0xff, 0xd1, 0x66),
        Some(ConditionKind::Rain) => Color32::from_rgb(0x06, 0xb6, 0xd4),
        Some(ConditionKind::Clouds) => Color32::from_rgb(0x93, 0xc5, 0xfd),
        Some(ConditionKind::Snow) => Color32::from_rgb(0xa7, 0xf3, 0xd0),
        Some(ConditionKind::Thunderstorm) => Color32::from_rgb(0x7c, 0x3a, 0xed),
        Some(ConditionKind::Mist) => Color32::from_rgb(0x94, 0xa3, 0xb8),
        Some(ConditionKind::Other) => Color32::from_rgb(0x60, 0xa5, 0xfa),
        None => NEUTRAL,
    }
}

/// Glyph drawn inside the condition badge.
pub fn condition_glyph(kind: Option<ConditionKind>) -> &'static str {
    match kind {
        Some(ConditionKind::Clear) => "☀",
        Some(ConditionKind::Rain) => "☔",
        Some(ConditionKind::Clouds) => "☁",
        Some(ConditionKind::Snow) => "❄",
        Some(ConditionKind::Thunderstorm) => "⚡",
        Some(ConditionKind::Mist) => "≈",
        Some(ConditionKind::Other) | None => "?",
    }
}
