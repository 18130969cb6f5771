use bi_core::chart::Rgb;
use bi_core::AppSettings;
use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

/// Theme configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Insight Dark".to_string(),
            dark_mode: true,
        }
    }
}

impl Theme {
    pub fn from_settings(settings: &AppSettings) -> Self {
        if settings.dark_mode {
            Self::default()
        } else {
            Self {
                name: "Insight Light".to_string(),
                dark_mode: false,
            }
        }
    }
}

/// Apply the application theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();

    let (mut visuals, bg_color, panel_bg, widget_bg, hover_color, active_color, text_color) =
        if theme.dark_mode {
            (
                Visuals::dark(),
                Color32::from_rgb(23, 23, 23),
                Color32::from_rgb(31, 31, 31),
                Color32::from_rgb(40, 40, 40),
                Color32::from_rgb(50, 50, 50),
                Color32::from_rgb(60, 60, 60),
                Color32::from_rgb(220, 220, 220),
            )
        } else {
            (
                Visuals::light(),
                Color32::from_rgb(249, 250, 251),
                Color32::from_rgb(255, 255, 255),
                Color32::from_rgb(243, 244, 246),
                Color32::from_rgb(229, 231, 235),
                Color32::from_rgb(209, 213, 219),
                Color32::from_rgb(17, 24, 39),
            )
        };
    let accent = accent_color();
    let border = if theme.dark_mode {
        Color32::from_rgb(70, 70, 70)
    } else {
        Color32::from_rgb(209, 213, 219)
    };

    visuals.window_fill = panel_bg;
    visuals.panel_fill = panel_bg;
    visuals.extreme_bg_color = bg_color;
    visuals.faint_bg_color = widget_bg;

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
    ] {
        widget.bg_stroke = Stroke::new(1.0, border);
        widget.fg_stroke = Stroke::new(1.0, text_color);
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.noninteractive.bg_fill = widget_bg;
    visuals.widgets.inactive.bg_fill = widget_bg;
    visuals.widgets.hovered.bg_fill = hover_color;

    visuals.widgets.active.bg_fill = active_color;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent);
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;

    visuals.window_shadow.extrusion = 8.0;
    visuals.popup_shadow.extrusion = 4.0;

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);
    style.spacing.indent = 20.0;

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Get the accent color for the theme
pub fn accent_color() -> Color32 {
    Color32::from_rgb(99, 102, 241)
}

/// Background of the "Filtered" badge
pub fn filter_badge_color() -> Color32 {
    Color32::from_rgb(59, 130, 246)
}

/// Background of the drill-down badge
pub fn drill_badge_color() -> Color32 {
    Color32::from_rgb(139, 92, 246)
}

/// Get the error color for the theme
pub fn error_color() -> Color32 {
    Color32::from_rgb(230, 80, 80)
}

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Color of the `index`-th of `len` bars shaded from `from` to `to`
pub fn gradient_at(from: Rgb, to: Rgb, index: usize, len: usize) -> Color32 {
    let t = if len > 1 { index as f32 / (len - 1) as f32 } else { 0.0 };
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color32::from_rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

const PALETTE: [Color32; 8] = [
    Color32::from_rgb(84, 112, 198),
    Color32::from_rgb(145, 204, 117),
    Color32::from_rgb(250, 200, 88),
    Color32::from_rgb(238, 102, 102),
    Color32::from_rgb(115, 192, 222),
    Color32::from_rgb(59, 162, 114),
    Color32::from_rgb(252, 132, 82),
    Color32::from_rgb(154, 96, 180),
];

/// Series color for the `index`-th point of a palette-filled chart
pub fn palette_color(index: usize) -> Color32 {
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_follows_settings() {
        let mut settings = AppSettings::default();
        assert!(Theme::from_settings(&settings).dark_mode);

        settings.dark_mode = false;
        assert!(!Theme::from_settings(&settings).dark_mode);
    }

    #[test]
    fn test_gradient_endpoints() {
        let from = Rgb(0x66, 0x7e, 0xea);
        let to = Rgb(0x76, 0x4b, 0xa2);
        assert_eq!(gradient_at(from, to, 0, 3), to_color32(from));
        assert_eq!(gradient_at(from, to, 2, 3), to_color32(to));
        assert_eq!(gradient_at(from, to, 0, 1), to_color32(from));
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(0), palette_color(PALETTE.len()));
        assert_ne!(palette_color(0), palette_color(1));
    }
}
