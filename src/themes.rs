use egui::style::Selection;
use egui::{Color32, Stroke, Style, Visuals};

pub mod palette;

/// Semantic colours for the density plot, derived from the active style.
#[derive(Clone, Debug)]
pub struct DensityPlotStyle {
    pub ink: Color32,
    pub outline: Color32,
    pub grid: Color32,
    pub background: Color32,
    /// Colour of the all-federation curve.
    pub muted: Color32,
}

impl From<&Style> for DensityPlotStyle {
    fn from(style: &Style) -> Self {
        let visuals = &style.visuals;
        let ink = visuals.text_color();
        let background = visuals.extreme_bg_color;
        Self {
            ink,
            outline: blend(ink, background, 0.4),
            grid: blend(ink, background, 0.85),
            background,
            muted: palette::NEUTRAL,
        }
    }
}

// Color utilities: simple sRGB linear interpolation for quick palette derivation
pub fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let r = (a.r() as f32 * (1.0 - t) + b.r() as f32 * t).round() as u8;
    let g = (a.g() as f32 * (1.0 - t) + b.g() as f32 * t).round() as u8;
    let bch = (a.b() as f32 * (1.0 - t) + b.b() as f32 * t).round() as u8;
    Color32::from_rgb(r, g, bch)
}

fn chart_visuals(foreground: Color32, background: Color32, accent: Color32, mut base: Visuals) -> Visuals {
    let border = blend(foreground, background, 0.6);

    base.window_fill = background;
    base.panel_fill = background;
    base.faint_bg_color = blend(background, foreground, 0.04);
    base.extreme_bg_color = blend(background, foreground, 0.02);
    base.slider_trailing_fill = true;
    base.selection = Selection {
        bg_fill: blend(background, accent, 0.25),
        stroke: Stroke::new(1.5, accent),
    };
    base.hyperlink_color = accent;
    base.window_stroke = Stroke::new(1.0, border);
    base
}

fn chart_style(visuals: Visuals) -> Style {
    let mut style = Style::default();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.slider_width = 320.0;
    style.animation_time = 0.12;
    style.visuals = visuals;
    style
}

pub fn chart_light() -> Style {
    chart_style(chart_visuals(
        Color32::from_rgb(0x22, 0x22, 0x22),
        Color32::from_rgb(0xfa, 0xfa, 0xfa),
        palette::CATEGORY10[0],
        Visuals::light(),
    ))
}

pub fn chart_dark() -> Style {
    chart_style(chart_visuals(
        Color32::from_rgb(0xe6, 0xe6, 0xe6),
        Color32::from_rgb(0x1e, 0x1e, 0x1e),
        palette::CATEGORY10[1],
        Visuals::dark(),
    ))
}

/// Installs both styles and follows the desktop's light/dark preference.
pub fn install(ctx: &egui::Context) {
    ctx.set_style_of(egui::Theme::Light, chart_light());
    ctx.set_style_of(egui::Theme::Dark, chart_dark());
    let theme = match dark_light::detect() {
        Ok(dark_light::Mode::Light) => egui::ThemePreference::Light,
        Ok(dark_light::Mode::Dark) => egui::ThemePreference::Dark,
        Ok(dark_light::Mode::Unspecified) | Err(_) => egui::ThemePreference::Light,
    };
    ctx.set_theme(theme);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        let a = Color32::from_rgb(0, 0, 0);
        let b = Color32::from_rgb(200, 100, 50);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, 0.5), Color32::from_rgb(100, 50, 25));
    }
}
