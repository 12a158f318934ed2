use eframe::egui::{
    self, pos2, vec2, Align2, Color32, FontId, Mesh, Pos2, Rect, Response, Sense, Shape,
    Stroke, TextStyle, Ui, Widget,
};

use crate::scene::{Scene, SceneElement};
use crate::themes::DensityPlotStyle;

/// Step of 1, 2 or 5 times a power of ten that splits `span` into at most
/// `segments` parts.
fn nice_step(span: f64, segments: usize) -> f64 {
    let segments = segments.max(1) as f64;
    let raw = (span / segments).abs();
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    for mult in [1.0, 2.0, 5.0, 10.0] {
        let step = mult * magnitude;
        if step >= raw {
            return step;
        }
    }
    10.0 * magnitude
}

/// Tick values inside `min..=max`. Never more than `segments + 1` of them.
fn ticks(min: f64, max: f64, segments: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max < min {
        return Vec::new();
    }
    let step = nice_step(max - min, segments);
    let first = (min / step).ceil() * step;
    (0..=segments.max(1))
        .map(|i| first + step * i as f64)
        .take_while(|value| *value <= max + step * 1e-9)
        .collect()
}

fn format_density(value: f64) -> String {
    if value == 0.0 {
        "0".to_owned()
    } else {
        format!("{value:.4}")
    }
}

/// Maps data coordinates into the plot area.
#[derive(Clone, Copy)]
struct Transform {
    area: Rect,
    x_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Transform {
    fn x(&self, x: f64) -> f32 {
        let span = (self.x_max - self.x_min).max(f64::EPSILON);
        self.area.left() + (((x - self.x_min) / span) as f32) * self.area.width()
    }

    fn y(&self, density: f64) -> f32 {
        let frac = (density / self.y_max).clamp(0.0, 1.0) as f32;
        self.area.bottom() - frac * self.area.height()
    }

    fn point(&self, p: [f64; 2]) -> Pos2 {
        pos2(self.x(p[0]), self.y(p[1]))
    }
}

/// Area between the curve and the baseline, one quad per grid segment so
/// the fill stays correct for non-convex curves.
fn area_mesh(points: &[Pos2], baseline: f32, color: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    for pair in points.windows(2) {
        let base = mesh.vertices.len() as u32;
        mesh.colored_vertex(pos2(pair[0].x, baseline), color);
        mesh.colored_vertex(pair[0], color);
        mesh.colored_vertex(pair[1], color);
        mesh.colored_vertex(pos2(pair[1].x, baseline), color);
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
    }
    mesh
}

fn paint_element(
    painter: &egui::Painter,
    t: Transform,
    element: &SceneElement,
    style: &DensityPlotStyle,
    font_id: &FontId,
) {
    let alpha = element.alpha();
    if alpha <= 0.0 || element.points.len() < 2 {
        return;
    }
    let emphasis = element.emphasis;
    let points: Vec<Pos2> = element.points.iter().map(|&p| t.point(p)).collect();

    let fill = element.color.gamma_multiply(emphasis.fill_alpha() * alpha);
    painter.add(Shape::mesh(area_mesh(&points, t.area.bottom(), fill)));

    let outline = Stroke::new(emphasis.stroke_width(), element.color.gamma_multiply(alpha));
    painter.add(Shape::line(points, outline));

    let x = t.x(element.mean);
    if x >= t.area.left() && x <= t.area.right() {
        let marker = Stroke::new(emphasis.stroke_width(), element.color.gamma_multiply(alpha));
        painter.extend(Shape::dashed_line(
            &[pos2(x, t.area.top()), pos2(x, t.area.bottom())],
            marker,
            6.0,
            4.0,
        ));
        painter.text(
            pos2(x + 3.0, t.area.top() + 2.0),
            Align2::LEFT_TOP,
            format!("{:.0}", element.mean),
            font_id.clone(),
            style.ink.gamma_multiply(alpha),
        );
    }
}

#[must_use = "You should put this widget in a ui with `ui.add(widget);`"]
pub struct DensityPlot<'a> {
    scene: &'a Scene,
    x_range: (f64, f64),
    y_max: f64,
    plot_height: f32,
    x_segments: usize,
    y_segments: usize,
}

impl<'a> DensityPlot<'a> {
    pub fn new(scene: &'a Scene, x_range: (f64, f64), y_max: f64) -> Self {
        Self {
            scene,
            x_range,
            y_max: if y_max.is_finite() && y_max > 0.0 { y_max } else { 1.0 },
            plot_height: 360.0,
            x_segments: 10,
            y_segments: 4,
        }
    }

    pub fn plot_height(mut self, plot_height: f32) -> Self {
        self.plot_height = plot_height.max(32.0);
        self
    }
}

impl Widget for DensityPlot<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let DensityPlot {
            scene,
            x_range: (x_min, x_max),
            y_max,
            plot_height,
            x_segments,
            y_segments,
        } = self;

        let style = DensityPlotStyle::from(ui.style().as_ref());
        let font_id = TextStyle::Small.resolve(ui.style());
        let desired_width = ui.available_width().max(200.0);
        let y_axis_w = 56.0;
        let x_axis_h = 34.0;

        let (outer_rect, response) =
            ui.allocate_exact_size(vec2(desired_width, plot_height + x_axis_h), Sense::hover());
        if !ui.is_rect_visible(outer_rect) {
            return response;
        }
        let _span = tracing::trace_span!("paint_density_plot").entered();

        let plot_rect = Rect::from_min_max(
            pos2(outer_rect.left() + y_axis_w, outer_rect.top()),
            pos2(outer_rect.right(), outer_rect.bottom() - x_axis_h),
        );
        if !plot_rect.is_positive() {
            return response;
        }
        let area = plot_rect.shrink(4.0);
        let t = Transform {
            area,
            x_min,
            x_max,
            y_max,
        };

        let painter = ui.painter().with_clip_rect(outer_rect);
        painter.rect_filled(plot_rect, 0.0, style.background);

        for value in ticks(0.0, y_max, y_segments) {
            let y = t.y(value);
            painter.line_segment(
                [pos2(area.left(), y), pos2(area.right(), y)],
                Stroke::new(1.0, style.grid),
            );
            painter.text(
                pos2(plot_rect.left() - 4.0, y),
                Align2::RIGHT_CENTER,
                format_density(value),
                font_id.clone(),
                style.ink,
            );
        }

        for value in ticks(x_min, x_max, x_segments) {
            let x = t.x(value);
            painter.line_segment(
                [pos2(x, plot_rect.bottom()), pos2(x, plot_rect.bottom() + 4.0)],
                Stroke::new(1.0, style.outline),
            );
            painter.text(
                pos2(x, plot_rect.bottom() + 6.0),
                Align2::CENTER_TOP,
                format!("{value:.0}"),
                font_id.clone(),
                style.ink,
            );
        }
        painter.text(
            pos2(plot_rect.center().x, outer_rect.bottom()),
            Align2::CENTER_BOTTOM,
            "Rating",
            font_id.clone(),
            style.ink,
        );

        let plot_painter = painter.with_clip_rect(plot_rect);
        for element in scene.elements() {
            paint_element(&plot_painter, t, element, &style, &font_id);
        }

        painter.rect_stroke(
            plot_rect,
            0.0,
            Stroke::new(1.0, style.outline),
            egui::StrokeKind::Inside,
        );

        if let Some(hover) = response.hover_pos().filter(|p| area.contains(*p)) {
            let span = x_max - x_min;
            let rating = x_min + ((hover.x - area.left()) / area.width()) as f64 * span;
            painter.line_segment(
                [pos2(hover.x, area.top()), pos2(hover.x, area.bottom())],
                Stroke::new(1.0, style.outline),
            );
            return response.on_hover_text(format!("Rating {rating:.0}"));
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(2000.0, 10), 200.0);
        assert!((nice_step(0.01, 4) - 0.005).abs() < 1e-12);
        assert_eq!(nice_step(0.0, 4), 1.0);
    }

    #[test]
    fn ticks_stay_inside_range() {
        let values = ticks(900.0, 2950.0, 10);
        assert_eq!(values.first(), Some(&1000.0));
        assert_eq!(values.last(), Some(&2500.0));
        assert!(values.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn ticks_give_up_on_unbounded_ranges() {
        assert!(ticks(0.0, f64::INFINITY, 4).is_empty());
        assert!(ticks(f64::NAN, 1.0, 4).is_empty());
        assert!(ticks(0.0, f64::MAX, 4).len() <= 5);
    }

    #[test]
    fn area_mesh_has_two_triangles_per_segment() {
        let points = [pos2(0.0, 5.0), pos2(1.0, 2.0), pos2(2.0, 8.0)];
        let mesh = area_mesh(&points, 10.0, Color32::RED);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.indices.len(), 12);
    }
}
