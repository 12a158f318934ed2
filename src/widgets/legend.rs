use eframe::egui::{self, vec2, Sense, Ui};

use crate::scene::LegendItem;

const SWATCH: f32 = 12.0;

/// One swatch, name and summary per visible entry. Rebuilt from the items
/// every frame.
pub fn legend(ui: &mut Ui, items: &[LegendItem]) {
    if items.is_empty() {
        ui.weak("No region has enough players this month.");
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for item in items {
            let (rect, _) = ui.allocate_exact_size(vec2(SWATCH, SWATCH), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, item.color);
            ui.label(egui::RichText::new(&item.label).strong())
                .on_hover_text(format!(
                    "{} players, mean rating {:.1}",
                    item.sample_count, item.mean
                ));
            ui.weak(format!("μ {:.0} · n={}", item.mean, item.sample_count));
            ui.add_space(8.0);
        }
    });
}
