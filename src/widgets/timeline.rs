use eframe::egui::{self, Ui};

use crate::controller::UiEvent;

/// Play/pause button, month slider and the current month label.
pub fn timeline(ui: &mut Ui, months: &[String], index: usize, playing: bool, events: &mut Vec<UiEvent>) {
    ui.horizontal(|ui| {
        let label = if playing { "⏸ Pause" } else { "▶ Play" };
        if ui
            .add_enabled(!months.is_empty(), egui::Button::new(label))
            .clicked()
        {
            events.push(UiEvent::TogglePlay);
        }

        let last = months.len().saturating_sub(1);
        let mut value = index.min(last);
        let slider = egui::Slider::new(&mut value, 0..=last).show_value(false);
        if ui.add_enabled(!months.is_empty(), slider).changed() {
            events.push(UiEvent::Slider(value));
        }

        let month = months.get(index).map(String::as_str).unwrap_or("–");
        ui.monospace(month);
    });
}
