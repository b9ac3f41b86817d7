use eframe::egui;
use pdf_cards::{DisplaySlot, DisplayStatus, DisplayTarget};

use super::UiAction;

/// Draw one display target: the page, a spinner while loading, or the
/// fallback text with a retry button
pub fn show_display(
    ui: &mut egui::Ui,
    target: DisplayTarget,
    slot: &DisplaySlot,
    texture: Option<&egui::TextureHandle>,
    actions: &mut Vec<UiAction>,
) {
    match slot.status() {
        DisplayStatus::Loading { page_number } => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("Rendering page {}...", page_number));
            });
        }
        DisplayStatus::Failed { .. } => {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.label("Error loading page. Please try again.");
                if ui.button("Retry").clicked() {
                    actions.push(UiAction::Retry(target));
                }
            });
            return;
        }
        DisplayStatus::Idle => {}
    }

    if let (Some(_), Some(texture)) = (slot.shown(), texture) {
        egui::ScrollArea::both()
            .id_salt(format!("{:?}_display", target))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.image((texture.id(), texture.size_vec2()));
                });
            });
    }
}
