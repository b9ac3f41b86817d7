use eframe::egui;
use pdf_cards::{CardViewer, DisplayTarget, KeyValueStore};

use super::UiAction;
use super::display::show_display;

pub fn show_instructions<S: KeyValueStore>(
    ui: &mut egui::Ui,
    viewer: &CardViewer<S>,
    texture: Option<&egui::TextureHandle>,
    actions: &mut Vec<UiAction>,
) {
    let nav = viewer.navigation();

    ui.horizontal(|ui| {
        if ui
            .add_enabled(nav.can_go_back(), egui::Button::new("◀ Previous"))
            .clicked()
        {
            actions.push(UiAction::PrevInstruction);
        }

        ui.label(nav.counter_label());

        if ui
            .add_enabled(nav.can_go_forward(), egui::Button::new("Next ▶"))
            .clicked()
        {
            actions.push(UiAction::NextInstruction);
        }
    });

    ui.separator();

    show_display(
        ui,
        DisplayTarget::Instructions,
        viewer.display(DisplayTarget::Instructions),
        texture,
        actions,
    );
}
