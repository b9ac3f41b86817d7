use eframe::egui;
use pdf_cards::{CardViewer, DisplayTarget, KeyValueStore};

use super::UiAction;
use super::display::show_display;

pub fn show_modal<S: KeyValueStore>(
    ctx: &egui::Context,
    viewer: &CardViewer<S>,
    texture: Option<&egui::TextureHandle>,
    actions: &mut Vec<UiAction>,
) {
    let Some(card) = viewer.modal() else {
        return;
    };

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        actions.push(UiAction::CloseModal);
        return;
    }

    let mut open = true;
    egui::Window::new(&card.title)
        .id(egui::Id::new("card_modal"))
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_size([840.0, 700.0])
        .show(ctx, |ui| {
            show_display(
                ui,
                DisplayTarget::Modal,
                viewer.display(DisplayTarget::Modal),
                texture,
                actions,
            );
        });

    if !open {
        actions.push(UiAction::CloseModal);
    }
}
