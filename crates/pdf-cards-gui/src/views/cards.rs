use eframe::egui;
use pdf_cards::{CardViewer, KeyValueStore};

use super::UiAction;

const CARD_SIZE: [f32; 2] = [160.0, 64.0];

/// Grid of the cards in `category`, viewed ones highlighted
pub fn show_card_list<S: KeyValueStore>(
    ui: &mut egui::Ui,
    viewer: &CardViewer<S>,
    category: &str,
    actions: &mut Vec<UiAction>,
) {
    let cards = match viewer.card_list(category) {
        Ok(cards) => cards,
        Err(e) => {
            ui.label(format!("Error: {e}"));
            return;
        }
    };

    let viewed = cards.iter().filter(|c| c.viewed).count();
    ui.label(format!("{} of {} viewed", viewed, cards.len()));
    ui.add_space(8.0);

    let columns = ((ui.available_width() / (CARD_SIZE[0] + 8.0)) as usize).max(1);

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new(format!("{category}_cards"))
            .spacing([8.0, 8.0])
            .show(ui, |ui| {
                for (i, card) in cards.iter().enumerate() {
                    let mut text = format!("{}\nPage {}", card.label, card.page_number);
                    if card.viewed {
                        text.push_str("  ✔");
                    }

                    let mut button = egui::Button::new(text);
                    if card.viewed {
                        button = button.fill(ui.visuals().selection.bg_fill.gamma_multiply(0.4));
                    }

                    if ui.add_sized(CARD_SIZE, button).clicked() {
                        actions.push(UiAction::OpenCard {
                            category: category.to_string(),
                            ordinal: card.ordinal,
                        });
                    }

                    if (i + 1) % columns == 0 {
                        ui.end_row();
                    }
                }
            });
    });
}
