pub mod cards;
pub mod display;
pub mod instructions;
pub mod modal;

pub use cards::show_card_list;
pub use instructions::show_instructions;
pub use modal::show_modal;

use pdf_cards::DisplayTarget;

/// User intent collected while drawing a frame, applied by the app afterwards
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SelectCategory(String),
    OpenCard { category: String, ordinal: usize },
    PrevInstruction,
    NextInstruction,
    CloseModal,
    Retry(DisplayTarget),
    ReloadDocument,
    ResetViewed,
}
