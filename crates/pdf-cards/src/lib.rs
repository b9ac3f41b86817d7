pub mod catalog;
mod config;
pub mod document;
pub mod navigation;
#[cfg(feature = "pdfium")]
pub mod pdfium;
pub mod render;
pub mod storage;
mod types;
pub mod viewed;
pub mod viewer;

pub use catalog::{CardCatalog, CardListing, Category, INSTRUCTIONS};
pub use config::ViewerConfig;
pub use document::{DocumentLoader, PdfDocument, PdfPage, load_document};
pub use navigation::InstructionNav;
pub use render::{RenderOptions, render_page};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use types::*;
pub use viewed::{DEFAULT_STORAGE_KEY, ViewedCards, load_viewed, save_viewed};
pub use viewer::{
    CardViewer, DisplayOutcome, DisplaySlot, DisplayStatus, DisplayTarget, ModalCard,
    RenderTicket, ShownPage,
};
