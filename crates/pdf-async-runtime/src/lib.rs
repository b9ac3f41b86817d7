use std::path::PathBuf;

// Re-export types from the core library
pub use pdf_cards::{RenderError, RenderOptions, RenderTicket, Surface};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum CardCommand {
    LoadDocument {
        path: PathBuf,
    },
    RenderPage {
        ticket: RenderTicket,
        available_width: f32,
        options: RenderOptions,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum CardUpdate {
    DocumentLoaded {
        path: PathBuf,
        page_count: usize,
    },
    LoadFailed {
        message: String,
    },
    PageRendered {
        ticket: RenderTicket,
        result: Result<Surface, RenderError>,
    },
}
