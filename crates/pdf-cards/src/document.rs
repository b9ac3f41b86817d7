//! PDF backend seam: documents, pages and document loading

use crate::types::{LoadError, PageNumber, SourceError, Surface, Viewport};
use std::future::Future;

/// An opened PDF document
pub trait PdfDocument: Send + Sync {
    type Page: PdfPage;

    fn page_count(&self) -> usize;

    /// Fetch a page; fails for page numbers outside `1..=page_count`
    fn get_page(
        &self,
        page_number: PageNumber,
    ) -> impl Future<Output = Result<Self::Page, SourceError>> + Send;
}

pub trait PdfPage: Send + Sync {
    fn viewport(&self, scale: f32) -> Viewport;

    /// Draw the page into `target`, which is sized for `viewport`
    fn render(
        &self,
        target: &mut Surface,
        viewport: Viewport,
    ) -> impl Future<Output = Result<(), SourceError>> + Send;
}

/// One way of opening the document
pub trait DocumentLoader {
    type Document: PdfDocument;

    /// Short description used in logs
    fn describe(&self) -> String;

    fn load(&self) -> impl Future<Output = Result<Self::Document, SourceError>> + Send;
}

/// Try each loader in order and return the first document that opens
pub async fn load_document<L: DocumentLoader>(loaders: &[L]) -> Result<L::Document, LoadError> {
    let mut last = None;

    for loader in loaders {
        log::info!("Attempting to load PDF: {}", loader.describe());
        match loader.load().await {
            Ok(document) => {
                log::info!("PDF loaded successfully. Pages: {}", document.page_count());
                return Ok(document);
            }
            Err(e) => {
                log::error!("Loading PDF via {} failed: {}", loader.describe(), e);
                last = Some(e);
            }
        }
    }

    match last {
        Some(last) => Err(LoadError::Exhausted {
            attempts: loaders.len(),
            last,
        }),
        None => Err(LoadError::NoStrategies),
    }
}

/// Range check shared by backends
pub fn check_page_number(page_number: PageNumber, page_count: usize) -> Result<(), SourceError> {
    if page_number == 0 || page_number as usize > page_count {
        Err(SourceError::PageOutOfRange {
            page_number,
            page_count,
        })
    } else {
        Ok(())
    }
}
