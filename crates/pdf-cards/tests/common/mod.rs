#![allow(dead_code)]

use pdf_cards::document::check_page_number;
use pdf_cards::*;
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Native page size used by `FakeDocument` (points at scale 1)
pub const PAGE_WIDTH: f32 = 400.0;
pub const PAGE_HEIGHT: f32 = 600.0;

/// In-memory document whose pages render as a solid fill of the page number
pub struct FakeDocument {
    page_count: usize,
    broken_pages: HashSet<PageNumber>,
    gate: Mutex<Option<(PageNumber, oneshot::Receiver<()>)>>,
}

impl FakeDocument {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            broken_pages: HashSet::new(),
            gate: Mutex::new(None),
        }
    }

    /// Pages that fail inside the backend's draw call
    pub fn with_broken_pages(mut self, pages: impl IntoIterator<Item = PageNumber>) -> Self {
        self.broken_pages = pages.into_iter().collect();
        self
    }

    /// Hold `get_page(page_number)` until the returned sender fires
    pub fn hold_page(&self, page_number: PageNumber) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some((page_number, rx));
        tx
    }
}

pub struct FakePage {
    page_number: PageNumber,
    broken: bool,
}

impl PdfDocument for FakeDocument {
    type Page = FakePage;

    fn page_count(&self) -> usize {
        self.page_count
    }

    async fn get_page(&self, page_number: PageNumber) -> Result<FakePage, SourceError> {
        check_page_number(page_number, self.page_count)?;

        let held = {
            let mut gate = self.gate.lock().unwrap();
            match gate.take() {
                Some((page, rx)) if page == page_number => Some(rx),
                other => {
                    *gate = other;
                    None
                }
            }
        };
        if let Some(rx) = held {
            let _ = rx.await;
        }

        Ok(FakePage {
            page_number,
            broken: self.broken_pages.contains(&page_number),
        })
    }
}

impl PdfPage for FakePage {
    fn viewport(&self, scale: f32) -> Viewport {
        Viewport {
            width: PAGE_WIDTH * scale,
            height: PAGE_HEIGHT * scale,
            scale,
        }
    }

    async fn render(&self, target: &mut Surface, _viewport: Viewport) -> Result<(), SourceError> {
        if self.broken {
            return Err(SourceError::Backend(format!(
                "cannot draw page {}",
                self.page_number
            )));
        }
        for pixel in target.rgba_data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[self.page_number as u8, 0, 0, 255]);
        }
        Ok(())
    }
}

/// Page number a `FakeDocument` surface was drawn from
pub fn drawn_page(surface: &Surface) -> Option<PageNumber> {
    surface.rgba_data.first().map(|&p| p as PageNumber)
}

/// Store that can read but rejects every write
#[derive(Default)]
pub struct FullStore {
    pub inner: MemoryStore,
}

impl KeyValueStore for FullStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }
}

pub fn new_viewer(store: MemoryStore) -> CardViewer<MemoryStore> {
    CardViewer::new(
        CardCatalog::default(),
        ViewedCards::load(store, DEFAULT_STORAGE_KEY),
        RenderOptions::default(),
    )
}
