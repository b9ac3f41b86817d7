//! Persisted set of viewed page numbers

use crate::storage::KeyValueStore;
use crate::types::{PageNumber, StorageError};
use std::collections::BTreeSet;

pub const DEFAULT_STORAGE_KEY: &str = "hdwyg-viewed-cards";

/// Read the viewed set stored under `key`.
///
/// A missing key is an empty set. Read or decode failures are logged and
/// also yield an empty set; a payload that is only partly valid is discarded
/// as a whole.
pub fn load_viewed(store: &impl KeyValueStore, key: &str) -> BTreeSet<PageNumber> {
    let saved = match store.get(key) {
        Ok(Some(saved)) => saved,
        Ok(None) => return BTreeSet::new(),
        Err(e) => {
            log::error!("Error loading viewed cards: {}", e);
            return BTreeSet::new();
        }
    };

    match serde_json::from_str::<Vec<PageNumber>>(&saved) {
        Ok(pages) => pages.into_iter().collect(),
        Err(e) => {
            log::error!("Error decoding viewed cards, starting fresh: {}", e);
            BTreeSet::new()
        }
    }
}

/// Write `pages` under `key` as a JSON array
pub fn save_viewed(
    store: &mut impl KeyValueStore,
    key: &str,
    pages: &BTreeSet<PageNumber>,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(pages)?;
    store.set(key, &json)
}

/// In-memory viewed set with write-through persistence
#[derive(Debug)]
pub struct ViewedCards<S> {
    store: S,
    key: String,
    pages: BTreeSet<PageNumber>,
}

impl<S: KeyValueStore> ViewedCards<S> {
    pub fn load(store: S, key: &str) -> Self {
        let pages = load_viewed(&store, key);
        log::info!("Restored {} viewed card(s)", pages.len());
        Self {
            store,
            key: key.to_string(),
            pages,
        }
    }

    /// Persist the current set. Failures are logged, the in-memory set is kept.
    pub fn save(&mut self) {
        if let Err(e) = save_viewed(&mut self.store, &self.key, &self.pages) {
            log::error!("Error saving viewed cards: {}", e);
        }
    }

    /// Record a view and save immediately. Returns true if the page was new.
    pub fn mark_viewed(&mut self, page_number: PageNumber) -> bool {
        let inserted = self.pages.insert(page_number);
        self.save();
        inserted
    }

    /// Forget every viewed card and delete the persisted key
    pub fn reset(&mut self) {
        self.pages.clear();
        if let Err(e) = self.store.remove(&self.key) {
            log::error!("Error removing viewed cards: {}", e);
        }
        log::info!("All viewed cards have been reset");
    }

    pub fn contains(&self, page_number: PageNumber) -> bool {
        self.pages.contains(&page_number)
    }

    pub fn pages(&self) -> impl Iterator<Item = PageNumber> + '_ {
        self.pages.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
