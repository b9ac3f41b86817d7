mod common;

use common::FullStore;
use pdf_cards::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

const KEY: &str = DEFAULT_STORAGE_KEY;

#[test]
fn test_missing_key_loads_empty() {
    let store = MemoryStore::new();
    assert!(load_viewed(&store, KEY).is_empty());
}

#[test]
fn test_mark_viewed_writes_through() {
    let mut viewed = ViewedCards::load(MemoryStore::new(), KEY);
    assert!(viewed.mark_viewed(26));
    assert!(viewed.mark_viewed(12));

    let saved = viewed.store().get(KEY).unwrap().unwrap();
    assert_eq!(saved, "[12,26]");
}

#[test]
fn test_mark_viewed_is_idempotent() {
    let mut viewed = ViewedCards::load(MemoryStore::new(), KEY);
    assert!(viewed.mark_viewed(5));
    assert!(!viewed.mark_viewed(5));
    assert_eq!(viewed.len(), 1);
    assert_eq!(viewed.store().get(KEY).unwrap().as_deref(), Some("[5]"));
}

#[test]
fn test_duplicates_in_payload_collapse() {
    let mut store = MemoryStore::new();
    store.set(KEY, "[3, 1, 3, 2, 1]").unwrap();
    let pages: Vec<_> = load_viewed(&store, KEY).into_iter().collect();
    assert_eq!(pages, vec![1, 2, 3]);
}

#[test]
fn test_corrupt_payload_loads_empty() {
    for payload in ["not json", "{\"a\": 1}", "[1, 2, \"three\"]", "[1, -2]", "[1, 2"] {
        let mut store = MemoryStore::new();
        store.set(KEY, payload).unwrap();
        assert!(
            load_viewed(&store, KEY).is_empty(),
            "payload {payload:?} should be discarded"
        );
    }
}

#[test]
fn test_reset_clears_memory_and_storage() {
    let mut viewed = ViewedCards::load(MemoryStore::new(), KEY);
    viewed.mark_viewed(1);
    viewed.mark_viewed(2);
    viewed.reset();

    assert!(viewed.is_empty());
    assert_eq!(viewed.store().get(KEY).unwrap(), None);

    let reloaded = ViewedCards::load(viewed.into_store(), KEY);
    assert!(reloaded.is_empty());
}

#[test]
fn test_write_failure_keeps_in_memory_state() {
    let mut viewed = ViewedCards::load(FullStore::default(), KEY);
    assert!(viewed.mark_viewed(7));
    assert!(viewed.contains(7));

    viewed.reset();
    assert!(viewed.is_empty());
}

#[test]
fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("viewed-cards.json");

    let mut viewed = ViewedCards::load(JsonFileStore::open(&path).unwrap(), KEY);
    viewed.mark_viewed(41);
    viewed.mark_viewed(12);
    drop(viewed);

    let restored = ViewedCards::load(JsonFileStore::open(&path).unwrap(), KEY);
    assert_eq!(restored.pages().collect::<Vec<_>>(), vec![12, 41]);
}

proptest! {
    #[test]
    fn viewed_pages_survive_round_trip(pages in proptest::collection::vec(1u32..500, 0..40)) {
        let mut viewed = ViewedCards::load(MemoryStore::new(), KEY);
        for &page in &pages {
            viewed.mark_viewed(page);
        }

        let restored = load_viewed(&viewed.into_store(), KEY);
        let expected: BTreeSet<_> = pages.into_iter().collect();
        prop_assert_eq!(restored, expected);
    }

    #[test]
    fn marking_twice_equals_marking_once(pages in proptest::collection::vec(1u32..100, 1..20)) {
        let mut once = ViewedCards::load(MemoryStore::new(), KEY);
        let mut twice = ViewedCards::load(MemoryStore::new(), KEY);
        for &page in &pages {
            once.mark_viewed(page);
            twice.mark_viewed(page);
            twice.mark_viewed(page);
        }
        prop_assert_eq!(once.pages().collect::<Vec<_>>(), twice.pages().collect::<Vec<_>>());
        prop_assert_eq!(once.store().get(KEY).unwrap(), twice.store().get(KEY).unwrap());
    }
}
