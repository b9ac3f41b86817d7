mod common;

use common::{FakeDocument, drawn_page, new_viewer};
use pdf_cards::*;

const WIDTH: f32 = 840.0;

fn shown_page(viewer: &CardViewer<MemoryStore>, target: DisplayTarget) -> Option<PageNumber> {
    viewer.display(target).shown().map(|shown| shown.page_number)
}

#[tokio::test]
async fn test_level2_end_to_end_with_reload() {
    let doc = FakeDocument::new(42);
    let mut viewer = new_viewer(MemoryStore::new());

    let cards = viewer.card_list("level2").unwrap();
    assert_eq!(cards.len(), 10);
    let labels: Vec<_> = cards.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels.first(), Some(&"Level 2 Card 1"));
    assert_eq!(labels.last(), Some(&"Level 2 Card 10"));
    assert!(cards.iter().all(|c| !c.viewed));

    let ticket = viewer.open_card("level2", 3).unwrap();
    assert_eq!(ticket.page_number, 24);
    assert_eq!(
        viewer.modal().map(|m| m.title.as_str()),
        Some("Level 2 Card 3 (Page 24)")
    );

    let outcome = viewer.show(&doc, ticket, WIDTH).await;
    assert_eq!(
        outcome,
        DisplayOutcome::Displayed {
            page_number: 24,
            newly_viewed: true
        }
    );
    assert!(viewer.is_viewed(24));

    // Simulated reload: a fresh viewer over the same storage
    let store = viewer.shutdown();
    let reloaded = new_viewer(store);
    let cards = reloaded.card_list("level2").unwrap();
    assert!(cards[2].viewed);
    assert_eq!(cards.iter().filter(|c| c.viewed).count(), 1);
}

#[tokio::test]
async fn test_later_request_wins() {
    let doc = FakeDocument::new(42);
    let mut viewer = new_viewer(MemoryStore::new());
    let options = *viewer.render_options();

    let first = viewer.open_card("level1", 1).unwrap();
    let second = viewer.open_card("level1", 2).unwrap();

    // The second request resolves first
    let result = render_page(&doc, second.page_number, WIDTH, &options).await;
    assert!(matches!(
        viewer.complete(second, result),
        DisplayOutcome::Displayed { page_number: 11, .. }
    ));

    let result = render_page(&doc, first.page_number, WIDTH, &options).await;
    assert_eq!(viewer.complete(first, result), DisplayOutcome::Stale);

    let shown = viewer.display(DisplayTarget::Modal).shown().unwrap();
    assert_eq!(shown.page_number, 11);
    assert_eq!(drawn_page(&shown.surface), Some(11));
    assert!(!viewer.is_viewed(10));
}

#[tokio::test]
async fn test_overlapping_renders_resolve_out_of_order() {
    let doc = FakeDocument::new(42);
    let mut viewer = new_viewer(MemoryStore::new());
    let options = *viewer.render_options();

    let release_first = doc.hold_page(10);
    let first = viewer.open_card("level1", 1).unwrap();

    let (first_result, ()) = tokio::join!(
        render_page(&doc, first.page_number, WIDTH, &options),
        async {
            let second = viewer.open_card("level1", 2).unwrap();
            let result = render_page(&doc, second.page_number, WIDTH, &options).await;
            viewer.complete(second, result);
            release_first.send(()).unwrap();
        }
    );

    assert_eq!(viewer.complete(first, first_result), DisplayOutcome::Stale);
    assert_eq!(shown_page(&viewer, DisplayTarget::Modal), Some(11));
    assert_eq!(viewer.viewed().pages().collect::<Vec<_>>(), vec![11]);
}

#[tokio::test]
async fn test_targets_do_not_supersede_each_other() {
    let doc = FakeDocument::new(42);
    let mut viewer = new_viewer(MemoryStore::new());

    let instruction = viewer.start().unwrap();
    let card = viewer.open_card("challenge", 2).unwrap();

    assert!(matches!(
        viewer.show(&doc, card, WIDTH).await,
        DisplayOutcome::Displayed { page_number: 32, .. }
    ));
    assert!(matches!(
        viewer.show(&doc, instruction, WIDTH).await,
        DisplayOutcome::Displayed { page_number: 1, .. }
    ));
    assert_eq!(shown_page(&viewer, DisplayTarget::Instructions), Some(1));
    assert_eq!(shown_page(&viewer, DisplayTarget::Modal), Some(32));
}

#[tokio::test]
async fn test_failed_render_is_retryable_and_not_viewed() {
    let doc = FakeDocument::new(42).with_broken_pages([20]);
    let mut viewer = new_viewer(MemoryStore::new());

    let ticket = viewer.open_card("challenge", 1).unwrap();
    let outcome = viewer.show(&doc, ticket, WIDTH).await;
    assert!(matches!(outcome, DisplayOutcome::Failed(ref e) if e.page_number == 20));

    let slot = viewer.display(DisplayTarget::Modal);
    assert!(matches!(slot.status(), DisplayStatus::Failed { .. }));
    assert!(slot.shown().is_none());
    assert!(!viewer.is_viewed(20));

    let retry = viewer.retry(DisplayTarget::Modal).unwrap();
    assert_eq!(retry.page_number, 20);
    assert!(viewer.display(DisplayTarget::Modal).is_loading());
    assert!(viewer.retry(DisplayTarget::Instructions).is_none());

    let fixed = FakeDocument::new(42);
    assert!(matches!(
        viewer.show(&fixed, retry, WIDTH).await,
        DisplayOutcome::Displayed { page_number: 20, .. }
    ));
}

#[tokio::test]
async fn test_page_missing_from_document_reports_error() {
    let doc = FakeDocument::new(40);
    let mut viewer = new_viewer(MemoryStore::new());

    let ticket = viewer.open_card("challenge", 3).unwrap();
    match viewer.show(&doc, ticket, WIDTH).await {
        DisplayOutcome::Failed(err) => {
            assert_eq!(err.page_number, 42);
            assert!(matches!(err.source, SourceError::PageOutOfRange { .. }));
        }
        other => panic!("Expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_close_modal_drops_in_flight_render() {
    let doc = FakeDocument::new(42);
    let mut viewer = new_viewer(MemoryStore::new());

    let ticket = viewer.open_card("level3", 1).unwrap();
    viewer.close_modal();
    assert!(viewer.modal().is_none());
    assert!(!viewer.display(DisplayTarget::Modal).is_loading());

    assert_eq!(viewer.show(&doc, ticket, WIDTH).await, DisplayOutcome::Stale);
    assert!(!viewer.is_viewed(34));
    assert!(viewer.display(DisplayTarget::Modal).shown().is_none());
}

#[tokio::test]
async fn test_instruction_navigation_marks_pages() {
    let doc = FakeDocument::new(42);
    let mut viewer = new_viewer(MemoryStore::new());

    let ticket = viewer.start().unwrap();
    viewer.show(&doc, ticket, WIDTH).await;
    assert!(viewer.prev_instruction().is_none());
    assert_eq!(viewer.navigation().index(), 0);

    for expected in 2..=8 {
        let ticket = viewer.next_instruction().unwrap();
        assert_eq!(ticket.page_number, expected);
        viewer.show(&doc, ticket, WIDTH).await;
    }
    assert!(viewer.next_instruction().is_none());
    assert_eq!(viewer.navigation().index(), 7);
    assert_eq!(viewer.navigation().counter_label(), "Page 8 of 8");
    assert_eq!(
        viewer.viewed().pages().collect::<Vec<_>>(),
        (1..=8).collect::<Vec<_>>()
    );

    let ticket = viewer.prev_instruction().unwrap();
    assert_eq!(ticket.page_number, 7);
}

#[test]
fn test_unknown_category_and_card() {
    let mut viewer = new_viewer(MemoryStore::new());
    assert_eq!(
        viewer.select_category("level9"),
        Err(CardError::UnknownCategory("level9".to_string()))
    );
    assert_eq!(viewer.active_category(), INSTRUCTIONS);

    viewer.select_category("level3").unwrap();
    assert_eq!(viewer.active_category(), "level3");

    assert_eq!(
        viewer.open_card("level3", 9),
        Err(CardError::NoSuchCard {
            category: "level3".to_string(),
            ordinal: 9
        })
    );
    assert!(viewer.modal().is_none());
}

#[tokio::test]
async fn test_reset_viewed_clears_markers() {
    let doc = FakeDocument::new(42);
    let mut store = MemoryStore::new();
    store.set(DEFAULT_STORAGE_KEY, "[10, 11]").unwrap();
    let mut viewer = new_viewer(store);
    assert!(viewer.card_list("level1").unwrap()[0].viewed);

    let ticket = viewer.open_card("level1", 3).unwrap();
    viewer.show(&doc, ticket, WIDTH).await;
    assert_eq!(viewer.viewed().len(), 3);

    viewer.reset_viewed();
    assert!(viewer.card_list("level1").unwrap().iter().all(|c| !c.viewed));

    let store = viewer.shutdown();
    assert_eq!(
        store.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
        Some("[]")
    );
}
