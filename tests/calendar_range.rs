use notecal::builder::EventBuilder;
use notecal::model::Note;
use notecal::notify::BufferedNotifier;
use notecal::store::InMemoryNoteStore;
use std::collections::BTreeMap;

fn month_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(day, id)| (day.to_string(), id.to_string()))
        .collect()
}

#[tokio::test]
async fn builds_events_for_date_notes_in_range() {
    let root = Note::new("calRoot", "My Calendar");
    let mut store = InMemoryNoteStore::new();
    store.insert(root.clone());
    store.insert(Note::new("d0505", "05 - Monday").with_label("dateNote", "2025-05-05"));
    store.insert(Note::new("d0506", "06 - Tuesday").with_label("dateNote", "2025-05-06"));
    store.set_month_date_notes(
        "calRoot",
        "2025-05",
        month_map(&[("05", "d0505"), ("06", "d0506")]),
    );

    let notifier = BufferedNotifier::new();
    let builder = EventBuilder::new(&store, &notifier);

    let events = builder
        .build_events_for_calendar(&root, "2025-05-01", "2025-05-31")
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title, "05 - Monday");
    assert_eq!(events[0].start, "2025-05-05");
    assert_eq!(events[0].end.as_deref(), Some("2025-05-06"));
    assert_eq!(events[1].title, "06 - Tuesday");
    assert_eq!(events[1].start, "2025-05-06");
}

#[tokio::test]
async fn attaches_descendants_to_their_date_note() {
    let root = Note::new("calRoot", "My Calendar");
    let mut store = InMemoryNoteStore::new();
    store.insert(root.clone());
    store.insert(
        Note::new("d0505", "05 - Monday")
            .with_label("dateNote", "2025-05-05")
            .with_child("journal1"),
    );
    // A nested descendant must inherit the date as well.
    store.insert(Note::new("journal1", "Morning entry").with_child("journal2"));
    store.insert(Note::new("journal2", "Deep entry"));
    store.set_month_date_notes("calRoot", "2025-05", month_map(&[("05", "d0505")]));

    let notifier = BufferedNotifier::new();
    let builder = EventBuilder::new(&store, &notifier);

    let events = builder
        .build_events_for_calendar(&root, "2025-05-01", "2025-05-31")
        .await
        .unwrap();

    assert_eq!(events.len(), 3);
    assert_eq!(events[0].title, "05 - Monday");
    let mut descendant_titles: Vec<&str> = events[1..].iter().map(|e| e.title.as_str()).collect();
    descendant_titles.sort();
    assert_eq!(descendant_titles, vec!["Deep entry", "Morning entry"]);
    assert!(events[1..].iter().all(|e| e.start == "2025-05-05"));
    assert!(events[1..].iter().all(|e| e.end.as_deref() == Some("2025-05-06")));
}

#[tokio::test]
async fn spans_multiple_months() {
    let root = Note::new("calRoot", "My Calendar");
    let mut store = InMemoryNoteStore::new();
    store.insert(root.clone());
    store.insert(Note::new("d0531", "May 31").with_label("dateNote", "2025-05-31"));
    store.insert(Note::new("d0601", "June 1").with_label("dateNote", "2025-06-01"));
    store.set_month_date_notes("calRoot", "2025-05", month_map(&[("31", "d0531")]));
    store.set_month_date_notes("calRoot", "2025-06", month_map(&[("01", "d0601")]));

    let notifier = BufferedNotifier::new();
    let builder = EventBuilder::new(&store, &notifier);

    let events = builder
        .build_events_for_calendar(&root, "2025-05-26", "2025-06-08")
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].start, "2025-05-31");
    assert_eq!(events[1].start, "2025-06-01");
}

#[tokio::test]
async fn skips_date_notes_without_date_label() {
    let root = Note::new("calRoot", "My Calendar");
    let mut store = InMemoryNoteStore::new();
    store.insert(root.clone());
    store.insert(Note::new("broken", "No date label here"));
    store.set_month_date_notes("calRoot", "2025-05", month_map(&[("05", "broken")]));

    let notifier = BufferedNotifier::new();
    let builder = EventBuilder::new(&store, &notifier);

    let events = builder
        .build_events_for_calendar(&root, "2025-05-01", "2025-05-31")
        .await
        .unwrap();

    assert!(events.is_empty());
}
