//! Events board against in-memory URL, clock and documents

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use zen_ui::{FixedClock, MemoryUrl, StaticDocuments};
use zen_widgets::{EventStatus, EventsBoard, EventsConfig, EventsFilter};

const PAGE: &str = "https://zenotika.id/acara";

fn board(href: &str) -> (Arc<MemoryUrl>, EventsBoard) {
    let url = Arc::new(MemoryUrl::new(href));
    // 2025-03-01 10:00 WIB
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 3, 0, 0).unwrap()));
    let board = EventsBoard::new(EventsConfig::default(), url.clone(), clock);
    (url, board)
}

fn documents() -> StaticDocuments {
    StaticDocuments::new().with_document(
        "/data/events.json",
        json!([
            { "title": "Dies Natalis", "date": "2025-03-20", "location": "Aula" },
            { "title": "Webinar Karier", "date": "2025-03-01T15:00:00+07:00" },
            { "title": "Hackathon", "date": "2025-02-10" },
            { "description": "tanpa judul", "date": "2025-03-05" },
            { "title": "Open Recruitment" }
        ]),
    )
}

#[tokio::test]
async fn default_filter_shows_upcoming() {
    let (url, mut board) = board(PAGE);
    let view = board.load(&documents()).await;

    let titles: Vec<_> = view.cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Webinar Karier", "Dies Natalis", "Open Recruitment"]);
    assert_eq!(view.cards[0].status, EventStatus::Today);
    assert_eq!(view.cards[1].chip_label, "Dalam 19 hari");
    assert_eq!(view.summary, "Menampilkan 3 acara mendatang.");
    assert_eq!(view.buttons.iter().map(|b| b.count).collect::<Vec<_>>(), [4, 3, 1]);
    assert_eq!(url.href().unwrap(), PAGE);
}

#[tokio::test]
async fn past_filter_from_url() {
    let (url, mut board) = board(&format!("{PAGE}?acara=PAST"));
    assert_eq!(board.filter(), EventsFilter::Past);

    let view = board.load(&documents()).await;
    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].chip_label, "Telah berlangsung");
    assert_eq!(url.href().unwrap(), format!("{PAGE}?acara=past"));
}

#[test]
fn invalid_filter_param_is_removed() {
    let (url, board) = board(&format!("{PAGE}?acara=besok&x=1"));
    assert_eq!(board.filter(), EventsFilter::Upcoming);
    assert_eq!(url.href().unwrap(), format!("{PAGE}?x=1"));
}

#[tokio::test]
async fn selecting_filters_updates_url() {
    let (url, mut board) = board(PAGE);
    board.load(&documents()).await;

    let all = board.select(EventsFilter::All);
    assert_eq!(all.cards.len(), 4);
    assert!(url.href().unwrap().contains("acara=all"));

    let back = board.select_raw("nonsense");
    assert_eq!(back.filter, EventsFilter::Upcoming);
    assert_eq!(url.href().unwrap(), PAGE);
}

#[tokio::test]
async fn empty_filter_has_message() {
    let (_url, mut board) = board(PAGE);
    let docs = StaticDocuments::new()
        .with_document("/data/events.json", json!([{ "title": "Lama", "date": "2024-01-01" }]));
    board.load(&docs).await;

    let view = board.select(EventsFilter::Upcoming);
    assert!(view.is_empty());
    assert_eq!(view.summary, "Tidak ada acara mendatang saat ini.");
    assert!(view.empty_message.is_some());
    assert!(!view.failed);
}

#[tokio::test]
async fn load_failure_yields_error_state() {
    let (_url, mut board) = board(PAGE);
    let docs = StaticDocuments::new();
    docs.fail_with_status("/data/events.json", 503);

    let view = board.load(&docs).await;
    assert!(view.failed);
    assert!(view.cards.is_empty());
    assert!(view.buttons.iter().all(|b| b.count == 0));
    assert!(board.listing().is_empty());
}
