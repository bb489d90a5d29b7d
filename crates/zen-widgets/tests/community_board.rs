//! Community grid against in-memory URL and documents

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use zen_ui::{MemoryUrl, StaticDocuments};
use zen_widgets::community::{
    LOAD_ERROR_MESSAGE, LOAD_FAILED_MESSAGE, NO_CONTENT_MESSAGE, NO_MATCH_MESSAGE,
};
use zen_widgets::{CommunityBoard, CommunityConfig, CommunityStatus, CommunityView};

const PAGE: &str = "https://zenotika.id/komunitas";
const DOC: &str = "/data/community.json";

fn board(href: &str) -> (Arc<MemoryUrl>, CommunityBoard) {
    let url = Arc::new(MemoryUrl::new(href));
    let board = CommunityBoard::new(CommunityConfig::default(), url.clone());
    (url, board)
}

fn documents() -> StaticDocuments {
    StaticDocuments::new().with_document(
        DOC,
        json!([
            {
                "title": "Bot Absensi",
                "author": "Tim HIMA",
                "description": "Absensi lewat Telegram",
                "tags": ["Python", "Bot"],
                "link": "https://github.com/zenotika/bot",
                "image": "https://images.example/bot.jpg"
            },
            {
                "id": "peta",
                "title": "Peta Kampus",
                "author": "Dewi",
                "description": "Peta interaktif gedung",
                "tags": ["Web"]
            },
            {
                "title": "Dashboard Nilai",
                "author": "Bima",
                "description": "Rekap nilai angkatan",
                "tags": ["Web", "Python"]
            }
        ]),
    )
}

fn titles(view: &CommunityView) -> Vec<&str> {
    view.cards.iter().map(|c| c.title.as_str()).collect()
}

#[tokio::test]
async fn loads_every_project_with_sorted_tags() {
    let (url, mut board) = board(PAGE);
    assert!(board.render().is_busy());

    let view = board.load(&documents()).await;

    assert_eq!(view.status, CommunityStatus::Ready);
    assert_eq!(titles(&view), ["Bot Absensi", "Peta Kampus", "Dashboard Nilai"]);
    let anchors: Vec<_> = view.cards.iter().map(|c| c.anchor.as_str()).collect();
    assert_eq!(anchors, ["bot-absensi", "peta", "dashboard-nilai"]);

    let labels: Vec<_> = view.tags.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["Semua", "Bot", "Python", "Web"]);
    assert!(view.tags[0].pressed);
    assert_eq!(view.tags[0].data_tag(), "all");

    assert!(view.cards[0].image.is_some());
    assert_eq!(view.cards[1].fallback_initial, 'P');
    assert!(view.empty_message.is_none());
    assert_eq!(url.href().unwrap(), PAGE);
}

#[tokio::test]
async fn filters_seed_from_url() {
    let (url, mut board) = board(&format!("{PAGE}?komunitas=nilai&tag=Python"));
    let view = board.load(&documents()).await;

    assert_eq!(board.active_tag(), Some("Python"));
    assert_eq!(view.search, "nilai");
    assert_eq!(titles(&view), ["Dashboard Nilai"]);
    assert!(view.tags.iter().any(|t| t.label == "Python" && t.pressed));
    assert_eq!(url.href().unwrap(), format!("{PAGE}?komunitas=nilai&tag=Python"));
}

#[tokio::test]
async fn unknown_tag_param_is_dropped() {
    let (url, mut board) = board(&format!("{PAGE}?tag=Rust"));
    let view = board.load(&documents()).await;

    assert_eq!(board.active_tag(), None);
    assert_eq!(view.cards.len(), 3);
    assert_eq!(url.href().unwrap(), PAGE);
}

#[tokio::test]
async fn tag_and_search_mirror_to_url() {
    let (url, mut board) = board(PAGE);
    board.load(&documents()).await;

    let view = board.select_tag("Web");
    assert_eq!(titles(&view), ["Peta Kampus", "Dashboard Nilai"]);
    assert_eq!(url.href().unwrap(), format!("{PAGE}?tag=Web"));

    let view = board.search("  DEWI ");
    assert_eq!(titles(&view), ["Peta Kampus"]);
    assert_eq!(url.href().unwrap(), format!("{PAGE}?tag=Web&komunitas=DEWI"));

    let view = board.search("telegram");
    assert!(view.cards.is_empty());
    assert_eq!(view.empty_message.as_deref(), Some(NO_MATCH_MESSAGE));

    let view = board.select_tag("all");
    assert_eq!(titles(&view), ["Bot Absensi"]);
    assert_eq!(url.href().unwrap(), format!("{PAGE}?komunitas=telegram"));

    board.search("");
    board.select_tag("Rust");
    assert_eq!(board.active_tag(), None);
    assert_eq!(url.href().unwrap(), PAGE);
}

#[tokio::test]
async fn fragment_focuses_visible_card() {
    let (url, mut board) = board(&format!("{PAGE}#peta"));
    let view = board.load(&documents()).await;
    assert_eq!(view.focus.as_deref(), Some("peta"));

    board.select_tag("Python");
    assert_eq!(board.focus_from_fragment(), None);

    url.navigate(format!("{PAGE}?tag=Python#dashboard-nilai"));
    assert_eq!(board.focus_from_fragment().as_deref(), Some("dashboard-nilai"));

    url.navigate(format!("{PAGE}#bukan-kartu"));
    assert_eq!(board.focus_from_fragment(), None);
}

#[tokio::test]
async fn empty_document_shows_no_content() {
    let (url, mut board) = board(&format!("{PAGE}?tag=Web"));
    let docs = StaticDocuments::new().with_document(DOC, json!([]));

    let view = board.load(&docs).await;
    assert_eq!(view.status, CommunityStatus::NoContent);
    assert_eq!(view.empty_message.as_deref(), Some(NO_CONTENT_MESSAGE));
    assert!(view.tags.is_empty());
    assert_eq!(url.href().unwrap(), format!("{PAGE}?tag=Web"));
}

#[tokio::test]
async fn failures_pick_their_message() {
    let (_, mut board) = board(PAGE);
    let docs = StaticDocuments::new();

    docs.fail_with_status(DOC, 503);
    let view = board.load(&docs).await;
    assert_eq!(view.status, CommunityStatus::Failed);
    assert_eq!(view.empty_message.as_deref(), Some(LOAD_FAILED_MESSAGE));

    docs.fail_with_transport(DOC, "offline");
    let view = board.load(&docs).await;
    assert_eq!(view.empty_message.as_deref(), Some(LOAD_ERROR_MESSAGE));

    docs.insert(DOC, json!({ "projects": [] }));
    let view = board.load(&docs).await;
    assert_eq!(view.empty_message.as_deref(), Some(LOAD_ERROR_MESSAGE));
    assert!(board.projects().is_empty());

    let view = board.load(&documents()).await;
    assert_eq!(view.status, CommunityStatus::Ready);
    assert!(view.empty_message.is_none());
}
