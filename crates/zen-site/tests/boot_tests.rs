//! Site boot and command plumbing

use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use zen_forum::{ForumCommand, LoadStatus, SortMode};
use zen_site::{command_channel, drain_commands, run_commands, Site, SiteConfig, SiteHost};
use zen_test_utils::{sample_forum_document, RecordingSurface, TestHost, FORUM_URL};
use zen_ui::{StaticDocuments, StorageBackend};
use zen_widgets::{EventsFilter, Theme};

fn documents() -> StaticDocuments {
    StaticDocuments::new()
        .with_document("/data/forum.json", sample_forum_document())
        .with_document(
            "/data/events.json",
            json!([
                { "title": "Kopdar Maret", "date": "2025-03-08" },
                { "title": "Demo Day", "date": "2025-02-01" }
            ]),
        )
        .with_document(
            "/data/announcements.json",
            json!([{ "id": "ospek", "message": "OSPEK dimulai", "cta_link": "/ospek" }]),
        )
        .with_document(
            "/data/community.json",
            json!([
                { "title": "Bot Absensi", "author": "Tim HIMA", "tags": ["Python"] },
                { "id": "peta", "title": "Peta Kampus", "author": "Dewi", "tags": ["Web"] }
            ]),
        )
}

fn site_host(host: &TestHost) -> SiteHost {
    SiteHost::new(host.url.clone(), host.storage.clone(), host.clock.clone())
}

async fn boot(host: &TestHost, docs: &StaticDocuments) -> Site<RecordingSurface> {
    Site::boot(SiteConfig::default(), site_host(host), RecordingSurface::new(), docs).await
}

#[tokio::test]
async fn boot_loads_every_component() {
    let host = TestHost::new(FORUM_URL);
    let site = boot(&host, &documents()).await;

    assert_eq!(site.forum().status(), LoadStatus::Ready);
    assert_eq!(site.forum().surface().rendered_ids().len(), 3);
    assert_eq!(site.events_view().cards.len(), 1);
    assert_eq!(site.events_view().cards[0].title, "Kopdar Maret");
    assert_eq!(site.announcement().unwrap().message, "OSPEK dimulai");
    assert_eq!(site.theme().current(), Theme::Dark);
    assert_eq!(site.merch().products().count(), 2);
    assert_eq!(site.community_view().cards.len(), 2);
    assert_eq!(site.community().tags(), ["Python", "Web"]);
}

#[tokio::test]
async fn one_failed_document_degrades_only_its_component() {
    let host = TestHost::new(FORUM_URL);
    let docs = documents();
    docs.fail_with_status("/data/forum.json", 500);

    let site = boot(&host, &docs).await;
    assert_eq!(site.forum().status(), LoadStatus::Failed);
    assert_eq!(site.events_view().cards.len(), 1);
    assert!(site.announcement().is_some());
    assert_eq!(site.community_view().cards.len(), 2);
}

#[tokio::test]
async fn community_grid_interactions() {
    let host = TestHost::new(&format!("{FORUM_URL}#peta"));
    let mut site = boot(&host, &documents()).await;
    assert_eq!(site.community_view().focus.as_deref(), Some("peta"));

    let view = site.select_community_tag("Python");
    assert_eq!(view.cards[0].title, "Bot Absensi");
    assert!(host.href().contains("tag=Python"));

    let view = site.search_community("tidak ada");
    assert!(view.cards.is_empty());
    assert!(host.href().contains("komunitas=tidak+ada"));

    site.select_community_tag("all");
    site.search_community("");
    host.url.navigate(format!("{FORUM_URL}#peta"));
    assert_eq!(site.location_changed().as_deref(), Some("peta"));
}

#[tokio::test]
async fn site_level_interactions_persist() {
    let host = TestHost::new(FORUM_URL);
    host.storage.set_item("zen_announcement_dismissed", "other").unwrap();
    let mut site = Site::boot(
        SiteConfig::default(),
        site_host(&host).with_prefers_light(true),
        RecordingSurface::new(),
        &documents(),
    )
    .await;

    assert_eq!(site.theme().current(), Theme::Light);
    assert_eq!(site.toggle_theme(), Theme::Dark);
    assert_eq!(host.storage.raw("theme").as_deref(), Some("dark"));

    assert!(site.dismiss_announcement());
    assert_eq!(host.storage.raw("zen_announcement_dismissed").as_deref(), Some("ospek"));

    let progress = site.toggle_merch("jaket").unwrap();
    assert_eq!(progress.display, 1);
    assert!(site.toggle_merch("topi").is_err());

    let past = site.select_events_filter(EventsFilter::Past);
    assert_eq!(past.cards[0].title, "Demo Day");
    assert!(host.href().contains("acara=past"));
}

#[tokio::test(start_paused = true)]
async fn debounced_search_reaches_session_once() {
    let host = TestHost::new(FORUM_URL);
    let mut site = boot(&host, &documents()).await;
    let renders = site.forum().surface().list_renders;

    let (tx, mut rx) = command_channel(8);
    let search = site.forum_search_input(tx.clone());
    assert_eq!(search.delay(), Duration::from_millis(300));
    for text in ["r", "ru", "rus", "rust"] {
        search.input(text);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(search.is_pending());
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(drain_commands(site.forum_mut(), &mut rx), 1);
    assert_eq!(site.forum().surface().list_renders, renders + 1);
    assert_eq!(site.forum().surface().rendered_ids(), ["rust-101"]);
    assert!(host.href().contains("forum=rust"));
}

#[tokio::test]
async fn run_commands_until_senders_drop() {
    let host = TestHost::new(FORUM_URL);
    let mut site = boot(&host, &documents()).await;

    let (tx, mut rx) = command_channel(8);
    tx.send(ForumCommand::SelectSort(SortMode::Newest)).await.unwrap();
    tx.send(ForumCommand::SelectCategory("Karier".into())).await.unwrap();
    drop(tx);

    assert_eq!(run_commands(site.forum_mut(), &mut rx).await, 2);
    assert_eq!(site.forum().surface().rendered_ids(), ["magang-2025"]);
}
