//! Filter/sort pipeline properties

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use zen_forum::{
    filter_threads, trending_score, visible_threads, SortMode, ThreadStore, TieBreak, ViewState,
    VoteLedger,
};
use zen_model::ThreadRecord;
use zen_test_utils::{fixed_now, thread};
use zen_ui::MemoryStorage;

const CATEGORIES: [&str; 4] = ["Karier", "Akademik", "Pemrograman", ""];
const WORDS: [&str; 6] = ["Rust", "magang", "Skripsi", "beasiswa", "LaTeX", "lomba"];

fn arb_thread() -> impl Strategy<Value = (usize, usize, usize, u32, u32, bool, Option<i64>)> {
    (
        0..CATEGORIES.len(),
        0..WORDS.len(),
        0..WORDS.len(),
        0u32..50,
        0u32..20,
        any::<bool>(),
        proptest::option::of(0i64..200),
    )
}

fn build_store(specs: &[(usize, usize, usize, u32, u32, bool, Option<i64>)]) -> ThreadStore {
    ThreadStore::from_records(specs.iter().enumerate().map(
        |(i, &(cat, w1, w2, upvotes, replies, answered, age))| {
            let mut builder = thread(&format!("t{i}"))
                .title(&format!("{} {}", WORDS[w1], i))
                .tags(&[WORDS[w2]])
                .category(CATEGORIES[cat])
                .upvotes(upvotes)
                .replies(replies)
                .answered(answered);
            if let Some(hours) = age {
                builder = builder.created_at(fixed_now() - Duration::hours(hours));
            }
            builder.build()
        },
    ))
}

fn ids(threads: &[&ThreadRecord]) -> Vec<String> {
    threads.iter().map(|t| t.id.as_str().to_string()).collect()
}

proptest! {
    #[test]
    fn prop_all_category_keeps_everything_in_order(specs in prop::collection::vec(arb_thread(), 0..12)) {
        let store = build_store(&specs);
        let filtered = filter_threads(&store, &ViewState::new());
        let all: Vec<&ThreadRecord> = store.iter().collect();
        prop_assert_eq!(ids(&filtered), ids(&all));
    }

    #[test]
    fn prop_search_results_contain_term(
        specs in prop::collection::vec(arb_thread(), 0..12),
        word in 0..WORDS.len(),
    ) {
        let store = build_store(&specs);
        let term = WORDS[word];
        let view = ViewState::new().with_search(&format!("  {term} "));
        let needle = term.to_lowercase();

        for t in filter_threads(&store, &view) {
            let tags = t.tags.join(" ");
            let fields = [
                t.title.as_str(),
                t.excerpt.as_str(),
                t.category.as_str(),
                t.author_name().unwrap_or(""),
                t.author_role().unwrap_or(""),
                tags.as_str(),
            ];
            prop_assert!(fields.iter().any(|f| f.to_lowercase().contains(&needle)));
        }
    }

    #[test]
    fn prop_unanswered_never_contains_answered(specs in prop::collection::vec(arb_thread(), 0..12)) {
        let store = build_store(&specs);
        let view = ViewState::new().with_sort(SortMode::Unanswered);
        let ledger = VoteLedger::new("forum_votes");
        let visible = visible_threads(&store, &view, &ledger, fixed_now(), TieBreak::Stable);
        prop_assert!(visible.iter().all(|t| !t.answered));
    }

    #[test]
    fn prop_newest_is_descending(specs in prop::collection::vec(arb_thread(), 0..12)) {
        let store = build_store(&specs);
        let view = ViewState::new().with_sort(SortMode::Newest);
        let ledger = VoteLedger::new("forum_votes");
        let visible = visible_threads(&store, &view, &ledger, fixed_now(), TieBreak::Stable);
        prop_assert!(visible
            .windows(2)
            .all(|w| w[0].created_at_millis() >= w[1].created_at_millis()));
    }

    #[test]
    fn prop_double_toggle_restores_count(
        specs in prop::collection::vec(arb_thread(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let store = build_store(&specs);
        let target = store.iter().nth(pick.index(store.len())).unwrap().clone();
        let storage = MemoryStorage::new();
        let mut ledger = VoteLedger::new("forum_votes");
        let before = ledger.display_count(&target);

        ledger.toggle(&target.id, &storage);
        prop_assert_eq!(ledger.display_count(&target), before + 1);
        ledger.toggle(&target.id, &storage);

        prop_assert_eq!(ledger.display_count(&target), before);
        prop_assert!(!ledger.has_voted(target.id.as_str()));
        prop_assert!(!ledger.to_document().contains_key(target.id.as_str()));
    }

    #[test]
    fn prop_trending_equal_scores_keep_input_order(count in 2usize..8, upvotes in 0u32..10) {
        let store = ThreadStore::from_records(
            (0..count).map(|i| thread(&format!("z{}", count - i)).upvotes(upvotes).build()),
        );
        let ledger = VoteLedger::new("forum_votes");
        let visible = visible_threads(&store, &ViewState::new(), &ledger, fixed_now(), TieBreak::Stable);
        let all: Vec<&ThreadRecord> = store.iter().collect();
        prop_assert_eq!(ids(&visible), ids(&all));
    }
}

#[test]
fn trending_example_scores_and_order() {
    let now: DateTime<Utc> = fixed_now();
    let store = ThreadStore::from_records([
        thread("first").upvotes(5).replies(1).answered(false).last_activity(now).build(),
        thread("second").upvotes(10).replies(0).answered(true).last_activity(now).build(),
        thread("third").upvotes(2).replies(8).answered(false).last_activity(now).build(),
    ]);
    let ledger = VoteLedger::new("forum_votes");

    let scores: Vec<f64> = store.iter().map(|t| trending_score(t, &ledger, now)).collect();
    let expected = [11.2, 25.0, 13.6];
    for (score, want) in scores.iter().zip(expected) {
        assert!((score - want).abs() < 1e-9, "score {score} != {want}");
    }

    let visible = visible_threads(&store, &ViewState::new(), &ledger, now, TieBreak::Stable);
    assert_eq!(ids(&visible), ["second", "third", "first"]);
}

#[test]
fn own_vote_counts_in_trending_score() {
    let now = fixed_now();
    let record = thread("a").upvotes(1).build();
    let mut ledger = VoteLedger::new("forum_votes");
    let before = trending_score(&record, &ledger, now);

    ledger.toggle(&record.id, &MemoryStorage::new());
    assert!((trending_score(&record, &ledger, now) - before - 2.0).abs() < 1e-9);
}
