//! Filter, sort and score
//!
//! Pure functions from (store, view-state, ledger, now) to the ordered list of
//! visible threads:
//!
//! 1. category filter (skipped for `all`)
//! 2. search filter over [`ThreadRecord::search_haystack`]
//! 3. sort: trending score, newest first, or unanswered newest first
//!
//! Sorting is stable; [`TieBreak::IdAscending`] adds the thread id as a final
//! key.

use crate::config::TieBreak;
use crate::store::ThreadStore;
use crate::view_state::{SortMode, ViewState};
use crate::votes::VoteLedger;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use zen_model::ThreadRecord;

const VOTE_WEIGHT: f64 = 2.0;
const REPLY_WEIGHT: f64 = 1.2;
const ANSWERED_BOOST: f64 = 5.0;
const RECENCY_WINDOW_HOURS: f64 = 24.0;
const RECENCY_CAP_HOURS: f64 = 72.0;
const RECENCY_RATE: f64 = 0.5;

/// Recency bonus for activity at `activity` (missing means `now`).
///
/// Decays linearly from 12 to 0 over the first day. Activity at or after
/// `now` earns nothing.
#[must_use]
pub fn recency_boost(activity: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let activity = activity.unwrap_or(now);
    #[allow(clippy::cast_precision_loss)]
    let hours = (now - activity).num_milliseconds() as f64 / 3_600_000.0;
    if hours <= 0.0 {
        return 0.0;
    }
    (RECENCY_WINDOW_HOURS - hours.min(RECENCY_CAP_HOURS)).max(0.0) * RECENCY_RATE
}

/// Trending score: `votes×2 + replies×1.2 + (answered ? 5 : 0) + recency`
#[must_use]
pub fn trending_score(thread: &ThreadRecord, ledger: &VoteLedger, now: DateTime<Utc>) -> f64 {
    let votes = f64::from(ledger.display_count(thread));
    let replies = f64::from(thread.replies);
    let answered = if thread.answered { ANSWERED_BOOST } else { 0.0 };

    votes * VOTE_WEIGHT
        + replies * REPLY_WEIGHT
        + answered
        + recency_boost(thread.activity_at(), now)
}

/// Category and search filters, in load order
#[must_use]
pub fn filter_threads<'a>(store: &'a ThreadStore, view: &ViewState) -> Vec<&'a ThreadRecord> {
    let category = view.category_filter();
    let term = view.search_term();

    store
        .iter()
        .filter(|t| category.map_or(true, |c| t.category == c))
        .filter(|t| t.matches_search(term))
        .collect()
}

/// Order `threads` for `mode`, dropping answered threads for `unanswered`
pub fn sort_threads(
    threads: &mut Vec<&ThreadRecord>,
    mode: SortMode,
    ledger: &VoteLedger,
    now: DateTime<Utc>,
    tie_break: TieBreak,
) {
    let tie = |a: &ThreadRecord, b: &ThreadRecord| match tie_break {
        TieBreak::Stable => Ordering::Equal,
        TieBreak::IdAscending => a.id.cmp(&b.id),
    };

    match mode {
        SortMode::Trending => {
            let mut scored: Vec<(f64, &ThreadRecord)> = threads
                .iter()
                .map(|t| (trending_score(t, ledger, now), *t))
                .collect();
            scored.sort_by(|(sa, a), (sb, b)| sb.total_cmp(sa).then_with(|| tie(a, b)));
            *threads = scored.into_iter().map(|(_, t)| t).collect();
        }
        SortMode::Newest | SortMode::Unanswered => {
            if mode == SortMode::Unanswered {
                threads.retain(|t| !t.answered);
            }
            threads.sort_by(|a, b| {
                b.created_at_millis()
                    .cmp(&a.created_at_millis())
                    .then_with(|| tie(a, b))
            });
        }
    }
}

/// Visible threads for `view`, in display order
#[must_use]
pub fn visible_threads<'a>(
    store: &'a ThreadStore,
    view: &ViewState,
    ledger: &VoteLedger,
    now: DateTime<Utc>,
    tie_break: TieBreak,
) -> Vec<&'a ThreadRecord> {
    let mut threads = filter_threads(store, view);
    sort_threads(&mut threads, view.sort_mode(), ledger, now, tie_break);
    tracing::debug!(
        total = store.len(),
        visible = threads.len(),
        sort = %view.sort_mode(),
        "Forum pipeline ran"
    );
    threads
}
