//! Community events listing
//!
//! Events are classified against "today" by calendar day in the site's local
//! offset, ordered (upcoming soonest first with undated last, then past most
//! recent first) and filtered by the `acara` query parameter.
//!
//! ```text
//! events.json ─► parse_event_document ─► EventsListing::classify
//!                                            │
//!                 acara param ─► EventsFilter ┴─► EventsView
//! ```

use crate::error::WidgetError;
use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use zen_model::{parse_event_document, EventRecord};
use zen_ui::{Clock, DocumentSource, QueryParamStore, UrlHost};

/// Summary shown while the document loads
pub const LOADING_SUMMARY: &str = "Memuat agenda komunitas...";
/// Empty-state message after a failed load
pub const LOAD_FAILED_MESSAGE: &str = "Gagal memuat daftar acara. Coba segarkan halaman nanti.";
/// Title used when an event has none after normalisation
pub const DEFAULT_EVENT_TITLE: &str = "Acara Komunitas";
/// Location shown when an event has none
pub const DEFAULT_LOCATION: &str = "Lokasi menyusul";
/// Link text on event cards
pub const DETAIL_LINK_LABEL: &str = "Lihat detail";

const MONTHS_SHORT: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MEI", "JUN", "JUL", "AGU", "SEP", "OKT", "NOV", "DES",
];
const MONTHS_LONG: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

/// Events listing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventsConfig {
    /// Events document path
    pub data_path: String,
    /// Query parameter holding the filter
    pub query_key: String,
    /// Offset from UTC, in minutes, that defines calendar days
    pub utc_offset_minutes: i32,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            data_path: "/data/events.json".to_owned(),
            query_key: "acara".to_owned(),
            // WIB
            utc_offset_minutes: 7 * 60,
        }
    }
}

impl EventsConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document path
    #[must_use]
    pub fn with_data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Set the filter query parameter
    #[must_use]
    pub fn with_query_key(mut self, key: impl Into<String>) -> Self {
        self.query_key = key.into();
        self
    }

    /// Set the local offset
    #[must_use]
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Local offset, falling back to UTC when out of range
    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Which events the listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventsFilter {
    /// Everything
    All,
    /// Today, future and undated events
    #[default]
    Upcoming,
    /// Past events
    Past,
}

impl EventsFilter {
    /// Filter buttons, in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Upcoming, Self::Past];

    /// Query parameter value
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Upcoming => "upcoming",
            Self::Past => "past",
        }
    }

    /// Whether this is the filter omitted from the URL
    #[inline]
    #[must_use]
    pub fn is_default(self) -> bool {
        self == Self::default()
    }

    /// Normalise a raw parameter value: trimmed and lower-cased, `None` when
    /// blank or unrecognised
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    /// Whether an event with `status` passes this filter
    #[inline]
    #[must_use]
    pub fn admits(self, status: EventStatus) -> bool {
        match self {
            Self::All => true,
            Self::Upcoming => !status.is_past(),
            Self::Past => status.is_past(),
        }
    }

    fn summary(self, count: usize) -> String {
        match (self, count) {
            (Self::All, 0) => "Agenda komunitas belum tersedia.".to_owned(),
            (Self::All, n) => format!("Menampilkan {n} agenda komunitas."),
            (Self::Upcoming, 0) => "Tidak ada acara mendatang saat ini.".to_owned(),
            (Self::Upcoming, n) => format!("Menampilkan {n} acara mendatang."),
            (Self::Past, 0) => "Belum ada arsip acara.".to_owned(),
            (Self::Past, n) => format!("Menampilkan {n} arsip acara."),
        }
    }

    fn empty_message(self) -> &'static str {
        match self {
            Self::All => "Belum ada agenda komunitas yang bisa ditayangkan saat ini.",
            Self::Upcoming => "Tidak ada acara mendatang untuk saat ini. Cek kembali sebentar lagi!",
            Self::Past => "Belum ada arsip acara yang tersedia.",
        }
    }
}

impl fmt::Display for EventsFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventsFilter {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "upcoming" => Ok(Self::Upcoming),
            "past" => Ok(Self::Past),
            _ => Err(WidgetError::InvalidFilter(s.to_owned())),
        }
    }
}

/// Where an event sits relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    /// Same calendar day
    Today,
    /// Later, or undated
    Upcoming,
    /// Earlier
    Past,
}

impl EventStatus {
    /// Whether the event is over
    #[inline]
    #[must_use]
    pub fn is_past(self) -> bool {
        self == Self::Past
    }

    /// Style modifier for the card and chip
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Upcoming => "upcoming",
            Self::Past => "past",
        }
    }
}

/// Classification of one event date against today
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTiming {
    /// Today, upcoming or past
    pub status: EventStatus,
    /// Human relative label ("Besok", "3 hari lalu"), when one applies
    pub relative: Option<String>,
    /// Calendar days from today; `None` when undated
    pub days_from_today: Option<i64>,
    /// Parsed instant; `None` when undated
    pub at: Option<DateTime<Utc>>,
}

impl EventTiming {
    /// Classify `at` against `now`, counting calendar days in `offset`
    #[must_use]
    pub fn classify(at: Option<DateTime<Utc>>, now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let Some(at) = at else {
            return Self {
                status: EventStatus::Upcoming,
                relative: None,
                days_from_today: None,
                at: None,
            };
        };

        let today = now.with_timezone(&offset).date_naive();
        let day = at.with_timezone(&offset).date_naive();
        let diff = (day - today).num_days();
        let (status, relative) = relative_day(diff);

        Self {
            status,
            relative,
            days_from_today: Some(diff),
            at: Some(at),
        }
    }

    /// Chip text
    #[must_use]
    pub fn status_label(&self) -> String {
        match (self.status, &self.relative) {
            (EventStatus::Today, _) => "Berlangsung hari ini".to_owned(),
            (EventStatus::Past, Some(r)) | (EventStatus::Upcoming, Some(r)) => r.clone(),
            (EventStatus::Past, None) => "Telah berlangsung".to_owned(),
            (EventStatus::Upcoming, None) => "Segera".to_owned(),
        }
    }
}

fn relative_day(diff: i64) -> (EventStatus, Option<String>) {
    match diff {
        0 => (EventStatus::Today, Some("Berlangsung hari ini".to_owned())),
        1 => (EventStatus::Upcoming, Some("Besok".to_owned())),
        2..=30 => (EventStatus::Upcoming, Some(format!("Dalam {diff} hari"))),
        // diff / 7 never lands on a half, so this is round-to-nearest
        31..=90 => (EventStatus::Upcoming, Some(format!("Dalam {} minggu", (diff + 3) / 7))),
        -1 => (EventStatus::Past, Some("Kemarin".to_owned())),
        -7..=-2 => (EventStatus::Past, Some(format!("{} hari lalu", -diff))),
        d if d < -7 => (EventStatus::Past, Some("Telah berlangsung".to_owned())),
        _ => (EventStatus::Upcoming, None),
    }
}

/// An event with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent {
    /// Published record
    pub record: EventRecord,
    /// Classification at load time
    pub timing: EventTiming,
}

/// Number of events each filter shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventCounts {
    /// Every event
    pub all: usize,
    /// Today, future and undated
    pub upcoming: usize,
    /// Past
    pub past: usize,
}

impl EventCounts {
    /// Count for `filter`
    #[must_use]
    pub fn get(&self, filter: EventsFilter) -> usize {
        match filter {
            EventsFilter::All => self.all,
            EventsFilter::Upcoming => self.upcoming,
            EventsFilter::Past => self.past,
        }
    }
}

/// Render model for one event card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCard {
    /// Title
    pub title: String,
    /// Description, when present
    pub description: Option<String>,
    /// Venue or the placeholder
    pub location: String,
    /// Detail link, when present
    pub link: Option<String>,
    /// Classification
    pub status: EventStatus,
    /// Chip text
    pub chip_label: String,
    /// Relative label, when one applies
    pub relative: Option<String>,
    /// Day of month column ("--" when undated)
    pub day: String,
    /// Short month column ("TBD" when undated)
    pub month: String,
    /// Full local date
    pub formatted: String,
}

impl EventCard {
    /// Build the card for `event`, formatting dates in `offset`
    #[must_use]
    pub fn for_event(event: &ScheduledEvent, offset: FixedOffset) -> Self {
        let record = &event.record;
        let (day, month, formatted) = match event.timing.at {
            Some(at) => {
                let local = at.with_timezone(&offset);
                let month_index = local.month0() as usize;
                (
                    local.day().to_string(),
                    MONTHS_SHORT[month_index].to_owned(),
                    format!(
                        "{}, {} {} {}",
                        weekday_name(local.weekday()),
                        local.day(),
                        MONTHS_LONG[month_index],
                        local.year()
                    ),
                )
            }
            None => (
                "--".to_owned(),
                "TBD".to_owned(),
                "Tanggal akan diumumkan".to_owned(),
            ),
        };

        Self {
            title: if record.title.trim().is_empty() {
                DEFAULT_EVENT_TITLE.to_owned()
            } else {
                record.title.clone()
            },
            description: non_blank(&record.description),
            location: non_blank(&record.location).unwrap_or_else(|| DEFAULT_LOCATION.to_owned()),
            link: non_blank(&record.link),
            status: event.timing.status,
            chip_label: event.timing.status_label(),
            relative: event.timing.relative.clone(),
            day,
            month,
            formatted,
        }
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Filter button state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterButton {
    /// Filter the button selects
    pub filter: EventsFilter,
    /// Events it would show
    pub count: usize,
    /// Whether it is the active filter
    pub pressed: bool,
}

/// Everything the events region displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsView {
    /// Active filter
    pub filter: EventsFilter,
    /// Cards, in order
    pub cards: Vec<EventCard>,
    /// Summary line
    pub summary: String,
    /// Empty-state message, when no cards are shown
    pub empty_message: Option<String>,
    /// Filter buttons with counts
    pub buttons: Vec<FilterButton>,
    /// Whether this is the load-failure state
    pub failed: bool,
}

impl EventsView {
    /// Load-failure state: error message, zero counts
    #[must_use]
    pub fn failed(filter: EventsFilter) -> Self {
        Self {
            filter,
            cards: Vec::new(),
            summary: EventsFilter::All.summary(0),
            empty_message: Some(LOAD_FAILED_MESSAGE.to_owned()),
            buttons: buttons(EventCounts::default(), filter),
            failed: true,
        }
    }

    /// Whether the empty state is shown
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

fn buttons(counts: EventCounts, active: EventsFilter) -> Vec<FilterButton> {
    EventsFilter::ALL
        .iter()
        .map(|&filter| FilterButton {
            filter,
            count: counts.get(filter),
            pressed: filter == active,
        })
        .collect()
}

/// Classified and ordered events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsListing {
    events: Vec<ScheduledEvent>,
    offset: Option<FixedOffset>,
}

impl EventsListing {
    /// Classify `records` against `now` and order them: upcoming (today and
    /// undated included) ascending with undated last, then past descending.
    #[must_use]
    pub fn classify(records: Vec<EventRecord>, now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let (mut past, mut upcoming): (Vec<_>, Vec<_>) = records
            .into_iter()
            .map(|record| {
                let timing = EventTiming::classify(record.scheduled_at(), now, offset);
                ScheduledEvent { record, timing }
            })
            .partition(|e| e.timing.status.is_past());

        upcoming.sort_by_key(|e| (e.timing.at.is_none(), e.timing.at));
        past.sort_by(|a, b| b.timing.at.cmp(&a.timing.at));

        upcoming.extend(past);
        Self {
            events: upcoming,
            offset: Some(offset),
        }
    }

    /// Ordered events
    #[inline]
    #[must_use]
    pub fn events(&self) -> &[ScheduledEvent] {
        &self.events
    }

    /// Number of events
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing was listed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Per-filter counts
    #[must_use]
    pub fn counts(&self) -> EventCounts {
        let past = self
            .events
            .iter()
            .filter(|e| e.timing.status.is_past())
            .count();
        EventCounts {
            all: self.events.len(),
            upcoming: self.events.len() - past,
            past,
        }
    }

    /// Events passing `filter`, in listing order
    pub fn filtered(&self, filter: EventsFilter) -> impl Iterator<Item = &ScheduledEvent> {
        self.events
            .iter()
            .filter(move |e| filter.admits(e.timing.status))
    }

    /// Render model for `filter`
    #[must_use]
    pub fn render(&self, filter: EventsFilter) -> EventsView {
        let offset = self.offset.unwrap_or_else(|| Utc.fix());
        let cards: Vec<EventCard> = self
            .filtered(filter)
            .map(|e| EventCard::for_event(e, offset))
            .collect();
        let empty_message = cards
            .is_empty()
            .then(|| filter.empty_message().to_owned());

        EventsView {
            filter,
            summary: filter.summary(cards.len()),
            cards,
            empty_message,
            buttons: buttons(self.counts(), filter),
            failed: false,
        }
    }
}

/// Events region state for one page session
pub struct EventsBoard {
    config: EventsConfig,
    query: QueryParamStore<Arc<dyn UrlHost>>,
    clock: Arc<dyn Clock>,
    filter: EventsFilter,
    listing: EventsListing,
}

impl fmt::Debug for EventsBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventsBoard")
            .field("filter", &self.filter)
            .field("events", &self.listing.len())
            .finish_non_exhaustive()
    }
}

impl EventsBoard {
    /// Create the board and seed the filter from the URL.
    ///
    /// An unrecognised filter parameter is removed from the URL.
    #[must_use]
    pub fn new(config: EventsConfig, url: Arc<dyn UrlHost>, clock: Arc<dyn Clock>) -> Self {
        let query = QueryParamStore::new(url);
        let raw = query.get(&config.query_key);
        let filter = match EventsFilter::parse(&raw) {
            Some(filter) => filter,
            None => {
                if !raw.is_empty() {
                    tracing::debug!(value = %raw, "Removing invalid events filter parameter");
                    query.set(&config.query_key, "");
                }
                EventsFilter::default()
            }
        };

        Self {
            config,
            query,
            clock,
            filter,
            listing: EventsListing::default(),
        }
    }

    /// Active filter
    #[inline]
    #[must_use]
    pub fn filter(&self) -> EventsFilter {
        self.filter
    }

    /// Loaded events
    #[inline]
    #[must_use]
    pub fn listing(&self) -> &EventsListing {
        &self.listing
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EventsConfig {
        &self.config
    }

    /// Fetch, classify and render the events document
    pub async fn load<D: DocumentSource + ?Sized>(&mut self, source: &D) -> EventsView {
        match source.fetch_json(&self.config.data_path).await {
            Ok(document) => self.install(parse_event_document(document)),
            Err(e) => self.fail_load(&WidgetError::from(e)),
        }
    }

    /// Classify `records` against the clock and render
    pub fn install(&mut self, records: Vec<EventRecord>) -> EventsView {
        self.listing = EventsListing::classify(records, self.clock.now(), self.config.offset());
        tracing::info!(events = self.listing.len(), "Events loaded");
        self.render()
    }

    fn fail_load(&mut self, error: &WidgetError) -> EventsView {
        tracing::error!("Failed to load events: {error}");
        self.listing = EventsListing::default();
        EventsView::failed(self.filter)
    }

    /// Filter button pressed
    pub fn select(&mut self, filter: EventsFilter) -> EventsView {
        self.filter = filter;
        self.render()
    }

    /// Filter chosen by raw value; anything unrecognised selects upcoming
    pub fn select_raw(&mut self, raw: &str) -> EventsView {
        self.select(EventsFilter::parse(raw).unwrap_or_default())
    }

    /// Mirror the filter to the URL and build the view
    pub fn render(&self) -> EventsView {
        let value = if self.filter.is_default() {
            ""
        } else {
            self.filter.as_str()
        };
        self.query.set(&self.config.query_key, value);
        self.listing.render(self.filter)
    }
}
