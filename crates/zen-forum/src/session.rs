//! Forum session
//!
//! One [`ForumSession`] per page view owns every piece of forum state (store,
//! ledger, view-state, modal, reveal tracking) and drives a [`ForumSurface`].
//! All mutation goes through `&mut self`; the only asynchronous step is
//! fetching the thread document, guarded by a generation ticket so a slow,
//! superseded response can never overwrite a newer one.

use crate::command::ForumCommand;
use crate::config::ForumConfig;
use crate::error::ForumError;
use crate::modal::ModalController;
use crate::pipeline;
use crate::render::{
    CategoryFilters, EmptyReason, ThreadDetail, ThreadListModel, VoteBadge,
};
use crate::store::ThreadStore;
use crate::surface::ForumSurface;
use crate::view_state::{SortMode, ViewState, ALL_CATEGORIES};
use crate::votes::VoteLedger;
use serde_json::Value;
use std::sync::Arc;
use zen_model::{ThreadId, ThreadRecord};
use zen_ui::{
    Clock, DocumentSource, FadeInObserver, FetchError, GenerationCounter, IntersectionEntry,
    LoadTicket, QueryParamStore, RevealOptions, StorageBackend, TrapAction, TrapKey, UrlHost,
};

/// Browser capabilities a session needs
#[derive(Clone)]
pub struct ForumHost {
    /// Location and history
    pub url: Arc<dyn UrlHost>,
    /// Local storage
    pub storage: Arc<dyn StorageBackend>,
    /// Wall clock for trending recency
    pub clock: Arc<dyn Clock>,
}

impl ForumHost {
    /// Bundle host capabilities
    #[must_use]
    pub fn new(
        url: Arc<dyn UrlHost>,
        storage: Arc<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            url,
            storage,
            clock,
        }
    }
}

/// Thread document load status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Fetch in flight
    Loading,
    /// Threads loaded
    Ready,
    /// Last load failed
    Failed,
}

/// Step run after the list is re-rendered
#[derive(Debug, Clone, PartialEq, Eq)]
enum AfterRender {
    Nothing,
    FocusVote(ThreadId),
    FocusThread(ThreadId),
}

/// Forum state for one page session
pub struct ForumSession<S: ForumSurface> {
    config: ForumConfig,
    query: QueryParamStore<Arc<dyn UrlHost>>,
    storage: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    surface: S,
    store: ThreadStore,
    ledger: VoteLedger,
    view: ViewState,
    modal: ModalController<S::Element>,
    reveal: FadeInObserver<ThreadId>,
    generations: GenerationCounter,
    status: LoadStatus,
    rendered: Vec<ThreadId>,
    initial_focus_handled: bool,
}

impl<S: ForumSurface> ForumSession<S> {
    /// Create a session with nothing loaded
    #[must_use]
    pub fn new(config: ForumConfig, host: ForumHost, surface: S) -> Self {
        let ledger = VoteLedger::new(config.votes_key.clone());
        Self {
            query: QueryParamStore::new(host.url),
            storage: host.storage,
            clock: host.clock,
            surface,
            store: ThreadStore::new(),
            ledger,
            view: ViewState::new(),
            modal: ModalController::new(),
            reveal: FadeInObserver::new(RevealOptions::default(), false, true),
            generations: GenerationCounter::new(),
            status: LoadStatus::Idle,
            rendered: Vec::new(),
            initial_focus_handled: false,
            config,
        }
    }

    /// Use a preconfigured reveal tracker
    #[must_use]
    pub fn with_reveal(mut self, reveal: FadeInObserver<ThreadId>) -> Self {
        self.reveal = reveal;
        self
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ForumConfig {
        &self.config
    }

    /// Current selection
    #[inline]
    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Loaded threads
    #[inline]
    #[must_use]
    pub fn store(&self) -> &ThreadStore {
        &self.store
    }

    /// Vote flags
    #[inline]
    #[must_use]
    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    /// Modal state
    #[inline]
    #[must_use]
    pub fn modal(&self) -> &ModalController<S::Element> {
        &self.modal
    }

    /// Reveal tracker
    #[inline]
    #[must_use]
    pub fn reveal(&self) -> &FadeInObserver<ThreadId> {
        &self.reveal
    }

    /// Load status
    #[inline]
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Ids of the cards last rendered, in order
    #[inline]
    #[must_use]
    pub fn rendered(&self) -> &[ThreadId] {
        &self.rendered
    }

    /// Surface adapter
    #[inline]
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Surface adapter, mutably
    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Fetch and install the thread document
    pub async fn load<D: DocumentSource + ?Sized>(&mut self, source: &D) -> bool {
        let ticket = self.begin_load();
        let result = source.fetch_json(&self.config.data_path).await;
        self.complete_load(ticket, result)
    }

    /// Mark the list busy and take a ticket for a new load
    pub fn begin_load(&mut self) -> LoadTicket {
        self.status = LoadStatus::Loading;
        self.surface.set_busy(true);
        self.generations.next()
    }

    /// Apply the outcome of the load started with `ticket`.
    ///
    /// Returns `false` when a newer load has started since; the response is
    /// discarded.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<Value, FetchError>) -> bool {
        if !self.generations.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation(),
                "Discarding superseded forum response"
            );
            return false;
        }

        match result {
            Ok(document) => self.install(ThreadStore::from_document(document)),
            Err(e) => self.fail_load(&ForumError::from(e)),
        }
        true
    }

    /// Install an already-built store, as after a successful load
    pub fn install(&mut self, store: ThreadStore) {
        self.store = store;
        self.ledger = VoteLedger::load(self.storage.as_ref(), &self.config.votes_key);
        self.view = ViewState::new();
        self.rendered.clear();
        self.status = LoadStatus::Ready;
        tracing::info!(
            threads = self.store.len(),
            votes = self.ledger.len(),
            "Forum threads loaded"
        );

        self.apply_query_state();
        self.surface
            .render_categories(&CategoryFilters::build(&self.store, &self.view));
        self.surface
            .set_controls(self.view.search_raw(), self.view.sort_mode());
        self.refresh();
    }

    fn fail_load(&mut self, error: &ForumError) {
        tracing::error!("{error}");
        self.store = ThreadStore::new();
        self.status = LoadStatus::Failed;
        self.rendered.clear();
        self.surface
            .render_categories(&CategoryFilters::build(&self.store, &self.view));
        self.surface
            .render_list(&ThreadListModel::empty(EmptyReason::LoadFailed));
        self.surface.set_busy(false);
    }

    /// Seed view-state from the URL
    fn apply_query_state(&mut self) {
        let keys = &self.config.query_keys;

        let search = self.query.get(&keys.search);
        if !search.is_empty() {
            self.view.set_search(&search);
        }

        let sort = self.query.get(&keys.sort);
        if !sort.is_empty() {
            match sort.parse::<SortMode>() {
                Ok(mode) => self.view.set_sort(mode),
                Err(e) => tracing::debug!("Ignoring sort parameter: {e}"),
            }
        }

        let category = self.query.get(&keys.category);
        if self.store.has_category(&category) {
            self.view.set_category(&category);
        }
    }

    fn write_view_to_url(&self) {
        let keys = &self.config.query_keys;
        self.query.set(&keys.search, self.view.search_raw());
        self.query
            .set(&keys.category, self.view.category_filter().unwrap_or(""));
        let sort = self.view.sort_mode();
        self.query
            .set(&keys.sort, if sort.is_default() { "" } else { sort.as_str() });
    }

    /// Re-run the pipeline and re-render the list
    pub fn refresh(&mut self) {
        self.render_pass(AfterRender::Nothing);
    }

    fn render_pass(&mut self, after: AfterRender) {
        if self.status != LoadStatus::Ready {
            return;
        }

        let now = self.clock.now();
        let visible = pipeline::visible_threads(
            &self.store,
            &self.view,
            &self.ledger,
            now,
            self.config.tie_break,
        );
        let list = ThreadListModel::build(&visible, &self.store, &self.view, &self.ledger);
        self.rendered = list.ids().cloned().collect();

        self.surface.render_list(&list);
        self.surface.set_busy(false);
        let revealed = self.reveal.observe(self.rendered.iter().cloned());
        if !revealed.is_empty() {
            self.surface.reveal(&revealed);
        }
        self.write_view_to_url();

        match after {
            AfterRender::Nothing => {}
            AfterRender::FocusVote(id) => {
                self.surface.focus_vote(&id);
            }
            AfterRender::FocusThread(id) => {
                self.focus_from_query(true, Some(id));
            }
        }

        self.focus_from_query(false, None);
        self.reconcile_modal();
    }

    /// Search box settled
    pub fn set_search(&mut self, raw: &str) {
        self.view.set_search(raw);
        self.refresh();
    }

    /// Category button pressed
    pub fn select_category(&mut self, category: &str) {
        self.view.set_category(category);
        self.surface
            .render_categories(&CategoryFilters::build(&self.store, &self.view));
        self.refresh();
    }

    /// Sort selector changed
    pub fn select_sort(&mut self, mode: SortMode) {
        self.view.set_sort(mode);
        self.refresh();
    }

    /// Flip this browser's vote on `id`.
    ///
    /// Returns the new flag, or `None` for an unknown thread. Under trending
    /// the list re-sorts; otherwise only the card is patched. Focus returns to
    /// the vote control either way.
    pub fn toggle_vote(&mut self, id: &str) -> Option<bool> {
        let Some(thread_id) = self.store.get(id).map(|t| t.id.clone()) else {
            tracing::debug!(thread_id = id, "Vote for unknown thread ignored");
            return None;
        };

        let voted = self.ledger.toggle(&thread_id, self.storage.as_ref());

        if self.view.sort_mode() == SortMode::Trending {
            self.render_pass(AfterRender::FocusVote(thread_id.clone()));
        } else {
            if let Some(thread) = self.store.get(id) {
                let badge = VoteBadge::for_thread(thread, &self.ledger);
                self.surface.update_vote(&badge);
            }
            self.surface.focus_vote(&thread_id);
        }

        if self.modal.is_showing(id) {
            if let Some(thread) = self.store.get(id) {
                let detail = ThreadDetail::for_thread(thread, &self.ledger);
                self.modal.refresh(&detail, &mut self.surface);
            }
        }

        Some(voted)
    }

    /// Open the detail modal for `id`.
    ///
    /// An unknown id logs a warning and leaves the modal as it was.
    pub fn open_modal(&mut self, id: &str) -> bool {
        let Some(thread) = self.store.get(id) else {
            tracing::warn!("{}", ForumError::UnknownThread(ThreadId::new(id)));
            return false;
        };

        let detail = ThreadDetail::for_thread(thread, &self.ledger);
        let transition = self.modal.open(&detail, &mut self.surface);
        tracing::debug!(thread_id = id, ?transition, "Forum modal opened");
        self.query.set(&self.config.query_keys.modal, id);
        true
    }

    /// Close the detail modal. Returns `false` when it was not open.
    pub fn close_modal(&mut self, restore_focus: bool) -> bool {
        if !self.modal.close(restore_focus, &mut self.surface) {
            return false;
        }
        self.query.set(&self.config.query_keys.modal, "");
        true
    }

    /// Key pressed while the modal captures keys
    pub fn handle_key(&mut self, key: TrapKey) -> TrapAction {
        let action = self.modal.handle_key(key, &mut self.surface);
        if action == TrapAction::Close {
            self.close_modal(true);
        }
        action
    }

    /// Title link clicked: record the deep link and focus the thread
    pub fn focus_thread(&mut self, id: &str) -> bool {
        self.query.set(&self.config.query_keys.thread, id);
        self.query.set_fragment(id);
        self.focus_from_query(true, Some(ThreadId::new(id)))
    }

    /// Location changed outside the session
    pub fn location_changed(&mut self) {
        self.reconcile_modal();
        self.focus_from_query(true, None);
    }

    /// Reduced-motion preference changed
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        let revealed = self.reveal.set_reduced_motion(reduced);
        if !revealed.is_empty() {
            self.surface.reveal(&revealed);
        }
    }

    /// Native intersection entries for thread cards
    pub fn handle_intersections(&mut self, entries: Vec<IntersectionEntry<ThreadId>>) {
        let revealed = self.reveal.handle_intersections(entries);
        if !revealed.is_empty() {
            self.surface.reveal(&revealed);
        }
    }

    /// Scroll to and focus the deep-linked thread.
    ///
    /// The target is `target`, else the thread query parameter, else the URL
    /// fragment. Unless `force` is set this runs once per session. A thread
    /// hidden by the current filters has them relaxed first.
    pub fn focus_from_query(&mut self, force: bool, target: Option<ThreadId>) -> bool {
        if !force && self.initial_focus_handled {
            return false;
        }

        let raw = target
            .map(|t| t.as_str().to_owned())
            .filter(|t| !t.is_empty())
            .or_else(|| non_empty(self.query.get(&self.config.query_keys.thread)))
            .or_else(|| non_empty(self.query.fragment()));
        let Some(raw) = raw else {
            if !force {
                self.initial_focus_handled = true;
            }
            return false;
        };
        let id = ThreadId::new(raw.trim_start_matches('#'));

        if !self.rendered.contains(&id) {
            if let Some(thread) = self.store.get(id.as_str()).cloned() {
                if self.ensure_visible(&thread) {
                    return true;
                }
            }
            if !force {
                self.initial_focus_handled = true;
            }
            return false;
        }

        self.initial_focus_handled = true;
        self.query.set(&self.config.query_keys.thread, id.as_str());
        self.query.set_fragment(id.as_str());
        self.view.set_focused_thread(Some(id.clone()));

        let smooth = !self.reveal.is_reduced_motion();
        self.surface.scroll_to_thread(&id, smooth);
        self.surface.focus_vote(&id);
        true
    }

    /// Relax filters hiding `thread`, then re-render and focus it
    fn ensure_visible(&mut self, thread: &ThreadRecord) -> bool {
        let mut modified = false;

        let target_category = if thread.category.is_empty() {
            ALL_CATEGORIES
        } else {
            thread.category.as_str()
        };
        if self
            .view
            .category_filter()
            .is_some_and(|active| active != target_category)
        {
            self.view.set_category(target_category);
            modified = true;
        }

        if self.view.sort_mode() == SortMode::Unanswered && thread.answered {
            self.view.set_sort(SortMode::Trending);
            modified = true;
        }

        if !self.view.search_term().is_empty() && !thread.matches_search(self.view.search_term()) {
            self.view.clear_search();
            modified = true;
        }

        if modified {
            tracing::debug!(thread_id = %thread.id, "Relaxing forum filters for deep link");
            self.surface
                .render_categories(&CategoryFilters::build(&self.store, &self.view));
            self.surface
                .set_controls(self.view.search_raw(), self.view.sort_mode());
            self.render_pass(AfterRender::FocusThread(thread.id.clone()));
        }
        modified
    }

    /// Open or close the modal to match the modal query parameter
    fn reconcile_modal(&mut self) {
        let param = self.query.get(&self.config.query_keys.modal);
        if !param.is_empty() && self.store.contains(&param) {
            if !self.modal.is_showing(&param) {
                self.open_modal(&param);
            }
        } else if self.modal.is_open() && !self.modal.is_showing(&param) {
            self.close_modal(false);
        }
    }

    /// Apply one interaction
    pub fn dispatch(&mut self, command: ForumCommand) {
        match command {
            ForumCommand::Search(raw) => self.set_search(&raw),
            ForumCommand::SelectCategory(category) => self.select_category(&category),
            ForumCommand::SelectSort(mode) => self.select_sort(mode),
            ForumCommand::ToggleVote(id) => {
                self.toggle_vote(id.as_str());
            }
            ForumCommand::OpenModal(id) => {
                self.open_modal(id.as_str());
            }
            ForumCommand::CloseModal => {
                self.close_modal(true);
            }
            ForumCommand::Key(key) => {
                self.handle_key(key);
            }
            ForumCommand::FocusThread(id) => {
                self.focus_thread(id.as_str());
            }
            ForumCommand::LocationChanged => self.location_changed(),
            ForumCommand::ReducedMotion(reduced) => self.set_reduced_motion(reduced),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
