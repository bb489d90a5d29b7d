//! Page boot
//!
//! [`Site::boot`] resolves the synchronous widgets (theme, merch) and then
//! fetches the forum, events, community and announcement documents
//! concurrently. A failed document degrades its own component only.

use crate::config::SiteConfig;
use crate::input::SearchInput;
use std::sync::Arc;
use tokio::sync::mpsc;
use zen_forum::{ForumCommand, ForumHost, ForumSession, ForumSurface};
use zen_ui::{Clock, DocumentSource, FadeInObserver, StorageBackend, UrlHost};
use zen_widgets::{
    AnnouncementBar, AnnouncementView, CommunityBoard, CommunityView, EventsBoard, EventsFilter, EventsView, MerchProgress,
    MerchTracker, Theme, ThemePreference, WidgetError,
};

/// Browser capabilities and media preferences at page load
#[derive(Clone)]
pub struct SiteHost {
    /// Location and history
    pub url: Arc<dyn UrlHost>,
    /// Local storage
    pub storage: Arc<dyn StorageBackend>,
    /// Wall clock
    pub clock: Arc<dyn Clock>,
    /// `prefers-reduced-motion: reduce`
    pub reduced_motion: bool,
    /// Whether intersection observation is available
    pub intersection_supported: bool,
    /// `prefers-color-scheme: light`
    pub prefers_light: bool,
    /// Theme set on the document element by the page
    pub document_theme: Option<String>,
}

impl SiteHost {
    /// Host with motion allowed, intersection support and a dark system theme
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
            reduced_motion: false,
            intersection_supported: true,
            prefers_light: false,
            document_theme: None,
        }
    }

    /// Set the reduced-motion preference
    #[must_use]
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Set the system colour-scheme preference
    #[must_use]
    pub fn with_prefers_light(mut self, light: bool) -> Self {
        self.prefers_light = light;
        self
    }

    /// Set the document's theme attribute
    #[must_use]
    pub fn with_document_theme(mut self, theme: impl Into<String>) -> Self {
        self.document_theme = Some(theme.into());
        self
    }

    fn forum_host(&self) -> ForumHost {
        ForumHost::new(self.url.clone(), self.storage.clone(), self.clock.clone())
    }
}

/// Every interactive component of one page
pub struct Site<S: ForumSurface> {
    config: SiteConfig,
    storage: Arc<dyn StorageBackend>,
    forum: ForumSession<S>,
    events: EventsBoard,
    events_view: EventsView,
    community: CommunityBoard,
    community_view: CommunityView,
    announcement: AnnouncementBar,
    theme: ThemePreference,
    merch: MerchTracker,
}

impl<S: ForumSurface> Site<S> {
    /// Build every component and load all documents concurrently
    pub async fn boot<D>(config: SiteConfig, host: SiteHost, surface: S, documents: &D) -> Self
    where
        D: DocumentSource + ?Sized,
    {
        let theme = ThemePreference::resolve(
            &config.theme,
            host.storage.as_ref(),
            host.document_theme.as_deref(),
            host.prefers_light,
        );
        let merch = MerchTracker::load(config.merch.clone(), host.storage.as_ref());

        let reveal = FadeInObserver::new(
            config.reveal,
            host.reduced_motion,
            host.intersection_supported,
        );
        let mut forum = ForumSession::new(config.forum.clone(), host.forum_host(), surface)
            .with_reveal(reveal);
        let mut events =
            EventsBoard::new(config.events.clone(), host.url.clone(), host.clock.clone());
        let mut community = CommunityBoard::new(config.community.clone(), host.url.clone());
        let mut announcement = AnnouncementBar::new(config.announcement.clone());

        let storage = host.storage.as_ref();
        let (_, events_view, community_view, _) = futures::join!(
            forum.load(documents),
            events.load(documents),
            community.load(documents),
            announcement.load(documents, storage),
        );

        tracing::info!(
            threads = forum.store().len(),
            events = events.listing().len(),
            projects = community.projects().len(),
            announcement = announcement.shown().is_some(),
            theme = %theme.current(),
            "Site ready"
        );

        Self {
            config,
            storage: host.storage,
            forum,
            events,
            events_view,
            community,
            community_view,
            announcement,
            theme,
            merch,
        }
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Forum session
    #[inline]
    #[must_use]
    pub fn forum(&self) -> &ForumSession<S> {
        &self.forum
    }

    /// Forum session, mutably
    #[inline]
    pub fn forum_mut(&mut self) -> &mut ForumSession<S> {
        &mut self.forum
    }

    /// Forum search box feeding `commands`, debounced per the forum config
    #[must_use]
    pub fn forum_search_input(&self, commands: mpsc::Sender<ForumCommand>) -> SearchInput {
        SearchInput::from_config(&self.config.forum, commands)
    }

    /// Events board
    #[inline]
    #[must_use]
    pub fn events(&self) -> &EventsBoard {
        &self.events
    }

    /// Last rendered events view
    #[inline]
    #[must_use]
    pub fn events_view(&self) -> &EventsView {
        &self.events_view
    }

    /// Events filter button pressed
    pub fn select_events_filter(&mut self, filter: EventsFilter) -> &EventsView {
        self.events_view = self.events.select(filter);
        &self.events_view
    }

    /// Community grid
    #[inline]
    #[must_use]
    pub fn community(&self) -> &CommunityBoard {
        &self.community
    }

    /// Last rendered community view
    #[inline]
    #[must_use]
    pub fn community_view(&self) -> &CommunityView {
        &self.community_view
    }

    /// Community tag button pressed
    pub fn select_community_tag(&mut self, tag: &str) -> &CommunityView {
        self.community_view = self.community.select_tag(tag);
        &self.community_view
    }

    /// Settled community search text
    pub fn search_community(&mut self, raw: &str) -> &CommunityView {
        self.community_view = self.community.search(raw);
        &self.community_view
    }

    /// Location fragment changed: community card to focus, and the forum
    /// deep link and modal reconciled
    pub fn location_changed(&mut self) -> Option<String> {
        self.forum.location_changed();
        self.community.focus_from_fragment()
    }

    /// Announcement currently shown
    #[inline]
    #[must_use]
    pub fn announcement(&self) -> Option<&AnnouncementView> {
        self.announcement.shown()
    }

    /// Dismiss button pressed
    pub fn dismiss_announcement(&mut self) -> bool {
        self.announcement.dismiss(self.storage.as_ref())
    }

    /// Theme preference
    #[inline]
    #[must_use]
    pub fn theme(&self) -> &ThemePreference {
        &self.theme
    }

    /// Theme toggle switched
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle(self.storage.as_ref())
    }

    /// System colour scheme changed
    pub fn system_theme_changed(&mut self, prefers_light: bool) -> Option<Theme> {
        self.theme.system_changed(prefers_light)
    }

    /// Merch tracker
    #[inline]
    #[must_use]
    pub fn merch(&self) -> &MerchTracker {
        &self.merch
    }

    /// Merch interest button pressed
    ///
    /// # Errors
    /// [`WidgetError::UnknownProduct`] for a product not on the page.
    pub fn toggle_merch(&mut self, product: &str) -> Result<MerchProgress, WidgetError> {
        self.merch.toggle(product, self.storage.as_ref())
    }

    /// Reduced-motion preference changed
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.forum.set_reduced_motion(reduced);
    }
}
