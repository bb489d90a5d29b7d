//! Community projects grid
//!
//! Projects from `/data/community.json` are filtered by one tag and a free-text
//! search, both mirrored to the URL (`tag`, `komunitas`). Each card gets a
//! stable anchor so `#anchor` links can bring a project into focus.
//!
//! ```text
//! community.json ─► parse_project_document ─► CommunityBoard::install
//!                                                 │  anchors, tag list
//!        komunitas / tag params ─► seed ──────────┤
//!                                                 ▼
//!                          select_tag / search ─► render ─► CommunityView
//! ```

use crate::error::WidgetError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use zen_model::{parse_project_document, ProjectRecord};
use zen_ui::{DocumentSource, FetchError, QueryParamStore, UrlHost};

/// Empty state when the document could not be fetched
pub const LOAD_FAILED_MESSAGE: &str = "Gagal memuat konten komunitas. Coba lagi nanti.";
/// Empty state when the document arrived but could not be used
pub const LOAD_ERROR_MESSAGE: &str = "Terjadi kesalahan saat memuat konten komunitas.";
/// Empty state for an empty document
pub const NO_CONTENT_MESSAGE: &str = "Belum ada konten komunitas yang dapat ditampilkan saat ini.";
/// Empty state when the filters hide everything
pub const NO_MATCH_MESSAGE: &str = "Tidak ada proyek yang sesuai dengan filter Anda.";
/// Label of the "all tags" button
pub const ALL_TAGS_LABEL: &str = "Semua";
/// Link text on project cards
pub const PROJECT_LINK_LABEL: &str = "Lihat Proyek";
/// Widths offered in image `srcset`s
pub const RESPONSIVE_IMAGE_WIDTHS: [u32; 5] = [360, 540, 720, 960, 1200];
/// Initial shown when a title has no usable first character
pub const DEFAULT_FALLBACK_INITIAL: char = 'Z';

const ALL_TAGS_VALUE: &str = "all";
const DEFAULT_IMAGE_WIDTH: u32 = 960;
const MAX_SLUG_LEN: usize = 60;

/// Community grid settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommunityConfig {
    /// Community document path
    pub data_path: String,
    /// Query parameter mirroring the search box
    pub search_key: String,
    /// Query parameter mirroring the active tag
    pub tag_key: String,
    /// Search box quiet period in milliseconds
    pub search_debounce_ms: u64,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            data_path: "/data/community.json".to_owned(),
            search_key: "komunitas".to_owned(),
            tag_key: "tag".to_owned(),
            search_debounce_ms: 300,
        }
    }
}

impl CommunityConfig {
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

    /// Set both query parameter names
    #[must_use]
    pub fn with_query_keys(mut self, search: impl Into<String>, tag: impl Into<String>) -> Self {
        self.search_key = search.into();
        self.tag_key = tag.into();
        self
    }

    /// Set the search quiet period
    #[must_use]
    pub fn with_search_debounce_ms(mut self, ms: u64) -> Self {
        self.search_debounce_ms = ms;
        self
    }

    /// Search quiet period
    #[inline]
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// URL-safe slug of `value`: lower-case ASCII letters and digits joined by
/// single hyphens, at most 60 characters. Empty results give `fallback`.
#[must_use]
pub fn slugify(value: &str, fallback: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug.truncate(MAX_SLUG_LEN);

    if slug.is_empty() {
        fallback.to_owned()
    } else {
        slug
    }
}

/// Unique anchor per project, in document order.
///
/// The publisher's id wins, else a slug of the title, else
/// `community-card-N`. Repeats get `-2`, `-3`, ... appended.
#[must_use]
pub fn card_anchors(projects: &[ProjectRecord]) -> Vec<String> {
    let mut used = HashSet::with_capacity(projects.len());
    projects
        .iter()
        .enumerate()
        .map(|(index, project)| {
            let fallback = format!("community-card-{}", index + 1);
            let base = match project.manual_id() {
                Some(id) => id.to_owned(),
                None => slugify(&project.title, &fallback),
            };

            let mut anchor = base.clone();
            let mut suffix = 2;
            while used.contains(&anchor) {
                anchor = format!("{base}-{suffix}");
                suffix += 1;
            }
            used.insert(anchor.clone());
            anchor
        })
        .collect()
}

/// Letter shown in place of a missing cover image
#[must_use]
pub fn fallback_initial(title: &str) -> char {
    title
        .trim()
        .chars()
        .next()
        .filter(char::is_ascii_alphanumeric)
        .map_or(DEFAULT_FALLBACK_INITIAL, |c| c.to_ascii_uppercase())
}

/// Image CDN URL for `width` and optional `format`.
///
/// Unparseable URLs come back unchanged.
#[must_use]
pub fn optimized_image_url(raw: &str, width: Option<u32>, format: Option<&str>) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        tracing::warn!(url = raw, "Cannot optimise image URL");
        return raw.to_owned();
    };

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    set_pair(&mut pairs, "auto", Some("format"));
    set_pair(&mut pairs, "fit", Some("crop"));
    if let Some(width) = width {
        set_pair(&mut pairs, "w", Some(&width.to_string()));
        set_pair(&mut pairs, "q", Some(if width >= 960 { "75" } else { "80" }));
    }
    set_pair(&mut pairs, "fm", format);

    url.query_pairs_mut().clear().extend_pairs(&pairs);
    url.into()
}

/// Replace the first `key` in place (dropping repeats) or append; `None` removes.
fn set_pair(pairs: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    let Some(value) = value else {
        pairs.retain(|(k, _)| k != key);
        return;
    };

    match pairs.iter().position(|(k, _)| k == key) {
        Some(first) => {
            pairs[first].1 = value.to_owned();
            let mut index = 0;
            pairs.retain(|(k, _)| {
                let keep = k != key || index == first;
                index += 1;
                keep
            });
        }
        None => pairs.push((key.to_owned(), value.to_owned())),
    }
}

/// Responsive image sources for one cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSources {
    /// Default `src`
    pub src: String,
    /// WebP `srcset`
    pub webp_srcset: String,
    /// Original-format `srcset`
    pub fallback_srcset: String,
}

impl ImageSources {
    /// Sources for the cover at `raw`
    #[must_use]
    pub fn for_url(raw: &str) -> Self {
        let srcset = |format: Option<&str>| {
            RESPONSIVE_IMAGE_WIDTHS
                .iter()
                .map(|&w| format!("{} {w}w", optimized_image_url(raw, Some(w), format)))
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            src: optimized_image_url(raw, Some(DEFAULT_IMAGE_WIDTH), None),
            webp_srcset: srcset(Some("webp")),
            fallback_srcset: srcset(None),
        }
    }
}

/// One project in the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCard {
    /// Element id for `#anchor` links
    pub anchor: String,
    /// Title
    pub title: String,
    /// "Oleh: ..." byline
    pub byline: String,
    /// Description
    pub description: String,
    /// Tag chips
    pub tags: Vec<String>,
    /// Project link
    pub link: String,
    /// Link text
    pub link_label: &'static str,
    /// Cover sources, when the project has an image
    pub image: Option<ImageSources>,
    /// Accessible image label
    pub image_alt: String,
    /// Letter for the image placeholder
    pub fallback_initial: char,
}

impl ProjectCard {
    /// Card for `project` under `anchor`
    #[must_use]
    pub fn for_project(project: &ProjectRecord, anchor: &str) -> Self {
        let title_for_alt = if project.title.is_empty() {
            "Tanpa Judul"
        } else {
            project.title.as_str()
        };

        Self {
            anchor: anchor.to_owned(),
            title: project.title.clone(),
            byline: format!("Oleh: {}", project.author),
            description: project.description.clone(),
            tags: project.tags.clone(),
            link: project.link.clone(),
            link_label: PROJECT_LINK_LABEL,
            image: project.image_url().map(ImageSources::for_url),
            image_alt: format!("Gambar Proyek: {title_for_alt}"),
            fallback_initial: fallback_initial(&project.title),
        }
    }
}

/// Tag filter button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagButton {
    /// Tag, `None` for the "all" button
    pub tag: Option<String>,
    /// Button text
    pub label: String,
    /// `aria-pressed`
    pub pressed: bool,
}

impl TagButton {
    /// Value for the button's `data-tag`
    #[inline]
    #[must_use]
    pub fn data_tag(&self) -> &str {
        self.tag.as_deref().unwrap_or(ALL_TAGS_VALUE)
    }

    /// Accessible label
    #[must_use]
    pub fn aria_label(&self) -> String {
        match &self.tag {
            Some(tag) => format!("Filter: {tag}"),
            None => "Filter: Tampilkan semua proyek".to_owned(),
        }
    }
}

/// Load state of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommunityStatus {
    /// Document not loaded yet
    #[default]
    Loading,
    /// Projects available
    Ready,
    /// Document loaded with no projects
    NoContent,
    /// Fetch or decode failed
    Failed,
}

/// Render model for the community region
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommunityView {
    /// Load state
    pub status: CommunityStatus,
    /// Cards in document order
    pub cards: Vec<ProjectCard>,
    /// Tag buttons, "all" first; empty until projects load
    pub tags: Vec<TagButton>,
    /// Search box text
    pub search: String,
    /// Empty-state message, when shown
    pub empty_message: Option<String>,
    /// Card to scroll to and highlight
    pub focus: Option<String>,
}

impl CommunityView {
    /// `aria-busy` on the grid
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.status == CommunityStatus::Loading
    }
}

/// Community region state for one page session
pub struct CommunityBoard {
    config: CommunityConfig,
    query: QueryParamStore<Arc<dyn UrlHost>>,
    status: CommunityStatus,
    failure: Option<&'static str>,
    projects: Vec<ProjectRecord>,
    anchors: Vec<String>,
    tags: Vec<String>,
    active_tag: Option<String>,
    search: String,
}

impl fmt::Debug for CommunityBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommunityBoard")
            .field("status", &self.status)
            .field("projects", &self.projects.len())
            .field("active_tag", &self.active_tag)
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}

impl CommunityBoard {
    /// Create an empty board reading and writing `url`
    #[must_use]
    pub fn new(config: CommunityConfig, url: Arc<dyn UrlHost>) -> Self {
        Self {
            config,
            query: QueryParamStore::new(url),
            status: CommunityStatus::Loading,
            failure: None,
            projects: Vec::new(),
            anchors: Vec::new(),
            tags: Vec::new(),
            active_tag: None,
            search: String::new(),
        }
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CommunityConfig {
        &self.config
    }

    /// Load state
    #[inline]
    #[must_use]
    pub fn status(&self) -> CommunityStatus {
        self.status
    }

    /// Loaded projects, in document order
    #[inline]
    #[must_use]
    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    /// Distinct tags, sorted case-insensitively
    #[inline]
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Active tag; `None` shows every project
    #[inline]
    #[must_use]
    pub fn active_tag(&self) -> Option<&str> {
        self.active_tag.as_deref()
    }

    /// Search text as typed
    #[inline]
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search
    }

    /// Fetch the community document and render it
    pub async fn load<D: DocumentSource + ?Sized>(&mut self, source: &D) -> CommunityView {
        let projects = match source.fetch_json(&self.config.data_path).await {
            Ok(document) => parse_project_document(document).map_err(WidgetError::from),
            Err(e) => Err(WidgetError::from(e)),
        };

        match projects {
            Ok(projects) => self.install(projects),
            Err(e) => self.fail_load(&e),
        }
    }

    /// Take `projects`, seed the filters from the URL and render
    pub fn install(&mut self, projects: Vec<ProjectRecord>) -> CommunityView {
        self.failure = None;
        self.anchors = card_anchors(&projects);
        self.tags = sorted_tags(&projects);
        self.projects = projects;
        self.active_tag = None;

        if self.projects.is_empty() {
            tracing::info!("Community document is empty");
            self.status = CommunityStatus::NoContent;
            return self.render();
        }

        self.status = CommunityStatus::Ready;
        self.search = self.query.get(&self.config.search_key);
        let requested = self.query.get(&self.config.tag_key);
        if !requested.is_empty() {
            if self.tags.contains(&requested) {
                self.active_tag = Some(requested);
            } else {
                tracing::debug!(tag = %requested, "Ignoring unknown community tag parameter");
            }
        }

        tracing::info!(
            projects = self.projects.len(),
            tags = self.tags.len(),
            "Community projects loaded"
        );
        self.render()
    }

    fn fail_load(&mut self, error: &WidgetError) -> CommunityView {
        tracing::error!("Failed to load community projects: {error}");
        self.projects.clear();
        self.anchors.clear();
        self.tags.clear();
        self.active_tag = None;
        self.status = CommunityStatus::Failed;
        self.failure = Some(match error {
            WidgetError::Fetch(FetchError::Status { .. }) => LOAD_FAILED_MESSAGE,
            _ => LOAD_ERROR_MESSAGE,
        });
        self.render()
    }

    /// Tag button pressed; `"all"` or an unknown tag shows everything
    pub fn select_tag(&mut self, tag: &str) -> CommunityView {
        self.active_tag = (tag != ALL_TAGS_VALUE && self.tags.iter().any(|t| t == tag))
            .then(|| tag.to_owned());
        self.render()
    }

    /// Settled search box text
    pub fn search(&mut self, raw: &str) -> CommunityView {
        raw.clone_into(&mut self.search);
        self.render()
    }

    /// Anchor of the visible card named by the URL fragment, if any
    #[must_use]
    pub fn focus_from_fragment(&self) -> Option<String> {
        let fragment = self.query.fragment();
        if fragment.is_empty() {
            return None;
        }
        self.visible()
            .find(|(anchor, _)| *anchor == fragment)
            .map(|(anchor, _)| anchor.to_owned())
    }

    /// Projects passing the active tag and search, with their anchors
    pub fn visible(&self) -> impl Iterator<Item = (&str, &ProjectRecord)> {
        let term = self.search.trim().to_lowercase();
        let tag = self.active_tag.as_deref();
        self.anchors
            .iter()
            .map(String::as_str)
            .zip(&self.projects)
            .filter(move |(_, p)| tag.map_or(true, |t| p.has_tag(t)))
            .filter(move |(_, p)| p.matches_search(&term))
    }

    /// Mirror the filters to the URL (once projects are loaded) and build the view
    pub fn render(&self) -> CommunityView {
        match self.status {
            CommunityStatus::Loading => CommunityView::default(),
            CommunityStatus::Failed | CommunityStatus::NoContent => CommunityView {
                status: self.status,
                search: self.search.clone(),
                empty_message: Some(
                    self.failure.unwrap_or(NO_CONTENT_MESSAGE).to_owned(),
                ),
                ..CommunityView::default()
            },
            CommunityStatus::Ready => {
                self.query.set(&self.config.search_key, &self.search);
                self.query
                    .set(&self.config.tag_key, self.active_tag.as_deref().unwrap_or(""));

                let cards: Vec<ProjectCard> = self
                    .visible()
                    .map(|(anchor, project)| ProjectCard::for_project(project, anchor))
                    .collect();

                CommunityView {
                    status: self.status,
                    empty_message: cards.is_empty().then(|| NO_MATCH_MESSAGE.to_owned()),
                    cards,
                    tags: self.tag_buttons(),
                    search: self.search.clone(),
                    focus: self.focus_from_fragment(),
                }
            }
        }
    }

    fn tag_buttons(&self) -> Vec<TagButton> {
        let all = TagButton {
            tag: None,
            label: ALL_TAGS_LABEL.to_owned(),
            pressed: self.active_tag.is_none(),
        };
        std::iter::once(all)
            .chain(self.tags.iter().map(|tag| TagButton {
                tag: Some(tag.clone()),
                label: tag.clone(),
                pressed: self.active_tag.as_ref() == Some(tag),
            }))
            .collect()
    }
}

fn sorted_tags(projects: &[ProjectRecord]) -> Vec<String> {
    let mut tags: Vec<String> = projects
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect();
    tags.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    tags.dedup();
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Bot Absensi -- v2!  ", "x"), "bot-absensi-v2");
        assert_eq!(slugify("???", "community-card-3"), "community-card-3");
        assert_eq!(slugify(&"a".repeat(80), "x").len(), 60);
    }

    #[test]
    fn anchors_are_unique() {
        let mut with_id = ProjectRecord::new("Apa Saja", "A");
        with_id.id = Some(" peta ".into());
        let projects = vec![
            ProjectRecord::new("Peta Kampus", "A"),
            with_id,
            ProjectRecord::new("Peta Kampus", "B"),
            ProjectRecord::new("", "C"),
        ];
        assert_eq!(
            card_anchors(&projects),
            ["peta-kampus", "peta", "peta-kampus-2", "community-card-4"]
        );
    }

    #[test]
    fn fallback_initial_uses_first_alphanumeric() {
        assert_eq!(fallback_initial(" bot"), 'B');
        assert_eq!(fallback_initial("#tag"), DEFAULT_FALLBACK_INITIAL);
        assert_eq!(fallback_initial(""), DEFAULT_FALLBACK_INITIAL);
    }

    #[test]
    fn image_url_parameters() {
        assert_eq!(
            optimized_image_url("https://img.example/p.jpg?fm=png&w=1", Some(360), Some("webp")),
            "https://img.example/p.jpg?fm=webp&w=360&auto=format&fit=crop&q=80"
        );
        assert_eq!(
            optimized_image_url("https://img.example/p.jpg?fm=png", Some(960), None),
            "https://img.example/p.jpg?auto=format&fit=crop&w=960&q=75"
        );
        assert_eq!(optimized_image_url("/local.png", None, None), "/local.png");
    }

    #[test]
    fn image_sources_cover_every_width() {
        let sources = ImageSources::for_url("https://img.example/p.jpg");
        assert_eq!(sources.webp_srcset.matches("w, ").count(), RESPONSIVE_IMAGE_WIDTHS.len() - 1);
        assert!(sources.webp_srcset.ends_with("1200w"));
        assert!(sources.src.contains("w=960"));
        assert!(!sources.fallback_srcset.contains("fm="));
    }

    #[test]
    fn tags_sort_case_insensitively_without_repeats() {
        let projects = vec![
            ProjectRecord::new("a", "x").with_tags(["web", "Bot"]),
            ProjectRecord::new("b", "x").with_tags(["bot", "Web", "web"]),
        ];
        assert_eq!(sorted_tags(&projects), ["Bot", "bot", "Web", "web"]);
    }

    #[test]
    fn card_fields() {
        let mut project = ProjectRecord::new("", "Tim HIMA");
        project.link = "https://github.com/zenotika".into();
        let card = ProjectCard::for_project(&project, "community-card-1");
        assert_eq!(card.byline, "Oleh: Tim HIMA");
        assert_eq!(card.image_alt, "Gambar Proyek: Tanpa Judul");
        assert!(card.image.is_none());
        assert_eq!(card.link_label, "Lihat Proyek");
    }
}
