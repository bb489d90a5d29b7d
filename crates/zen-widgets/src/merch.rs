//! Merchandise interest tracker
//!
//! Each product shows a published baseline plus the increments recorded in
//! this browser, against a production goal. Two storage entries back it: an
//! object of per-product increments and the list of products this browser
//! registered interest in.

use crate::error::WidgetError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use zen_ui::{read_json, write_json, StorageBackend};

/// Goal used when a product has none
pub const DEFAULT_GOAL: u32 = 50;

/// One product on the merch page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MerchProduct {
    /// Product id used in storage
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Interest count published with the page
    #[serde(default)]
    pub base: u32,
    /// Production goal; the tracker default when absent or zero
    #[serde(default)]
    pub goal: Option<u32>,
}

impl MerchProduct {
    /// Product with no baseline and the default goal
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base: 0,
            goal: None,
        }
    }

    /// Set the published baseline
    #[must_use]
    pub fn with_base(mut self, base: u32) -> Self {
        self.base = base;
        self
    }

    /// Set the goal
    #[must_use]
    pub fn with_goal(mut self, goal: u32) -> Self {
        self.goal = Some(goal);
        self
    }
}

/// Merch tracker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MerchConfig {
    /// Local storage key of per-product increments
    pub counts_key: String,
    /// Local storage key of this browser's interested products
    pub interests_key: String,
    /// Goal for products without one
    pub default_goal: u32,
    /// Products on the page
    pub products: Vec<MerchProduct>,
}

impl Default for MerchConfig {
    fn default() -> Self {
        Self {
            counts_key: "merch_interests".to_owned(),
            interests_key: "user_merch_interests".to_owned(),
            default_goal: DEFAULT_GOAL,
            products: vec![
                MerchProduct::new("jaket", "Jaket Angkatan"),
                MerchProduct::new("jersey", "Jersey Futsal"),
            ],
        }
    }
}

impl MerchConfig {
    /// Replace the product list
    #[must_use]
    pub fn with_products(mut self, products: Vec<MerchProduct>) -> Self {
        self.products = products;
        self
    }

    /// Set the fallback goal
    #[must_use]
    pub fn with_default_goal(mut self, goal: u32) -> Self {
        self.default_goal = goal;
        self
    }
}

/// Progress toward one product's goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchProgress {
    /// Product id
    pub product: String,
    /// Baseline plus increments, floored at zero
    pub display: u32,
    /// Effective goal
    pub goal: u32,
    /// Rounded percentage, capped at 100
    pub percent: u32,
    /// Interest still needed, while below goal
    pub remaining: Option<u32>,
    /// Whether this browser registered interest
    pub interested: bool,
}

impl MerchProgress {
    /// Compute progress for `display` against `goal` (zero goals count as one)
    #[must_use]
    pub fn compute(product: impl Into<String>, display: u32, goal: u32, interested: bool) -> Self {
        let goal = goal.max(1);
        let bounded = u64::from(display.min(goal));
        let percent = (bounded * 100 + u64::from(goal) / 2) / u64::from(goal);
        Self {
            product: product.into(),
            display,
            goal,
            percent: u32::try_from(percent).unwrap_or(100),
            remaining: (display < goal).then(|| goal - display),
            interested,
        }
    }

    /// Whether the goal is reached
    #[inline]
    #[must_use]
    pub fn goal_reached(&self) -> bool {
        self.remaining.is_none()
    }

    /// Status line under the progress bar
    #[must_use]
    pub fn status_text(&self) -> String {
        match self.remaining {
            None => "Target terpenuhi! Produksi batch pertama siap dimulai.".to_owned(),
            Some(n) => format!("{n} minat lagi menuju produksi"),
        }
    }

    /// Progress caption
    #[must_use]
    pub fn goal_text(&self) -> String {
        format!("Progress: {}/{} ({}%)", self.display, self.goal, self.percent)
    }

    /// Interest button text
    #[must_use]
    pub fn button_label(&self) -> &'static str {
        if self.interested {
            "Sudah Daftar"
        } else {
            "Daftar Minat"
        }
    }
}

/// Interest counts for the merch page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchTracker {
    config: MerchConfig,
    products: IndexMap<String, MerchProduct>,
    increments: BTreeMap<String, i64>,
    interested: Vec<String>,
}

impl MerchTracker {
    /// Tracker with nothing stored
    #[must_use]
    pub fn new(config: MerchConfig) -> Self {
        let products = config
            .products
            .iter()
            .map(|p| (p.id.clone(), p.clone()))
            .collect();
        Self {
            config,
            products,
            increments: BTreeMap::new(),
            interested: Vec::new(),
        }
    }

    /// Load stored counts, starting empty when storage fails
    #[must_use]
    pub fn load<S: StorageBackend + ?Sized>(config: MerchConfig, storage: &S) -> Self {
        let mut tracker = Self::new(config);
        if let Err(e) = tracker.reload(storage) {
            tracing::warn!("Unable to read merch interest: {e}");
        }
        tracker
    }

    /// Re-read stored increments and interests.
    ///
    /// Non-numeric counts and non-string interests are skipped.
    ///
    /// # Errors
    /// Storage is unavailable or holds malformed JSON.
    pub fn reload<S: StorageBackend + ?Sized>(&mut self, storage: &S) -> Result<(), WidgetError> {
        let counts: Option<Map<String, Value>> = read_json(storage, &self.config.counts_key)?;
        let interests: Option<Vec<Value>> = read_json(storage, &self.config.interests_key)?;

        self.increments = counts
            .into_iter()
            .flatten()
            .filter_map(|(product, count)| Some((product, count.as_i64()?)))
            .collect();
        self.interested = interests
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect();
        Ok(())
    }

    /// Configured products, in page order
    pub fn products(&self) -> impl Iterator<Item = &MerchProduct> {
        self.products.values()
    }

    /// Whether this browser registered interest in `product`
    #[inline]
    #[must_use]
    pub fn is_interested(&self, product: &str) -> bool {
        self.interested.iter().any(|p| p == product)
    }

    /// Stored increment for `product`
    #[inline]
    #[must_use]
    pub fn increment(&self, product: &str) -> i64 {
        self.increments.get(product).copied().unwrap_or(0)
    }

    /// Current progress for `product`
    ///
    /// # Errors
    /// [`WidgetError::UnknownProduct`] when `product` is not configured.
    pub fn progress(&self, product: &str) -> Result<MerchProgress, WidgetError> {
        let product_def = self
            .products
            .get(product)
            .ok_or_else(|| WidgetError::UnknownProduct(product.to_owned()))?;

        let display = i64::from(product_def.base)
            .saturating_add(self.increment(product))
            .max(0);
        let goal = product_def
            .goal
            .filter(|g| *g > 0)
            .unwrap_or(self.config.default_goal);

        Ok(MerchProgress::compute(
            product,
            u32::try_from(display).unwrap_or(u32::MAX),
            goal,
            self.is_interested(product),
        ))
    }

    /// Flip this browser's interest in `product` and persist.
    ///
    /// Registering adds one to the stored increment; withdrawing removes one,
    /// never going below zero. Write failures are logged and the change still
    /// applies for the session.
    ///
    /// # Errors
    /// [`WidgetError::UnknownProduct`] when `product` is not configured.
    pub fn toggle<S: StorageBackend + ?Sized>(
        &mut self,
        product: &str,
        storage: &S,
    ) -> Result<MerchProgress, WidgetError> {
        if !self.products.contains_key(product) {
            return Err(WidgetError::UnknownProduct(product.to_owned()));
        }

        let count = self.increments.entry(product.to_owned()).or_insert(0);
        if self.interested.iter().any(|p| p == product) {
            *count = count.saturating_sub(1).max(0);
            self.interested.retain(|p| p != product);
        } else {
            *count = count.saturating_add(1);
            self.interested.push(product.to_owned());
        }

        if let Err(e) = self.persist(storage) {
            tracing::warn!(product, "Unable to save merch interest: {e}");
        }

        let progress = self.progress(product)?;
        tracing::debug!(
            product,
            interested = progress.interested,
            display = progress.display,
            "Merch interest toggled"
        );
        Ok(progress)
    }

    /// Write increments and interests
    ///
    /// # Errors
    /// Storage write failures.
    pub fn persist<S: StorageBackend + ?Sized>(&self, storage: &S) -> Result<(), WidgetError> {
        write_json(storage, &self.config.counts_key, &self.increments)?;
        write_json(storage, &self.config.interests_key, &self.interested)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zen_ui::{MemoryStorage, StorageMode};

    fn tracker(storage: &MemoryStorage) -> MerchTracker {
        let config = MerchConfig::default().with_products(vec![
            MerchProduct::new("jaket", "Jaket Angkatan").with_base(12),
            MerchProduct::new("jersey", "Jersey Futsal").with_base(49).with_goal(50),
        ]);
        MerchTracker::load(config, storage)
    }

    #[test]
    fn progress_arithmetic() {
        let p = MerchProgress::compute("jaket", 12, 50, false);
        assert_eq!(p.percent, 24);
        assert_eq!(p.remaining, Some(38));
        assert_eq!(p.status_text(), "38 minat lagi menuju produksi");
        assert_eq!(p.goal_text(), "Progress: 12/50 (24%)");

        let over = MerchProgress::compute("jaket", 75, 50, true);
        assert_eq!(over.percent, 100);
        assert!(over.goal_reached());

        assert_eq!(MerchProgress::compute("x", 1, 3, false).percent, 33);
        assert_eq!(MerchProgress::compute("x", 1, 8, false).percent, 13);
    }

    #[test]
    fn toggle_on_and_off() {
        let storage = MemoryStorage::new();
        let mut merch = tracker(&storage);

        let on = merch.toggle("jersey", &storage).unwrap();
        assert_eq!(on.display, 50);
        assert!(on.goal_reached());
        assert_eq!(on.button_label(), "Sudah Daftar");
        assert_eq!(storage.raw("merch_interests").as_deref(), Some(r#"{"jersey":1}"#));
        assert_eq!(storage.raw("user_merch_interests").as_deref(), Some(r#"["jersey"]"#));

        let off = merch.toggle("jersey", &storage).unwrap();
        assert_eq!(off.display, 49);
        assert!(!off.interested);
        assert_eq!(storage.raw("user_merch_interests").as_deref(), Some("[]"));
    }

    #[test]
    fn restores_stored_state() {
        let storage = MemoryStorage::with_entries([
            ("merch_interests", r#"{"jaket": 3, "jersey": "x"}"#),
            ("user_merch_interests", r#"["jaket", 4]"#),
        ]);
        let merch = tracker(&storage);

        let jaket = merch.progress("jaket").unwrap();
        assert_eq!(jaket.display, 15);
        assert!(jaket.interested);
        assert_eq!(merch.increment("jersey"), 0);
    }

    #[test]
    fn withdrawing_never_goes_negative() {
        let storage = MemoryStorage::with_entries([("user_merch_interests", r#"["jaket"]"#)]);
        let mut merch = tracker(&storage);

        let off = merch.toggle("jaket", &storage).unwrap();
        assert_eq!(merch.increment("jaket"), 0);
        assert_eq!(off.display, 12);
    }

    #[test]
    fn extreme_stored_counts_saturate() {
        let counts = format!(r#"{{"jaket": {}, "jersey": {}}}"#, i64::MAX, i64::MIN);
        let storage = MemoryStorage::with_entries([
            ("merch_interests", counts.as_str()),
            ("user_merch_interests", r#"["jersey"]"#),
        ]);
        let mut merch = tracker(&storage);

        let jaket = merch.toggle("jaket", &storage).unwrap();
        assert_eq!(merch.increment("jaket"), i64::MAX);
        assert_eq!(jaket.display, u32::MAX);
        assert!(jaket.goal_reached());

        let jersey = merch.toggle("jersey", &storage).unwrap();
        assert_eq!(merch.increment("jersey"), 0);
        assert_eq!(jersey.display, 49);
    }

    #[test]
    fn unknown_product_is_an_error() {
        let storage = MemoryStorage::new();
        let mut merch = tracker(&storage);
        assert!(matches!(
            merch.toggle("topi", &storage),
            Err(WidgetError::UnknownProduct(_))
        ));
    }

    #[test]
    fn write_failure_keeps_session_state() {
        let storage = MemoryStorage::new();
        let mut merch = tracker(&storage);
        storage.set_mode(StorageMode::Full);

        let on = merch.toggle("jaket", &storage).unwrap();
        assert!(on.interested);
        assert_eq!(on.display, 13);
        assert!(storage.raw("merch_interests").is_none());
    }
}
