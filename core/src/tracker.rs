//! Affiliate click/conversion tracking.
//!
//! The tracker owns the counters for this process and mirrors them to
//! durable storage after every mutation (full overwrite, last write wins).
//!
//! RULES:
//!   - No public operation fails the caller. Storage and reporter
//!     failures are logged and tracking continues in memory.
//!   - State is loaded once at startup; a missing or corrupt entry
//!     leaves the empty default in place.

use crate::{
    analytics::{AnalyticsEvent, AnalyticsReporter, ClickParameters},
    config::WidgetConfig,
    error::WidgetResult,
    partner::partner_from_product_id,
    storage::KeyValueStorage,
    types::{ProductId, StorageKey},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted layout: `{"clicks": {id: n}, "conversions": {id: n}, "revenue": x}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackingState {
    #[serde(default)]
    pub clicks:      BTreeMap<ProductId, u64>,
    #[serde(default)]
    pub conversions: BTreeMap<ProductId, u64>,
    #[serde(default)]
    pub revenue:     f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStats {
    pub total_clicks:           u64,
    pub total_conversions:      u64,
    pub total_revenue:          f64,
    pub clicks_by_product:      BTreeMap<ProductId, u64>,
    pub conversions_by_product: BTreeMap<ProductId, u64>,
}

pub struct Tracker {
    state:          TrackingState,
    storage_key:    StorageKey,
    event_category: String,
    storage:        Option<Box<dyn KeyValueStorage>>,
    reporter:       Option<Box<dyn AnalyticsReporter>>,
}

impl Tracker {
    /// A tracker persisting to `storage` under the default key.
    /// State is NOT loaded; call `load_tracking_data()` or use `open()`.
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self::with_config(Some(storage), &WidgetConfig::default())
    }

    /// A tracker with no durable storage. Counters live for this session only.
    pub fn ephemeral() -> Self {
        Self::with_config(None, &WidgetConfig::default())
    }

    pub fn with_config(storage: Option<Box<dyn KeyValueStorage>>, config: &WidgetConfig) -> Self {
        Self {
            state:          TrackingState::default(),
            storage_key:    config.storage_key.clone(),
            event_category: config.event_category.clone(),
            storage,
            reporter:       None,
        }
    }

    /// Construct and load prior state. This is the startup path.
    pub fn open(
        storage:  Option<Box<dyn KeyValueStorage>>,
        reporter: Option<Box<dyn AnalyticsReporter>>,
        config:   &WidgetConfig,
    ) -> Self {
        let mut tracker = Self::with_config(storage, config);
        tracker.reporter = reporter;
        tracker.load_tracking_data();
        tracker
    }

    pub fn with_reporter(mut self, reporter: Box<dyn AnalyticsReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Record one click on `product_id`. `category` is the product's
    /// display label, forwarded to analytics as-is.
    pub fn track_click(&mut self, product_id: &str, category: &str) {
        let count = self.state.clicks.entry(product_id.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        log::debug!("click product={product_id} category={category} count={count}");

        let event = AnalyticsEvent::AffiliateClick {
            event_category:    self.event_category.clone(),
            event_label:       product_id.to_string(),
            custom_parameters: ClickParameters {
                product_category:  category.to_string(),
                affiliate_partner: partner_from_product_id(product_id).to_string(),
            },
        };
        self.forward(&event);
        self.save_tracking_data();
    }

    /// Record one conversion worth `value`. Finite values are accepted
    /// unchecked, negatives included. Non-finite values are dropped.
    pub fn track_conversion(&mut self, product_id: &str, value: f64) {
        if !value.is_finite() {
            log::warn!("Ignoring conversion for {product_id}: non-finite value {value}");
            return;
        }
        let count = self
            .state
            .conversions
            .entry(product_id.to_string())
            .or_insert(0);
        *count = count.saturating_add(1);
        self.state.revenue += value;
        log::debug!(
            "conversion product={product_id} value={value} revenue={:.2}",
            self.state.revenue
        );

        let event = AnalyticsEvent::AffiliateConversion {
            event_category: self.event_category.clone(),
            event_label:    product_id.to_string(),
            value,
        };
        self.forward(&event);
        self.save_tracking_data();
    }

    /// Partner name for a product id; see `partner::Partner`.
    pub fn get_partner_from_product_id(&self, product_id: &str) -> &'static str {
        partner_from_product_id(product_id)
    }

    /// Write the full state under the storage key. Failures are logged.
    pub fn save_tracking_data(&mut self) {
        if let Err(e) = self.try_save() {
            log::warn!("Could not persist tracking data to '{}': {e}", self.storage_key);
        }
    }

    /// Replace in-memory state with the stored entry, if one parses.
    pub fn load_tracking_data(&mut self) {
        match self.try_load() {
            Ok(Some(state)) => {
                log::info!(
                    "Loaded tracking data from '{}' ({} products clicked)",
                    self.storage_key,
                    state.clicks.len()
                );
                self.state = state;
            }
            Ok(None) => log::debug!("No tracking data under '{}'", self.storage_key),
            Err(e) => log::warn!(
                "Ignoring unreadable tracking data under '{}': {e}",
                self.storage_key
            ),
        }
    }

    pub fn get_stats(&self) -> TrackingStats {
        TrackingStats {
            total_clicks:           saturating_total(&self.state.clicks),
            total_conversions:      saturating_total(&self.state.conversions),
            total_revenue:          self.state.revenue,
            clicks_by_product:      self.state.clicks.clone(),
            conversions_by_product: self.state.conversions.clone(),
        }
    }

    /// Clear all counters and persist the empty state.
    pub fn reset(&mut self) {
        self.state = TrackingState::default();
        log::info!("Tracking data reset");
        self.save_tracking_data();
    }

    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    pub fn clicks(&self, product_id: &str) -> u64 {
        self.state.clicks.get(product_id).copied().unwrap_or(0)
    }

    pub fn conversions(&self, product_id: &str) -> u64 {
        self.state.conversions.get(product_id).copied().unwrap_or(0)
    }

    /// Give back the storage, e.g. to hand it to a fresh tracker.
    pub fn into_storage(self) -> Option<Box<dyn KeyValueStorage>> {
        self.storage
    }

    fn try_save(&mut self) -> WidgetResult<()> {
        let Some(storage) = self.storage.as_mut() else {
            return Ok(());
        };
        let json = serde_json::to_string(&self.state)?;
        storage.set(&self.storage_key, &json)
    }

    fn try_load(&self) -> WidgetResult<Option<TrackingState>> {
        let Some(storage) = self.storage.as_ref() else {
            return Ok(None);
        };
        match storage.get(&self.storage_key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn forward(&mut self, event: &AnalyticsEvent) {
        let Some(reporter) = self.reporter.as_mut() else {
            return;
        };
        if let Err(e) = reporter.report(event) {
            log::warn!("Reporter '{}' failed on {}: {e}", reporter.name(), event.name());
        }
    }
}

/// Sum of all counts, pinned at `u64::MAX` instead of overflowing.
fn saturating_total(counts: &BTreeMap<ProductId, u64>) -> u64 {
    counts.values().fold(0u64, |acc, n| acc.saturating_add(*n))
}
