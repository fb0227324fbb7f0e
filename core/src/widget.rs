//! The widget context: catalog, config and tracker, built once at
//! startup and passed to whatever renders or handles clicks.

use crate::{
    analytics::AnalyticsReporter,
    catalog::{Catalog, Product},
    config::WidgetConfig,
    render::{render_affiliate_products, Page},
    selector,
    storage::KeyValueStorage,
    tracker::{Tracker, TrackingStats},
    types::Month0,
};

pub struct AffiliateWidget {
    config:  WidgetConfig,
    catalog: Catalog,
    tracker: Tracker,
}

impl AffiliateWidget {
    pub fn new(config: WidgetConfig, catalog: Catalog, tracker: Tracker) -> Self {
        Self { config, catalog, tracker }
    }

    /// Build a fully wired widget: construct the tracker and load its
    /// prior state from `storage`.
    pub fn open(
        config:   WidgetConfig,
        catalog:  Catalog,
        storage:  Option<Box<dyn KeyValueStorage>>,
        reporter: Option<Box<dyn AnalyticsReporter>>,
    ) -> Self {
        let tracker = Tracker::open(storage, reporter, &config);
        log::info!(
            "Affiliate widget ready: {} products, storage key '{}'",
            catalog.len(),
            config.storage_key
        );
        Self::new(config, catalog, tracker)
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.tracker
    }

    pub fn render(
        &self,
        page:         &mut Page,
        container_id: &str,
        category:     Option<&str>,
        limit:        Option<usize>,
    ) -> Option<usize> {
        render_affiliate_products(page, &self.catalog, &self.config, container_id, category, limit)
    }

    pub fn relevant_products(&self, crime_type: &str, location: &str) -> Vec<&Product> {
        selector::show_relevant_products(&self.catalog, crime_type, location)
    }

    pub fn seasonal_products(&self) -> Vec<&Product> {
        selector::get_seasonal_products(&self.catalog)
    }

    pub fn seasonal_products_at(&self, month: Month0) -> Vec<&Product> {
        selector::seasonal_products_at(&self.catalog, month)
    }

    /// Link activation from the page. Returns the navigation target.
    pub fn activate(&mut self, page: &Page, container_id: &str, product_id: &str) -> Option<String> {
        page.activate(container_id, product_id, &mut self.tracker)
    }

    pub fn track_conversion(&mut self, product_id: &str, value: f64) {
        self.tracker.track_conversion(product_id, value);
    }

    pub fn stats(&self) -> TrackingStats {
        self.tracker.get_stats()
    }
}
