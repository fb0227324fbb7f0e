//! Affiliate product widget for a crime-map site.
//!
//! Components, leaf first:
//!   - `catalog`:  the fixed product table
//!   - `tracker`:  click/conversion counters mirrored to durable storage
//!   - `selector`: crime-type and seasonal product picks
//!   - `render`:   product card markup and link activation
//!
//! `AffiliateWidget` ties them together; hosts build one at startup.

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod error;
pub mod partner;
pub mod render;
pub mod selector;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod types;
pub mod widget;

pub use catalog::{Catalog, Category, Product};
pub use render::render_affiliate_products;
pub use selector::{get_seasonal_products, show_relevant_products};
pub use tracker::{Tracker, TrackingState, TrackingStats};
pub use widget::AffiliateWidget;
