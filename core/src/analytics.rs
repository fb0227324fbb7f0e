//! Analytics forwarding: an optional, injected reporting capability.
//!
//! RULE: Reporting is best-effort. A missing reporter is skipped;
//! a failing reporter is logged. Neither affects tracking.

use crate::{
    error::WidgetResult,
    store::{EventLogEntry, WidgetStore},
    types::ProductId,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

pub const CLICK_EVENT: &str = "affiliate_click";
pub const CONVERSION_EVENT: &str = "affiliate_conversion";

/// Every event the tracker forwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    AffiliateClick {
        event_category:    String,
        event_label:       ProductId,
        custom_parameters: ClickParameters,
    },
    AffiliateConversion {
        event_category: String,
        event_label:    ProductId,
        value:          f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClickParameters {
    pub product_category:  String,
    pub affiliate_partner: String,
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AffiliateClick { .. }      => CLICK_EVENT,
            Self::AffiliateConversion { .. } => CONVERSION_EVENT,
        }
    }

    /// The product id the event is about.
    pub fn label(&self) -> &str {
        match self {
            Self::AffiliateClick { event_label, .. }
            | Self::AffiliateConversion { event_label, .. } => event_label,
        }
    }
}

/// The contract every analytics sink fulfills.
pub trait AnalyticsReporter {
    /// Stable name, used in log lines.
    fn name(&self) -> &'static str;

    fn report(&mut self, event: &AnalyticsEvent) -> WidgetResult<()>;
}

/// Emits each event as a JSON log line at `info`.
#[derive(Debug, Default)]
pub struct LogReporter;

impl AnalyticsReporter for LogReporter {
    fn name(&self) -> &'static str { "log" }

    fn report(&mut self, event: &AnalyticsEvent) -> WidgetResult<()> {
        let payload = serde_json::to_string(event)?;
        log::info!(target: "affiliate::analytics", "{} {payload}", event.name());
        Ok(())
    }
}

/// Appends each event to the store's `event_log` table.
pub struct StoreReporter {
    store: WidgetStore,
}

impl StoreReporter {
    pub fn new(store: WidgetStore) -> Self {
        Self { store }
    }
}

impl AnalyticsReporter for StoreReporter {
    fn name(&self) -> &'static str { "store" }

    fn report(&mut self, event: &AnalyticsEvent) -> WidgetResult<()> {
        let entry = EventLogEntry {
            id:         None,
            event_id:   uuid::Uuid::new_v4().to_string(),
            event_name: event.name().to_string(),
            label:      event.label().to_string(),
            payload:    serde_json::to_string(event)?,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.store.append_event(&entry)
    }
}

/// Keeps events in a shared buffer. Clones share the buffer, so a host
/// can hand one clone to the tracker and read from another.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Rc<RefCell<Vec<AnalyticsEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl AnalyticsReporter for RecordingReporter {
    fn name(&self) -> &'static str { "recording" }

    fn report(&mut self, event: &AnalyticsEvent) -> WidgetResult<()> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}
