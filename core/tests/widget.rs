//! Widget context tests: startup wiring and the end-to-end click path.

use affiliate_core::{
    analytics::RecordingReporter,
    catalog::Catalog,
    config::WidgetConfig,
    render::Page,
    storage::MemoryStorage,
    AffiliateWidget,
};

fn widget(storage: &MemoryStorage, reporter: &RecordingReporter) -> AffiliateWidget {
    AffiliateWidget::open(
        WidgetConfig::default(),
        Catalog::builtin(),
        Some(Box::new(storage.clone())),
        Some(Box::new(reporter.clone())),
    )
}

#[test]
fn render_click_convert_flow() {
    let storage = MemoryStorage::new();
    let reporter = RecordingReporter::new();
    let mut widget = widget(&storage, &reporter);

    let mut page = Page::new();
    page.add_container("sidebar");
    let relevant: Vec<_> = widget
        .relevant_products("inbrott", "Södermalm")
        .iter()
        .map(|p| p.id.clone())
        .collect();
    assert_eq!(relevant.len(), 3);

    assert_eq!(widget.render(&mut page, "sidebar", Some("security"), Some(2)), Some(2));
    let href = widget.activate(&page, "sidebar", "sector-alarm");
    assert!(href.is_some());
    widget.track_conversion("sector-alarm", 199.0);

    let stats = widget.stats();
    assert_eq!(stats.total_clicks, 1);
    assert_eq!(stats.total_conversions, 1);
    assert_eq!(reporter.len(), 2);
}

/// A second widget on the same storage picks up where the first left off.
#[test]
fn state_carries_across_sessions() {
    let storage = MemoryStorage::new();
    let reporter = RecordingReporter::new();
    {
        let mut first = widget(&storage, &reporter);
        first.tracker_mut().track_click("pepper-spray", "Självförsvar");
    }
    let second = widget(&storage, &reporter);
    assert_eq!(second.tracker().clicks("pepper-spray"), 1);
}

#[test]
fn widget_without_storage_or_reporter_still_tracks() {
    let mut widget =
        AffiliateWidget::open(WidgetConfig::default(), Catalog::builtin(), None, None);
    widget.tracker_mut().track_click("yale-doorman", "Smarta lås");
    assert_eq!(widget.stats().total_clicks, 1);
    assert!(widget.seasonal_products().len() >= 2);
}

#[test]
fn shipped_config_matches_defaults() {
    let path = format!("{}/../data/widget_config.json", env!("CARGO_MANIFEST_DIR"));
    let config = WidgetConfig::load(&path).expect("shipped config loads");
    assert_eq!(config, WidgetConfig::default());
}

#[test]
fn config_file_overrides_link_label() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("widget.json");
    std::fs::write(&path, r#"{ "link_label": "Till butiken" }"#).unwrap();

    let config = WidgetConfig::load_or_default(&path).expect("config loads");
    let widget = AffiliateWidget::open(config, Catalog::builtin(), None, None);
    let mut page = Page::new();
    page.add_container("main");
    widget.render(&mut page, "main", Some("legal"), None);
    assert!(page.container("main").unwrap().html.contains("Till butiken"));

    let absent = WidgetConfig::load_or_default(dir.path().join("missing.json")).unwrap();
    assert_eq!(absent, WidgetConfig::default());
}
