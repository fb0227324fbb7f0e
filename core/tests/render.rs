//! Renderer tests: card markup, selection, link activation.

use affiliate_core::{
    catalog::Catalog,
    config::WidgetConfig,
    render::{render_affiliate_products, Page},
    storage::MemoryStorage,
    tracker::Tracker,
};

const TARGET: &str = "affiliate-products";

fn page() -> Page {
    let mut page = Page::new();
    page.add_container(TARGET);
    page
}

fn render(page: &mut Page, category: Option<&str>, limit: Option<usize>) -> Option<usize> {
    render_affiliate_products(
        page,
        &Catalog::builtin(),
        &WidgetConfig::default(),
        TARGET,
        category,
        limit,
    )
}

#[test]
fn missing_target_is_a_silent_no_op() {
    let mut page = page();
    let rendered = render_affiliate_products(
        &mut page,
        &Catalog::builtin(),
        &WidgetConfig::default(),
        "does-not-exist",
        None,
        None,
    );
    assert_eq!(rendered, None);
    assert!(page.container("does-not-exist").is_none());
    assert!(page.container(TARGET).unwrap().html.is_empty());
}

#[test]
fn no_category_renders_every_product_in_catalog_order() {
    let mut page = page();
    assert_eq!(render(&mut page, None, None), Some(8));
    let container = page.container(TARGET).unwrap();
    let ids: Vec<_> = container.bindings.iter().map(|b| b.product_id.as_str()).collect();
    let expected: Vec<_> = Catalog::builtin().all().map(|p| p.id.clone()).collect();
    assert_eq!(ids, expected);
    assert_eq!(container.html.matches(r#"class="affiliate-product""#).count(), 8);
}

#[test]
fn limit_one_without_category_renders_first_security_product() {
    let mut page = page();
    assert_eq!(render(&mut page, None, Some(1)), Some(1));
    let container = page.container(TARGET).unwrap();
    assert_eq!(container.card_count(), 1);
    assert_eq!(container.bindings[0].product_id, "verisure-alarm");
    assert_eq!(container.html.matches(r#"class="affiliate-product""#).count(), 1);
}

#[test]
fn category_renders_only_that_category() {
    let mut page = page();
    assert_eq!(render(&mut page, Some("insurance"), None), Some(2));
    let html = &page.container(TARGET).unwrap().html;
    assert!(html.contains("If Hemförsäkring"));
    assert!(html.contains("Folksam Hemförsäkring"));
    assert!(!html.contains("Verisure"));
}

#[test]
fn unknown_category_clears_target() {
    let mut page = page();
    render(&mut page, None, None);
    assert_eq!(render(&mut page, Some("weapons"), None), Some(0));
    let container = page.container(TARGET).unwrap();
    assert!(container.html.is_empty());
    assert!(container.bindings.is_empty());
}

/// Each call replaces the whole content; nothing accumulates.
#[test]
fn rendering_replaces_previous_content() {
    let mut page = page();
    render(&mut page, Some("security"), None);
    render(&mut page, Some("legal"), None);
    let container = page.container(TARGET).unwrap();
    assert_eq!(container.card_count(), 1);
    assert!(!container.html.contains("Verisure"));
}

#[test]
fn card_markup_carries_css_contract_and_link_attributes() {
    let mut page = page();
    render(&mut page, Some("legal"), None);
    let html = &page.container(TARGET).unwrap().html;

    for class in [
        "affiliate-product",
        "product-image",
        "product-info",
        "product-name",
        "product-description",
        "product-rating",
        "rating-number",
        "product-price",
        "product-category",
        "product-actions",
        "affiliate-link",
    ] {
        assert!(html.contains(&format!(r#"class="{class}""#)), "missing class {class}");
    }
    assert!(html.contains(r#"href="https://www.lawline.se/?ref=stockholmvaldskarta""#));
    assert!(html.contains(r#"target="_blank""#));
    assert!(html.contains(r#"rel="nofollow noopener sponsored""#));
    assert!(html.contains(r#"onerror="this.src='/images/placeholder.jpg'""#));
    assert!(html.contains(r#"data-product-id="lawline-juridik""#));
    assert!(html.contains("Läs mer &amp; Köp"));
}

#[test]
fn rating_renders_stars_and_number() {
    let mut page = page();
    render(&mut page, Some("safety"), Some(1));
    let html = &page.container(TARGET).unwrap().html;
    // pepper-spray is rated 4.0
    assert!(html.contains("★★★★☆"));
    assert!(html.contains(r#"<span class="rating-number">4</span>"#));
}

#[test]
fn activation_records_click_and_returns_destination() {
    let mut page = page();
    render(&mut page, Some("security"), None);
    let mut tracker = Tracker::new(Box::new(MemoryStorage::new()));

    let href = page.activate(TARGET, "yale-doorman", &mut tracker);
    assert_eq!(href.as_deref(), Some("https://www.yale.se/?ref=stockholmvaldskarta"));
    assert_eq!(tracker.clicks("yale-doorman"), 1);

    assert!(page.activate(TARGET, "lawline-juridik", &mut tracker).is_none());
    assert!(page.activate("elsewhere", "yale-doorman", &mut tracker).is_none());
    assert_eq!(tracker.get_stats().total_clicks, 1);
}

/// A quote in the fallback path must not end the inline handler's string.
#[test]
fn fallback_image_is_escaped_for_inline_script() {
    let config = WidgetConfig {
        fallback_image: "/images/it's-missing.jpg".into(),
        ..WidgetConfig::default()
    };
    let mut page = page();
    render_affiliate_products(&mut page, &Catalog::builtin(), &config, TARGET, Some("legal"), None);
    let html = &page.container(TARGET).unwrap().html;

    // After HTML attribute decoding the handler reads this.src='/images/it\'s-missing.jpg'
    assert!(
        html.contains(r#"onerror="this.src='/images/it\&#39;s-missing.jpg'""#),
        "unexpected handler markup: {html}"
    );
}
