//! Product card rendering into page display targets.
//!
//! The markup's CSS class names are a compatibility surface for external
//! stylesheets and must stay as they are.

use crate::{
    catalog::{Catalog, Product},
    config::WidgetConfig,
    tracker::Tracker,
    types::ProductId,
};
use std::collections::HashMap;
use std::fmt::Write;

/// Link activation wiring: activating the card's link records a click
/// for `product_id` under `category` (the product's display label).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickBinding {
    pub product_id: ProductId,
    pub category:   String,
    pub href:       String,
}

/// A display target: its current markup plus the click bindings of the
/// links inside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub html:     String,
    pub bindings: Vec<ClickBinding>,
}

impl Container {
    pub fn card_count(&self) -> usize {
        self.bindings.len()
    }
}

/// The page: display targets resolved by id.
#[derive(Debug, Clone, Default)]
pub struct Page {
    containers: HashMap<String, Container>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty display target.
    pub fn add_container(&mut self, id: &str) {
        self.containers.entry(id.to_string()).or_default();
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    /// Activate the affiliate link for `product_id` inside `container_id`.
    /// Records the click and returns the URL navigation proceeds to, or
    /// `None` when no such link is on the page.
    pub fn activate(
        &self,
        container_id: &str,
        product_id:   &str,
        tracker:      &mut Tracker,
    ) -> Option<String> {
        let binding = self
            .containers
            .get(container_id)?
            .bindings
            .iter()
            .find(|b| b.product_id == product_id)?;
        tracker.track_click(&binding.product_id, &binding.category);
        Some(binding.href.clone())
    }
}

/// Render product cards into `container_id`, replacing its content.
///
/// - `category`: a catalog key; unknown keys render nothing. `None`
///   renders every category in declared order.
/// - `limit`: keep at most this many cards.
///
/// Returns the number of cards rendered, or `None` when the target is
/// not on the page (nothing happens in that case).
pub fn render_affiliate_products(
    page:         &mut Page,
    catalog:      &Catalog,
    config:       &WidgetConfig,
    container_id: &str,
    category:     Option<&str>,
    limit:        Option<usize>,
) -> Option<usize> {
    let Some(container) = page.containers.get_mut(container_id) else {
        log::debug!("render target '{container_id}' not found, skipping");
        return None;
    };

    let mut products: Vec<&Product> = match category {
        Some(key) => catalog.by_key(key).iter().collect(),
        None => catalog.all().collect(),
    };
    if let Some(limit) = limit {
        products.truncate(limit);
    }

    let mut html = String::new();
    let mut bindings = Vec::with_capacity(products.len());
    for product in &products {
        html.push_str(&product_card(product, config));
        bindings.push(ClickBinding {
            product_id: product.id.clone(),
            category:   product.category.clone(),
            href:       product.affiliate_url.clone(),
        });
    }

    *container = Container { html, bindings };
    log::debug!(
        "rendered {} products into '{container_id}' (category={category:?}, limit={limit:?})",
        products.len()
    );
    Some(products.len())
}

/// Markup for a single product card.
pub fn product_card(product: &Product, config: &WidgetConfig) -> String {
    let mut out = String::new();
    let name = escape(&product.name);
    // Writing to a String cannot fail.
    let _ = write!(
        out,
        r#"
<div class="affiliate-product">
    <div class="product-image">
        <img src="{image}" alt="{name}" onerror="this.src='{fallback}'">
    </div>
    <div class="product-info">
        <h4 class="product-name">{name}</h4>
        <p class="product-description">{description}</p>
        <div class="product-rating">
            {stars}
            <span class="rating-number">{rating}</span>
        </div>
        <div class="product-price">{price}</div>
        <div class="product-category">{category}</div>
    </div>
    <div class="product-actions">
        <a href="{href}"
           class="affiliate-link"
           target="_blank"
           rel="nofollow noopener sponsored"
           data-product-id="{id}"
           data-category="{category}">
            {label}
        </a>
    </div>
</div>
"#,
        image       = escape(&product.image),
        fallback    = escape(&escape_js_string(&config.fallback_image)),
        description = escape(&product.description),
        stars       = product.stars(),
        rating      = product.rating,
        price       = escape(&product.price),
        category    = escape(&product.category),
        href        = escape(&product.affiliate_url),
        id          = escape(&product.id),
        label       = escape(&config.link_label),
    );
    out
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
    out
}

/// Escape text for a single-quoted JS string literal. The result still
/// needs `escape` when it goes into an attribute.
pub fn escape_js_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\'       => out.push_str("\\\\"),
            '\''       => out.push_str("\\'"),
            '"'        => out.push_str("\\u0022"),
            '<'        => out.push_str("\\u003c"),
            '>'        => out.push_str("\\u003e"),
            '\n'       => out.push_str("\\n"),
            '\r'       => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _          => out.push(c),
        }
    }
    out
}
