//! The product catalog: a fixed, hand-authored table grouped by category.
//!
//! RULE: The catalog is never mutated after load.
//! Order within a category is display order; selection takes prefixes.

use crate::{
    error::{WidgetError, WidgetResult},
    types::ProductId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Total number of symbols in a rendered star rating.
pub const STAR_COUNT: usize = 5;
pub const FILLED_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id:            ProductId,
    pub name:          String,
    pub description:   String,
    /// Free text, e.g. "Från 299 kr/mån". Never parsed.
    pub price:         String,
    pub image:         String,
    pub affiliate_url: String,
    /// Display label, e.g. "Hemlarm". Not the catalog category key.
    pub category:      String,
    pub rating:        f64,
    /// Free text, e.g. "15%" or "25 kr per lead".
    pub commission:    String,
}

impl Product {
    /// Number of filled stars: `floor(rating)` with rating clamped to [0, 5].
    pub fn filled_stars(&self) -> usize {
        let rating = if self.rating.is_nan() { 0.0 } else { self.rating.clamp(0.0, 5.0) };
        rating.floor() as usize
    }

    /// Five symbols: filled stars followed by empty ones.
    pub fn stars(&self) -> String {
        let filled = self.filled_stars();
        let mut out = String::with_capacity(STAR_COUNT * 3);
        out.extend(std::iter::repeat(FILLED_STAR).take(filled));
        out.extend(std::iter::repeat(EMPTY_STAR).take(STAR_COUNT - filled));
        out
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Security,
    Insurance,
    Safety,
    Legal,
}

impl Category {
    /// Declared catalog order. "All products" concatenates in this order.
    pub const ALL: [Category; 4] = [
        Category::Security,
        Category::Insurance,
        Category::Safety,
        Category::Legal,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Security  => "security",
            Self::Insurance => "insurance",
            Self::Safety    => "safety",
            Self::Legal     => "legal",
        }
    }

    /// Exact key match. Unknown keys yield `None`.
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    security:  Vec<Product>,
    #[serde(default)]
    insurance: Vec<Product>,
    #[serde(default)]
    safety:    Vec<Product>,
    #[serde(default)]
    legal:     Vec<Product>,
}

impl Catalog {
    /// Build a catalog from per-category sequences, enforcing id uniqueness.
    pub fn from_parts(
        security:  Vec<Product>,
        insurance: Vec<Product>,
        safety:    Vec<Product>,
        legal:     Vec<Product>,
    ) -> WidgetResult<Self> {
        let catalog = Self { security, insurance, safety, legal };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load `<data_dir>/catalog/affiliate_products.json`.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/catalog/affiliate_products.json");
        Self::load_file(&path)
    }

    pub fn load_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&content)?;
        catalog.validate()?;
        log::info!(
            "Loaded catalog from {} ({} products)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    fn validate(&self) -> WidgetResult<()> {
        let mut seen = HashSet::new();
        for product in self.all() {
            if !seen.insert(product.id.as_str()) {
                return Err(WidgetError::DuplicateProduct { id: product.id.clone() });
            }
        }
        Ok(())
    }

    /// The ordered products of one category.
    pub fn products(&self, category: Category) -> &[Product] {
        match category {
            Category::Security  => &self.security,
            Category::Insurance => &self.insurance,
            Category::Safety    => &self.safety,
            Category::Legal     => &self.legal,
        }
    }

    /// Lookup by raw key. An unknown key is an empty result, not an error.
    pub fn by_key(&self, key: &str) -> &[Product] {
        match Category::parse(key) {
            Some(category) => self.products(category),
            None => &[],
        }
    }

    /// Each category with its products, in declared order.
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[Product])> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.products(c)))
    }

    /// Every product, categories concatenated in declared order.
    pub fn all(&self) -> impl Iterator<Item = &Product> + '_ {
        Category::ALL.into_iter().flat_map(move |c| self.products(c).iter())
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        self.all().find(|p| p.id == id)
    }

    /// Category key owning `id`, if any.
    pub fn category_of(&self, id: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| self.products(*c).iter().any(|p| p.id == id))
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.products(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The hand-authored catalog shipped with the widget.
    pub fn builtin() -> Self {
        Self {
            security: vec![
                product(
                    "verisure-alarm",
                    "Verisure Hemlarm",
                    "Komplett hemlarmssystem med 24/7 övervakning",
                    "Från 299 kr/mån",
                    "/images/verisure-alarm.jpg",
                    "https://www.verisure.se/?ref=stockholmvaldskarta",
                    "Hemlarm",
                    4.5,
                    "15%",
                ),
                product(
                    "sector-alarm",
                    "Sector Alarm",
                    "Trådlöst larmsystem med app-styrning",
                    "Från 199 kr/mån",
                    "/images/sector-alarm.jpg",
                    "https://www.sectoralarm.se/?ref=stockholmvaldskarta",
                    "Hemlarm",
                    4.3,
                    "12%",
                ),
                product(
                    "yale-doorman",
                    "Yale Doorman",
                    "Smart dörrlås med kodlås och app-kontroll",
                    "2,995 kr",
                    "/images/yale-doorman.jpg",
                    "https://www.yale.se/?ref=stockholmvaldskarta",
                    "Smarta lås",
                    4.4,
                    "8%",
                ),
            ],
            insurance: vec![
                product(
                    "if-hemforsakring",
                    "If Hemförsäkring",
                    "Omfattande hemförsäkring med inbrottsskydd",
                    "Från 150 kr/mån",
                    "/images/if-insurance.jpg",
                    "https://www.if.se/?ref=stockholmvaldskarta",
                    "Försäkring",
                    4.2,
                    "25 kr per lead",
                ),
                product(
                    "folksam-hemforsakring",
                    "Folksam Hemförsäkring",
                    "Trygg hemförsäkring med bra villkor",
                    "Från 180 kr/mån",
                    "/images/folksam-insurance.jpg",
                    "https://www.folksam.se/?ref=stockholmvaldskarta",
                    "Försäkring",
                    4.1,
                    "30 kr per lead",
                ),
            ],
            safety: vec![
                product(
                    "pepper-spray",
                    "Laglig Pepparspray",
                    "Godkänd pepparspray för självförsvar",
                    "149 kr",
                    "/images/pepper-spray.jpg",
                    "https://www.sakerhetsprodukter.se/?ref=stockholmvaldskarta",
                    "Självförsvar",
                    4.0,
                    "10%",
                ),
                product(
                    "personal-alarm",
                    "Personlarm",
                    "Högt personlarm med LED-ljus",
                    "99 kr",
                    "/images/personal-alarm.jpg",
                    "https://www.sakerhetsprodukter.se/?ref=stockholmvaldskarta",
                    "Personlig säkerhet",
                    4.2,
                    "15%",
                ),
            ],
            legal: vec![product(
                "lawline-juridik",
                "Lawline Juridisk Rådgivning",
                "Juridisk hjälp vid brott och försäkringsärenden",
                "Från 500 kr/konsultation",
                "/images/lawline.jpg",
                "https://www.lawline.se/?ref=stockholmvaldskarta",
                "Juridik",
                4.6,
                "100 kr per lead",
            )],
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id:            &str,
    name:          &str,
    description:   &str,
    price:         &str,
    image:         &str,
    affiliate_url: &str,
    category:      &str,
    rating:        f64,
    commission:    &str,
) -> Product {
    Product {
        id:            id.to_string(),
        name:          name.to_string(),
        description:   description.to_string(),
        price:         price.to_string(),
        image:         image.to_string(),
        affiliate_url: affiliate_url.to_string(),
        category:      category.to_string(),
        rating,
        commission:    commission.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(rating: f64) -> Product {
        let mut p = Catalog::builtin().products(Category::Legal)[0].clone();
        p.rating = rating;
        p
    }

    #[test]
    fn stars_floor_the_rating() {
        assert_eq!(rated(4.6).stars(), "★★★★☆");
        assert_eq!(rated(4.0).stars(), "★★★★☆");
        assert_eq!(rated(0.0).stars(), "☆☆☆☆☆");
        assert_eq!(rated(5.0).stars(), "★★★★★");
    }

    #[test]
    fn stars_clamp_out_of_range_ratings() {
        assert_eq!(rated(7.5).stars(), "★★★★★");
        assert_eq!(rated(-1.0).stars(), "☆☆☆☆☆");
        assert_eq!(rated(f64::NAN).stars().chars().count(), STAR_COUNT);
    }

    #[test]
    fn category_keys_round_trip() {
        for c in Category::ALL {
            assert_eq!(Category::parse(c.key()), Some(c));
        }
        assert_eq!(Category::parse("Security"), None);
    }
}
