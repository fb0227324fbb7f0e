//! Product selection: crime-type relevance and seasonal picks.
//!
//! Pure functions over a borrowed catalog. No state, no side effects.

use crate::{
    catalog::{Catalog, Category, Product},
    types::Month0,
};
use chrono::Datelike;

/// Upper bound on `show_relevant_products` output.
pub const MAX_RELEVANT_PRODUCTS: usize = 3;

/// Crime types the selector knows about. Matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrimeType {
    Robbery,     // "rån"
    Assault,     // "misshandel"
    Burglary,    // "inbrott"
    Theft,       // "stöld"
    Shooting,    // "skottlossning"
    Explosion,   // "explosion"
    Unrecognized,
}

impl CrimeType {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "rån"           => Self::Robbery,
            "misshandel"    => Self::Assault,
            "inbrott"       => Self::Burglary,
            "stöld"         => Self::Theft,
            "skottlossning" => Self::Shooting,
            "explosion"     => Self::Explosion,
            _               => Self::Unrecognized,
        }
    }

    pub fn relevance_group(&self) -> RelevanceGroup {
        match self {
            Self::Robbery | Self::Assault     => RelevanceGroup::PersonalSafety,
            Self::Burglary | Self::Theft      => RelevanceGroup::PropertyProtection,
            Self::Shooting | Self::Explosion  => RelevanceGroup::SeriousViolence,
            Self::Unrecognized                => RelevanceGroup::General,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelevanceGroup {
    PersonalSafety,
    PropertyProtection,
    SeriousViolence,
    General,
}

impl RelevanceGroup {
    /// Candidate products, concatenated in the group's fixed order.
    pub fn candidates<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        match self {
            Self::PersonalSafety => chain(catalog, &[
                (Category::Safety, None),
                (Category::Insurance, Some(1)),
            ]),
            Self::PropertyProtection => chain(catalog, &[
                (Category::Security, None),
                (Category::Insurance, None),
            ]),
            Self::SeriousViolence => chain(catalog, &[
                (Category::Security, None),
                (Category::Safety, None),
                (Category::Legal, None),
            ]),
            Self::General => chain(catalog, &[
                (Category::Security, Some(2)),
                (Category::Safety, Some(1)),
            ]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// Dec to Feb: more burglaries, home alarms first.
    Winter,
    /// Jun to Aug: more time outdoors, personal safety first.
    Summer,
    Shoulder,
}

impl Season {
    pub fn from_month0(month: Month0) -> Self {
        match month {
            11 | 0 | 1 => Self::Winter,
            5..=7      => Self::Summer,
            _          => Self::Shoulder,
        }
    }

    pub fn products<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        match self {
            Self::Winter => chain(catalog, &[(Category::Security, None)]),
            Self::Summer => chain(catalog, &[(Category::Safety, None)]),
            Self::Shoulder => chain(catalog, &[
                (Category::Security, Some(2)),
                (Category::Safety, Some(1)),
                (Category::Insurance, Some(1)),
            ]),
        }
    }
}

/// Up to three products relevant to `crime_type`.
/// `location` is accepted for call-site compatibility and not used.
pub fn show_relevant_products<'a>(
    catalog:    &'a Catalog,
    crime_type: &str,
    _location:  &str,
) -> Vec<&'a Product> {
    let group = CrimeType::parse(crime_type).relevance_group();
    let mut products = group.candidates(catalog);
    products.truncate(MAX_RELEVANT_PRODUCTS);
    log::debug!(
        "relevant crime_type={crime_type:?} group={group:?} -> {} products",
        products.len()
    );
    products
}

/// Seasonal picks for a given 0-indexed month.
pub fn seasonal_products_at(catalog: &Catalog, month: Month0) -> Vec<&Product> {
    Season::from_month0(month).products(catalog)
}

/// Seasonal picks for the current month on the host clock.
pub fn get_seasonal_products(catalog: &Catalog) -> Vec<&Product> {
    seasonal_products_at(catalog, chrono::Local::now().month0())
}

/// Concatenate category prefixes; `None` takes the whole category.
fn chain<'a>(catalog: &'a Catalog, parts: &[(Category, Option<usize>)]) -> Vec<&'a Product> {
    parts
        .iter()
        .flat_map(move |(category, take)| {
            let products = catalog.products(*category);
            let n = take.unwrap_or(products.len()).min(products.len());
            products[..n].iter()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crime_types_parse_case_insensitively() {
        assert_eq!(CrimeType::parse("RÅN"), CrimeType::Robbery);
        assert_eq!(CrimeType::parse("Misshandel"), CrimeType::Assault);
        assert_eq!(CrimeType::parse("STÖLD"), CrimeType::Theft);
        assert_eq!(CrimeType::parse("Explosion"), CrimeType::Explosion);
        assert_eq!(CrimeType::parse(""), CrimeType::Unrecognized);
        assert_eq!(CrimeType::parse(" rån"), CrimeType::Unrecognized);
    }

    #[test]
    fn seasons_cover_all_months() {
        let winter: Vec<_> = (0..12).filter(|m| Season::from_month0(*m) == Season::Winter).collect();
        let summer: Vec<_> = (0..12).filter(|m| Season::from_month0(*m) == Season::Summer).collect();
        assert_eq!(winter, vec![0, 1, 11]);
        assert_eq!(summer, vec![5, 6, 7]);
    }
}
