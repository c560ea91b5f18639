//! Review rating normalization.
//!
//! Marketplaces export ratings in several spellings: `4.7/5`, `4,7 из 5`
//! or a bare `4.5`. Everything is reduced to a `rating`/`max_rating` pair
//! plus a 0..=100 `normalized_rating` used for filtering.

use std::sync::LazyLock;

use regex::Regex;

static FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(?:/|из)\s*(\d+(?:\.\d+)?)").expect("valid regex")
});
static BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)").expect("valid regex"));

/// Parses a raw rating string into `(rating, max_rating)`. Comma decimals
/// are accepted; trailing text after the number is ignored.
pub fn parse_rating(raw: &str) -> Option<(f64, Option<f64>)> {
    let cleaned = raw.replace(',', ".");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Some(caps) = FRACTION.captures(cleaned) {
        let rating = caps[1].parse().ok()?;
        let max = caps[2].parse().ok()?;
        return Some((rating, Some(max)));
    }
    let caps = BARE.captures(cleaned)?;
    Some((caps[1].parse().ok()?, None))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RatingFields {
    pub raw_rating: Option<String>,
    pub rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub normalized_rating: i32,
}

/// Reconciles the three rating representations of a review row.
///
/// When only `raw_rating` is present it is parsed into numbers; when only
/// the numbers are present a `raw_rating` string is synthesized. The
/// normalized value is 0 whenever the pair cannot be computed.
pub fn derive_rating(
    raw: Option<String>,
    mut rating: Option<f64>,
    mut max_rating: Option<f64>,
) -> RatingFields {
    let mut raw_rating = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    if let Some(raw) = raw_rating.as_deref() {
        if rating.is_none()
            && max_rating.is_none()
            && let Some((r, m)) = parse_rating(raw)
        {
            rating = Some(r);
            max_rating = m;
        }
    } else if rating.is_some() || max_rating.is_some() {
        raw_rating = Some(format!(
            "{}/{}",
            rating.unwrap_or(0.0),
            max_rating.unwrap_or(0.0)
        ));
    }

    let normalized_rating = match (rating, max_rating) {
        (Some(r), Some(m)) if m > 0.0 => (r / m * 100.0).round() as i32,
        _ => 0,
    };

    RatingFields {
        raw_rating,
        rating,
        max_rating,
        normalized_rating,
    }
}
