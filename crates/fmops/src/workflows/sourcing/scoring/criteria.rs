//! Per-criterion normalizers. Each maps one quote attribute onto 0–100.

use super::super::domain::Quote;

/// Fallback for quality/compliance/ESG attributes a supplier left blank.
pub(crate) const DEFAULT_ATTRIBUTE_SCORE: f64 = 50.0;
/// Assumed lead time when a quote does not state one.
pub(crate) const DEFAULT_DELIVERY_DAYS: u32 = 30;
pub(crate) const MAX_SCORE: f64 = 100.0;

/// Lower price is better. The cheapest quote in the set scores 100, the most
/// expensive 0. When every quote carries the same price the spread is
/// degenerate and all of them score 100.
pub(crate) fn price_scores(quotes: &[Quote]) -> Vec<f64> {
    let min = quotes.iter().map(|q| q.total_price).fold(f64::INFINITY, f64::min);
    let max = quotes
        .iter()
        .map(|q| q.total_price)
        .fold(f64::NEG_INFINITY, f64::max);

    if max - min <= f64::EPSILON * max.abs() {
        return vec![MAX_SCORE; quotes.len()];
    }

    quotes
        .iter()
        .map(|quote| (max - quote.total_price) / (max - min) * MAX_SCORE)
        .collect()
}

pub(crate) fn quality_score(quote: &Quote) -> f64 {
    quote
        .quality_score
        .map(f64::from)
        .unwrap_or(DEFAULT_ATTRIBUTE_SCORE)
}

/// Slower delivery monotonically lowers the score; it floors at 0 once the
/// lead time reaches 50 days.
pub(crate) fn delivery_score(quote: &Quote) -> f64 {
    let days = quote.delivery_days.unwrap_or(DEFAULT_DELIVERY_DAYS);
    (MAX_SCORE - f64::from(days) * 2.0).max(0.0)
}

/// Mean of the declared compliance and ESG attributes.
pub(crate) fn compliance_score(quote: &Quote) -> f64 {
    let compliance = quote
        .compliance_score
        .map(f64::from)
        .unwrap_or(DEFAULT_ATTRIBUTE_SCORE);
    let esg = quote
        .esg_score
        .map(f64::from)
        .unwrap_or(DEFAULT_ATTRIBUTE_SCORE);
    (compliance + esg) / 2.0
}
