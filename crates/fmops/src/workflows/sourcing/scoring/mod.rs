//! The benchmark engine: pure scoring over a full quote set.

mod criteria;
mod ranking;

pub use ranking::{assign_ranks, RankAssignment};

use super::domain::{EvaluationWeights, Quote};

/// Benchmarking a single quote against itself is meaningless.
pub const MIN_QUOTES_FOR_BENCHMARK: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("benchmarking requires at least {required} quotes, found {found}")]
    InsufficientQuotes { found: usize, required: usize },
    #[error("evaluation weights sum to zero")]
    ZeroWeightSum,
}

/// Per-quote criterion scores plus the weighted benchmark, at full precision.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub price: f64,
    pub quality: f64,
    pub delivery: f64,
    pub compliance: f64,
    pub benchmark: f64,
}

/// Score every quote in the set. Price is relative to the set's min/max
/// spread; the other criteria are per-quote. The benchmark is the weighted
/// mean normalized by the actual weight sum.
pub fn benchmark_quotes(
    weights: &EvaluationWeights,
    quotes: &[Quote],
) -> Result<Vec<ScoreBreakdown>, ScoringError> {
    if quotes.len() < MIN_QUOTES_FOR_BENCHMARK {
        return Err(ScoringError::InsufficientQuotes {
            found: quotes.len(),
            required: MIN_QUOTES_FOR_BENCHMARK,
        });
    }

    let weight_sum = weights.total();
    if weight_sum == 0 {
        return Err(ScoringError::ZeroWeightSum);
    }
    let denominator = weight_sum as f64;

    let price_scores = criteria::price_scores(quotes);

    Ok(quotes
        .iter()
        .zip(price_scores)
        .map(|(quote, price)| {
            let quality = criteria::quality_score(quote);
            let delivery = criteria::delivery_score(quote);
            let compliance = criteria::compliance_score(quote);
            let benchmark = (price * f64::from(weights.price)
                + quality * f64::from(weights.quality)
                + delivery * f64::from(weights.delivery)
                + compliance * f64::from(weights.compliance))
                / denominator;

            ScoreBreakdown {
                price,
                quality,
                delivery,
                compliance,
                benchmark,
            }
        })
        .collect())
}

/// Rounding applied to persisted benchmark values. Comparisons and ranking
/// always happen on the raw figure.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
