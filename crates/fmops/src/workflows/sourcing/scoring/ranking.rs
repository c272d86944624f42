//! Rank assembly over scored quotes.
//!
//! Ordering always uses the raw benchmark and raw price, never the rounded
//! persisted values, so display rounding can never collapse two distinct
//! quotes into an arbitrary order.

use std::cmp::Ordering;

use super::super::domain::Quote;
use super::ScoreBreakdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankAssignment {
    pub overall_rank: u32,
    pub price_rank: u32,
}

/// Assign 1-based `overall_rank` (descending benchmark) and `price_rank`
/// (ascending price). Ties break on earliest submission, then quote id, so
/// the result is a total order and recomputation is deterministic.
pub fn assign_ranks(quotes: &[Quote], scores: &[ScoreBreakdown]) -> Vec<RankAssignment> {
    debug_assert_eq!(quotes.len(), scores.len());

    let tie_break = |a: usize, b: usize| -> Ordering {
        quotes[a]
            .submitted_at
            .cmp(&quotes[b].submitted_at)
            .then_with(|| quotes[a].id.0.cmp(&quotes[b].id.0))
    };

    let mut by_benchmark: Vec<usize> = (0..quotes.len()).collect();
    by_benchmark.sort_by(|&a, &b| {
        scores[b]
            .benchmark
            .total_cmp(&scores[a].benchmark)
            .then_with(|| tie_break(a, b))
    });

    let mut by_price: Vec<usize> = (0..quotes.len()).collect();
    by_price.sort_by(|&a, &b| {
        quotes[a]
            .total_price
            .total_cmp(&quotes[b].total_price)
            .then_with(|| tie_break(a, b))
    });

    let mut ranks = vec![
        RankAssignment {
            overall_rank: 0,
            price_rank: 0,
        };
        quotes.len()
    ];
    for (position, &index) in by_benchmark.iter().enumerate() {
        ranks[index].overall_rank = position as u32 + 1;
    }
    for (position, &index) in by_price.iter().enumerate() {
        ranks[index].price_rank = position as u32 + 1;
    }

    ranks
}
