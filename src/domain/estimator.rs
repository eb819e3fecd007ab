//! Robust central price estimate.
//!
//! Marketplace search results routinely contain a handful of extreme
//! outliers: wholesale multi-set lots at several times the street price,
//! and obviously mispriced or bait listings near zero. A plain mean (or
//! even a plain median on small samples) is skewed by these, so the
//! estimate trims a fixed number of extremes from each end before taking
//! the median.

use std::cmp::Ordering;

/// Number of values trimmed from each end of the sorted price list.
const TRIM_EACH_SIDE: usize = 5;

/// Reduces a list of observed prices to one robust central estimate.
///
/// Sorts ascending, drops the lowest and highest [`TRIM_EACH_SIDE`] values
/// by position, and returns the median of the remainder (mean of the two
/// central values for even lengths). When trimming would empty the list
/// (ten or fewer inputs) the untrimmed median is used instead. An empty
/// input yields `0.0`.
///
/// Pure: the input is never mutated and the result depends only on the
/// multiset of values, not their order.
#[must_use]
pub fn trimmed_median(prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }

    let mut sorted = prices.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let trimmed = sorted
        .get(TRIM_EACH_SIDE..sorted.len().saturating_sub(TRIM_EACH_SIDE))
        .filter(|slice| !slice.is_empty());

    match trimmed {
        Some(slice) => median_of_sorted(slice),
        None => median_of_sorted(&sorted),
    }
}

/// Median of an already-sorted, non-empty slice.
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let lower = sorted.get(mid.saturating_sub(1)).copied().unwrap_or(0.0);
        let upper = sorted.get(mid).copied().unwrap_or(0.0);
        (lower + upper) / 2.0
    } else {
        sorted.get(mid).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_zero() {
        assert_eq!(trimmed_median(&[]), 0.0);
    }

    #[test]
    fn single_value_is_its_own_median() {
        assert_eq!(trimmed_median(&[123.5]), 123.5);
    }

    #[test]
    fn ten_or_fewer_values_use_the_classic_median() {
        // Trimming 5 + 5 would empty these, so the untrimmed median applies.
        assert_eq!(trimmed_median(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(trimmed_median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(
            trimmed_median(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]),
            55.0
        );
    }

    #[test]
    fn fifteen_value_example_trims_to_305() {
        let prices = [
            299.0, 305.0, 310.0, 295.0, 320.0, 298.0, 315.0, 302.0, 308.0, 300.0, 312.0, 304.0,
            307.0, 301.0, 309.0,
        ];
        // Sorted and trimmed 5/5 this leaves [302, 304, 305, 307, 308].
        assert_eq!(trimmed_median(&prices), 305.0);
    }

    #[test]
    fn even_trimmed_length_averages_the_central_pair() {
        // 12 values, trimmed to [6, 7] -> 6.5.
        let prices = [
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0,
        ];
        assert_eq!(trimmed_median(&prices), 6.5);
    }

    #[test]
    fn result_is_invariant_under_permutation() {
        let prices = [
            299.0, 305.0, 310.0, 295.0, 320.0, 298.0, 315.0, 302.0, 308.0, 300.0, 312.0, 304.0,
            307.0, 301.0, 309.0,
        ];
        let mut reversed = prices.to_vec();
        reversed.reverse();
        assert_eq!(trimmed_median(&prices), trimmed_median(&reversed));
    }

    #[test]
    fn input_is_not_mutated() {
        let prices = vec![320.0, 295.0, 310.0];
        let before = prices.clone();
        let _ = trimmed_median(&prices);
        assert_eq!(prices, before);
    }

    #[test]
    fn outliers_beyond_the_trim_window_do_not_move_the_estimate() {
        let mut prices = vec![
            299.0, 305.0, 310.0, 295.0, 320.0, 298.0, 315.0, 302.0, 308.0, 300.0, 312.0, 304.0,
            307.0, 301.0, 309.0,
        ];
        let baseline = trimmed_median(&prices);
        // A wholesale lot and a bait listing land in the trimmed zone...
        if let Some(first) = prices.first_mut() {
            *first = 9_999.0;
        }
        if let Some(second) = prices.get_mut(1) {
            *second = 0.01;
        }
        // ...and the estimate only shifts by the values they displaced
        // inside the window, never by the outliers themselves.
        let shifted = trimmed_median(&prices);
        assert!((shifted - baseline).abs() < 10.0);
        assert!(shifted < 1_000.0);
    }
}
