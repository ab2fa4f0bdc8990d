// src/data_analysis/quartiles.rs
//
// Box plot statistics: linearly interpolated quartiles, whiskers clamped
// to the farthest datum within 1.5 IQR of the box, outliers beyond.

use crate::constants::BOX_WHISKER_SPAN;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Percentile of a sorted slice with linear interpolation between ranks.
/// `q` is in [0, 1]. The slice must be non-empty.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = q * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Statistics for one box. Non-finite values are ignored; `None` when no
/// finite values remain.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = percentile(&sorted, 0.25);
    let median = percentile(&sorted, 0.5);
    let q3 = percentile(&sorted, 0.75);
    let reach = BOX_WHISKER_SPAN * (q3 - q1);

    let whisker_low = sorted
        .iter()
        .copied()
        .find(|&v| v >= q1 - reach)
        .unwrap_or(q1);
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= q3 + reach)
        .unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < whisker_low || v > whisker_high)
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 1.0), 4.0);
        assert_eq!(percentile(&sorted, 0.5), 2.5);
        assert_eq!(percentile(&sorted, 0.25), 1.75);
    }

    #[test]
    fn whiskers_clamp_to_data() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = box_stats(&values).unwrap();
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        // All data within reach: whiskers sit on the extremes.
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 5.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn far_points_become_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = box_stats(&values).unwrap();
        assert!(stats.outliers.contains(&100.0));
        assert!(stats.whisker_high < 100.0);
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let values = [f64::NAN, 1.0, 2.0, f64::INFINITY];
        let stats = box_stats(&values).unwrap();
        assert_eq!(stats.median, 1.5);
        assert!(box_stats(&[f64::NAN]).is_none());
    }
}
