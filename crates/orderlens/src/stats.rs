//! Numeric helpers shared by cleaning, aggregation and forecasting.

use serde::{Deserialize, Serialize};

/// Descriptive statistics over a set of non-null numeric values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); 0 for fewer than two values.
    pub std: f64,
    pub median: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
}

impl NumericStatistics {
    /// Compute statistics, or `None` when there are no values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        // Welford's algorithm for stable mean and variance
        let mut count = 0usize;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &value in values {
            count += 1;
            sum += value;
            let delta = value - mean;
            mean += delta / count as f64;
            m2 += delta * (value - mean);
            min = min.min(value);
            max = max.max(value);
        }

        let std = if count < 2 {
            0.0
        } else {
            (m2 / (count - 1) as f64).sqrt()
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            count,
            sum,
            min,
            max,
            mean,
            std,
            median: median_sorted(&sorted),
            q1: quantile_sorted(&sorted, 0.25),
            q3: quantile_sorted(&sorted, 0.75),
        })
    }

    /// Calculate the interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Inclusive bounds outside of which a value is an IQR outlier.
    pub fn iqr_bounds(&self, multiplier: f64) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - multiplier * iqr, self.q3 + multiplier * iqr)
    }

    /// Calculate the z-score for a value.
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            0.0
        } else {
            (value - self.mean) / self.std
        }
    }
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Median of pre-sorted values; the two middle values are averaged.
fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        0.0
    } else if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Nearest-rank quantile of pre-sorted values (`index = round(q * (n - 1))`).
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (q * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Round to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `part / whole * 100` rounded to two decimals, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round_to(part as f64 / whole as f64 * 100.0, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_basic() {
        let stats = NumericStatistics::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.sum, 15.0);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        assert!((stats.std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_even_median_is_averaged() {
        let stats = NumericStatistics::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn test_empty_values() {
        assert!(NumericStatistics::from_values(&[]).is_none());
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn test_single_value_has_zero_std() {
        let stats = NumericStatistics::from_values(&[7.0]).unwrap();
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.z_score(100.0), 0.0);
    }

    #[test]
    fn test_iqr_bounds() {
        let stats = NumericStatistics::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.iqr_bounds(1.5), (-1.0, 7.0));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(5, 0), 0.0);
    }
}
