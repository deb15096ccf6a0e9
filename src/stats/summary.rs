use std::fmt;

use serde::Serialize;

use super::quantile::{quantile_sorted, sorted};
use crate::data::model::Dataset;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// DistributionShape – skew-based label
// ---------------------------------------------------------------------------

/// Coarse description of a distribution's asymmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DistributionShape {
    ApproximatelySymmetric,
    ModeratelyRightSkewed,
    ModeratelyLeftSkewed,
    HighlyRightSkewed,
    HighlyLeftSkewed,
}

impl DistributionShape {
    /// |g1| < 0.5 is symmetric, < 1 moderate, otherwise high.
    pub fn from_skewness(skew: f64) -> Self {
        let magnitude = skew.abs();
        if magnitude < 0.5 {
            DistributionShape::ApproximatelySymmetric
        } else if magnitude < 1.0 {
            if skew > 0.0 {
                DistributionShape::ModeratelyRightSkewed
            } else {
                DistributionShape::ModeratelyLeftSkewed
            }
        } else if skew > 0.0 {
            DistributionShape::HighlyRightSkewed
        } else {
            DistributionShape::HighlyLeftSkewed
        }
    }
}

impl fmt::Display for DistributionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DistributionShape::ApproximatelySymmetric => "approximately symmetric",
            DistributionShape::ModeratelyRightSkewed => "moderately right-skewed",
            DistributionShape::ModeratelyLeftSkewed => "moderately left-skewed",
            DistributionShape::HighlyRightSkewed => "highly right-skewed",
            DistributionShape::HighlyLeftSkewed => "highly left-skewed",
        };
        write!(f, "{text}")
    }
}

// ---------------------------------------------------------------------------
// SummaryStatistics
// ---------------------------------------------------------------------------

/// Descriptive statistics of one numeric field over its non-null values.
///
/// Quartiles use linear interpolation between order statistics (see
/// [`quantile`](super::quantile)).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub field: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1); `None` for a single value.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Adjusted Fisher-Pearson skewness; `None` below three values or
    /// without variance.
    pub skewness: Option<f64>,
    /// Values outside the Tukey fences.
    pub outliers: usize,
}

impl SummaryStatistics {
    /// Compute statistics for `values`, labelled `field`.
    pub fn from_values(field: &str, values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::insufficient(1, 0));
        }
        let data = sorted(values);
        let n = data.len();
        let nf = n as f64;

        let constant = data[0] == data[n - 1];
        let mean = if constant { data[0] } else { data.iter().sum::<f64>() / nf };
        let m2 = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
        let std_dev = (n > 1).then(|| if constant { 0.0 } else { (m2 / (nf - 1.0)).sqrt() });

        let skewness = match std_dev {
            Some(s) if n > 2 && s > 0.0 => {
                let m3 = data.iter().map(|x| ((x - mean) / s).powi(3)).sum::<f64>();
                Some(nf / ((nf - 1.0) * (nf - 2.0)) * m3)
            }
            _ => None,
        };

        let q1 = quantile_sorted(&data, 0.25)?;
        let q2 = quantile_sorted(&data, 0.5)?;
        let q3 = quantile_sorted(&data, 0.75)?;
        let iqr = q3 - q1;
        let (low, high) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
        let outliers = data.iter().filter(|&&x| x < low || x > high).count();

        Ok(SummaryStatistics {
            field: field.to_string(),
            count: n,
            mean,
            median: q2,
            std_dev,
            min: data[0],
            max: data[n - 1],
            q1,
            q2,
            q3,
            iqr,
            skewness,
            outliers,
        })
    }

    /// Tukey fences `(Q1 - 1.5 IQR, Q3 + 1.5 IQR)`, the box-plot whisker limits.
    pub fn fences(&self) -> (f64, f64) {
        (self.q1 - 1.5 * self.iqr, self.q3 + 1.5 * self.iqr)
    }

    pub fn shape(&self) -> Option<DistributionShape> {
        self.skewness.map(DistributionShape::from_skewness)
    }
}

/// Descriptive statistics of a numeric field.
pub fn summarize(dataset: &Dataset, field: &str) -> Result<SummaryStatistics> {
    let values = dataset.numeric_values(field)?;
    SummaryStatistics::from_values(field, &values)
}

/// Summaries of every numeric field that holds at least one value, in
/// schema order.
pub fn describe(dataset: &Dataset) -> Result<Vec<SummaryStatistics>> {
    let mut out = Vec::new();
    for name in dataset.schema().numeric_fields() {
        match summarize(dataset, name) {
            Ok(stats) => out.push(stats),
            Err(Error::InsufficientData { .. }) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn basic_moments_and_quartiles() {
        let s = SummaryStatistics::from_values("x", &[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(s.count, 5);
        assert_abs_diff_eq!(s.mean, 3.0);
        assert_abs_diff_eq!(s.median, 3.0);
        assert_abs_diff_eq!(s.std_dev.unwrap(), 2.5f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(s.q1, 2.0);
        assert_abs_diff_eq!(s.q3, 4.0);
        assert_abs_diff_eq!(s.iqr, 2.0);
        assert_abs_diff_eq!(s.skewness.unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 5.0);
        assert_eq!(s.outliers, 0);
    }

    #[test]
    fn skewness_matches_adjusted_fisher_pearson() {
        // pandas.Series([1, 2, 3, 10]).skew() == 1.76363...
        let s = SummaryStatistics::from_values("x", &[1.0, 2.0, 3.0, 10.0]).unwrap();
        assert_abs_diff_eq!(s.skewness.unwrap(), 1.76363, epsilon = 1e-4);
        assert_eq!(s.shape(), Some(DistributionShape::HighlyRightSkewed));
    }

    #[test]
    fn single_value_has_no_spread() {
        let s = SummaryStatistics::from_values("x", &[7.0]).unwrap();
        assert_eq!(s.std_dev, None);
        assert_eq!(s.skewness, None);
        assert_eq!(s.iqr, 0.0);
    }

    #[test]
    fn constant_fractional_values_have_zero_spread() {
        let s = SummaryStatistics::from_values("x", &[0.1, 0.1, 0.1]).unwrap();
        assert_eq!(s.mean, 0.1);
        assert_eq!(s.std_dev, Some(0.0));
        assert_eq!(s.skewness, None);
        assert_eq!(s.shape(), None);
        assert_eq!(s.iqr, 0.0);
    }

    #[test]
    fn fences_count_outliers() {
        let mut values = vec![10.0; 20];
        values.extend([11.0, 12.0, 9.0, 100.0]);
        let s = SummaryStatistics::from_values("x", &values).unwrap();
        let (_, high) = s.fences();
        assert!(high < 100.0);
        assert!(s.outliers >= 1);
    }

    #[test]
    fn shape_thresholds() {
        assert_eq!(
            DistributionShape::from_skewness(0.2),
            DistributionShape::ApproximatelySymmetric
        );
        assert_eq!(
            DistributionShape::from_skewness(-0.7),
            DistributionShape::ModeratelyLeftSkewed
        );
        assert_eq!(
            DistributionShape::from_skewness(1.0),
            DistributionShape::HighlyRightSkewed
        );
    }
}
