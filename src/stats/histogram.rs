use serde::Serialize;

use crate::data::model::Dataset;
use crate::error::{Error, Result};

/// Equal-width histogram of a numeric field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub field: String,
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning min..=max. Every
    /// bin is half-open except the last, which includes the maximum.
    /// Constant data is spread over `value ± 0.5`, as NumPy does.
    pub fn from_values(field: &str, values: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::InvalidParameter("histogram needs at least one bin".to_string()));
        }
        if values.is_empty() {
            return Err(Error::insufficient(1, 0));
        }

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Histogram {
            field: field.to_string(),
            edges,
            counts,
        })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Histogram of the non-null values of `field`.
pub fn histogram(dataset: &Dataset, field: &str, bins: usize) -> Result<Histogram> {
    let values = dataset.numeric_values(field)?;
    Histogram::from_values(field, &values, bins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_bin_includes_maximum() {
        let h = Histogram::from_values("x", &[0.0, 1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(h.edges, vec![0.0, 2.0, 4.0]);
        assert_eq!(h.counts, vec![2, 3]);
        assert_eq!(h.total(), 5);
    }

    #[test]
    fn constant_values_get_unit_range() {
        let h = Histogram::from_values("x", &[3.0, 3.0], 1).unwrap();
        assert_eq!(h.edges, vec![2.5, 3.5]);
        assert_eq!(h.counts, vec![2]);
    }

    #[test]
    fn zero_bins_rejected() {
        assert!(matches!(
            Histogram::from_values("x", &[1.0], 0),
            Err(Error::InvalidParameter(_))
        ));
    }
}
