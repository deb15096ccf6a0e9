//! Linear-interpolation quantiles.
//!
//! Uses the default method of NumPy and Pandas: for probability `p` over
//! `n` sorted values, `h = (n - 1) * p` and the result interpolates between
//! the order statistics at `floor(h)` and `floor(h) + 1`.

use crate::error::{Error, Result};

/// Sort a copy of `values` in ascending order. NaNs sort last.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Quantile `p` of already-sorted data.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::InvalidParameter(format!("Quantile {p} must be in [0, 1]")));
    }
    if sorted.is_empty() {
        return Err(Error::insufficient(1, 0));
    }

    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    if frac == 0.0 {
        return Ok(sorted[lo]);
    }
    Ok(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Quantile `p` of unsorted data.
pub fn quantile(values: &[f64], p: f64) -> Result<f64> {
    quantile_sorted(&sorted(values), p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn interpolates_between_order_statistics() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(quantile(&data, 0.25).unwrap(), 1.75);
        assert_abs_diff_eq!(quantile(&data, 0.5).unwrap(), 2.5);
        assert_abs_diff_eq!(quantile(&data, 0.75).unwrap(), 3.25);
        assert_abs_diff_eq!(quantile(&data, 0.0).unwrap(), 1.0);
        assert_abs_diff_eq!(quantile(&data, 1.0).unwrap(), 4.0);
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let data = [10.0, 0.0, 5.0];
        assert_abs_diff_eq!(quantile(&data, 0.5).unwrap(), 5.0);
    }

    #[test]
    fn single_outlier_does_not_move_99th_percentile() {
        let mut data = vec![1.0; 100];
        data.push(1000.0);
        assert_abs_diff_eq!(quantile(&data, 0.99).unwrap(), 1.0);
    }

    #[test]
    fn exact_order_statistic_ignores_infinite_neighbour() {
        let data = [1.0, 2.0, f64::INFINITY];
        assert_eq!(quantile(&data, 0.5).unwrap(), 2.0);
    }

    #[test]
    fn rejects_bad_probability_and_empty_input() {
        assert!(matches!(quantile(&[1.0], 1.5), Err(Error::InvalidParameter(_))));
        assert!(matches!(
            quantile(&[], 0.5),
            Err(Error::InsufficientData { expected: 1, actual: 0 })
        ));
    }
}
