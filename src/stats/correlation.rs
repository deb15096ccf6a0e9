//! Pearson correlation between numeric fields.

use std::fmt;

use serde::Serialize;

use crate::data::model::Dataset;
use crate::error::{Error, Result};

/// Pearson correlation of two numeric fields over rows where both are
/// present.
pub fn correlate(dataset: &Dataset, field_a: &str, field_b: &str) -> Result<f64> {
    let a = dataset.schema().numeric_position(field_a)?;
    let b = dataset.schema().numeric_position(field_b)?;

    let (xs, ys): (Vec<f64>, Vec<f64>) = dataset
        .records()
        .iter()
        .filter_map(|r| Some((r.get(a).as_f64()?, r.get(b).as_f64()?)))
        .unzip();

    pearson(&xs, &ys, field_a, field_b)
}

/// Pearson correlation coefficient of paired samples, clamped to [-1, 1].
fn pearson(x: &[f64], y: &[f64], name_x: &str, name_y: &str) -> Result<f64> {
    if x.len() < 2 {
        return Err(Error::insufficient(2, x.len()));
    }

    // A constant column has no variance even when rounding in the mean
    // leaves tiny nonzero deviations.
    if is_constant(x) {
        return Err(Error::ZeroVariance(name_x.to_string()));
    }
    if is_constant(y) {
        return Err(Error::ZeroVariance(name_y.to_string()));
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    Ok((numerator / (sum_sq_x * sum_sq_y).sqrt()).clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

// ---------------------------------------------------------------------------
// CorrelationStrength – bucketing of |r|
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationStrength {
    Negligible,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl CorrelationStrength {
    /// |r| < 0.1 negligible, < 0.3 weak, < 0.5 moderate, < 0.7 strong.
    pub fn classify(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude < 0.1 {
            CorrelationStrength::Negligible
        } else if magnitude < 0.3 {
            CorrelationStrength::Weak
        } else if magnitude < 0.5 {
            CorrelationStrength::Moderate
        } else if magnitude < 0.7 {
            CorrelationStrength::Strong
        } else {
            CorrelationStrength::VeryStrong
        }
    }

    /// e.g. "strong positive", "weak negative", "negligible".
    pub fn describe(r: f64) -> String {
        let strength = Self::classify(r);
        if strength == CorrelationStrength::Negligible {
            return strength.to_string();
        }
        let direction = if r > 0.0 { "positive" } else { "negative" };
        format!("{strength} {direction}")
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CorrelationStrength::Negligible => "negligible",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::VeryStrong => "very strong",
        };
        write!(f, "{text}")
    }
}

// ---------------------------------------------------------------------------
// CorrelationMatrix
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlations (Pandas `df[cols].corr()`).
///
/// Each pair uses the rows where both fields are present. Entries are
/// `None` where the correlation is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, field_a: &str, field_b: &str) -> Option<f64> {
        let i = self.fields.iter().position(|f| f == field_a)?;
        let j = self.fields.iter().position(|f| f == field_b)?;
        self.values[i][j]
    }
}

pub fn correlation_matrix(dataset: &Dataset, fields: &[&str]) -> Result<CorrelationMatrix> {
    let n = fields.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let r = match correlate(dataset, fields[i], fields[j]) {
                Ok(r) => Some(r),
                Err(Error::ZeroVariance(_)) | Err(Error::InsufficientData { .. }) => None,
                Err(e) => return Err(e),
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        fields: fields.iter().map(|f| f.to_string()).collect(),
        values,
    })
}
