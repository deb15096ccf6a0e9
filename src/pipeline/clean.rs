use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use super::config::CleanConfig;
use crate::data::model::{Dataset, Record, Value};
use crate::data::schema::{FieldDef, FieldKind, Schema};
use crate::error::{Error, Result};
use crate::stats::quantile::quantile;

// ---------------------------------------------------------------------------
// CleanReport – what each step did
// ---------------------------------------------------------------------------

/// Upper cap applied to one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapReport {
    pub field: String,
    pub threshold: f64,
    pub values_capped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_dropped_missing: usize,
    pub caps: Vec<CapReport>,
    pub duplicates_removed: usize,
    pub rows_out: usize,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Clean `raw` according to `config`, returning a new snapshot.
///
/// Steps, in order:
/// 1. drop rows with a null in any required field;
/// 2. cap each field at its `cap_percentile` quantile, computed on the
///    rows surviving step 1 (before deduplication);
/// 3. coerce categorical fields to categories and integer fields to
///    integers, truncating toward zero;
/// 4. drop exact duplicate rows, keeping the first occurrence.
///
/// A field that is both capped and integer is bounded by its threshold
/// only for non-negative values: truncating a negative fraction toward
/// zero can lift it above a fractional threshold (-2.4 under a cap of
/// -2.5 becomes -2).
pub fn clean(raw: &Dataset, config: &CleanConfig) -> Result<Dataset> {
    clean_with_report(raw, config).map(|(dataset, _)| dataset)
}

/// [`clean`], plus per-step counts.
pub fn clean_with_report(raw: &Dataset, config: &CleanConfig) -> Result<(Dataset, CleanReport)> {
    let schema = raw.schema();
    config.validate(schema)?;
    if raw.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let mut rows = drop_missing(raw, &config.required_fields)?;
    let rows_dropped_missing = raw.len() - rows.len();
    debug!("dropped {rows_dropped_missing} rows with missing required values");
    if rows.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let mut caps = Vec::with_capacity(config.fields_to_cap.len());
    for name in &config.fields_to_cap {
        let pos = schema.numeric_position(name)?;
        if let Some(cap) = cap_upper(&mut rows, pos, name, config.cap_percentile)? {
            debug!(
                "capped {} values of '{name}' at {}",
                cap.values_capped, cap.threshold
            );
            caps.push(cap);
        }
    }

    for name in &config.integer_fields {
        truncate_to_integer(&mut rows, schema.numeric_position(name)?);
    }
    for name in &config.categorical_fields {
        to_category(&mut rows, schema.position(name)?);
    }

    let before_dedup = rows.len();
    let rows = drop_duplicates(rows);
    let duplicates_removed = before_dedup - rows.len();
    debug!("removed {duplicates_removed} duplicate rows");

    let report = CleanReport {
        rows_in: raw.len(),
        rows_dropped_missing,
        caps,
        duplicates_removed,
        rows_out: rows.len(),
    };
    let schema = coerced_schema(raw, &config.categorical_fields);
    Ok((Dataset::new(schema, rows), report))
}

fn drop_missing<'a, I>(raw: &Dataset, required: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = &'a String>,
{
    let positions = required
        .into_iter()
        .map(|name| raw.schema().position(name))
        .collect::<Result<Vec<_>>>()?;

    Ok(raw
        .records()
        .iter()
        .filter(|r| positions.iter().all(|&p| !r.get(p).is_null()))
        .cloned()
        .collect())
}

/// Clamp values above the `percentile` quantile to it. The column becomes
/// float, as a `np.where` over an integer column does. Returns `None` when
/// the field has no values at all.
fn cap_upper(
    rows: &mut [Record],
    pos: usize,
    name: &str,
    percentile: f64,
) -> Result<Option<CapReport>> {
    let values: Vec<f64> = rows.iter().filter_map(|r| r.get(pos).as_f64()).collect();
    if values.is_empty() {
        debug!("'{name}' has no values to cap");
        return Ok(None);
    }
    let threshold = quantile(&values, percentile)?;

    let mut values_capped = 0;
    for row in rows.iter_mut() {
        let Some(slot) = row.values.get_mut(pos) else {
            continue;
        };
        if let Some(v) = slot.as_f64() {
            *slot = if v > threshold {
                values_capped += 1;
                Value::Float(threshold)
            } else {
                Value::Float(v)
            };
        }
    }

    Ok(Some(CapReport {
        field: name.to_string(),
        threshold,
        values_capped,
    }))
}

/// `astype(int)`: fractional parts are discarded, not rounded. Nulls stay
/// null.
fn truncate_to_integer(rows: &mut [Record], pos: usize) {
    for row in rows.iter_mut() {
        if let Some(slot) = row.values.get_mut(pos) {
            if let Value::Float(f) = *slot {
                *slot = Value::Integer(f.trunc() as i64);
            }
        }
    }
}

fn to_category(rows: &mut [Record], pos: usize) {
    let mut interned: HashMap<String, Arc<str>> = HashMap::new();
    for row in rows.iter_mut() {
        let Some(slot) = row.values.get_mut(pos) else {
            continue;
        };
        if matches!(slot, Value::Category(_)) {
            continue;
        }
        if let Some(label) = slot.label() {
            let tag = interned
                .entry(label)
                .or_insert_with_key(|l| Arc::from(l.as_str()))
                .clone();
            *slot = Value::Category(tag);
        }
    }
}

fn drop_duplicates(rows: Vec<Record>) -> Vec<Record> {
    let keep: Vec<bool> = {
        let mut seen: HashSet<&Record> = HashSet::with_capacity(rows.len());
        rows.iter().map(|r| seen.insert(r)).collect()
    };
    rows.into_iter()
        .zip(keep)
        .filter_map(|(r, k)| k.then_some(r))
        .collect()
}

/// Fields coerced to categories are categorical from now on, whatever
/// they were declared as.
fn coerced_schema<'a, I>(raw: &Dataset, categorical: I) -> Arc<Schema>
where
    I: IntoIterator<Item = &'a String>,
{
    let categorical: HashSet<&str> = categorical.into_iter().map(String::as_str).collect();
    let schema = raw.schema();
    let changed = schema
        .fields()
        .iter()
        .any(|f| f.kind == FieldKind::Numeric && categorical.contains(f.name.as_str()));
    if !changed {
        return raw.shared_schema();
    }
    let fields = schema
        .fields()
        .iter()
        .map(|f| {
            if categorical.contains(f.name.as_str()) {
                FieldDef::categorical(&f.name)
            } else {
                f.clone()
            }
        })
        .collect();
    Arc::new(Schema::new(fields))
}
