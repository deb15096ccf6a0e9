//! The exploration bundle: everything the survey dashboard showed, as
//! plain data, plus a text rendering for the terminal.

use std::fmt::Write;

use log::warn;
use serde::Serialize;

use crate::data::model::Dataset;
use crate::data::schema::{FieldKind, KEY_NUMERIC_FIELDS};
use crate::error::{Error, Result};
use crate::pipeline::{clean_with_report, profile, CleanConfig, CleanReport, DatasetProfile};
use crate::stats::{
    breakdown, correlation_matrix, histogram, summarize, CategoryBreakdown, CorrelationMatrix,
    CorrelationStrength, DistributionShape, Histogram, SummaryStatistics,
};

/// Summary, shape and histogram of one numeric field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub summary: SummaryStatistics,
    pub shape: Option<DistributionShape>,
    pub fences: (f64, f64),
    pub histogram: Histogram,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Profile of the data as loaded.
    pub raw: DatasetProfile,
    pub cleaning: CleanReport,
    pub fields: Vec<FieldReport>,
    pub breakdowns: Vec<CategoryBreakdown>,
    pub correlations: CorrelationMatrix,
}

/// Numeric fields to explore when none are named: the four headline
/// survey fields if present, otherwise every numeric field.
pub fn default_fields(dataset: &Dataset) -> Vec<String> {
    let schema = dataset.schema();
    if KEY_NUMERIC_FIELDS
        .iter()
        .all(|f| schema.numeric_position(f).is_ok())
    {
        KEY_NUMERIC_FIELDS.iter().map(|f| f.to_string()).collect()
    } else {
        schema.numeric_fields().map(str::to_string).collect()
    }
}

impl Report {
    /// Profile `raw`, clean it, and compute the statistics for `fields`.
    ///
    /// A field with no values after cleaning is skipped with a warning
    /// rather than failing the whole report.
    pub fn build(raw: &Dataset, config: &CleanConfig, fields: &[String], bins: usize) -> Result<Self> {
        let raw_profile = profile(raw);
        let (dataset, cleaning) = clean_with_report(raw, config)?;

        let mut field_reports = Vec::with_capacity(fields.len());
        for name in fields {
            let summary = match summarize(&dataset, name) {
                Ok(s) => s,
                Err(Error::InsufficientData { .. }) => {
                    warn!("skipping '{name}': no values after cleaning");
                    continue;
                }
                Err(e) => return Err(e),
            };
            field_reports.push(FieldReport {
                shape: summary.shape(),
                fences: summary.fences(),
                histogram: histogram(&dataset, name, bins)?,
                summary,
            });
        }

        let breakdowns = dataset
            .schema()
            .fields()
            .iter()
            .filter(|f| f.kind == FieldKind::Categorical)
            .map(|f| breakdown(&dataset, &f.name))
            .collect::<Result<Vec<_>>>()?;

        let names: Vec<&str> = fields.iter().map(String::as_str).collect();
        let correlations = correlation_matrix(&dataset, &names)?;

        Ok(Report {
            raw: raw_profile,
            cleaning,
            fields: field_reports,
            breakdowns,
            correlations,
        })
    }

    /// Plain-text rendering for the terminal.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "== Dataset ==")?;
        writeln!(out, "{} rows, {} columns", self.raw.rows, self.raw.columns.len())?;
        for col in &self.raw.columns {
            writeln!(
                out,
                "  {:<36} {:<9} {:>8} non-null {:>6} missing",
                col.name, col.dtype, col.non_null, col.nulls
            )?;
        }
        writeln!(out, "duplicate rows: {}", self.raw.duplicate_rows)?;
        let with_nulls: Vec<&str> = self
            .raw
            .columns_with_nulls()
            .map(|c| c.name.as_str())
            .collect();
        if !with_nulls.is_empty() {
            writeln!(out, "columns with missing values: {}", with_nulls.join(", "))?;
        }

        let c = &self.cleaning;
        writeln!(out, "\n== Cleaning ==")?;
        writeln!(out, "rows in:                 {}", c.rows_in)?;
        writeln!(out, "dropped (missing):       {}", c.rows_dropped_missing)?;
        for cap in &c.caps {
            writeln!(
                out,
                "capped '{}' at {:.2}: {} values",
                cap.field, cap.threshold, cap.values_capped
            )?;
        }
        writeln!(out, "duplicates removed:      {}", c.duplicates_removed)?;
        writeln!(out, "rows out:                {}", c.rows_out)?;

        for f in &self.fields {
            let s = &f.summary;
            writeln!(out, "\n== {} ==", s.field)?;
            writeln!(
                out,
                "mean {:.2}  median {:.2}  std {}  min {:.2}  max {:.2}",
                s.mean,
                s.median,
                s.std_dev.map_or("n/a".to_string(), |v| format!("{v:.2}")),
                s.min,
                s.max
            )?;
            writeln!(
                out,
                "Q1 {:.2}  Q2 {:.2}  Q3 {:.2}  IQR {:.2}",
                s.q1, s.q2, s.q3, s.iqr
            )?;
            if let (Some(skew), Some(shape)) = (s.skewness, f.shape) {
                writeln!(out, "skewness {skew:.2} ({shape})")?;
            }
            writeln!(
                out,
                "fences [{:.2}, {:.2}], {} outliers",
                f.fences.0, f.fences.1, s.outliers
            )?;
            write_histogram(out, &f.histogram)?;
        }

        for b in &self.breakdowns {
            writeln!(out, "\n== {} ==", b.field)?;
            for cat in &b.categories {
                writeln!(out, "  {:<28} {:>8} {:>6.2}%", cat.label, cat.count, cat.percentage)?;
            }
        }

        let m = &self.correlations;
        writeln!(out, "\n== Correlation ==")?;
        for (i, a) in m.fields.iter().enumerate() {
            for (j, b) in m.fields.iter().enumerate().skip(i + 1) {
                match m.values[i][j] {
                    Some(r) => writeln!(
                        out,
                        "  {a} / {b}: {r:.2} ({})",
                        CorrelationStrength::describe(r)
                    )?,
                    None => writeln!(out, "  {a} / {b}: undefined")?,
                }
            }
        }
        Ok(())
    }
}

fn write_histogram(out: &mut String, h: &Histogram) -> std::fmt::Result {
    const WIDTH: usize = 40;
    let peak = h.counts.iter().copied().max().unwrap_or(0).max(1);
    writeln!(out, "histogram ({} values, {} bins)", h.total(), h.counts.len())?;
    for (i, &count) in h.counts.iter().enumerate() {
        let bar = "#".repeat(count * WIDTH / peak);
        writeln!(
            out,
            "  [{:>10.2}, {:>10.2}) {:>7} {bar}",
            h.edges[i],
            h.edges[i + 1],
            count
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_reader;

    #[test]
    fn builds_and_renders_for_inferred_schema() {
        let data = "grp,x,y\na,1,2\nb,2,4\na,3,7\na,3,7\n";
        let raw = load_csv_reader(data.as_bytes(), None).unwrap();
        let fields = default_fields(&raw);
        assert_eq!(fields, vec!["x".to_string(), "y".to_string()]);

        let report = Report::build(&raw, &CleanConfig::default(), &fields, 5).unwrap();
        assert_eq!(report.cleaning.duplicates_removed, 1);
        assert_eq!(report.fields.len(), 2);
        assert_eq!(report.breakdowns.len(), 1);
        assert!(report.correlations.get("x", "y").unwrap() > 0.9);

        let text = report.render_text();
        assert!(text.contains("== x =="));
        assert!(text.contains("duplicates removed:      1"));
        assert!(text.contains("x / y:"));
    }

    #[test]
    fn text_lists_missing_columns_and_histogram_totals() {
        let data = "grp,x,y\na,1,2\nb,2,\na,3,7\n";
        let raw = load_csv_reader(data.as_bytes(), None).unwrap();
        let fields = default_fields(&raw);
        let report = Report::build(&raw, &CleanConfig::default(), &fields, 3).unwrap();

        let text = report.render_text();
        assert!(text.contains("columns with missing values: y"));
        assert!(text.contains("histogram (3 values, 3 bins)"));
        assert!(text.contains("histogram (2 values, 3 bins)"));
    }
}
