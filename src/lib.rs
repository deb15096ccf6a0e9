//! Cleaning and descriptive statistics for tabular survey data.
//!
//! Load a dataset once, clean it into an immutable snapshot, then ask it
//! for summaries:
//!
//! ```no_run
//! use std::path::Path;
//! use survey_stats::{breakdown, clean, correlate, load_file, summarize, CleanConfig, Schema};
//!
//! # fn main() -> survey_stats::Result<()> {
//! let raw = load_file(Path::new("Invistico_Airline.csv"), Some(&Schema::airline()))?;
//! let data = clean(&raw, &CleanConfig::airline())?;
//!
//! let age = summarize(&data, "Age")?;
//! println!("mean age {:.1}, IQR {:.1}", age.mean, age.iqr);
//!
//! let classes = breakdown(&data, "Class")?;
//! let r = correlate(&data, "Departure Delay in Minutes", "Arrival Delay in Minutes")?;
//! # let _ = (classes, r);
//! # Ok(())
//! # }
//! ```
//!
//! The library renders nothing and installs no logger; diagnostics go
//! through the `log` facade.

pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use data::loader::{load_csv_reader, load_file};
pub use data::model::{Dataset, Record, Value};
pub use data::schema::{FieldDef, FieldKind, Schema};
pub use error::{Error, Result};
pub use pipeline::{clean, clean_with_report, profile, CleanConfig, CleanReport, DatasetProfile};
pub use report::Report;
pub use stats::{
    breakdown, correlate, correlation_matrix, describe, histogram, summarize, CategoryBreakdown,
    CorrelationMatrix, CorrelationStrength, DistributionShape, Histogram, SummaryStatistics,
};
