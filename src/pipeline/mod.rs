//! Cleaning pipeline: configuration, the fixed cleaning sequence, and
//! the pre-cleaning profile.

pub mod clean;
pub mod config;
pub mod profile;

pub use clean::{clean, clean_with_report, CapReport, CleanReport};
pub use config::CleanConfig;
pub use profile::{profile, ColumnProfile, DatasetProfile};
