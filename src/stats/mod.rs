//! Descriptive statistics over a cleaned [`Dataset`](crate::Dataset).
//!
//! Every function here is a pure function of an immutable snapshot: calling
//! one twice yields identical results, and snapshots can be shared across
//! threads for concurrent reads. Callers wanting memoisation keep their own
//! cache keyed by field name.

pub mod breakdown;
pub mod correlation;
pub mod histogram;
pub mod quantile;
pub mod summary;

pub use breakdown::{breakdown, CategoryBreakdown, CategoryCount};
pub use correlation::{correlate, correlation_matrix, CorrelationMatrix, CorrelationStrength};
pub use histogram::{histogram, Histogram};
pub use summary::{describe, summarize, DistributionShape, SummaryStatistics};
