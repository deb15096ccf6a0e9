/// Data layer: typed schema, row model, and loading.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, validate header against Schema → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Arc<Schema> + Vec<Record>, immutable snapshot
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod schema;
