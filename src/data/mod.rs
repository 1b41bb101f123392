/// Data layer: table model, loading, and series selection.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named numeric columns, equal length
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  candidate names (or all but the index) → ordered series
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod select;
