/// Data layer: core types, loading, filtering, sorting and statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → BookTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  topic / min rating / min count → reduced BookTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   sort    │  SortKey, descending, stable → new BookTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ describe  │  numeric columns → Summary   (optional)
///   └──────────┘
/// ```

pub mod describe;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sort;
