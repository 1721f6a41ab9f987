/// Data layer: core types, loading, and reshaping.
///
/// Architecture:
/// ```text
///  timing series / pair CSV / commit log / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Series
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  SeriesSheet  │  Vec<Series>, name index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ transform │  head / drop freezes / cumsum / merge → chart-ready rows
///   └──────────┘
/// ```
pub mod loader;
pub mod model;
pub mod transform;
