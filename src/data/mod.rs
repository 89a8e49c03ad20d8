/// Data layer: typed tables, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  EV_Makers / EV_States / EV_Infrastructure .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → Datasets
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / quarter / category selection → borrowed rows
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  per-view metrics and grouped tables (via `group`)
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod group;
pub mod loader;
pub mod model;
