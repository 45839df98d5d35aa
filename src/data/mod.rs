/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + quarantine rows → ContractDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ ContractDataset  │  Vec<ContractRecord>, column indexes
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌────────────┐
///   │  filter   │ ──▶ │ aggregate  │  filtered indices → AggregateView
///   └──────────┘     └────────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
