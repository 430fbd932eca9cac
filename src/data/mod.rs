/// Data layer: core types, loading, statistics and analysis.
///
/// Architecture:
/// ```text
///  .csv / .tsv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → StudentTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ StudentTable  │  Vec<StudentRecord>, subject columns fixed at load
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ analysis  │  clean / averages / percentiles / top N / grades
///   └──────────┘        (numeric kernels live in `stats`)
/// ```

pub mod analysis;
pub mod loader;
pub mod model;
pub mod stats;
