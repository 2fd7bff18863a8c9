/// Data layer: schema, the normalization pipeline, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  tokenized rows → RawRow
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  RawRow × Schema → typed Entry
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  dedupe   │  one canonical Entry per identity key
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  facet    │  observed domains → initial ActiveFilters
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ filter / page │  exclusion predicate → visible page
///   └──────────────┘
/// ```

pub mod dedupe;
pub mod facet;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod page;
pub mod schema;
