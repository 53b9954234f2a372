//! Data layer: records, loading, filtering, export and summary statistics.
//!
//! Architecture:
//! ```text
//!   delivery_data.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file once → Arc<DeliveryDataset>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────────┐
//!   │ DeliveryDataset │  Vec<DeliveryRecord>, facet index
//!   └────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterCriteria → filtered indices
//!   └──────────┘
//!        │
//!        ├──► export  (filtered view → CSV)
//!        └──► stats   (box summaries for charts)
//! ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
