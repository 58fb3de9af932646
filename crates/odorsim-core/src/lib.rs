//! # odorsim-core
//!
//! Core types, configuration records and errors shared by the odorsim crates.
//!
//! ```text
//! ┌─────────────────┐
//! │  odorsim-core   │  ← errors, config, data model
//! └─────────────────┘
//!         ▲
//!         │
//! ┌───────┴─────────┐
//! │  odorsim-dist   │  ← distance engine
//! └─────────────────┘
//!         ▲
//!         │
//! ┌───────┴─────────┐
//! │ odorsim-report  │  ← comparison figures + CLI
//! └─────────────────┘
//! ```

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::{
    default_scatter_keys, title_case, Aggregation, ChemDistanceConfig, ColumnScaling, Metric, NeuralDistanceConfig,
    OdorSetGrouping, RunConfig, TrialFold, OVERLAY_EXTENT,
};
pub use errors::{OdorsimError, Result};
pub use types::{
    validate_observations, KeyedMatrices, KeyedPseudopopulations, KeyedVectors, Pseudopopulation,
};
