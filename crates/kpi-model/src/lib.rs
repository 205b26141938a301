//! KPI Hierarchy Model
//!
//! Data types shared by every stage of a KPI calculation run.
//!
//! # Core Concepts
//!
//! - [`KpiHierarchy`]: Immutable, user-authored definition of how a score is computed
//! - [`RawValueKpi`]: One observed measurement in `[0, 100]`, produced by a tool adapter
//! - [`RuntimeHierarchy`]: Arena tree produced by binding raw values onto a definition
//! - [`KpiCalculationResult`]: Typed per-node outcome (success, incomplete, error, empty)
//! - [`ResultHierarchy`]: Serializable snapshot of an evaluated runtime hierarchy
//! - [`KpiAdapter`]: Contract tool-specific adapters implement to feed raw values
//!
//! # Example
//!
//! ```rust,ignore
//! use kpi_model::{KpiHierarchy, RawValueKpi};
//!
//! let hierarchy = KpiHierarchy::from_json(&definition_json)?;
//! let value = RawValueKpi::new("SECRETS", 100, "finding-1")?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod adapter;
mod error;
mod hierarchy;
mod kpi_type;
mod raw_value;
mod result;
mod result_tree;
mod runtime;
mod strategy;

// Re-exports
pub use adapter::{partition_outcomes, AdapterOutcome, KpiAdapter, ValidationFailure};
pub use error::ModelError;
pub use hierarchy::{KpiEdge, KpiHierarchy, KpiNode, Threshold, DEFAULT_SCHEMA_VERSION};
pub use kpi_type::KpiType;
pub use raw_value::{RawValueKpi, MAX_SCORE, MIN_SCORE};
pub use result::KpiCalculationResult;
pub use result_tree::{ResultEdge, ResultHierarchy, ResultNode};
pub use runtime::{NodeId, NodeIndex, RuntimeEdge, RuntimeHierarchy, RuntimeNode};
pub use strategy::KpiStrategy;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
