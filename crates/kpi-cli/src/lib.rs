//! KPI hierarchy command line front end
//!
//! File loading, the JSON raw value adapter and subscriber setup behind the
//! `kpi-calc` binary.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod adapter;
pub mod commands;
pub mod telemetry;

pub use adapter::{parse_raw_values, JsonRawValueAdapter, RawValueEntry};
pub use commands::{CalculateOptions, LoadedValues};
