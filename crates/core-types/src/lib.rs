//! # Dashboard Core Types
//!
//! The shared vocabulary of the dashboard workspace: the in-memory `Table` and its
//! typed `Value` cells, the request-scoped `FilterSet`, the metric and chart
//! definitions read from the YAML config, and the result DTOs returned to clients.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** This crate has no knowledge of files, HTTP or configuration
//!   sources. Every other crate depends on it; it depends on none of them.
//! - **Immutable Data:** A `Table` is never mutated once built. Operations that
//!   narrow or reorder it return a new `Table`.

pub mod dates;
pub mod definitions;
pub mod error;
pub mod filters;
pub mod results;
pub mod table;
pub mod value;

// Re-export the core types to provide a clean public API.
pub use definitions::{Aggregation, ChartAggregation, ChartDefinition, MetricDefinition};
pub use error::CoreError;
pub use filters::FilterSet;
pub use results::{ChartPoint, ChartResult, MetricResult};
pub use table::{Row, Table};
pub use value::{Value, ValueKey};
