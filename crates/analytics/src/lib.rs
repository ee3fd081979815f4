//! # Dashboard Analytics Engine
//!
//! This crate turns the loaded table and the declarative metric/chart definitions
//! into the numbers and display strings the dashboard shows.
//!
//! ## Architectural Principles
//!
//! - **Pure Calculation:** Nothing here performs I/O or mutates the source table.
//!   Given the same table, definition and filter set, every function returns the
//!   same result.
//! - **Fail Soft:** Missing columns, unknown aggregations and unusable format
//!   specs degrade to NaN, empty series or plain text instead of errors, so one
//!   misconfigured card cannot take the dashboard down.
//!
//! ## Public API
//!
//! - `apply_filters`: the date-range Filter Applier.
//! - `compute_metrics` / `AggregationOutcome`: the Metric Evaluator.
//! - `compute_chart_data`: the Chart Data Builder.
//! - `format_value` / `FormatKind`: the Formatter.
//! - `DashboardContext`: the immutable start-up context the HTTP layer calls into.

pub mod charts;
pub mod context;
pub mod filter;
pub mod format;
pub mod metrics;

pub use charts::compute_chart_data;
pub use context::DashboardContext;
pub use filter::apply_filters;
pub use format::{FormatKind, format_value};
pub use metrics::{AggregationOutcome, compute_metrics, evaluate_metric};
