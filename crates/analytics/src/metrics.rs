use crate::filter::apply_filters;
use crate::format::format_value;
use core_types::{Aggregation, FilterSet, MetricDefinition, MetricResult, Table, Value};
use std::collections::HashSet;

/// The result of evaluating one aggregation.
///
/// Only `Value` carries a number; every other outcome is reported to clients as
/// NaN so a partially misconfigured dashboard keeps rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregationOutcome {
    Value(f64),
    /// A referenced column (or the reference itself) is missing.
    MissingColumn,
    /// `sum`, `mean` or `ratio` over a column holding text or dates.
    NonNumericColumn,
    UnknownAggregation,
}

impl AggregationOutcome {
    pub fn value(self) -> f64 {
        match self {
            AggregationOutcome::Value(v) => v,
            _ => f64::NAN,
        }
    }
}

/// Computes every metric over the filtered table, in definition order.
pub fn compute_metrics(
    table: &Table,
    metrics: &[MetricDefinition],
    filters: &FilterSet,
    date_column: Option<&str>,
) -> Vec<MetricResult> {
    let filtered = apply_filters(table, date_column, filters);

    metrics
        .iter()
        .map(|metric| {
            let outcome = evaluate_metric(&filtered, metric);
            if !matches!(outcome, AggregationOutcome::Value(_)) {
                tracing::debug!(metric = %metric.id, ?outcome, "Metric evaluated to NaN.");
            }
            let value = outcome.value();
            MetricResult {
                id: metric.id.clone(),
                label: metric.display_label().to_string(),
                value,
                formatted: format_value(Some(value), metric.format.as_deref()),
            }
        })
        .collect()
}

/// Evaluates a single metric over an already filtered table.
pub fn evaluate_metric(table: &Table, metric: &MetricDefinition) -> AggregationOutcome {
    if metric.aggregation == Aggregation::Ratio {
        return evaluate_ratio(table, metric);
    }

    let Some(cells) = metric.column.as_deref().and_then(|column| table.column(column)) else {
        return AggregationOutcome::MissingColumn;
    };

    match &metric.aggregation {
        Aggregation::Sum => sum(cells),
        Aggregation::Mean => mean(cells),
        Aggregation::Count => {
            AggregationOutcome::Value(cells.filter(|v| !v.is_null()).count() as f64)
        }
        Aggregation::NUnique => {
            let distinct: HashSet<_> = cells.filter_map(Value::key).collect();
            AggregationOutcome::Value(distinct.len() as f64)
        }
        Aggregation::Ratio | Aggregation::Unknown(_) => AggregationOutcome::UnknownAggregation,
    }
}

/// `sum(numerator) / sum(denominator)`.
///
/// An all-zero denominator is replaced by 1, so the metric shows the numerator
/// sum instead of failing.
// TODO: revisit the zero-denominator fallback once dashboards can show an explicit "no data" state.
fn evaluate_ratio(table: &Table, metric: &MetricDefinition) -> AggregationOutcome {
    let column_sum = |name: Option<&str>| match name.and_then(|n| table.column(n)) {
        Some(cells) => sum(cells),
        None => AggregationOutcome::MissingColumn,
    };

    let numerator = match column_sum(metric.numerator.as_deref()) {
        AggregationOutcome::Value(v) => v,
        other => return other,
    };
    let denominator = match column_sum(metric.denominator.as_deref()) {
        AggregationOutcome::Value(v) if v == 0.0 => 1.0,
        AggregationOutcome::Value(v) => v,
        other => return other,
    };

    AggregationOutcome::Value(numerator / denominator)
}

/// Collects the numeric cells of a column, skipping empty ones. Any other kind
/// of cell makes the column non-numeric.
fn numeric_cells<'a>(cells: impl Iterator<Item = &'a Value>) -> Option<Vec<f64>> {
    cells
        .filter(|v| !v.is_null())
        .map(Value::as_f64)
        .collect()
}

fn sum<'a>(cells: impl Iterator<Item = &'a Value>) -> AggregationOutcome {
    match numeric_cells(cells) {
        Some(values) => AggregationOutcome::Value(values.iter().sum()),
        None => AggregationOutcome::NonNumericColumn,
    }
}

fn mean<'a>(cells: impl Iterator<Item = &'a Value>) -> AggregationOutcome {
    match numeric_cells(cells) {
        Some(values) if values.is_empty() => AggregationOutcome::Value(f64::NAN),
        Some(values) => AggregationOutcome::Value(values.iter().sum::<f64>() / values.len() as f64),
        None => AggregationOutcome::NonNumericColumn,
    }
}
