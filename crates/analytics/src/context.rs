use crate::charts::compute_chart_data;
use crate::filter::apply_filters;
use crate::metrics::compute_metrics;
use configuration::{ClientConfig, DashboardConfig};
use core_types::{ChartResult, FilterSet, MetricResult, Table};

/// Everything a request needs to compute results: the validated config and the
/// loaded table.
///
/// Built once at start-up and never mutated afterwards, so it can be shared
/// across concurrent requests behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    config: DashboardConfig,
    table: Table,
}

impl DashboardContext {
    pub fn new(config: DashboardConfig, table: Table) -> Self {
        Self { config, table }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    fn date_column(&self) -> Option<&str> {
        self.config.date_column.as_deref()
    }

    /// The config as sent to the browser.
    pub fn client_config(&self) -> ClientConfig<'_> {
        self.config.client_config()
    }

    /// Every configured metric, in config order.
    pub fn metrics(&self, filters: &FilterSet) -> Vec<MetricResult> {
        compute_metrics(&self.table, &self.config.metrics, filters, self.date_column())
    }

    /// The series for the chart with `id`, or `None` if no such chart is configured.
    pub fn chart(&self, id: &str, filters: &FilterSet) -> Option<ChartResult> {
        let chart = self.config.chart(id)?;
        Some(compute_chart_data(&self.table, chart, filters, self.date_column()))
    }

    /// The first `limit` filtered rows, newest first when the table has the
    /// configured date column.
    pub fn recent_rows(&self, filters: &FilterSet, limit: usize) -> Table {
        let filtered = apply_filters(&self.table, self.date_column(), filters);
        let ordered = match self.date_column() {
            Some(column) if filtered.has_column(column) => filtered.sorted_descending_by(column),
            _ => filtered,
        };
        ordered.head(limit)
    }
}
