use crate::filter::apply_filters;
use core_types::{
    ChartAggregation, ChartDefinition, ChartPoint, ChartResult, FilterSet, Table, Value, ValueKey,
};
use std::cmp::Ordering;
use std::collections::HashMap;

/// The running aggregate of the `y` values sharing one `x` value.
struct Group<'a> {
    key: &'a Value,
    sum: f64,
    count: usize,
}

impl Group<'_> {
    fn result(&self, aggregation: ChartAggregation) -> f64 {
        match aggregation {
            ChartAggregation::Sum => self.sum,
            ChartAggregation::Mean if self.count == 0 => f64::NAN,
            ChartAggregation::Mean => self.sum / self.count as f64,
        }
    }
}

/// Builds the series for one chart over the filtered table.
///
/// A chart whose `x` or `y` column is missing yields no points rather than an
/// error, so a renamed column only blanks that chart.
pub fn compute_chart_data(
    table: &Table,
    chart: &ChartDefinition,
    filters: &FilterSet,
    date_column: Option<&str>,
) -> ChartResult {
    let filtered = apply_filters(table, date_column, filters);

    let points = match (filtered.column_index(&chart.x), filtered.column_index(&chart.y)) {
        (Some(x), Some(y)) => build_points(&filtered, x, y, chart.aggregation()),
        _ => {
            tracing::debug!(chart = %chart.id, x = %chart.x, y = %chart.y, "Chart references a missing column.");
            Vec::new()
        }
    };

    ChartResult {
        id: chart.id.clone(),
        label: chart.display_label().to_string(),
        chart_type: chart.kind().to_string(),
        points,
    }
}

fn build_points(table: &Table, x: usize, y: usize, aggregation: ChartAggregation) -> Vec<ChartPoint> {
    let mut slots: HashMap<ValueKey, usize> = HashMap::new();
    let mut groups: Vec<Group<'_>> = Vec::new();

    for row in table.rows() {
        // Rows without an x value belong to no group.
        let Some(key) = row[x].key() else {
            continue;
        };
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push(Group {
                key: &row[x],
                sum: 0.0,
                count: 0,
            });
            groups.len() - 1
        });
        if let Some(v) = row[y].as_f64() {
            groups[slot].sum += v;
            groups[slot].count += 1;
        }
    }

    if mutually_comparable(groups.iter().map(|g| g.key)) {
        groups.sort_by(|a, b| a.key.natural_cmp(b.key).unwrap_or(Ordering::Equal));
    }

    groups
        .iter()
        .map(|group| ChartPoint {
            x: group.key.to_string(),
            y: group.result(aggregation),
        })
        .collect()
}

/// True when every key can be ordered against every other, i.e. they are all
/// numbers, all text, or all dates. Otherwise groups keep first-seen order.
fn mutually_comparable<'a>(mut keys: impl Iterator<Item = &'a Value>) -> bool {
    match keys.next() {
        Some(first) => keys.all(|key| first.natural_cmp(key).is_some()),
        None => true,
    }
}
