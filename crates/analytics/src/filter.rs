use core_types::{FilterSet, Table};

/// Narrows `table` to the rows whose `date_column` falls within `filters`.
///
/// Without a date column, with a date column the table does not have, or with
/// no bounds set, the result has the same rows in the same order as the input.
/// Rows whose date cell is empty never satisfy a bound.
pub fn apply_filters(table: &Table, date_column: Option<&str>, filters: &FilterSet) -> Table {
    let Some(index) = date_column.and_then(|column| table.column_index(column)) else {
        return table.clone();
    };
    if !filters.has_bounds() {
        return table.clone();
    }

    table.filter_rows(|row| row[index].as_date().is_some_and(|date| filters.contains(date)))
}
