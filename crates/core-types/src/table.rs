use crate::error::CoreError;
use crate::value::Value;
use serde_json::{Map, Value as JsonValue};

/// One row of a `Table`: a cell per column, in column order.
pub type Row = Vec<Value>;

/// An immutable, row-ordered, in-memory dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Builds a table, checking that every row has one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, CoreError> {
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(CoreError::InvalidInput(
                format!("row {index}"),
                format!("expected {} cells, found {}", columns.len(), row.len()),
            ));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterates the cells of one column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    /// Returns a new table holding the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[Value]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }

    /// Returns a new table stably sorted by `column`, newest/largest first, with
    /// empty cells last. A missing column or a column whose cells are not mutually
    /// comparable leaves the order unchanged.
    pub fn sorted_descending_by(&self, column: &str) -> Table {
        let Some(index) = self.column_index(column) else {
            return self.clone();
        };

        let mut present = self.rows.iter().map(|row| &row[index]).filter(|v| !v.is_null());
        if let Some(first) = present.next() {
            if present.any(|v| first.natural_cmp(v).is_none()) {
                return self.clone();
            }
        }

        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| match (a[index].is_null(), b[index].is_null()) {
            (false, false) => b[index]
                .natural_cmp(&a[index])
                .unwrap_or(std::cmp::Ordering::Equal),
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (true, true) => std::cmp::Ordering::Equal,
        });

        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Returns a new table with at most the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Renders every row as a JSON object keyed by column name.
    pub fn to_records(&self) -> Vec<Map<String, JsonValue>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect()
            })
            .collect()
    }
}
