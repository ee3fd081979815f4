use crate::error::DataError;
use core_types::dates::parse_datetime;
use core_types::{Row, Table, Value};
use std::io::Read;
use std::path::Path;

/// Cell contents that mean "no value".
const NULL_TOKENS: [&str; 11] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// The type shared by every non-empty cell of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Text,
    Date,
}

/// Loads the CSV file at `path` into a `Table`.
///
/// The first line is the header. Each column is typed from its contents: all
/// integers become `Int`, all numbers `Float`, anything else `Text`. When
/// `date_column` names a column of the file, its cells are parsed as dates and an
/// unparseable cell fails the load.
pub fn load_table(path: &Path, date_column: Option<&str>) -> Result<Table, DataError> {
    if !path.is_file() {
        return Err(DataError::NotFound(path.display().to_string()));
    }

    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let table = read_table(reader, date_column)?;

    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "Loaded data table."
    );
    Ok(table)
}

/// Parses CSV text into a `Table`, typing columns like `load_table`.
pub fn parse_table(csv_text: &str, date_column: Option<&str>) -> Result<Table, DataError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());
    read_table(reader, date_column)
}

fn read_table<R: Read>(mut reader: csv::Reader<R>, date_column: Option<&str>) -> Result<Table, DataError> {
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut raw_rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw_rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let kinds: Vec<ColumnKind> = columns
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if date_column == Some(name.as_str()) {
                ColumnKind::Date
            } else {
                infer_kind(raw_rows.iter().map(|row| row[index].as_str()))
            }
        })
        .collect();

    if let Some(date_column) = date_column {
        if !columns.iter().any(|c| c == date_column) {
            tracing::warn!(column = %date_column, "Configured date column is not in the data; date filters will be ignored.");
        }
    }

    let rows = raw_rows
        .into_iter()
        .enumerate()
        .map(|(row_index, raw)| {
            raw.into_iter()
                .zip(&kinds)
                .zip(&columns)
                .map(|((cell, kind), column)| convert_cell(cell, *kind, column, row_index))
                .collect::<Result<Row, DataError>>()
        })
        .collect::<Result<Vec<Row>, DataError>>()?;

    Ok(Table::new(columns, rows)?)
}

fn is_null(cell: &str) -> bool {
    NULL_TOKENS.contains(&cell)
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Int;
    for cell in cells.filter(|c| !is_null(c)) {
        if kind == ColumnKind::Int && cell.parse::<i64>().is_err() {
            kind = ColumnKind::Float;
        }
        if kind == ColumnKind::Float && cell.parse::<f64>().is_err() {
            return ColumnKind::Text;
        }
    }
    kind
}

fn convert_cell(cell: String, kind: ColumnKind, column: &str, row: usize) -> Result<Value, DataError> {
    if is_null(&cell) {
        return Ok(Value::Null);
    }

    // Inference guarantees the numeric parses succeed; fall back to text regardless.
    let value = match kind {
        ColumnKind::Int => cell.parse().map(Value::Int).unwrap_or(Value::Text(cell)),
        ColumnKind::Float => cell.parse().map(Value::Float).unwrap_or(Value::Text(cell)),
        ColumnKind::Text => Value::Text(cell),
        ColumnKind::Date => match parse_datetime(&cell) {
            Some(dt) => Value::Date(dt),
            None => {
                return Err(DataError::InvalidDate {
                    column: column.to_string(),
                    row,
                    value: cell,
                });
            }
        },
    };
    Ok(value)
}
