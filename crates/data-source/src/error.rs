use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file not found at: {0}")]
    NotFound(String),

    #[error("Failed to read CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid date '{value}' in column '{column}' at row {row}")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Malformed table: {0}")]
    Table(#[from] core_types::CoreError),
}
