use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Derived column length mismatch: table has {rows} rows but {values} values were supplied")]
    ColumnLength { rows: usize, values: usize },
}
