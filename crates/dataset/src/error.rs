use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Data file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error while reading data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV data: {0}")]
    Csv(#[from] csv::Error),
}
