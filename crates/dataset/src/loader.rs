use crate::error::DatasetError;
use core_types::{ProductRecord, SaleRecord, Table};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Deserializes every row of a headered CSV stream.
pub fn read_records<R, T>(reader: T) -> Result<Vec<R>, DatasetError>
where
    R: DeserializeOwned,
    T: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let record: R = result?;
        records.push(record);
    }
    Ok(records)
}

pub fn load_products(path: impl AsRef<Path>) -> Result<Table<ProductRecord>, DatasetError> {
    load_table(path.as_ref(), "product")
}

pub fn load_sales(path: impl AsRef<Path>) -> Result<Table<SaleRecord>, DatasetError> {
    load_table(path.as_ref(), "sale")
}

/// Loads both logs, ready to hand to `KpiEngine::set_tables`.
pub fn load_tables(
    product_path: impl AsRef<Path>,
    sale_path: impl AsRef<Path>,
) -> Result<(Table<ProductRecord>, Table<SaleRecord>), DatasetError> {
    Ok((load_products(product_path)?, load_sales(sale_path)?))
}

fn load_table<R: DeserializeOwned>(path: &Path, kind: &str) -> Result<Table<R>, DatasetError> {
    if !path.is_file() {
        return Err(DatasetError::FileNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let records: Vec<R> = read_records(BufReader::new(file))?;
    tracing::info!(path = %path.display(), rows = records.len(), "Loaded {} log.", kind);
    Ok(Table::new(records))
}
