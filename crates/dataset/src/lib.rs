//! Loads the product and sale logs from CSV files into `core-types` tables.
//!
//! Headers may use either the snake_case field names (`cat_id`) or the
//! camelCase names of the upstream export (`catID`). The `date_id` column is
//! optional; every other column is required, so a file missing one fails here
//! rather than inside a KPI query.

pub mod error;
pub mod loader;

pub use error::DatasetError;
pub use loader::{load_products, load_sales, load_tables, read_records};
