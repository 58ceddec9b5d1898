pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Frequency, Season};
pub use error::CoreError;
pub use structs::{
    CategoryId, DateId, DateKeyed, DateRange, LogId, ManufacturerId, ProductId, ProductRecord,
    SaleRecord, StoreId, Table,
};
