use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Product data not configured: call set_tables before querying product KPIs")]
    ProductDataNotConfigured,

    #[error("Sale data not configured: call set_tables before querying sale KPIs")]
    SaleDataNotConfigured,

    #[error("Invalid query input: {0}")]
    Core(#[from] core_types::CoreError),
}
