use core_types::Frequency;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataSettings,
    #[serde(default)]
    pub kpi: KpiSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the two input logs live.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// CSV file holding the product listing log.
    pub product_file: PathBuf,
    /// CSV file holding the sale agreement log.
    pub sale_file: PathBuf,
}

/// Defaults applied to KPI queries when the command line does not override them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KpiSettings {
    /// How many of the busiest stores the health score looks at.
    pub top_n_stores: usize,
    /// Period length for the time-series KPIs.
    pub frequency: Frequency,
    /// Year used for the discount-period KPIs.
    pub discount_year: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as `info` or `analytics=debug`. `RUST_LOG` wins when set.
    pub level: String,
    /// Directory for the daily rolling log file. Console only when absent.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

// --- Default Implementations ---
// This allows a user to omit the `[kpi]` or `[logging]` sections from their toml
// and still have it work with sensible defaults.

impl Default for KpiSettings {
    fn default() -> Self {
        Self {
            top_n_stores: 10,
            frequency: Frequency::MonthEnd,
            discount_year: 2022,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "market-health.log".to_string(),
        }
    }
}
