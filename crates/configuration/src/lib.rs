use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{Config, DataSettings, KpiSettings, LoggingSettings};

const ENV_PREFIX: &str = "MARKET_HEALTH";

/// Loads the application configuration from the `config.toml` file.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from("config.toml")
}

/// Loads the configuration from `path`, then applies `MARKET_HEALTH__SECTION__KEY`
/// environment overrides, deserializes it into our strongly-typed `Config` struct
/// and validates it.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

/// Parses and validates configuration held in a TOML string.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kpi.top_n_stores == 0 {
            return Err(ConfigError::ValidationError(
                "kpi.top_n_stores must be greater than 0".to_string(),
            ));
        }
        if self.logging.file_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.file_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Frequency;
    use std::path::PathBuf;

    const MINIMAL: &str = r#"
        [data]
        product_file = "data/products.csv"
        sale_file = "data/sales.csv"
    "#;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = parse_config(MINIMAL).unwrap();
        assert_eq!(config.data.product_file, PathBuf::from("data/products.csv"));
        assert_eq!(config.kpi.top_n_stores, 10);
        assert_eq!(config.kpi.frequency, Frequency::MonthEnd);
        assert_eq!(config.kpi.discount_year, 2022);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn explicit_sections_are_read() {
        let toml = format!(
            "{}\n[kpi]\ntop_n_stores = 3\nfrequency = \"W\"\n\n[logging]\nlevel = \"debug\"\ndirectory = \"logs\"\n",
            MINIMAL
        );
        let config = parse_config(&toml).unwrap();
        assert_eq!(config.kpi.top_n_stores, 3);
        assert_eq!(config.kpi.frequency, Frequency::Weekly);
        assert_eq!(config.kpi.discount_year, 2022);
        assert_eq!(config.logging.directory, Some(PathBuf::from("logs")));
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let toml = format!("{}\n[kpi]\ntop_n_stores = 0\n", MINIMAL);
        assert!(matches!(parse_config(&toml), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        let toml = format!("{}\n[kpi]\nfrequency = \"fortnightly\"\n", MINIMAL);
        assert!(matches!(parse_config(&toml), Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn data_section_is_required() {
        assert!(parse_config("[kpi]\ntop_n_stores = 5\n").is_err());
    }

    #[test]
    fn file_values_are_overridden_by_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let toml = format!("{}\n[kpi]\ntop_n_stores = 7\nfrequency = \"M\"\ndiscount_year = 2021\n", MINIMAL);
        std::fs::write(&path, toml).unwrap();

        // Only this test touches MARKET_HEALTH__* variables.
        unsafe {
            std::env::set_var("MARKET_HEALTH__KPI__TOP_N_STORES", "3");
            std::env::set_var("MARKET_HEALTH__KPI__FREQUENCY", "W");
        }
        let result = load_config_from(&path);
        unsafe {
            std::env::remove_var("MARKET_HEALTH__KPI__TOP_N_STORES");
            std::env::remove_var("MARKET_HEALTH__KPI__FREQUENCY");
        }

        let config = result.unwrap();
        assert_eq!(config.kpi.top_n_stores, 3);
        assert_eq!(config.kpi.frequency, Frequency::Weekly);
        assert_eq!(config.kpi.discount_year, 2021);
        assert_eq!(config.data.sale_file, PathBuf::from("data/sales.csv"));
    }

    #[test]
    fn missing_config_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
