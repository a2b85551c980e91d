use crate::kpi::ConversionSource;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub analysis: AnalysisConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let output_dir = env::var("KPI_OUTPUT_DIR").unwrap_or_else(|_| ".".to_string());
        if output_dir.trim().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            analysis: AnalysisConfig {
                columns: ColumnMapping::from_env()?,
                output_dir: PathBuf::from(output_dir),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where results are written and which dataset columns feed each metric.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub columns: ColumnMapping,
    pub output_dir: PathBuf,
}

/// Dataset column consumed by each calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub nps: String,
    pub csat: String,
    pub conversions: String,
    pub visitors: String,
    pub conversion_flag: String,
    pub sales: String,
    pub date: String,
    pub status: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            nps: "nps_score".to_string(),
            csat: "satisfaction_score".to_string(),
            conversions: "converted".to_string(),
            visitors: "visitors".to_string(),
            conversion_flag: "conversion".to_string(),
            sales: "sales".to_string(),
            date: "date".to_string(),
            status: "status".to_string(),
        }
    }
}

impl ColumnMapping {
    fn from_env() -> Result<Self, ConfigError> {
        let mut mapping = Self::default();
        let overrides: [(&'static str, &mut String); 8] = [
            ("KPI_NPS_COLUMN", &mut mapping.nps),
            ("KPI_CSAT_COLUMN", &mut mapping.csat),
            ("KPI_CONVERSIONS_COLUMN", &mut mapping.conversions),
            ("KPI_VISITORS_COLUMN", &mut mapping.visitors),
            ("KPI_CONVERSION_FLAG_COLUMN", &mut mapping.conversion_flag),
            ("KPI_SALES_COLUMN", &mut mapping.sales),
            ("KPI_DATE_COLUMN", &mut mapping.date),
            ("KPI_STATUS_COLUMN", &mut mapping.status),
        ];

        for (variable, slot) in overrides {
            if let Ok(value) = env::var(variable) {
                let value = value.trim();
                if value.is_empty() {
                    return Err(ConfigError::EmptyColumn { variable });
                }
                *slot = value.to_string();
            }
        }

        Ok(mapping)
    }

    pub fn conversion_source(&self) -> ConversionSource<'_> {
        ConversionSource {
            conversions: &self.conversions,
            visitors: &self.visitors,
            flag: &self.conversion_flag,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyColumn { variable: &'static str },
    EmptyOutputDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyColumn { variable } => {
                write!(f, "{variable} must name a dataset column when set")
            }
            ConfigError::EmptyOutputDir => write!(f, "KPI_OUTPUT_DIR must not be blank"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const VARIABLES: [&str; 11] = [
        "APP_ENV",
        "APP_LOG_LEVEL",
        "KPI_OUTPUT_DIR",
        "KPI_NPS_COLUMN",
        "KPI_CSAT_COLUMN",
        "KPI_CONVERSIONS_COLUMN",
        "KPI_VISITORS_COLUMN",
        "KPI_CONVERSION_FLAG_COLUMN",
        "KPI_SALES_COLUMN",
        "KPI_DATE_COLUMN",
        "KPI_STATUS_COLUMN",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for variable in VARIABLES {
            env::remove_var(variable);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.analysis.columns, ColumnMapping::default());
        assert_eq!(config.analysis.output_dir, PathBuf::from("."));
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn column_overrides_are_applied() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("KPI_SALES_COLUMN", " revenue ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.analysis.columns.sales, "revenue");
        assert_eq!(config.analysis.columns.nps, "nps_score");
        reset_env();
    }

    #[test]
    fn blank_column_override_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("KPI_DATE_COLUMN", "   ");
        let err = AppConfig::load().expect_err("blank override fails");
        assert!(matches!(
            err,
            ConfigError::EmptyColumn {
                variable: "KPI_DATE_COLUMN"
            }
        ));
        reset_env();
    }
}
