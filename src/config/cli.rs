use crate::core::ConfigProvider;
use crate::domain::model::Audience;
use crate::domain::ports::SourceSettings;
use crate::utils::error::{CapacityError, Result};
use crate::utils::validation::{
    parse_dos, validate_path, validate_positive_number, validate_url, Validate,
};
use chrono::{Days, NaiveDate};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "capacity-util")]
#[command(about = "Daily radiology capacity utilization report")]
pub struct CliConfig {
    /// Date of service (YYYY-MM-DD); defaults to tomorrow
    #[arg(long)]
    pub dos: Option<String>,

    /// Number of consecutive days starting at --dos
    #[arg(long)]
    pub days: Option<usize>,

    /// Email audience; defaults to scheduling
    #[arg(long, value_enum)]
    pub audience: Option<Audience>,

    /// TOML config file; replaces the source and output flags below
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, default_value = "./data")]
    pub data_dir: String,

    /// Read from a reporting API instead of CSV extracts
    #[arg(long)]
    pub api_endpoint: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Write a ZIP bundle of every rendering to --output-path
    #[arg(long)]
    pub archive: bool,

    /// Print the result as JSON instead of text
    #[arg(long)]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit JSON log lines")]
    pub log_json: bool,
}

impl CliConfig {
    /// 未指定 DOS 時預設為明天
    pub fn target_dos(&self, today: NaiveDate) -> Result<NaiveDate> {
        match &self.dos {
            Some(value) => parse_dos("--dos", value),
            None => Ok(today.checked_add_days(Days::new(1)).unwrap_or(today)),
        }
    }
}

impl ConfigProvider for CliConfig {
    fn source_settings(&self) -> SourceSettings {
        match &self.api_endpoint {
            Some(endpoint) => SourceSettings::Http {
                endpoint: endpoint.clone(),
                timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
            },
            None => SourceSettings::Csv {
                path: self.data_dir.clone(),
            },
        }
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn audience(&self) -> Audience {
        self.audience.unwrap_or_default()
    }

    fn days(&self) -> usize {
        self.days.unwrap_or(1)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(dos) = &self.dos {
            parse_dos("--dos", dos)?;
        }
        if let Some(days) = self.days {
            validate_positive_number("--days", days, 1)?;
        }

        if self.config.is_none() {
            match &self.api_endpoint {
                Some(endpoint) => validate_url("--api-endpoint", endpoint)?,
                None => validate_path("--data-dir", &self.data_dir)?,
            }
        }

        if let Some(path) = &self.output_path {
            validate_path("--output-path", path)?;
        } else if self.archive && self.config.is_none() {
            return Err(CapacityError::MissingConfigError {
                field: "--output-path (required by --archive)".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::parse_from(std::iter::once("capacity-util").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_read_csv_for_tomorrow() {
        let config = parse(&[]);
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();

        assert_eq!(
            config.target_dos(today).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()
        );
        assert_eq!(config.days(), 1);
        assert_eq!(config.audience(), Audience::Scheduling);
        assert_eq!(
            config.source_settings(),
            SourceSettings::Csv {
                path: "./data".to_string()
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_endpoint_selects_http_source() {
        let config = parse(&["--api-endpoint", "https://reports.example.com/api", "--audience", "ops"]);

        assert!(matches!(config.source_settings(), SourceSettings::Http { .. }));
        assert_eq!(config.audience(), Audience::Ops);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_flags_fail_validation() {
        assert!(parse(&["--dos", "16/01/2026"]).validate().is_err());
        assert!(parse(&["--days", "0"]).validate().is_err());
        assert!(parse(&["--api-endpoint", "not-a-url"]).validate().is_err());
        assert!(parse(&["--archive"]).validate().is_err());
        assert!(parse(&["--archive", "--output-path", "./out"]).validate().is_ok());
    }
}
