use crate::core::ConfigProvider;
use crate::domain::model::Audience;
use crate::domain::ports::SourceSettings;
use crate::utils::error::{CapacityError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_required_field,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub source: SourceConfig,
    pub output: Option<OutputConfig>,
    pub email: Option<EmailConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub audience: Option<Audience>,
    pub days: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Csv,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: SourceKind,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub archive: Option<bool>,
}

/// 郵件設定僅記錄，不負責寄送
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub subject_prefix: Option<String>,
    pub recipients: Vec<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CapacityError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPORT_API})，未設定者保留原字樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| CapacityError::ConfigError {
            message: format!("env placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn archive_enabled(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.archive)
            .unwrap_or(false)
    }

    pub fn recipients(&self) -> &[String] {
        self.email.as_ref().map(|e| e.recipients.as_slice()).unwrap_or(&[])
    }

    /// Prefixes an email subject when `[email].subject_prefix` is set.
    pub fn email_subject(&self, subject: &str) -> String {
        match self.email.as_ref().and_then(|e| e.subject_prefix.as_deref()) {
            Some(prefix) if !prefix.trim().is_empty() => format!("{} {}", prefix.trim(), subject),
            _ => subject.to_string(),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("report.name", &self.report.name)?;
        if let Some(days) = self.report.days {
            validate_positive_number("report.days", days, 1)?;
        }

        match self.source.r#type {
            SourceKind::Csv => {
                let path = validate_required_field("source.path", &self.source.path)?;
                validate_path("source.path", path)?;
            }
            SourceKind::Http => {
                let endpoint = validate_required_field("source.endpoint", &self.source.endpoint)?;
                validate_url("source.endpoint", endpoint)?;
            }
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validate_positive_number("source.timeout_seconds", timeout as usize, 1)?;
        }

        if let Some(output) = &self.output {
            validate_path("output.path", &output.path)?;
        }

        for recipient in self.recipients() {
            validate_non_empty_string("email.recipients", recipient)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn source_settings(&self) -> SourceSettings {
        match self.source.r#type {
            SourceKind::Csv => SourceSettings::Csv {
                path: self.source.path.clone().unwrap_or_default(),
            },
            SourceKind::Http => SourceSettings::Http {
                endpoint: self.source.endpoint.clone().unwrap_or_default(),
                timeout_seconds: self.source.timeout_seconds,
            },
        }
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.path.as_str())
    }

    fn audience(&self) -> Audience {
        self.report.audience.unwrap_or_default()
    }

    fn days(&self) -> usize {
        self.report.days.unwrap_or(1)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
