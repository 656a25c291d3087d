use crate::utils::error::{CapacityError, Result};
use chrono::NaiveDate;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CapacityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CapacityError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CapacityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CapacityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CapacityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(CapacityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| CapacityError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CapacityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` day of service.
pub fn parse_dos(field_name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        CapacityError::InvalidDateInput {
            message: format!("{} '{}' is not a YYYY-MM-DD date: {}", field_name, value, e),
        }
    })
}

pub fn validate_date_window(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(CapacityError::InvalidDateInput {
            message: format!("window end {} is before start {}", end, start),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source.endpoint", "https://example.com").is_ok());
        assert!(validate_url("source.endpoint", "http://example.com").is_ok());
        assert!(validate_url("source.endpoint", "").is_err());
        assert!(validate_url("source.endpoint", "invalid-url").is_err());
        assert!(validate_url("source.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("days", 5, 1).is_ok());
        assert!(validate_positive_number("days", 0, 1).is_err());
    }

    #[test]
    fn test_parse_dos() {
        assert_eq!(
            parse_dos("dos", "2026-01-16").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()
        );
        assert!(matches!(
            parse_dos("dos", "01/16/2026"),
            Err(CapacityError::InvalidDateInput { .. })
        ));
    }

    #[test]
    fn test_validate_date_window() {
        let jan16 = NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();
        let jan17 = NaiveDate::from_ymd_opt(2026, 1, 17).unwrap();
        assert!(validate_date_window(jan16, jan16).is_ok());
        assert!(validate_date_window(jan16, jan17).is_ok());
        assert!(validate_date_window(jan17, jan16).is_err());
    }
}
