use crate::utils::error::{ForecastError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ForecastError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number<T>(field_name: &str, value: T, min_value: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min_value {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| ForecastError::MissingConfigError {
            field: field_name.to_string(),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("provider.endpoint", "https://api.deepseek.com").is_ok());
        assert!(validate_url("provider.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("provider.endpoint", "").is_err());
        assert!(validate_url("provider.endpoint", "invalid-url").is_err());
        assert!(validate_url("provider.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("generation.max_tokens", 7000u32, 1).is_ok());
        assert!(validate_positive_number("generation.max_tokens", 0u32, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("generation.temperature", 0.7, 0.0, 2.0).is_ok());
        assert!(validate_range("generation.temperature", 2.5, 0.0, 2.0).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let missing: Option<String> = None;
        let err = validate_required_field("DEEPSEEK_API_KEY", &missing).unwrap_err();
        assert!(matches!(err, ForecastError::MissingConfigError { .. }));

        let present = Some("sk-test".to_string());
        assert_eq!(
            validate_required_field("DEEPSEEK_API_KEY", &present).unwrap(),
            "sk-test"
        );
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("provider.model", "deepseek-chat").is_ok());
        assert!(validate_non_empty_string("provider.model", "   ").is_err());
    }
}
