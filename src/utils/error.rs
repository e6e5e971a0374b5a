use thiserror::Error;

/// 錯誤分類，用於日誌與退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Provider,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

pub const INVALID_BIRTHDATE_MESSAGE: &str =
    "မှားယွင်းသော ရက်စွဲ format ဖြစ်နေပါသည်။ DD-MM-YYYY format ဖြင့် ပြန်လည်ရိုက်ထည့်ပါ။";

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Invalid birthdate '{input}': expected DD-MM-YYYY")]
    InvalidBirthdate { input: String },

    #[error("Unknown prediction category '{input}'")]
    InvalidCategory { input: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Provider request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Provider request timed out after {seconds}s")]
    TimeoutError { seconds: u64 },

    #[error("Provider rejected credentials (HTTP {status}): {message}")]
    AuthenticationError { status: u16, message: String },

    #[error("Provider returned HTTP {status}: {message}")]
    ProviderResponseError { status: u16, message: String },

    #[error("Malformed provider response: {message}")]
    MalformedResponseError { message: String },

    #[error("Provider returned no content")]
    EmptyResponseError,

    #[error("Provider response was truncated (finish_reason: {finish_reason})")]
    TruncatedResponseError { finish_reason: String },
}

impl ForecastError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidBirthdate { .. } | Self::InvalidCategory { .. } => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::HttpError(_)
            | Self::TimeoutError { .. }
            | Self::AuthenticationError { .. }
            | Self::ProviderResponseError { .. }
            | Self::MalformedResponseError { .. }
            | Self::EmptyResponseError
            | Self::TruncatedResponseError { .. } => ErrorCategory::Provider,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            // 單次呼叫失敗可重新執行
            ErrorCategory::Provider => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 是否為文字服務端的錯誤（網路、認證、回應內容）
    pub fn is_provider_error(&self) -> bool {
        self.category() == ErrorCategory::Provider
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidBirthdate { .. } => "Enter the birthdate as DD-MM-YYYY, e.g. 15-08-1995",
            Self::InvalidCategory { .. } => {
                "Use one of: weekly, monthly, yearly, personality, recommendations, all"
            }
            Self::MissingConfigError { .. } => {
                "Set DEEPSEEK_API_KEY in the environment or in a .env file"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } | Self::TomlError(_) => {
                "Check the configuration file and command line flags"
            }
            Self::AuthenticationError { .. } => "Verify that the API key is valid and active",
            Self::TimeoutError { .. } => "Increase request_timeout_seconds or try again later",
            Self::TruncatedResponseError { .. } => "Increase max_tokens in the generation settings",
            Self::HttpError(_)
            | Self::ProviderResponseError { .. }
            | Self::MalformedResponseError { .. }
            | Self::EmptyResponseError => "Check the provider endpoint and try again later",
            Self::IoError(_) | Self::SerializationError(_) => "Check file permissions and disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidBirthdate { .. } => INVALID_BIRTHDATE_MESSAGE.to_string(),
            Self::MissingConfigError { field } => format!("Missing required setting: {}", field),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_birthdate_uses_localized_message() {
        let err = ForecastError::InvalidBirthdate {
            input: "1995-08-15".to_string(),
        };
        assert_eq!(err.user_friendly_message(), INVALID_BIRTHDATE_MESSAGE);
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(!err.is_provider_error());
    }

    #[test]
    fn test_provider_errors_share_category() {
        let errors = vec![
            ForecastError::TimeoutError { seconds: 5 },
            ForecastError::EmptyResponseError,
            ForecastError::AuthenticationError {
                status: 401,
                message: "bad key".to_string(),
            },
            ForecastError::TruncatedResponseError {
                finish_reason: "length".to_string(),
            },
        ];
        for err in errors {
            assert!(err.is_provider_error(), "{err}");
            assert_eq!(err.severity(), ErrorSeverity::Medium);
        }
    }

    #[test]
    fn test_missing_config_message_names_field() {
        let err = ForecastError::MissingConfigError {
            field: "DEEPSEEK_API_KEY".to_string(),
        };
        assert!(err.user_friendly_message().contains("DEEPSEEK_API_KEY"));
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
