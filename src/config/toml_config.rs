use crate::core::orchestrator::ExecutionMode;
use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Optional settings file. Every section and field may be omitted.
///
/// ```toml
/// [provider]
/// endpoint = "https://api.deepseek.com"
/// api_key = "${DEEPSEEK_API_KEY}"
/// model = "deepseek-chat"
/// request_timeout_seconds = 120
///
/// [generation]
/// system_prompt = "You are a professional astrologer..."
/// temperature = 0.7
/// max_tokens = 7000
///
/// [orchestration]
/// mode = "concurrent"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub provider: Option<ProviderSection>,
    pub generation: Option<GenerationSection>,
    pub orchestration: Option<OrchestrationSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSection {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationSection {
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestrationSection {
    pub mode: Option<ExecutionMode>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        let config: Self = toml::from_str(&processed_content)?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${DEEPSEEK_API_KEY})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static env var regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn execution_mode(&self) -> Option<ExecutionMode> {
        self.orchestration.as_ref().and_then(|o| o.mode)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(provider) = &self.provider {
            if let Some(endpoint) = &provider.endpoint {
                validation::validate_url("provider.endpoint", endpoint)?;
            }
            if let Some(key) = &provider.api_key {
                if key.starts_with("${") {
                    return Err(ForecastError::ConfigError {
                        message: format!("provider.api_key references an unset variable: {}", key),
                    });
                }
            }
            if let Some(timeout) = provider.request_timeout_seconds {
                validation::validate_positive_number("provider.request_timeout_seconds", timeout, 1)?;
            }
        }

        if let Some(generation) = &self.generation {
            if let Some(temperature) = generation.temperature {
                validation::validate_range("generation.temperature", temperature, 0.0, 2.0)?;
            }
            if let Some(max_tokens) = generation.max_tokens {
                validation::validate_positive_number("generation.max_tokens", max_tokens, 1)?;
            }
        }

        Ok(())
    }
}
