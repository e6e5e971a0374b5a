use crate::config::toml_config::TomlConfig;
use crate::core::prompt::SYSTEM_PROMPT;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
// 足以容納五個段落合併的最長輸出
pub const DEFAULT_MAX_TOKENS: u32 = 7000;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

pub const ENV_API_KEY: &str = "DEEPSEEK_API_KEY";
pub const ENV_ENDPOINT: &str = "DEEPSEEK_BASE_URL";
pub const ENV_MODEL: &str = "DEEPSEEK_MODEL";

/// Immutable provider settings, resolved once at startup and handed to the
/// client constructor.
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Resolves settings from the process environment over the optional file.
    pub fn from_env(file: Option<&TomlConfig>) -> Result<Self> {
        Self::from_sources(file, |name| std::env::var(name).ok())
    }

    /// 優先順序: 環境變數 > TOML 檔案 > 預設值
    pub fn from_sources<F>(file: Option<&TomlConfig>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = file.and_then(|f| f.provider.clone()).unwrap_or_default();
        let generation = file.and_then(|f| f.generation.clone()).unwrap_or_default();

        let api_key = env(ENV_API_KEY)
            .filter(|key| !key.trim().is_empty())
            .or(provider.api_key);
        let api_key = validation::validate_required_field(ENV_API_KEY, &api_key)?;

        let mut config = Self::new(api_key.clone());

        // 空白的環境變數視同未設定
        let non_blank = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        if let Some(endpoint) = non_blank(ENV_ENDPOINT).or(provider.endpoint) {
            config.endpoint = endpoint;
        }
        if let Some(model) = non_blank(ENV_MODEL).or(provider.model) {
            config.model = model;
        }
        if let Some(timeout) = provider.request_timeout_seconds {
            config.request_timeout = Duration::from_secs(timeout);
        }
        if let Some(system_prompt) = generation.system_prompt {
            config.system_prompt = system_prompt;
        }
        if let Some(temperature) = generation.temperature {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = generation.max_tokens {
            config.max_tokens = max_tokens;
        }

        Ok(config)
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("provider.endpoint", &self.endpoint)?;
        validation::validate_non_empty_string(ENV_API_KEY, &self.api_key)?;
        validation::validate_non_empty_string("provider.model", &self.model)?;
        validation::validate_non_empty_string("generation.system_prompt", &self.system_prompt)?;
        validation::validate_range("generation.temperature", self.temperature, 0.0, 2.0)?;
        validation::validate_positive_number("generation.max_tokens", self.max_tokens, 1)?;
        validation::validate_positive_number(
            "provider.request_timeout_seconds",
            self.request_timeout.as_secs(),
            1,
        )?;
        Ok(())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
