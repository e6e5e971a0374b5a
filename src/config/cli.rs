use super::{ProviderConfig, TomlConfig};
use crate::core::orchestrator::ExecutionMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "astro-forecast")]
#[command(about = "Birthdate-based astrological predictions from a generative text provider")]
pub struct CliConfig {
    /// Birthdate in DD-MM-YYYY format
    pub birthdate: String,

    /// weekly, monthly, yearly, personality, recommendations or all
    #[arg(short, long, default_value = "all")]
    pub category: String,

    /// Path to a TOML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub api_endpoint: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub temperature: Option<f32>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Per-request timeout for the provider, in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// How the five calls of an "all" request are issued
    #[arg(long, value_enum)]
    pub mode: Option<ExecutionMode>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// 命令列參數覆蓋檔案與環境變數的設定
    pub fn apply_overrides(&self, mut config: ProviderConfig) -> ProviderConfig {
        if let Some(endpoint) = &self.api_endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(timeout) = self.timeout_seconds {
            config.request_timeout = Duration::from_secs(timeout);
        }
        config
    }

    /// 執行模式: `--mode` > `[orchestration] mode` > 預設（並行）
    pub fn resolve_mode(&self, file: Option<&TomlConfig>) -> ExecutionMode {
        self.mode
            .or_else(|| file.and_then(|f| f.execution_mode()))
            .unwrap_or_default()
    }
}
