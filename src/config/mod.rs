#[cfg(feature = "cli")]
pub mod cli;
pub mod provider;
pub mod toml_config;

pub use provider::ProviderConfig;
pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, OutputFormat};
