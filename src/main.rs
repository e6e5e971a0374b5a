use astro_forecast::utils::error::ErrorSeverity;
use astro_forecast::utils::{logger, validation::Validate};
use astro_forecast::{
    Birthdate, CategorySelector, ChatCompletionsClient, CliConfig, ForecastError, Orchestrator,
    OutputFormat, ProviderConfig, TomlConfig,
};
use clap::Parser;

fn fail(e: &ForecastError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn resolve_config(cli: &CliConfig) -> Result<(ProviderConfig, Option<TomlConfig>), ForecastError> {
    let file = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            Some(file)
        }
        None => None,
    };

    let config = cli.apply_overrides(ProviderConfig::from_env(file.as_ref())?);
    config.validate()?;
    Ok((config, file))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 從 .env 載入 API 金鑰，檔案不存在也沒關係
    let dotenv_path = dotenvy::dotenv().ok();

    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting astro-forecast");
    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 輸入驗證在核心之前完成
    let birthdate = Birthdate::parse(&cli.birthdate).unwrap_or_else(|e| fail(&e));
    let selector: CategorySelector = cli.category.parse().unwrap_or_else(|e| fail(&e));

    let (config, file) = resolve_config(&cli).unwrap_or_else(|e| fail(&e));
    tracing::debug!("Provider config: {:?}", config);

    let mode = cli.resolve_mode(file.as_ref());

    let client = ChatCompletionsClient::new(config).unwrap_or_else(|e| fail(&e));
    let orchestrator = Orchestrator::with_mode(client, mode);

    tracing::info!("🔮 Predicting '{}' for {}", selector, birthdate);
    let document = orchestrator.run(&birthdate, selector).await;

    match cli.format {
        OutputFormat::Markdown => println!("{}", document.to_markdown()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&document)?),
    }

    let failures = document.failure_count();
    if failures > 0 {
        tracing::warn!("⚠️ {} of {} predictions failed", failures, document.len());
    } else {
        tracing::info!("✅ Prediction completed successfully!");
    }

    Ok(())
}
