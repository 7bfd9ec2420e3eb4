use anyhow::Context;
use clap::Parser;
use employee_facade::core::ConfigProvider;
use employee_facade::utils::{logger, validation::Validate};
use employee_facade::{api, AggregationService, CliConfig, ReqwestEmployeeClient, TomlConfig};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 有指定 TOML 檔案時，以檔案內容為準
    let toml_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    // 初始化日誌
    let verbose = cli.verbose || toml_config.as_ref().is_some_and(|c| c.verbose_logging());
    let json_logs = cli.json_logs || toml_config.as_ref().is_some_and(|c| c.json_logging());
    logger::init_logger(verbose, json_logs);

    tracing::info!("Starting employee-facade");

    match toml_config {
        Some(config) => serve(config).await,
        None => serve(cli).await,
    }
}

async fn serve<C: ConfigProvider + Validate + std::fmt::Debug>(config: C) -> anyhow::Result<()> {
    tracing::debug!("Service config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let client = ReqwestEmployeeClient::new(config.upstream_url(), config.request_timeout())
        .context("could not build upstream client")?;
    let policy = config.retry_policy();

    tracing::info!(
        upstream = %client.base_url(),
        retry_policy = %policy.name,
        max_attempts = policy.max_attempts,
        "🔧 Upstream client ready"
    );

    let service = Arc::new(AggregationService::new(client, policy));
    let app = api::router(service);

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("could not bind {}", config.listen_addr()))?;

    tracing::info!("🚀 Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
