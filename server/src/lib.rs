pub mod api;
pub mod infrastructure;
pub mod modules;
pub mod shared;

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use infrastructure::AppState;
use modules::config::{ConfigLoader, PartialAppConfig};
use shared::AppResult;

/// 命令行参数（优先级最高）
#[derive(Debug, Parser)]
#[command(name = "yorisoi")]
#[command(about = "Empathetic chat companion: emotion detection with supportive replies")]
pub struct Cli {
    /// JSON config file (falls back to $YORISOI_CONFIG)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

impl Cli {
    fn overrides(&self) -> PartialAppConfig {
        PartialAppConfig {
            host: self.host.clone(),
            port: self.port,
            ..Default::default()
        }
    }
}

pub async fn run(cli: Cli) -> AppResult<()> {
    let config = ConfigLoader::new()
        .with_config_path(cli.config.clone())
        .load(cli.overrides())
        .await?;

    // 初始化日志（RUST_LOG 优先）
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Yorisoi starting...");

    let state = AppState::build(&config).await?;
    let app = api::build_router(state);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Yorisoi stopped");
    Ok(())
}

/// Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}
