use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use knock::server::{
    LoggingVisitRecorder, RelayConfig, VisitRecorder, WebhookVisitRecorder, router, spawn_relay,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const RELAY_DRAIN: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "knock")]
#[command(about = "Call-signaling relay for QR doorbell rooms")]
struct Cli {
    /// Listen address.
    #[arg(long, env = "KNOCK_BIND", default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// Overrides the port of --bind (set by most hosting platforms).
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    #[arg(long, env = "KNOCK_SWEEP_SECS", default_value_t = 600)]
    sweep_secs: u64,

    #[arg(long, env = "KNOCK_HEARTBEAT_SECS", default_value_t = 25)]
    heartbeat_secs: u64,

    #[arg(long, env = "KNOCK_IDLE_SECS", default_value_t = 60)]
    idle_secs: u64,

    #[arg(long, env = "KNOCK_COMMAND_BUFFER", default_value_t = 256)]
    command_buffer: usize,

    /// Visit-history endpoint receiving one JSON POST per visit.
    #[arg(long, env = "KNOCK_VISIT_WEBHOOK")]
    visit_webhook: Option<String>,

    /// Default filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> RelayConfig {
        let mut bind_addr = self.bind;
        if let Some(port) = self.port {
            bind_addr.set_port(port);
        }

        RelayConfig {
            bind_addr,
            sweep_interval: Duration::from_secs(self.sweep_secs),
            heartbeat_interval: Duration::from_secs(self.heartbeat_secs),
            idle_timeout: Duration::from_secs(self.idle_secs),
            command_buffer: self.command_buffer,
            visit_webhook: self.visit_webhook,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.into_config();
    config.validate().context("Refusing to start")?;

    let recorder: Arc<dyn VisitRecorder> = match &config.visit_webhook {
        Some(url) => {
            info!("Visits are forwarded to {}", url);
            Arc::new(WebhookVisitRecorder::new(url.clone()))
        }
        None => Arc::new(LoggingVisitRecorder),
    };

    let (signaling, relay_task) = spawn_relay(&config, recorder)?;
    let app = router(signaling);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    println!("{}", "🔔 knock relay is up".green().bold());
    println!("   ws:     ws://{}/ws", config.bind_addr);
    println!("   health: http://{}/healthz", config.bind_addr);
    info!("Signaling server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Upgraded sockets that outlive the server still hold a relay handle.
    match tokio::time::timeout(RELAY_DRAIN, relay_task).await {
        Ok(Ok(())) => info!("Relay stopped"),
        Ok(Err(e)) => tracing::error!("Relay task failed: {}", e),
        Err(_) => info!("Relay still draining after {:?}, exiting", RELAY_DRAIN),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
