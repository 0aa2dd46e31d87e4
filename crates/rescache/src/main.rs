//! Rescache - cache-fronted resource services driven from the command line

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod config;

use commands::{App, Command};
use config::{Config, LoggingConfig};

/// Rescache - LRU/LFU caches in front of the user and product services
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Eviction algorithm (LRU or LFU)
    #[arg(long, env = "RESCACHE_CACHE_ALGORITHM")]
    algorithm: Option<String>,

    /// Entries per resource cache; 0 or less disables caching
    #[arg(long, env = "RESCACHE_CACHE_CAPACITY", allow_hyphen_values = true)]
    capacity: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    config.apply_overrides(args.algorithm, args.capacity);

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting Rescache v{}", env!("CARGO_PKG_VERSION"));

    let metrics = if config.metrics.enabled {
        Some(init_metrics()?)
    } else {
        None
    };

    let app = App::new(config, metrics);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run(&app, stdin, &mut stdout).await?;

    info!("Rescache stopped");
    Ok(())
}

/// Read commands until `quit`, end of input or Ctrl+C
async fn run<R, W>(app: &App, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = shutdown_signal() => break,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                output.write_all(format!("error: {:#}\n", e).as_bytes()).await?;
                output.flush().await?;
                continue;
            }
        };

        if matches!(command, Command::Quit) {
            break;
        }

        let text = match app.execute(command).await {
            Ok(text) => text,
            Err(e) => format!("error: {:#}", e),
        };
        output.write_all(text.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }

    Ok(())
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Install the Prometheus recorder for the cache counters
fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install CTRL+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn transcript(input: &str) -> String {
        let app = App::new(Config::default(), None);
        let mut output = Vec::new();
        run(&app, input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_last_line_is_reported() {
        let text = transcript("help\nlaunch rockets").await;
        assert!(text.starts_with("Commands:"));
        assert!(text.ends_with("error: Unrecognized command: launch rockets\n"));
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let text = transcript("get users x\nquit\nhelp\n").await;
        assert!(text.starts_with("error: Invalid id: x"));
        assert_eq!(text.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_service_errors_do_not_stop_the_loop() {
        let text = transcript("get users 1\ncreate users alice alice@example.com\n").await;
        assert!(text.starts_with("error: Record not found: user 1\n"));
        assert!(text.contains("\"username\": \"alice\""));
    }
}
