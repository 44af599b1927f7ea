use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use loadmon::config::{load_config, MonitorConfig};
use loadmon::monitor::ProcMonitor;
use loadmon::net::{Listener, MonitorServer};
use loadmon::observability::{logging, metrics};

/// Bad command line or configuration file.
const EXIT_USAGE: u8 = 2;
/// Socket could not be created, bound or put into listening state.
const EXIT_STARTUP: u8 = 3;

#[derive(Parser)]
#[command(name = "loadmon", version)]
#[command(about = "Reports host CPU and memory usage over a line protocol", long_about = None)]
struct Cli {
    /// TCP port to listen on
    port: u16,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // clap exits with status 2 on usage errors
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Invalid configuration {:?}: {}", path, e);
                return ExitCode::from(EXIT_USAGE);
            }
        },
        None => MonitorConfig::default(),
    };
    config.listener.port = cli.port;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("loadmon v{} starting", env!("CARGO_PKG_VERSION"));

    let listener = match Listener::bind(&config.listener) {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            eprintln!("Fatal error: {}", e);
            return ExitCode::from(EXIT_STARTUP);
        }
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = MonitorServer::new(&config.protocol, Arc::new(ProcMonitor::new()));
    server.run(listener).await;

    ExitCode::SUCCESS
}
