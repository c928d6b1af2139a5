//! GitOps starter - a minimal JSON web API template with health checks and example items

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gitops_starter::api::{self, ApiDoc};
use gitops_starter::config::Config;

#[derive(Parser)]
#[command(name = "gitops-starter")]
#[command(about = "A starter template for learning GitOps with a small JSON web API")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Prefix the API is mounted under
        #[arg(long)]
        root_path: Option<String>,
    },

    /// Print the OpenAPI document
    Openapi,

    /// List all routes
    Routes,

    /// Print the resolved configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment before the log filter reads RUST_LOG
    let _ = dotenvy::dotenv();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("gitops_starter={},tower_http={}", log_level, log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let config = if let Some(path) = &cli.config {
        Config::load_from(path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Commands::Serve { host, port, root_path } => {
            let config = resolve_config(config, host, port, root_path)?;
            let router = api::create_router(&config)?;

            let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
            let addr = listener.local_addr()?;

            tracing::info!("Starting HTTP server on {}", addr);
            match config.mount_prefix() {
                Some(prefix) => tracing::info!("Root path: {}", prefix),
                None => tracing::info!("Root path: /"),
            }

            println!("GitOps starter running at http://{}", addr);
            println!("  API Docs: http://{}/docs", addr);
            println!("  Health:   http://{}/health", addr);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("Server shutdown complete");
        }

        Commands::Openapi => {
            println!("{}", ApiDoc::to_json(&config)?);
        }

        Commands::Routes => {
            for (method, path) in api::route_table(&config) {
                println!("{:<6} {}", method, path);
            }
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// Apply `serve` flag overrides on top of the loaded config
fn resolve_config(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
    root_path: Option<String>,
) -> gitops_starter::Result<Config> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(root_path) = root_path {
        config.root_path = root_path;
    }
    config.validate()?;
    Ok(config)
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        () = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
