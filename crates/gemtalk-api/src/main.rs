//! gemtalk entry point.
//!
//! Binary name: `gemtalk`
//!
//! Parses CLI arguments, loads `.env` and `config.toml`, then runs the
//! terminal chat or starts the image question web server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use gemtalk_infra::config::load_global_config;
use gemtalk_infra::filesystem::{config_path, resolve_data_dir};
use gemtalk_infra::secret::load_dotenv;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need anything else
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "gemtalk", &mut std::io::stdout());
        return Ok(());
    }

    // .env first so it can also carry RUST_LOG
    let dotenv = load_dotenv()?;

    let filter = gemtalk_observe::verbosity_filter(cli.verbose, cli.quiet);
    gemtalk_observe::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment from .env");
    }

    let config_file = cli
        .config
        .clone()
        .unwrap_or_else(|| config_path(&resolve_data_dir()));
    let mut config = load_global_config(&config_file).await;

    let result = match cli.command {
        Commands::Chat { model } => cli::chat::loop_runner::run_chat_loop(&config, model).await,

        Commands::Serve { port, host, model } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            serve(&config, model).await
        }

        Commands::Completions { .. } => Ok(()),
    };

    gemtalk_observe::shutdown_tracing();
    result
}

async fn serve(
    config: &gemtalk_types::config::GlobalConfig,
    model: Option<String>,
) -> anyhow::Result<()> {
    let state = AppState::init(config, model)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} Image Q&A page at {}",
        console::style("✨").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());
    tracing::info!(%addr, model = state.vision.model(), "Server listening");

    let sweeper = state.spawn_session_sweeper();
    let router = http::router::build_router(state);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    served?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
}
