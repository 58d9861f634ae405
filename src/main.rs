use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use childcare_fee_estimator::api::{AppState, create_router};
use childcare_fee_estimator::config::ConfigLoader;

/// Serves child care gap-fee estimates over HTTP.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory holding metadata.yaml, ccs.yaml and programs.yaml.
    /// The compiled-in tables are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Log at debug level.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.debug);

    let config = match &args.config {
        Some(dir) => ConfigLoader::load(dir)
            .with_context(|| format!("loading rate tables from {}", dir.display()))?,
        None => ConfigLoader::bundled(),
    };
    info!(
        financial_year = %config.tables().metadata().financial_year,
        "Rate tables loaded"
    );

    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("Listening on {}", args.bind);

    axum::serve(listener, app).await?;

    Ok(())
}

fn setup_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("childcare_fee_estimator=debug")
        } else {
            EnvFilter::new("childcare_fee_estimator=info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
