//! idea-intake daemon
//!
//! ## Usage
//!
//! ```bash
//! # Start with defaults
//! idea-intake
//!
//! # Start with a config file
//! idea-intake --config /etc/idea-intake.toml
//!
//! # Override the port or directories
//! idea-intake --http-port 9000 --data-dir /var/lib/idea --upload-dir /var/lib/idea/uploads
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use idea_intake::api::{create_router, AppState};
use idea_intake::config::Config;
use idea_intake::intake::Orchestrator;
use idea_intake::sinks::{DriveClient, MailRelay, SheetClient};
use idea_intake::store::IdeaStore;
use idea_intake::translate::{PhraseBundles, TextGenClient};
use idea_intake::uploads::StagingArea;

#[derive(Parser, Debug)]
#[command(name = "idea-intake")]
#[command(about = "Multilingual idea collection service")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "idea-intake.toml")]
    config: String,

    /// HTTP port (overrides config file)
    #[arg(long, env = "IDEA_HTTP_PORT")]
    http_port: Option<u16>,

    /// Data directory (overrides config file)
    #[arg(long, env = "IDEA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Upload staging directory (overrides config file)
    #[arg(long, env = "IDEA_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("idea_intake=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = if std::path::Path::new(&cli.config).exists() {
        info!("Loading config from {}", cli.config);
        Config::load(&cli.config)?
    } else {
        info!("Config file not found, using defaults");
        Config::default()
    };

    if let Some(port) = cli.http_port {
        config.server.http_port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(upload_dir) = cli.upload_dir {
        config.storage.upload_dir = upload_dir;
    }

    std::fs::create_dir_all(&config.storage.data_dir)?;

    let store = Arc::new(IdeaStore::open(config.db_path())?);
    let staging = Arc::new(StagingArea::new(config.storage.upload_dir.clone())?);
    let textgen = Arc::new(TextGenClient::new(&config.translate)?);

    let sheet = Arc::new(SheetClient::new(&config.sheet)?);
    let drive = Arc::new(DriveClient::new(&config.drive)?);
    let mail = Arc::new(MailRelay::new(&config.mail)?);

    let orchestrator = Orchestrator::new(
        store,
        staging.clone(),
        sheet,
        drive,
        mail,
        config.mail.team_addr.clone(),
    );

    let bundles = PhraseBundles::new(textgen.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.http_port));
    let state = Arc::new(AppState {
        config,
        orchestrator,
        staging,
        textgen,
        bundles,
    });
    let app = create_router(state);

    info!("idea-intake listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
