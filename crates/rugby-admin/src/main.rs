//! Rugby results admin panel server.

use anyhow::Context;
use clap::Parser;
use rugby_admin::auth::Credentials;
use rugby_admin::{router, AppState};
use rugby_core::RugbyConfig;
use rugby_store::Store;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Longest accepted session lifetime: 30 days.
const MAX_SESSION_MINUTES: i64 = 30 * 24 * 60;

#[derive(Parser, Debug)]
#[command(name = "rugby-admin")]
#[command(about = "Web admin panel for rugby match results")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value_os_t = RugbyConfig::default_path())]
    config: PathBuf,

    /// Override the listen address from the configuration
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Directory holding the stylesheet
    #[arg(long, default_value_os_t = default_static_dir())]
    static_dir: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = RugbyConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if config.admin.password_sha256.is_none() {
        tracing::warn!("admin.password_sha256 is not set; nobody can sign in");
    }

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating {}", config.data_dir.display()))?;
    let store = Store::open(&config.data_dir, config.cache_ttl());

    let minutes = config.admin.session_ttl_minutes.clamp(1, MAX_SESSION_MINUTES);
    let state = AppState::new(
        store,
        Credentials {
            username: config.admin.username.clone(),
            password_sha256: config.admin.password_sha256.clone(),
        },
        chrono::Duration::minutes(minutes),
    );
    let app = router(state, &cli.static_dir);

    let addr = match cli.bind {
        Some(addr) => addr,
        None => config
            .admin
            .bind
            .parse()
            .with_context(|| format!("admin.bind {:?}", config.admin.bind))?,
    };
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Admin panel running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
