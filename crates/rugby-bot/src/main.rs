//! Rugby results bot.
//!
//! Long-polls the Bot API for updates and handles them one at a time.

use anyhow::Context;
use clap::Parser;
use rugby_bot::{Bot, BotOptions, ChatTarget, TelegramClient, COMMANDS};
use rugby_core::RugbyConfig;
use rugby_store::Store;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Back-off after a failed poll.
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "rugby-bot")]
#[command(about = "Chat bot for entering and publishing rugby match results")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value_os_t = RugbyConfig::default_path())]
    config: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
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
    let token = config.token()?;
    let channel = config
        .bot
        .channel
        .as_deref()
        .map(str::parse::<ChatTarget>)
        .transpose()
        .map_err(anyhow::Error::msg)
        .context("bot.channel")?;
    if channel.is_none() {
        tracing::warn!("no channel configured; results will be saved but not published");
    }

    let store = Store::open(&config.data_dir, config.cache_ttl());
    let poll_timeout = Duration::from_secs(config.bot.poll_timeout_secs);
    let client = TelegramClient::new(&config.bot.api_url, token, poll_timeout)?;
    if let Err(e) = client.set_my_commands(COMMANDS).await {
        tracing::warn!(error = %e, "could not register command menu");
    }

    let bot = Bot::new(
        client.clone(),
        store,
        BotOptions {
            channel,
            admin_ids: config.bot.admin_ids.clone(),
            results_page: config.results_page,
        },
    );

    tracing::info!(data_dir = %config.data_dir.display(), "bot started");
    tokio::select! {
        _ = poll(&client, &bot, config.bot.poll_timeout_secs) => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
    }
    Ok(())
}

async fn poll(client: &TelegramClient, bot: &Bot<TelegramClient>, timeout: u64) {
    let mut offset = 0;
    loop {
        let updates = match client.get_updates(offset, timeout).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "fetching updates failed");
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        };
        for update in updates {
            offset = offset.max(update.update_id + 1);
            let update_id = update.update_id;
            if let Err(e) = bot.handle_update(update).await {
                tracing::error!(update_id, error = %e, "update failed");
            }
        }
    }
}
