mod callback;
mod commands;
mod gateway;
mod i18n;
mod keyboards;
mod usecases;
mod wizard;

#[cfg(test)]
mod test_support;

use clap::{Parser, Subcommand};
use sprout_channels::telegram::TelegramChannel;
use sprout_core::config::{self, shellexpand, BOT_TOKEN_ENV};
use sprout_store::Store;
use std::path::Path;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use usecases::UseCases;

#[derive(Parser)]
#[command(
    name = "sprout",
    version,
    about = "Sprout — houseplant watering reminders on Telegram"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Print configuration and database statistics.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_logging(&cfg.sprout.log_level, &cfg.sprout.log_file)?;

    match cli.command {
        Commands::Start => {
            let tg = match cfg.channel.telegram {
                Some(ref tg) if tg.enabled => tg.clone(),
                _ => anyhow::bail!(
                    "Telegram is not enabled. Enable [channel.telegram] in config.toml."
                ),
            };
            if tg.bot_token.is_empty() {
                anyhow::bail!(
                    "Telegram is enabled but bot_token is empty. \
                     Set it in config.toml or {BOT_TOKEN_ENV} env var."
                );
            }
            let channel = Arc::new(TelegramChannel::new(tg));

            let store = Store::new(&cfg.database).await?;
            let usecases = UseCases::new(store);

            println!("Sprout — starting {}...", cfg.sprout.name);
            let gw = gateway::Gateway::new(channel, usecases, cfg.scheduler.clone());
            Arc::new(gw).run().await?;
        }
        Commands::Status => {
            println!("Sprout — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Database: {}", shellexpand(&cfg.database.db_path));
            println!();

            if let Some(ref tg) = cfg.channel.telegram {
                println!(
                    "  telegram: {}",
                    if tg.enabled && !tg.bot_token.is_empty() {
                        "configured"
                    } else if tg.enabled {
                        "enabled but missing bot_token"
                    } else {
                        "disabled"
                    }
                );
            } else {
                println!("  telegram: not configured");
            }
            println!(
                "  scheduler: {} (every {}s, from {}:00)",
                if cfg.scheduler.enabled {
                    "enabled"
                } else {
                    "disabled"
                },
                cfg.scheduler.poll_interval_secs,
                cfg.scheduler.send_hour,
            );
            println!();

            let store = Store::new(&cfg.database).await?;
            let stats = store.stats().await?;
            println!("  users:         {}", stats.users);
            println!("  groups:        {}", stats.groups);
            println!("  plants:        {}", stats.plants);
            println!("  notifications: {}", stats.notifications);
        }
    }

    Ok(())
}

/// Console logging, plus a log file when `log_file` is set.
///
/// `RUST_LOG` overrides `log_level`. The returned guard flushes the file
/// writer and must live until exit.
fn init_logging(log_level: &str, log_file: &str) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let (file_layer, guard) = if log_file.is_empty() {
        (None, None)
    } else {
        let path = shellexpand(log_file);
        let path = Path::new(&path);
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("log_file has no file name: {log_file}"))?;
        std::fs::create_dir_all(dir)?;
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
        (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();
    Ok(guard)
}
