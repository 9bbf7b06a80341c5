use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_updater::{
    config::Config,
    services::{AggregateService, CatalogService, StreamResolver, UpdateService},
    utils::{DocumentFetcher, StandardHttpClient},
};

#[derive(Parser)]
#[command(name = "m3u-updater")]
#[command(version = "0.1.0")]
#[command(about = "Finds live stream URLs for TV channels and keeps an M3U playlist current")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve configured channels from their pages and update the playlist
    Update {
        /// Only update this channel (repeatable)
        #[arg(long = "channel", value_name = "NAME")]
        channels: Vec<String>,

        /// Playlist to write (overrides config file)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Merge tagged channels from remote playlists
    Aggregate {
        /// Playlist to write (overrides config file)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Discover channels on a collection page and look up their streams
    Catalog {
        /// Playlist to write (overrides config file)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("m3u_updater={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting M3U Updater v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    let fetcher: Arc<dyn DocumentFetcher> = Arc::new(StandardHttpClient::from_config(&config.http)?);

    match cli.command {
        Command::Update { channels, output } => {
            if let Some(output) = output {
                config.update.output_path = output;
            }
            let resolver = StreamResolver::from_config(&config)?;
            let service = UpdateService::new(fetcher, resolver, &config.update);
            if let Some(summary) = service.run(&channels).await? {
                info!(
                    "Update finished: {} changed, {} unchanged",
                    summary.changed, summary.unchanged
                );
            }
        }
        Command::Aggregate { output } => {
            if let Some(output) = output {
                config.aggregate.output_path = output;
            }
            let summary = AggregateService::new(fetcher, &config.aggregate).run().await?;
            info!("Aggregate finished: {} entries written", summary.written);
        }
        Command::Catalog { output } => {
            let Some(mut catalog) = config.catalog.take() else {
                bail!("No [catalog] section in {}", cli.config);
            };
            if let Some(output) = output {
                catalog.output_path = output;
            }
            let service = CatalogService::new(fetcher, &catalog)?;
            match service.run().await? {
                Some(summary) => info!("Catalog finished: {} entries written", summary.written),
                None => info!("Catalog finished without streams"),
            }
        }
    }

    Ok(())
}
