use clap::Parser;
use leetscrape_indexer_prelude::{Indexer, IndexerBuilder};
use std::process::ExitCode;

mod cli;
mod config;
mod sink;

fn init_logs() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leetscrape=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(cfg!(debug_assertions)),
        )
        .try_init();
}

fn main() -> ExitCode {
    init_logs();

    let cli = cli::Cli::parse();
    let config = match config::Config::load(cli.config.as_deref()) {
        Ok(value) => value,
        Err(error) => {
            tracing::error!("unable to load configuration: {error}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        cli::Commands::Search { category, query } => {
            let indexer = match config.indexer.build(leetscrape_indexer_1337x::NAME.into()) {
                Ok(value) => value,
                Err(error) => {
                    tracing::error!("unable to build indexer: {error}");
                    return ExitCode::FAILURE;
                }
            };
            let mut sink = sink::PrintSink::new(std::io::stdout().lock());
            indexer.search(query.join(" ").as_str(), category.as_str(), &mut sink);
        }
        cli::Commands::Download { magnet } => {
            println!("{magnet} {magnet}");
        }
    }

    ExitCode::SUCCESS
}
