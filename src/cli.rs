use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "leetscrape")]
#[command(about = "Search 1337x and print the listings with their magnet links")]
#[command(version)]
pub struct Cli {
    /// Override config file path
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search listings and print one line per result
    Search {
        /// Category key (all, movies, tv, music, games, anime, software, books, adult)
        #[arg(short = 'C', long, default_value = "all")]
        category: String,

        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Hand a magnet link back to the client
    Download {
        magnet: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_search() {
        let cli = Cli::try_parse_from(["leetscrape", "search", "-C", "software", "ubuntu", "server"])
            .unwrap();
        match cli.command {
            Commands::Search { category, query } => {
                assert_eq!(category, "software");
                assert_eq!(query, vec!["ubuntu", "server"]);
            }
            Commands::Download { .. } => panic!("expected search"),
        }
    }

    #[test]
    fn should_require_query() {
        assert!(Cli::try_parse_from(["leetscrape", "search"]).is_err());
    }
}
