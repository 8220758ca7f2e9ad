//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// JSON:API articles demo
#[derive(Parser, Debug)]
#[command(name = "jsonapi-demo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server base URL for client commands (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the JSON:API server with seeded data
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Number of articles to seed (overrides the config file)
        #[arg(long)]
        seed: Option<usize>,
    },

    /// Fetch one page of the articles listing
    Articles {
        /// Page number (paged strategy)
        #[arg(long)]
        page: Option<u64>,

        /// Page size (paged strategy)
        #[arg(long)]
        size: Option<u32>,

        /// Offset (offset strategy)
        #[arg(long, conflicts_with = "page")]
        offset: Option<u64>,

        /// Limit (offset strategy)
        #[arg(long, conflicts_with = "size")]
        limit: Option<u32>,
    },

    /// Load an article, apply edits and save it
    Edit {
        /// Article id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body
        #[arg(long)]
        body: Option<String>,
    },

    /// Validate the configuration file and print the effective settings
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON (one document per line)
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit() {
        let cli = Cli::parse_from([
            "jsonapi-demo",
            "edit",
            "3",
            "--title",
            "Rocannon's World",
            "-c",
            "demo.yaml",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("demo.yaml")));
        match cli.command {
            Commands::Edit { id, title, body } => {
                assert_eq!(id, "3");
                assert_eq!(title.as_deref(), Some("Rocannon's World"));
                assert!(body.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_articles_defaults() {
        let cli = Cli::parse_from(["jsonapi-demo", "articles", "--page", "2"]);
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(matches!(
            cli.command,
            Commands::Articles {
                page: Some(2),
                size: None,
                ..
            }
        ));
    }

    #[test]
    fn test_offset_conflicts_with_page() {
        let parsed = Cli::try_parse_from(["jsonapi-demo", "articles", "--page", "1", "--offset", "2"]);
        assert!(parsed.is_err());
    }
}
