//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::{EditController, HttpStore, Route};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::pagination::PageParams;
use crate::resource::{Article, Document, Resource};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let mut config = self.load_config()?;

        match &self.cli.command {
            Commands::Serve { port, seed } => {
                if let Some(port) = port {
                    config.server.port = *port;
                }
                if let Some(seed) = seed {
                    config.seed.articles = *seed;
                }
                crate::cli::serve(&config).await
            }
            Commands::Articles {
                page,
                size,
                offset,
                limit,
            } => {
                let params = page_params(*page, *size, *offset, *limit);
                self.articles(&config, &params).await
            }
            Commands::Edit { id, title, body } => {
                self.edit(&config, id, title.as_deref(), body.as_deref())
                    .await
            }
            Commands::Validate => self.print(&config),
        }
    }

    /// Load the configuration file, or the defaults when none is given
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.cli.config {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                AppConfig::from_file(path)?
            }
            None => AppConfig::default(),
        };
        if let Some(base_url) = &self.cli.base_url {
            config.client.base_url.clone_from(base_url);
            config.validate()?;
        }
        Ok(config)
    }

    /// Fetch and print one page of articles
    async fn articles(&self, config: &AppConfig, params: &PageParams) -> Result<()> {
        let store = HttpStore::from_settings(&config.client)?;
        let document = store.fetch_page(Article::KIND, params).await?;

        if self.cli.verbose {
            if let Some(meta) = &document.meta {
                info!(records = meta.record_count(), "Fetched page");
            }
        }
        self.print(&document)
    }

    /// Drive one article through load, edit and save
    async fn edit(
        &self,
        config: &AppConfig,
        id: &str,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<()> {
        let store = HttpStore::from_settings(&config.client)?;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller = EditController::new(Arc::new(store), tx, id)
            .with_save_timeout(config.client.save_timeout());

        info!(route = %Route::ArticleEdit { id: id.to_string() }, "Opening editor");
        controller.load().await?;

        if title.is_none() && body.is_none() {
            return Err(Error::config("Nothing to change (use --title and/or --body)"));
        }
        if let Some(title) = title {
            controller.set_title(title)?;
        }
        if let Some(body) = body {
            controller.set_body(body)?;
        }

        controller.save().await?;

        while let Ok(route) = rx.try_recv() {
            info!(%route, "Navigated");
        }

        let saved = controller
            .working_copy()
            .ok_or_else(|| Error::Other("Saved article missing from editor".to_string()))?;
        self.print(&Document::single(saved.to_resource()))
    }

    /// Print a value in the selected output format
    fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }
}

/// Page parameters from the command-line flags; offset flags win when present
fn page_params(
    page: Option<u64>,
    size: Option<u32>,
    offset: Option<u64>,
    limit: Option<u32>,
) -> PageParams {
    if offset.is_some() || limit.is_some() {
        PageParams {
            offset: offset.map(|o| o as i64),
            limit: limit.map(i64::from),
            ..Default::default()
        }
    } else {
        PageParams {
            number: page.map(|n| n as i64),
            size: size.map(i64::from),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_page_params_from_flags() {
        assert_eq!(page_params(Some(3), Some(2), None, None), PageParams::paged(3, 2));
        assert_eq!(page_params(None, None, Some(4), Some(2)), PageParams::offset(4, 2));
        assert_eq!(page_params(None, None, None, None), PageParams::default());
    }

    #[test]
    fn test_load_config_with_base_url_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pagination:\n  strategy: offset\n  default_page_size: 3").unwrap();

        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            base_url: Some("http://example.test:9000".to_string()),
            format: OutputFormat::Json,
            verbose: false,
            command: Commands::Validate,
        };
        let config = Runner::new(cli).load_config().unwrap();

        assert_eq!(config.pagination.default_page_size, 3);
        assert_eq!(config.client.base_url, "http://example.test:9000");
    }

    #[test]
    fn test_load_config_rejects_bad_base_url() {
        let cli = Cli {
            config: None,
            base_url: Some("not a url".to_string()),
            format: OutputFormat::Json,
            verbose: false,
            command: Commands::Validate,
        };
        assert!(Runner::new(cli).load_config().is_err());
    }
}
