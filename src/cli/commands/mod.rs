pub mod card;
pub mod config;
pub mod list;
pub mod show;
pub mod version;

use std::sync::Arc;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::connectivity::StaticConnectivity;
use crate::error::Result;
use crate::progress::{ProgressManager, Spinner};
use crate::router::CardRepository;

/// Global flags shared by every card command
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub format: OutputFormat,
    pub offline: bool,
    pub verbose: bool,
}

impl Context {
    /// Build the repository from the saved configuration
    pub fn repository(&self) -> Result<CardRepository> {
        let config = Config::load()?;
        let connectivity = Arc::new(StaticConnectivity::new(!self.offline));
        CardRepository::from_config(&config, connectivity)
    }

    pub fn progress(&self) -> Arc<ProgressManager> {
        // Spinners would corrupt JSON piped to another program
        let quiet = self.format == OutputFormat::Json;
        Arc::new(ProgressManager::new(quiet, self.verbose))
    }
}

/// Build the card index behind a spinner
pub(crate) async fn index_cards(repo: &CardRepository, progress: Arc<ProgressManager>) -> Result<()> {
    let spinner = Spinner::new(progress, "Indexing cards...");
    spinner.set_message(&format!("Indexing cards from the {}...", repo.current_source()));

    repo.ensure_indexed().await?;

    spinner.finish_with_message(&format!("Indexed {} cards", repo.index().len().await));
    Ok(())
}
