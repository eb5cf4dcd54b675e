use clap::{Args, Subcommand};

/// A card, named by its exact title. Unquoted words are joined with spaces.
#[derive(Args, Debug)]
pub struct CardArgs {
    /// Card name, e.g. "Dark Magician"
    #[arg(required = true, num_args = 1.., value_name = "NAME")]
    pub words: Vec<String>,
}

impl CardArgs {
    pub fn name(&self) -> String {
        self.words.join(" ")
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show at most this many names
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Only names containing this text (case-insensitive)
    #[arg(short, long)]
    pub contains: Option<String>,
}

/// Configuration management arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., wiki.base_url, cache.capacity)
        key: String,
        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show configuration file path
    Path,

    /// Initialize configuration file
    Init,
}
