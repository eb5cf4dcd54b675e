pub mod args;
pub mod commands;

use clap::{Parser, Subcommand};

use crate::model::AdditionalInfoKind;
use crate::router::CardQuery;

/// Trading card lookup from the wiki or a local card database
#[derive(Parser, Debug)]
#[command(
    name = "ygodb",
    about = "Look up trading card text, stats, banlist status and rulings from the terminal",
    version,
    author,
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read from the local card database instead of the wiki
    #[arg(long, global = true, env = "YGODB_OFFLINE")]
    pub offline: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List known card names
    #[command(alias = "ls")]
    List(args::ListArgs),

    /// Show a card's text
    Lore(args::CardArgs),

    /// Show a card's attribute, type and stats
    #[command(alias = "i")]
    Info(args::CardArgs),

    /// Show a card's TCG/OCG banlist status
    Status(args::CardArgs),

    /// Show a card's rulings
    Ruling(args::CardArgs),

    /// Show tips for playing a card
    Tips(args::CardArgs),

    /// Show a card's trivia
    Trivia(args::CardArgs),

    /// Show the link to a card's image
    Image(args::CardArgs),

    /// Show everything known about a card
    #[command(alias = "s")]
    Show(args::CardArgs),

    /// Manage configuration
    #[command(alias = "c")]
    Config(args::ConfigArgs),

    /// Show version information
    Version,
}

impl Cli {
    /// Run the CLI application
    pub async fn run() -> crate::error::Result<()> {
        let cli = Self::parse();

        // Set up logging
        let default_filter = if cli.verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
            .init();

        let context = commands::Context {
            format: cli.format,
            offline: cli.offline,
            verbose: cli.verbose,
        };

        let result = match cli.command {
            Commands::List(args) => commands::list::execute(args, &context).await,
            Commands::Lore(args) => commands::card::execute(CardQuery::Lore, args, &context).await,
            Commands::Info(args) => commands::card::execute(CardQuery::Info, args, &context).await,
            Commands::Status(args) => {
                commands::card::execute(CardQuery::Status, args, &context).await
            }
            Commands::Ruling(args) => {
                let query = CardQuery::Additional(AdditionalInfoKind::Ruling);
                commands::card::execute(query, args, &context).await
            }
            Commands::Tips(args) => {
                let query = CardQuery::Additional(AdditionalInfoKind::Tips);
                commands::card::execute(query, args, &context).await
            }
            Commands::Trivia(args) => {
                let query = CardQuery::Additional(AdditionalInfoKind::Trivia);
                commands::card::execute(query, args, &context).await
            }
            Commands::Image(args) => commands::card::execute(CardQuery::Image, args, &context).await,
            Commands::Show(args) => commands::show::execute(args, &context).await,
            Commands::Config(args) => commands::config::execute(args).await,
            Commands::Version => {
                commands::version::execute();
                Ok(())
            }
        };

        // Handle errors with better messaging
        if let Err(e) = &result {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.hint() {
                eprintln!("\nHint: {}", hint);
            } else if !cli.verbose {
                eprintln!("\nRun with --verbose for more details.");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_card_command_with_global_flags() {
        let cli = Cli::try_parse_from(["ygodb", "info", "Dark Magician", "--offline", "-f", "json"])
            .unwrap();
        assert!(cli.offline);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Info(args) => assert_eq!(args.name(), "Dark Magician"),
            other => panic!("Expected info command, got {:?}", other),
        }
    }

    #[test]
    fn test_card_name_words_are_joined() {
        let cli = Cli::try_parse_from(["ygodb", "ruling", "Pot", "of", "Greed"]).unwrap();
        match cli.command {
            Commands::Ruling(args) => assert_eq!(args.name(), "Pot of Greed"),
            other => panic!("Expected ruling command, got {:?}", other),
        }
    }
}
