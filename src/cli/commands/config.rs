use crate::cli::args::{ConfigArgs, ConfigCommand};
use crate::config::Config;
use crate::error::Result;

/// Execute config command
pub async fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("✅ Configuration updated: {} = {}", key, value);
            Ok(())
        }
        ConfigCommand::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{}: {}", key, value),
                None => println!("Configuration key '{}' not found", key),
            }
            Ok(())
        }
        ConfigCommand::Path => {
            let path = Config::config_file_path()?;
            println!("Configuration file: {}", path.display());
            Ok(())
        }
        ConfigCommand::Init => {
            Config::initialize()?;
            let config = Config::load()?;
            println!("✅ Configuration initialized");
            println!();
            println!("Wiki:           {}", config.wiki.base_url);
            println!("Local database: {}", config.database.path.display());
            println!();
            println!("To use a mirror of the wiki, run:");
            println!("  ygodb config set wiki.base_url https://your-mirror.example");
            Ok(())
        }
    }
}
