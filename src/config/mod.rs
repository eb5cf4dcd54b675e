use dirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{Result, YgoError};

const CONFIG_DIR_NAME: &str = ".ygodb";
const CONFIG_FILE_NAME: &str = "config.yaml";

pub const DEFAULT_BASE_URL: &str = "http://yugioh.wikia.com";
pub const DEFAULT_PAGE_SIZE: u32 = 5000;
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub wiki: WikiConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Wiki root, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Maximum number of attempts per request
    pub max_retries: u32,
    /// Base delay for exponential backoff (milliseconds)
    pub retry_base_delay: u64,
    /// Articles requested per list page
    pub page_size: u32,
    pub user_agent: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 30,
            max_retries: 3,
            retry_base_delay: 100,
            page_size: DEFAULT_PAGE_SIZE,
            user_agent: format!("ygodb/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of card pages held in memory
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Bundled card database used in offline mode
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ygodb")
                .join("cards.db"),
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| YgoError::Config("Could not determine home directory".to_string()))?;

        Ok(home_dir.join(CONFIG_DIR_NAME))
    }

    /// Get the configuration file full path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_path()?.join(CONFIG_FILE_NAME))
    }

    /// Initialize configuration directory and file
    pub fn initialize() -> Result<()> {
        let config_dir = Self::config_path()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| YgoError::Config(format!("Failed to create config directory: {}", e)))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let permissions = fs::Permissions::from_mode(0o700);
                fs::set_permissions(&config_dir, permissions)
                    .map_err(|e| YgoError::Config(format!("Failed to set directory permissions: {}", e)))?;
            }
        }

        let config_file = Self::config_file_path()?;
        if !config_file.exists() {
            Self::default().write_to(&config_file)?;
        }

        Ok(())
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::initialize()?;

        let config_file = Self::config_file_path()?;
        let contents = fs::read_to_string(&config_file)
            .map_err(|e| YgoError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text; missing sections take defaults
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| YgoError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        Self::initialize()?;
        self.write_to(&Self::config_file_path()?)
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| YgoError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, yaml)
            .map_err(|e| YgoError::Config(format!("Failed to write config file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, permissions)
                .map_err(|e| YgoError::Config(format!("Failed to set file permissions: {}", e)))?;
        }

        Ok(())
    }

    /// Set a configuration value by key path, without saving
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        fn number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
            value
                .parse()
                .map_err(|_| YgoError::Config(format!("Invalid value for {}: {}", key, value)))
        }

        match key {
            "wiki.base_url" => self.wiki.base_url = value.trim_end_matches('/').to_string(),
            "wiki.timeout" => self.wiki.timeout = number(key, value)?,
            "wiki.max_retries" => self.wiki.max_retries = number(key, value)?,
            "wiki.retry_base_delay" => self.wiki.retry_base_delay = number(key, value)?,
            "wiki.page_size" => self.wiki.page_size = number(key, value)?,
            "wiki.user_agent" => self.wiki.user_agent = value.to_string(),
            "cache.capacity" => {
                let capacity: usize = number(key, value)?;
                if capacity == 0 {
                    return Err(YgoError::Config("cache.capacity must be at least 1".to_string()));
                }
                self.cache.capacity = capacity;
            }
            "database.path" => self.database.path = PathBuf::from(value),
            _ => {
                return Err(YgoError::Config(format!("Unknown configuration key: {}", key)));
            }
        }
        Ok(())
    }

    /// Set a configuration value by key path and persist it
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Get a configuration value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "wiki.base_url" => Some(self.wiki.base_url.clone()),
            "wiki.timeout" => Some(self.wiki.timeout.to_string()),
            "wiki.max_retries" => Some(self.wiki.max_retries.to_string()),
            "wiki.retry_base_delay" => Some(self.wiki.retry_base_delay.to_string()),
            "wiki.page_size" => Some(self.wiki.page_size.to_string()),
            "wiki.user_agent" => Some(self.wiki.user_agent.clone()),
            "cache.capacity" => Some(self.cache.capacity.to_string()),
            "database.path" => Some(self.database.path.display().to_string()),
            _ => None,
        }
    }
}
