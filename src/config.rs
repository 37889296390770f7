use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    default_config as defaults,
    search::{Order, QueryError, SearchQuery, SortField},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub github: ConfigGithub,
    pub database: ConfigDatabase,
    pub tokens: Tokens,
    /// path for storing temporary items
    pub temp_dir_path: PathBuf,
    pub state_file_location: PathBuf,
    /// Where reports go when no explicit path is given
    pub report_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: ConfigGithub::default(),
            database: ConfigDatabase::default(),
            tokens: Tokens::default(),
            temp_dir_path: PathBuf::from(defaults::TEMP_DIR_LOCATION),
            state_file_location: PathBuf::from(defaults::STATE_FILE_LOCATION),
            report_dir: PathBuf::from(defaults::REPORT_DIR_LOCATION),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Invalid config file: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Config {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let reader = io::BufReader::new(fs::File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the default config, pretty printed, to `path`
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        let mut writer = io::BufWriter::new(fs::File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &Config::default())?;
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigGithub {
    /// Base of the REST API, without trailing path
    pub api_url: String,
    pub api_version: String,
    pub user_agent: String,
    /// Results per page, 1 to 100
    pub page_size: u32,
    /// Safety cap on pages fetched for a single search
    pub max_pages: u32,
    /// Lookback for users without a previous search
    pub lookback_days: u32,
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub order: Order,
}

impl Default for ConfigGithub {
    fn default() -> Self {
        Self {
            api_url: defaults::github::API_URL.to_owned(),
            api_version: defaults::github::API_VERSION.to_owned(),
            user_agent: defaults::github::USER_AGENT.to_owned(),
            page_size: defaults::github::PAGE_SIZE,
            max_pages: defaults::github::MAX_PAGES,
            lookback_days: defaults::github::LOOKBACK_DAYS,
            sort: SortField::default(),
            order: Order::default(),
        }
    }
}

impl ConfigGithub {
    /// Apply the configured sort, order, page size and page limit to a query
    pub fn bounded(&self, query: SearchQuery) -> Result<SearchQuery, QueryError> {
        query
            .with_sort(self.sort)
            .with_order(self.order)
            .with_page_size(self.page_size)?
            .with_max_pages(self.max_pages)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigDatabase {
    /// Used when `DATABASE_URL` is not set
    pub url: String,
    pub issues_table_name: String,
}

impl Default for ConfigDatabase {
    fn default() -> Self {
        Self {
            url: defaults::database::URL.to_owned(),
            issues_table_name: defaults::database::ISSUES_TABLE_NAME.to_owned(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Tokens {
    pub github: Option<String>,
}
