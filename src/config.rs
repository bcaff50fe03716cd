use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::TrialSheetError;
use crate::exchange::ExchangeFormat;
use crate::trials::FileBasedStorage;

const APP_DIR_NAME: &str = "trialsheet";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the trial store location in the data directory
    pub store_path: Option<PathBuf>,
    pub xlsx_file_name: String,
    pub json_file_name: String,
    pub csv_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            xlsx_file_name: "mario-kart-time-trials.xlsx".to_string(),
            json_file_name: "time-trials.json".to_string(),
            csv_file_name: "time-trials.csv".to_string(),
        }
    }
}

impl AppConfig {
    pub fn default_config_path() -> Result<PathBuf, TrialSheetError> {
        Ok(dirs::config_dir()
            .ok_or(TrialSheetError::NoConfigDir)?
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    /// Read the config from the user config directory, `None` if there is none.
    pub fn from_local_file() -> Result<Option<Self>, TrialSheetError> {
        Self::from_file(&Self::default_config_path()?)
    }

    pub fn from_file(config_path: &Path) -> Result<Option<Self>, TrialSheetError> {
        if !config_path.exists() {
            debug!("No config file at {:?}", config_path);
            return Ok(None);
        }

        let file = std::fs::File::open(config_path)
            .map_err(|e| TrialSheetError::ConfigIOError { source: e })?;
        serde_json::from_reader(file)
            .map(Some)
            .map_err(|e| TrialSheetError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<PathBuf, TrialSheetError> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), TrialSheetError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TrialSheetError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| TrialSheetError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| TrialSheetError::ConfigSerializeError { source: e })
    }

    /// Where the trial store lives: the configured path or the data directory.
    pub fn resolve_store_path(&self) -> Result<PathBuf, TrialSheetError> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => FileBasedStorage::default_storage_path(),
        }
    }

    pub fn export_file_name(&self, format: ExchangeFormat) -> &str {
        match format {
            ExchangeFormat::Xlsx => &self.xlsx_file_name,
            ExchangeFormat::Json => &self.json_file_name,
            ExchangeFormat::Csv => &self.csv_file_name,
        }
    }
}
