// Storage implementation for trial persistence

use crate::errors::TrialSheetError;
use crate::trials::types::Trial;
use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "trials.json";

/// Trait defining the interface for trial persistence
pub trait TrialStorage {
    /// Load every stored trial, in insertion order.
    ///
    /// A missing or unreadable store yields an empty list, not an error.
    fn load_trials(&self) -> Vec<Trial>;

    /// Replace the stored trials with `trials`
    fn save_trials(&mut self, trials: &[Trial]) -> Result<(), TrialSheetError>;
}

/// Keeps all trials in a single JSON array file
pub struct FileBasedStorage {
    file_path: PathBuf,
}

impl FileBasedStorage {
    /// Create a storage backed by `file_path`. The file is created on first save.
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    /// Create storage in the default application data directory
    pub fn new_default() -> Result<Self, TrialSheetError> {
        Ok(Self::new(Self::default_storage_path()?))
    }

    /// Get the default path of the trial store
    pub fn default_storage_path() -> Result<PathBuf, TrialSheetError> {
        let app_data_dir = dirs::data_dir().ok_or(TrialSheetError::NoDataDir)?;
        Ok(app_data_dir.join("trialsheet").join(STORE_FILE_NAME))
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn io_error(&self, source: std::io::Error) -> TrialSheetError {
        TrialSheetError::StoreIOError {
            path: self.file_path.clone(),
            source,
        }
    }
}

impl TrialStorage for FileBasedStorage {
    fn load_trials(&self) -> Vec<Trial> {
        if !self.file_path.exists() {
            debug!("Trial store does not exist yet: {:?}", self.file_path);
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read trial store {:?}: {}", self.file_path, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Option<Vec<Trial>>>(&content) {
            Ok(trials) => {
                let trials = trials.unwrap_or_default();
                debug!("Loaded {} trials from {:?}", trials.len(), self.file_path);
                trials
            }
            Err(e) => {
                warn!(
                    "Ignoring corrupt trial store {:?}: {}",
                    self.file_path, e
                );
                Vec::new()
            }
        }
    }

    fn save_trials(&mut self, trials: &[Trial]) -> Result<(), TrialSheetError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let content = serde_json::to_string_pretty(trials)
            .map_err(|e| TrialSheetError::StoreSerializeError { source: e })?;

        // Write to temporary file first
        let temp_path = self.file_path.with_extension("json.tmp");
        {
            let mut temp_file = fs::File::create(&temp_path).map_err(|e| self.io_error(e))?;
            temp_file
                .write_all(content.as_bytes())
                .map_err(|e| self.io_error(e))?;
            temp_file.sync_all().map_err(|e| self.io_error(e))?;
        }

        fs::rename(&temp_path, &self.file_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            self.io_error(e)
        })?;

        debug!("Saved {} trials to {:?}", trials.len(), self.file_path);
        Ok(())
    }
}
