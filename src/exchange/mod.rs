// Import and export of trial lists as xlsx, JSON or CSV files

pub mod csv;
pub mod json;
pub mod xlsx;

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::errors::TrialSheetError;
use crate::trials::Trial;

/// File formats trials can be exported to or imported from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ExchangeFormat {
    Xlsx,
    Json,
    Csv,
}

impl ExchangeFormat {
    /// Guess the format from a file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// A trial as read from an import file, before it is given an id.
///
/// Every text field defaults to empty; `id` is only kept when it is a
/// positive integer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportRecord {
    pub track: String,
    pub character: String,
    pub vehicle: String,
    pub lap1: String,
    pub lap2: String,
    pub lap3: String,
    pub finished_time: String,
    pub date: String,
    pub id: Option<u64>,
}

impl ImportRecord {
    /// Build a record from a lookup by column or key name.
    pub(crate) fn from_fields(field: impl Fn(&str) -> Option<String>) -> Self {
        let text = |name: &str| field(name).unwrap_or_default();
        Self {
            track: text("track"),
            character: text("character"),
            vehicle: text("vehicle"),
            lap1: text("lap1"),
            lap2: text("lap2"),
            lap3: text("lap3"),
            finished_time: text("finishedTime"),
            date: text("date"),
            id: field("id").and_then(|id| parse_id(&id)),
        }
    }

    pub fn into_trial(self, fallback_id: u64) -> Trial {
        Trial {
            track: self.track,
            character: self.character,
            vehicle: self.vehicle,
            lap1: self.lap1,
            lap2: self.lap2,
            lap3: self.lap3,
            finished_time: self.finished_time,
            id: self.id.unwrap_or(fallback_id),
            date: self.date,
        }
    }
}

fn parse_id(text: &str) -> Option<u64> {
    let text = text.trim();
    let id = text.parse::<u64>().ok().or_else(|| {
        // JSON numbers such as 1.7e12 arrive as floats
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 1.0 && f.fract() == 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    })?;
    (id > 0).then_some(id)
}

/// Write `trials` to `path` in `format`.
pub fn export_to_file(
    format: ExchangeFormat,
    trials: &[Trial],
    path: &Path,
) -> Result<(), TrialSheetError> {
    let content = match format {
        ExchangeFormat::Xlsx => xlsx::to_xlsx_bytes(trials)?,
        ExchangeFormat::Json => json::to_json(trials)?.into_bytes(),
        ExchangeFormat::Csv => csv::to_csv(trials).into_bytes(),
    };
    fs::write(path, content).map_err(|e| TrialSheetError::ExportIOError {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Exported {} trials to {:?}", trials.len(), path);
    Ok(())
}

/// Read and parse an import file, choosing the parser by extension.
///
/// Only `.json` and `.csv` are understood; anything else yields
/// [`TrialSheetError::NoDataFound`].
pub fn read_import_file(path: &Path) -> Result<Vec<ImportRecord>, TrialSheetError> {
    let format = ExchangeFormat::from_path(path);
    let parse: fn(&str) -> Result<Vec<ImportRecord>, TrialSheetError> = match format {
        Some(ExchangeFormat::Json) => json::parse_json,
        Some(ExchangeFormat::Csv) => csv::parse_csv,
        Some(ExchangeFormat::Xlsx) | None => {
            warn!("Cannot import {:?}: not a .json or .csv file", path);
            return Err(TrialSheetError::NoDataFound);
        }
    };

    let content = fs::read_to_string(path).map_err(|e| TrialSheetError::ImportFailed {
        reason: e.to_string(),
    })?;
    let records = parse(&content)?;
    info!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}
