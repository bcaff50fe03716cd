// Error types for trialsheet

use snafu::Snafu;
use std::{io, path::PathBuf};

#[derive(Debug, Snafu)]
pub enum TrialSheetError {
    // Trial store errors
    #[snafu(display("Could not find application data directory to save trials"))]
    NoDataDir,
    #[snafu(display("Error reading or writing trial store {path:?}"))]
    StoreIOError { path: PathBuf, source: io::Error },
    #[snafu(display("Error serializing trial store"))]
    StoreSerializeError { source: serde_json::Error },

    // Config management errors
    #[snafu(display("Could not find application config directory"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error parsing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Export errors
    #[snafu(display("There are no trials to export"))]
    NothingToExport,
    #[snafu(display("Error writing export file {path:?}"))]
    ExportIOError { path: PathBuf, source: io::Error },
    #[snafu(display("Error serializing trials for export"))]
    ExportSerializeError { source: serde_json::Error },
    #[snafu(display("Error building spreadsheet"))]
    SpreadsheetError { source: rust_xlsxwriter::XlsxError },

    // Import errors
    #[snafu(display("Import failed: {reason}"))]
    ImportFailed { reason: String },
    #[snafu(display("No data found in file."))]
    NoDataFound,
}

impl From<rust_xlsxwriter::XlsxError> for TrialSheetError {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        TrialSheetError::SpreadsheetError { source: value }
    }
}
