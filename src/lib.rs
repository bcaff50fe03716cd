// Library interface for trialsheet
// This allows integration tests to access internal modules

pub mod catalog;
pub mod config;
pub mod errors;
pub mod exchange;
pub mod timing;
pub mod trials;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::TrialSheetError;
pub use exchange::{ExchangeFormat, ImportRecord};
pub use timing::{BestLap, LapSlot, TimeValue, TrackBests, display_time};
pub use trials::{FileBasedStorage, Trial, TrialEntry, TrialStorage, TrialStore};
