// Trial store: the ordered list of recorded runs and its persistence

pub mod storage;
pub mod types;

pub use storage::{FileBasedStorage, TrialStorage};
pub use types::{Trial, TrialEntry};

use std::collections::HashSet;

use chrono::{DateTime, Local};
use itertools::Itertools;
use log::{debug, info, warn};

use crate::catalog::{OptionKind, compare_names};
use crate::errors::TrialSheetError;
use crate::exchange::ImportRecord;
use crate::timing::{BestSplits, best_splits};

/// Short date in the `M/D/YYYY` shape used for the `date` field
const DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Recorded runs in insertion order, written through to `S` on every change.
pub struct TrialStore<S: TrialStorage> {
    storage: S,
    trials: Vec<Trial>,
}

impl<S: TrialStorage> TrialStore<S> {
    /// Load the store once from `storage`. A missing or corrupt store opens empty.
    pub fn open(storage: S) -> Self {
        let trials = storage.load_trials();
        Self { storage, trials }
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get(&self, id: u64) -> Option<&Trial> {
        self.trials.iter().find(|t| t.id == id)
    }

    /// Commit `entry` as a new trial stamped with the current time.
    ///
    /// Returns `Ok(None)` without touching the store when the entry is
    /// incomplete.
    pub fn add(&mut self, entry: TrialEntry) -> Result<Option<&Trial>, TrialSheetError> {
        self.add_at(entry, Local::now())
    }

    /// Commit `entry` as if it were entered at `now`.
    pub fn add_at(
        &mut self,
        entry: TrialEntry,
        now: DateTime<Local>,
    ) -> Result<Option<&Trial>, TrialSheetError> {
        if !entry.is_complete() {
            debug!("Refusing incomplete entry: {:?}", entry);
            return Ok(None);
        }
        if !OptionKind::Tracks.contains(&entry.track) {
            warn!("Track {:?} is not in the track list", entry.track);
        }

        let id = self.next_id(now);
        let date = now.format(DATE_FORMAT).to_string();
        let trial = entry.into_trial(id, date);
        info!(
            "Recording {} run on {} (lap 3: {:?})",
            trial.finished_time, trial.track, trial.lap3
        );

        self.trials.push(trial);
        self.persist()?;
        Ok(self.trials.last())
    }

    /// Remove the trial with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: u64) -> Result<bool, TrialSheetError> {
        let initial_len = self.trials.len();
        self.trials.retain(|t| t.id != id);
        let removed = self.trials.len() != initial_len;
        if removed {
            info!("Removed trial {}", id);
        } else {
            debug!("No trial with id {} to remove", id);
        }
        self.persist()?;
        Ok(removed)
    }

    /// Replace every trial with the imported `records`.
    ///
    /// Records without a usable id get `now` in epoch milliseconds plus
    /// their position. An empty import fails with
    /// [`TrialSheetError::NoDataFound`] and leaves the store as it was.
    pub fn import(
        &mut self,
        records: Vec<ImportRecord>,
        now: DateTime<Local>,
    ) -> Result<usize, TrialSheetError> {
        if records.is_empty() {
            return Err(TrialSheetError::NoDataFound);
        }
        let base_id = epoch_millis(now);
        let trials = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| record.into_trial(base_id.saturating_add(position as u64)))
            .collect_vec();
        self.replace_all(trials)?;
        Ok(self.trials.len())
    }

    /// Wholesale replace, persisting the new list.
    pub fn replace_all(&mut self, trials: Vec<Trial>) -> Result<(), TrialSheetError> {
        info!("Replacing {} trials with {}", self.trials.len(), trials.len());
        self.trials = trials;
        self.persist()
    }

    /// Trials recorded on `track`, in insertion order.
    pub fn for_track<'a>(&'a self, track: &'a str) -> impl Iterator<Item = &'a Trial> + 'a {
        self.trials.iter().filter(move |t| t.track == track)
    }

    /// Distinct tracks that have at least one trial, sorted by name.
    pub fn logged_tracks(&self) -> Vec<&str> {
        self.trials
            .iter()
            .map(|t| t.track.as_str())
            .unique()
            .sorted_by(|a, b| compare_names(a, b))
            .collect()
    }

    pub fn best_splits(&self) -> BestSplits {
        best_splits(&self.trials)
    }

    fn next_id(&self, now: DateTime<Local>) -> u64 {
        let candidate = epoch_millis(now);
        match self.trials.iter().map(|t| t.id).max() {
            Some(max) if max >= candidate => max
                .checked_add(1)
                .unwrap_or_else(|| self.lowest_free_id(candidate)),
            _ => candidate,
        }
    }

    /// First id at or after `from` that no trial holds, wrapping past the top.
    /// Zero is skipped since imports read it as a missing id.
    fn lowest_free_id(&self, from: u64) -> u64 {
        let used: HashSet<u64> = self.trials.iter().map(|t| t.id).collect();
        let from = from.max(1);
        (from..=u64::MAX)
            .chain(1..from)
            .find(|id| !used.contains(id))
            .unwrap_or(from)
    }

    fn persist(&mut self) -> Result<(), TrialSheetError> {
        self.storage.save_trials(&self.trials)
    }
}

fn epoch_millis(now: DateTime<Local>) -> u64 {
    now.timestamp_millis().max(0) as u64
}
