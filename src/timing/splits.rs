// Lap-3 derivation and per-track personal-best aggregation
//
// Everything here is a pure function of its inputs. Nothing is cached; callers
// recompute whenever the trial list changes.

use std::collections::BTreeMap;

use serde::Serialize;

use super::TimeValue;
use crate::trials::Trial;

/// The three lap segments of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LapSlot {
    Lap1,
    Lap2,
    Lap3,
}

impl LapSlot {
    pub const ALL: [LapSlot; 3] = [LapSlot::Lap1, LapSlot::Lap2, LapSlot::Lap3];

    pub fn label(self) -> &'static str {
        match self {
            LapSlot::Lap1 => "L1",
            LapSlot::Lap2 => "L2",
            LapSlot::Lap3 => "L3",
        }
    }

    fn time_of(self, trial: &Trial) -> &str {
        match self {
            LapSlot::Lap1 => &trial.lap1,
            LapSlot::Lap2 => &trial.lap2,
            LapSlot::Lap3 => &trial.lap3,
        }
    }
}

/// Fastest recorded instance of one lap slot, with the run that set it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BestLap {
    pub time: String,
    pub character: String,
    pub vehicle: String,
    pub date: String,
}

impl BestLap {
    fn from_trial(time: &str, trial: &Trial) -> Self {
        Self {
            time: time.to_string(),
            character: trial.character.clone(),
            vehicle: trial.vehicle.clone(),
            date: trial.date.clone(),
        }
    }

    pub fn time_value(&self) -> TimeValue {
        TimeValue::parse(&self.time)
    }
}

/// Best lap per slot for one track.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TrackBests {
    pub lap1: Option<BestLap>,
    pub lap2: Option<BestLap>,
    pub lap3: Option<BestLap>,
}

impl TrackBests {
    pub fn get(&self, slot: LapSlot) -> Option<&BestLap> {
        match slot {
            LapSlot::Lap1 => self.lap1.as_ref(),
            LapSlot::Lap2 => self.lap2.as_ref(),
            LapSlot::Lap3 => self.lap3.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: LapSlot) -> &mut Option<BestLap> {
        match slot {
            LapSlot::Lap1 => &mut self.lap1,
            LapSlot::Lap2 => &mut self.lap2,
            LapSlot::Lap3 => &mut self.lap3,
        }
    }

    /// Theoretical best: the three independently fastest laps added up.
    ///
    /// No single run necessarily achieved this total.
    pub fn split_sum(&self) -> Option<TimeValue> {
        split_sum(self)
    }
}

/// Best splits keyed by track name.
pub type BestSplits = BTreeMap<String, TrackBests>;

/// The third lap implied by a finish time and the first two laps.
///
/// `None` unless all three inputs parse to positive values and the remainder
/// is itself positive.
pub fn derive_lap3(finished_time: &str, lap1: &str, lap2: &str) -> Option<TimeValue> {
    let finish = TimeValue::parse(finished_time);
    let lap1 = TimeValue::parse(lap1);
    let lap2 = TimeValue::parse(lap2);
    if !finish.is_set() || !lap1.is_set() || !lap2.is_set() {
        return None;
    }
    finish
        .checked_sub(lap1)
        .and_then(|rest| rest.checked_sub(lap2))
        .filter(|lap3| lap3.is_set())
}

/// Fastest trial per track and lap slot.
///
/// Ties go to the earlier trial. The lap-1 and lap-2 slots are seeded by the
/// first trial on a track whatever its times; trials with no lap 3 never
/// enter the lap-3 slot.
pub fn best_splits(trials: &[Trial]) -> BestSplits {
    let mut splits = BestSplits::new();
    for trial in trials {
        let bests = splits.entry(trial.track.clone()).or_default();
        for slot in LapSlot::ALL {
            let time = slot.time_of(trial);
            if slot == LapSlot::Lap3 && time.is_empty() {
                continue;
            }
            let current = bests.slot_mut(slot);
            let faster = match current {
                None => true,
                Some(best) => TimeValue::parse(time) < best.time_value(),
            };
            if faster {
                *current = Some(BestLap::from_trial(time, trial));
            }
        }
    }
    splits
}

/// Fastest positive finish time among the given trials.
pub fn best_finish<'a>(trials: impl IntoIterator<Item = &'a Trial>) -> Option<TimeValue> {
    trials
        .into_iter()
        .map(Trial::finish_time)
        .filter(|finish| finish.is_set())
        .min()
}

/// Sum of the three best laps, when all three slots are filled.
pub fn split_sum(bests: &TrackBests) -> Option<TimeValue> {
    let lap1 = bests.lap1.as_ref()?.time_value();
    let lap2 = bests.lap2.as_ref()?.time_value();
    let lap3 = bests.lap3.as_ref()?.time_value();
    Some(lap1.saturating_add(lap2).saturating_add(lap3))
}
