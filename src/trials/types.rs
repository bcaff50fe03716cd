// Core data structures for recorded time-trial runs

use serde::{Deserialize, Serialize};

use crate::timing::{TimeValue, derive_lap3};

/// One recorded time-trial run.
///
/// Time fields keep the text the user typed; they are only interpreted through
/// [`TimeValue::parse`] when compared or displayed.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub track: String,
    pub character: String,
    pub vehicle: String,
    pub lap1: String,
    pub lap2: String,
    /// Derived from the finish time at commit; empty when it could not be.
    #[serde(default)]
    pub lap3: String,
    pub finished_time: String,
    /// Commit time in epoch milliseconds, unique within a store
    pub id: u64,
    /// Human-readable commit date, e.g. `3/14/2025`
    #[serde(default)]
    pub date: String,
}

impl Trial {
    pub fn lap1_time(&self) -> TimeValue {
        TimeValue::parse(&self.lap1)
    }

    pub fn lap2_time(&self) -> TimeValue {
        TimeValue::parse(&self.lap2)
    }

    pub fn lap3_time(&self) -> TimeValue {
        TimeValue::parse(&self.lap3)
    }

    pub fn finish_time(&self) -> TimeValue {
        TimeValue::parse(&self.finished_time)
    }
}

/// A run being entered, before it has an id or date.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrialEntry {
    pub track: String,
    pub character: String,
    pub vehicle: String,
    pub lap1: String,
    pub lap2: String,
    pub finished_time: String,
}

impl TrialEntry {
    /// True once every field a stored trial requires has been filled in.
    pub fn is_complete(&self) -> bool {
        [
            &self.track,
            &self.character,
            &self.vehicle,
            &self.lap1,
            &self.lap2,
            &self.finished_time,
        ]
        .iter()
        .all(|field| !field.is_empty())
    }

    /// Third lap implied by the finish time, if the entry allows one.
    pub fn lap3(&self) -> Option<TimeValue> {
        derive_lap3(&self.finished_time, &self.lap1, &self.lap2)
    }

    pub(crate) fn into_trial(self, id: u64, date: String) -> Trial {
        let lap3 = self.lap3().map(|t| t.to_string()).unwrap_or_default();
        Trial {
            track: self.track,
            character: self.character,
            vehicle: self.vehicle,
            lap1: self.lap1,
            lap2: self.lap2,
            lap3,
            finished_time: self.finished_time,
            id,
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_entry() -> TrialEntry {
        TrialEntry {
            track: "Mario Circuit".to_string(),
            character: "Mario".to_string(),
            vehicle: "Rally Kart".to_string(),
            lap1: "20.000".to_string(),
            lap2: "20.000".to_string(),
            finished_time: "1:05.000".to_string(),
        }
    }

    #[test]
    fn test_entry_completeness() {
        assert!(complete_entry().is_complete());
        assert!(!TrialEntry::default().is_complete());

        let entry = TrialEntry {
            vehicle: String::new(),
            ..complete_entry()
        };
        assert!(!entry.is_complete());
    }

    #[test]
    fn test_entry_derives_lap3_on_commit() {
        let trial = complete_entry().into_trial(42, "3/14/2025".to_string());
        assert_eq!(trial.lap3, "25.000");
        assert_eq!(trial.id, 42);
        assert_eq!(trial.date, "3/14/2025");
    }

    #[test]
    fn test_entry_without_lap3_commits_empty() {
        let entry = TrialEntry {
            finished_time: "30.000".to_string(),
            ..complete_entry()
        };
        let trial = entry.into_trial(1, String::new());
        assert_eq!(trial.lap3, "");
    }

    #[test]
    fn test_trial_serializes_with_original_field_names() {
        let trial = complete_entry().into_trial(1_700_000_000_000, "11/14/2023".to_string());
        let json = serde_json::to_value(&trial).unwrap();
        assert_eq!(json["finishedTime"], "1:05.000");
        assert_eq!(json["lap3"], "25.000");
        assert_eq!(json["id"], 1_700_000_000_000u64);
    }

    #[test]
    fn test_trial_without_lap3_or_date_deserializes() {
        let json = r#"{"track":"DK Pass","character":"Toad","vehicle":"Cloud 9",
            "lap1":"40.000","lap2":"41.000","finishedTime":"2:00.000","id":7}"#;
        let trial: Trial = serde_json::from_str(json).unwrap();
        assert_eq!(trial.lap3, "");
        assert_eq!(trial.date, "");
        assert_eq!(trial.finish_time().millis(), 120_000);
    }
}
