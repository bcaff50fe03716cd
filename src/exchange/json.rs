// JSON export and import of the trial list

use serde_json::Value;

use super::ImportRecord;
use crate::errors::TrialSheetError;
use crate::trials::Trial;

/// Pretty-printed JSON array of the trials exactly as stored.
pub fn to_json(trials: &[Trial]) -> Result<String, TrialSheetError> {
    serde_json::to_string_pretty(trials)
        .map_err(|e| TrialSheetError::ExportSerializeError { source: e })
}

/// Parse a JSON array of trial-like objects.
///
/// Anything other than a non-empty array is [`TrialSheetError::NoDataFound`];
/// an array holding something other than objects fails the import.
pub fn parse_json(content: &str) -> Result<Vec<ImportRecord>, TrialSheetError> {
    let value: Value = serde_json::from_str(content).map_err(|e| TrialSheetError::ImportFailed {
        reason: e.to_string(),
    })?;

    let items = match value {
        Value::Array(items) if !items.is_empty() => items,
        _ => return Err(TrialSheetError::NoDataFound),
    };

    items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let object = item.as_object().ok_or_else(|| TrialSheetError::ImportFailed {
                reason: format!("record {} is not an object", position + 1),
            })?;
            Ok(ImportRecord::from_fields(|name| {
                object.get(name).and_then(value_text)
            }))
        })
        .collect()
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trial() -> Trial {
        Trial {
            track: "Sky-High Sundae".to_string(),
            character: "Peach".to_string(),
            vehicle: "Plushbuggy".to_string(),
            lap1: "35.100".to_string(),
            lap2: "34.900".to_string(),
            lap3: "35.000".to_string(),
            finished_time: "1:45.000".to_string(),
            id: 1_741_946_400_000,
            date: "3/14/2025".to_string(),
        }
    }

    #[test]
    fn test_to_json_is_pretty_with_stored_names() {
        let json = to_json(&[sample_trial()]).unwrap();
        assert!(json.starts_with("[\n  {\n    \"track\": \"Sky-High Sundae\""));
        assert!(json.contains("\"finishedTime\": \"1:45.000\""));
        assert!(json.contains("\"id\": 1741946400000"));
    }

    #[test]
    fn test_to_json_empty() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_parse_json_reads_exported_trials() {
        let json = to_json(&[sample_trial()]).unwrap();
        let records = parse_json(&json).unwrap();
        assert_eq!(records.len(), 1);
        let trial = records[0].clone().into_trial(1);
        assert_eq!(trial, sample_trial());
    }

    #[test]
    fn test_parse_json_tolerates_missing_and_odd_fields() {
        let records =
            parse_json(r#"[{"track": "DK Pass", "lap1": 31, "lap3": null, "extra": [1]}]"#)
                .unwrap();
        assert_eq!(records[0].track, "DK Pass");
        assert_eq!(records[0].lap1, "31");
        assert_eq!(records[0].lap3, "");
        assert_eq!(records[0].character, "");
        assert_eq!(records[0].id, None);
    }

    #[test]
    fn test_parse_json_without_data() {
        assert!(matches!(parse_json("[]"), Err(TrialSheetError::NoDataFound)));
        assert!(matches!(parse_json("{}"), Err(TrialSheetError::NoDataFound)));
        assert!(matches!(parse_json("null"), Err(TrialSheetError::NoDataFound)));
    }

    #[test]
    fn test_parse_json_malformed() {
        let err = parse_json("[{\"track\": ").unwrap_err();
        assert!(matches!(err, TrialSheetError::ImportFailed { .. }));
        assert!(err.to_string().starts_with("Import failed: "));

        assert!(matches!(
            parse_json("[1, 2]"),
            Err(TrialSheetError::ImportFailed { .. })
        ));
    }
}
