// Plain comma-separated export and import
//
// Fields are joined and split on bare commas with no quoting. None of the
// catalog names contain a comma; free-text values that do will not survive a
// round trip.

use std::collections::HashMap;

use itertools::Itertools;

use super::ImportRecord;
use crate::errors::TrialSheetError;
use crate::trials::Trial;

pub const CSV_HEADER: &str = "track,character,vehicle,lap1,lap2,lap3,finishedTime,date";

pub fn to_csv(trials: &[Trial]) -> String {
    let rows = trials.iter().map(|t| {
        [
            t.track.as_str(),
            t.character.as_str(),
            t.vehicle.as_str(),
            t.lap1.as_str(),
            t.lap2.as_str(),
            t.lap3.as_str(),
            t.finished_time.as_str(),
            t.date.as_str(),
        ]
        .join(",")
    });
    std::iter::once(CSV_HEADER.to_string()).chain(rows).join("\n")
}

/// Parse CSV whose first line names the columns.
///
/// Values are matched to fields by column name and trimmed; missing columns
/// read as empty and blank lines are skipped. A file with no data rows is
/// [`TrialSheetError::NoDataFound`].
pub fn parse_csv(content: &str) -> Result<Vec<ImportRecord>, TrialSheetError> {
    let mut lines = content.trim().split('\n');
    let header = lines
        .next()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .collect_vec();

    let records = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let values = line.split(',').collect_vec();
            let row: HashMap<&str, &str> = header
                .iter()
                .enumerate()
                .map(|(i, name)| (*name, values.get(i).map_or("", |v| v.trim())))
                .collect();
            ImportRecord::from_fields(|name| row.get(name).map(|v| v.to_string()))
        })
        .collect_vec();

    if records.is_empty() {
        return Err(TrialSheetError::NoDataFound);
    }
    Ok(records)
}
