// Workbook export: a summary sheet plus one sheet per track

use std::collections::HashSet;

use itertools::Itertools;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::catalog::{TRACKS, compare_names};
use crate::errors::TrialSheetError;
use crate::timing::{BestLap, BestSplits, best_finish, best_splits, display_time};
use crate::trials::Trial;

pub const SUMMARY_SHEET: &str = "Summary";

const SUMMARY_COLUMNS: [(&str, f64); 7] = [
    ("Track", 24.0),
    ("Runs", 6.0),
    ("Best Lap 1", 12.0),
    ("Best Lap 2", 12.0),
    ("Best Lap 3", 12.0),
    ("Best Split Sum", 14.0),
    ("Best Finish", 12.0),
];

const TRACK_COLUMNS: [(&str, f64); 7] = [
    ("Date", 12.0),
    ("Character", 16.0),
    ("Vehicle", 18.0),
    ("Lap 1", 10.0),
    ("Lap 2", 10.0),
    ("Lap 3", 10.0),
    ("Finished", 10.0),
];

const MAX_SHEET_NAME_CHARS: usize = 31;
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// One row of the summary sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryRow {
    pub track: String,
    pub runs: usize,
    pub best_lap1: String,
    pub best_lap2: String,
    pub best_lap3: String,
    pub best_split_sum: String,
    pub best_finish: String,
}

/// Summary rows for catalog tracks that have at least one run, in catalog
/// order. Runs on tracks outside the catalog only get their own sheet.
pub fn summary_rows(trials: &[Trial]) -> Vec<SummaryRow> {
    let splits: BestSplits = best_splits(trials);
    TRACKS
        .iter()
        .filter_map(|track| {
            let bests = splits.get(*track)?;
            let runs = trials.iter().filter(|t| t.track == *track).collect_vec();
            let best_lap = |slot: &Option<BestLap>| {
                slot.as_ref()
                    .map(|best| display_time(&best.time))
                    .unwrap_or_default()
            };
            Some(SummaryRow {
                track: track.to_string(),
                runs: runs.len(),
                best_lap1: best_lap(&bests.lap1),
                best_lap2: best_lap(&bests.lap2),
                best_lap3: best_lap(&bests.lap3),
                best_split_sum: bests
                    .split_sum()
                    .map(|sum| sum.to_string())
                    .unwrap_or_default(),
                best_finish: best_finish(runs.iter().copied())
                    .map(|finish| finish.to_string())
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// Build the workbook for `trials`.
///
/// An empty list is [`TrialSheetError::NothingToExport`]; a workbook needs at
/// least one sheet.
pub fn build_workbook(trials: &[Trial]) -> Result<Workbook, TrialSheetError> {
    if trials.is_empty() {
        return Err(TrialSheetError::NothingToExport);
    }

    let mut workbook = Workbook::new();
    let mut used_names = HashSet::new();

    let summary = summary_rows(trials);
    if !summary.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET)?;
        used_names.insert(SUMMARY_SHEET.to_lowercase());
        write_header(sheet, &SUMMARY_COLUMNS)?;
        for (row, line) in (1u32..).zip(&summary) {
            sheet.write_string(row, 0, line.track.as_str())?;
            sheet.write_number(row, 1, line.runs as f64)?;
            for (col, value) in (2u16..).zip([
                &line.best_lap1,
                &line.best_lap2,
                &line.best_lap3,
                &line.best_split_sum,
                &line.best_finish,
            ]) {
                write_text(sheet, row, col, value)?;
            }
        }
    }

    let by_track = trials.iter().into_group_map_by(|t| t.track.as_str());
    for track in by_track.keys().sorted_by(|a, b| compare_names(a, b)) {
        let sheet = workbook.add_worksheet();
        sheet.set_name(unique_sheet_name(track, &mut used_names))?;
        write_header(sheet, &TRACK_COLUMNS)?;
        for (row, run) in (1u32..).zip(&by_track[track]) {
            write_text(sheet, row, 0, &run.date)?;
            write_text(sheet, row, 1, &run.character)?;
            write_text(sheet, row, 2, &run.vehicle)?;
            write_text(sheet, row, 3, &display_time(&run.lap1))?;
            write_text(sheet, row, 4, &display_time(&run.lap2))?;
            write_text(sheet, row, 5, &display_time(&run.lap3))?;
            write_text(sheet, row, 6, &display_time(&run.finished_time))?;
        }
    }

    Ok(workbook)
}

pub fn to_xlsx_bytes(trials: &[Trial]) -> Result<Vec<u8>, TrialSheetError> {
    let mut workbook = build_workbook(trials)?;
    Ok(workbook.save_to_buffer()?)
}

/// Sheet name for `track`: forbidden characters replaced, cut to 31
/// characters, and suffixed when it would clash with an earlier sheet.
/// Excel also rejects names that start or end with an apostrophe.
pub fn unique_sheet_name(track: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = track
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches('\'');
    let base = if cleaned.is_empty() { "Track" } else { cleaned };

    let mut name = clip_sheet_name(base, MAX_SHEET_NAME_CHARS);
    let mut suffix = 2;
    while !used.insert(name.to_lowercase()) {
        let tag = format!(" ({suffix})");
        let keep = MAX_SHEET_NAME_CHARS - tag.chars().count();
        name = clip_sheet_name(base, keep) + &tag;
        suffix += 1;
    }
    name
}

/// First `limit` characters of `base` with any apostrophes the cut exposed
/// removed from the end.
fn clip_sheet_name(base: &str, limit: usize) -> String {
    let clipped: String = base.chars().take(limit).collect();
    clipped.trim_end_matches('\'').to_string()
}

fn write_header(sheet: &mut Worksheet, columns: &[(&str, f64)]) -> Result<(), TrialSheetError> {
    for (col, (title, width)) in (0u16..).zip(columns) {
        sheet.write_string(0, col, *title)?;
        sheet.set_column_width(col, *width)?;
    }
    Ok(())
}

/// Empty values leave the cell blank.
fn write_text(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
) -> Result<(), TrialSheetError> {
    if !value.is_empty() {
        sheet.write_string(row, col, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(track: &str, lap1: &str, lap3: &str, finish: &str) -> Trial {
        Trial {
            track: track.to_string(),
            character: "Luigi".to_string(),
            vehicle: "B Dasher".to_string(),
            lap1: lap1.to_string(),
            lap2: "30.000".to_string(),
            lap3: lap3.to_string(),
            finished_time: finish.to_string(),
            id: 1,
            date: "2/2/2025".to_string(),
        }
    }

    #[test]
    fn test_summary_rows_follow_catalog_order() {
        let trials = vec![
            trial("Wario Stadium", "30.000", "30.000", "1:30.000"),
            trial("Acorn Heights", "29.000", "", "1:29.500"),
            trial("Not A Real Track", "29.000", "", "1:29.500"),
            trial("Wario Stadium", "29.500", "31.000", "1:30.500"),
        ];
        let rows = summary_rows(&trials);
        assert_eq!(
            rows.iter().map(|r| r.track.as_str()).collect_vec(),
            vec!["Acorn Heights", "Wario Stadium"]
        );

        let acorn = &rows[0];
        assert_eq!(acorn.runs, 1);
        assert_eq!(acorn.best_lap3, "");
        assert_eq!(acorn.best_split_sum, "");
        assert_eq!(acorn.best_finish, "1:29.500");

        let wario = &rows[1];
        assert_eq!(wario.runs, 2);
        assert_eq!(wario.best_lap1, "29.500");
        assert_eq!(wario.best_lap3, "30.000");
        assert_eq!(wario.best_split_sum, "1:29.500");
        assert_eq!(wario.best_finish, "1:30.000");
    }

    #[test]
    fn test_summary_best_lap_uses_display_format() {
        let rows = summary_rows(&[trial("DK Pass", "90.000", "0", "2:00.000")]);
        assert_eq!(rows[0].best_lap1, "1:30.000");
        assert_eq!(rows[0].best_lap3, "--:--.---");
    }

    #[test]
    fn test_sheet_names() {
        let mut used = HashSet::from([SUMMARY_SHEET.to_lowercase()]);
        assert_eq!(
            unique_sheet_name("Great ? Block Ruins", &mut used),
            "Great _ Block Ruins"
        );
        assert_eq!(
            unique_sheet_name("A Very Long Custom Track Name Indeed", &mut used),
            "A Very Long Custom Track Name I"
        );
        assert_eq!(
            unique_sheet_name("A Very Long Custom Track Name Indeed!", &mut used),
            "A Very Long Custom Track Na (2)"
        );
        assert_eq!(unique_sheet_name("summary", &mut used), "summary (2)");
        assert_eq!(unique_sheet_name("", &mut used), "Track");
    }

    #[test]
    fn test_sheet_name_cut_at_an_apostrophe() {
        let track = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAA's Raceway";
        let mut used = HashSet::new();
        assert_eq!(unique_sheet_name(track, &mut used), "A".repeat(30));
        assert_eq!(
            unique_sheet_name(track, &mut used),
            format!("{} (2)", "A".repeat(27))
        );

        let mut used = HashSet::new();
        assert_eq!(
            unique_sheet_name("AAAAAAAAAAAAAAAAAAAAAAAAAA'Raceway", &mut used),
            "AAAAAAAAAAAAAAAAAAAAAAAAAA'Race"
        );
        assert_eq!(
            unique_sheet_name("AAAAAAAAAAAAAAAAAAAAAAAAAA'Raceway!", &mut used),
            format!("{} (2)", "A".repeat(26))
        );
    }

    #[test]
    fn test_workbook_with_apostrophe_at_the_cut() {
        let trials = vec![trial(
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAA's Raceway",
            "30.000",
            "30.000",
            "1:30.000",
        )];
        let bytes = to_xlsx_bytes(&trials).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_empty_export_is_refused() {
        assert!(matches!(
            build_workbook(&[]),
            Err(TrialSheetError::NothingToExport)
        ));
    }

    #[test]
    fn test_workbook_bytes() {
        let trials = vec![
            trial("Great ? Block Ruins", "30.000", "30.000", "1:30.000"),
            trial("Mario Circuit", "30.000", "", "1:30.000"),
        ];
        let bytes = to_xlsx_bytes(&trials).unwrap();
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }
}
