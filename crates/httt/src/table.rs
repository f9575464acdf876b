//! CSV import and export of the score and split tables
//!
//! Column names match the exported schema exactly: `Track, Initials, Boat,
//! Timestamp` for scores and `Track, Split 1` .. `Split 5` for splits. Rows
//! are written and read in block order; the track column is checked on
//! import but a row's position decides where it is stored.

use crate::common::{HtError, HtResult, Span};
use crate::duration;
use crate::records::{self, ScoreEntry, SplitEntry};
use crate::types::{Boat, Track};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Column headers of the scores table
pub const SCORE_COLUMNS: [&str; 4] = ["Track", "Initials", "Boat", "Timestamp"];

/// Column headers of the splits table
pub const SPLIT_COLUMNS: [&str; 6] = ["Track", "Split 1", "Split 2", "Split 3", "Split 4", "Split 5"];

/// One row of the scores table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    #[serde(rename = "Track")]
    pub track: String,
    #[serde(rename = "Initials")]
    pub initials: String,
    #[serde(rename = "Boat")]
    pub boat: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

/// One row of the splits table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRow {
    #[serde(rename = "Track")]
    pub track: String,
    #[serde(rename = "Split 1")]
    pub split_1: String,
    #[serde(rename = "Split 2")]
    pub split_2: String,
    #[serde(rename = "Split 3")]
    pub split_3: String,
    #[serde(rename = "Split 4")]
    pub split_4: String,
    #[serde(rename = "Split 5")]
    pub split_5: String,
}

impl From<&ScoreEntry> for ScoreRow {
    fn from(entry: &ScoreEntry) -> Self {
        Self {
            track: entry.track.name().to_string(),
            initials: entry.initials.clone(),
            boat: entry.boat.name().to_string(),
            timestamp: entry.time.clone(),
        }
    }
}

impl ScoreRow {
    /// Convert the row found at position `index` of the table
    pub fn to_entry(&self, index: usize) -> HtResult<ScoreEntry> {
        let track = Track::from_name(&self.track)?;
        records::check_track(index, Track::for_score(index), track)?;
        records::check_initials(&self.initials)?;
        duration::parse_seconds(&self.timestamp)?;

        Ok(ScoreEntry {
            track,
            initials: self.initials.clone(),
            boat: Boat::from_name(&self.boat)?,
            time: self.timestamp.clone(),
        })
    }
}

impl From<&SplitEntry> for SplitRow {
    fn from(entry: &SplitEntry) -> Self {
        let [split_1, split_2, split_3, split_4, split_5] = entry.splits.clone();
        Self {
            track: entry.track.name().to_string(),
            split_1,
            split_2,
            split_3,
            split_4,
            split_5,
        }
    }
}

impl SplitRow {
    /// Convert the row found at position `index` of the table
    pub fn to_entry(&self, index: usize) -> HtResult<SplitEntry> {
        let track = Track::from_name(&self.track)?;
        records::check_track(index, Track::for_split(index), track)?;

        let splits = [
            self.split_1.clone(),
            self.split_2.clone(),
            self.split_3.clone(),
            self.split_4.clone(),
            self.split_5.clone(),
        ];
        for split in &splits {
            duration::parse_seconds(split)?;
        }
        Ok(SplitEntry { track, splits })
    }
}

/// Write the scores table as CSV
pub fn write_scores<W: io::Write>(writer: W, scores: &[ScoreEntry]) -> HtResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for entry in scores {
        csv.serialize(ScoreRow::from(entry))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the splits table as CSV
pub fn write_splits<W: io::Write>(writer: W, splits: &[SplitEntry]) -> HtResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for entry in splits {
        csv.serialize(SplitRow::from(entry))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_scores_file(path: &Path, scores: &[ScoreEntry]) -> HtResult<()> {
    write_scores(fs::File::create(path)?, scores)
}

pub fn write_splits_file(path: &Path, splits: &[SplitEntry]) -> HtResult<()> {
    write_splits(fs::File::create(path)?, splits)
}

/// Span of the line starting at `start`, without its line terminator
fn line_span(source: &str, start: usize) -> Span {
    let rest = &source[start.min(source.len())..];
    let line = rest.split('\n').next().unwrap_or_default();
    Span::new(start, start + line.trim_end_matches('\r').len())
}

/// Parse every row of a CSV table, converting each with `convert` and its
/// position
///
/// Errors carry the line and byte span of the offending row in `source`.
fn read_rows<Row, Entry>(
    source: &str,
    file: &Path,
    convert: impl Fn(&Row, usize) -> HtResult<Entry>,
) -> HtResult<Vec<Entry>>
where
    Row: for<'de> Deserialize<'de>,
{
    let mut reader = csv::Reader::from_reader(source.as_bytes());
    let headers = reader.headers()?.clone();

    let mut entries = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|err| {
            let (line, span) = err
                .position()
                .map(|pos| (pos.line(), line_span(source, pos.byte() as usize)))
                .unwrap_or_default();
            HtError::table(file, err.to_string(), line, span)
        })?;

        let (line, span) = record
            .position()
            .map(|pos| (pos.line(), line_span(source, pos.byte() as usize)))
            .unwrap_or_default();

        let row: Row = record
            .deserialize(Some(&headers))
            .map_err(|err| HtError::table(file, err.to_string(), line, span))?;
        let entry = convert(&row, index).map_err(|err| HtError::table(file, err.to_string(), line, span))?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Read a scores table from CSV text
pub fn read_scores(source: &str, file: &Path) -> HtResult<Vec<ScoreEntry>> {
    read_rows(source, file, ScoreRow::to_entry)
}

/// Read a splits table from CSV text
pub fn read_splits(source: &str, file: &Path) -> HtResult<Vec<SplitEntry>> {
    read_rows(source, file, SplitRow::to_entry)
}

pub fn read_scores_file(path: &Path) -> HtResult<Vec<ScoreEntry>> {
    read_scores(&fs::read_to_string(path)?, path)
}

pub fn read_splits_file(path: &Path) -> HtResult<Vec<SplitEntry>> {
    read_splits(&fs::read_to_string(path)?, path)
}
