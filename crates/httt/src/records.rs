//! Score and split table codec
//!
//! The times section holds 130 eight-byte records, ten per track in track
//! order: a boat id, three ASCII initials and an `f32` time in seconds. The
//! splits section holds one record per track of five `f32` checkpoint times.
//! Tracks are never stored; they follow from a record's position.

use crate::common::{HtError, HtResult};
use crate::duration;
use crate::layout::{BlockLayout, SCORE_RECORD_SIZE, SPLIT_RECORD_SIZE, SPLITS_PER_TRACK, Section};
use crate::types::{Boat, Track};

/// Width of the initials field
pub const INITIALS_LEN: usize = 3;

/// One high score slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub track: Track,
    pub initials: String,
    pub boat: Boat,
    /// Clock text `MM:SS.ff`
    pub time: String,
}

/// Best checkpoint times for one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitEntry {
    pub track: Track,
    /// Clock text for splits 1 to 5
    pub splits: [String; SPLITS_PER_TRACK],
}

/// Borrow `section` out of a whole block
fn section_bytes<'a>(block: &'a [u8], layout: &BlockLayout, section: Section) -> HtResult<&'a [u8]> {
    let start = layout.offset_of(section);
    let end = start + layout.len_of(section);
    block.get(start..end).ok_or(HtError::BlockTooShort {
        expected: end,
        found: block.len(),
    })
}

/// Check that `initials` fit the three-byte ASCII field
pub fn check_initials(initials: &str) -> HtResult<()> {
    if !initials.is_ascii() || initials.len() > INITIALS_LEN {
        return Err(HtError::InvalidInitials(initials.to_string()));
    }
    Ok(())
}

/// Check that a record at `index` is for the track owning that slot
pub fn check_track(index: usize, expected: Track, found: Track) -> HtResult<()> {
    if expected != found {
        return Err(HtError::TrackMismatch {
            index,
            expected,
            found,
        });
    }
    Ok(())
}

fn time_field(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

/// Decode all score records from a block
pub fn decode_scores(block: &[u8], layout: &BlockLayout) -> HtResult<Vec<ScoreEntry>> {
    let times = section_bytes(block, layout, Section::Times)?;

    times
        .chunks_exact(SCORE_RECORD_SIZE)
        .enumerate()
        .map(|(index, record)| {
            let boat = Boat::from_id(record[0])?;
            let initials = &record[1..1 + INITIALS_LEN];
            if !initials.is_ascii() {
                return Err(HtError::InvalidInitials(
                    String::from_utf8_lossy(initials).into_owned(),
                ));
            }

            Ok(ScoreEntry {
                track: Track::for_score(index),
                initials: initials.iter().map(|&b| char::from(b)).collect(),
                boat,
                time: duration::decode(time_field(&record[4..]))?,
            })
        })
        .collect()
}

/// Encode score records into a times section
///
/// Exactly one entry per slot is required, in slot order: each entry's
/// track must be the track owning its position. Initials shorter than three
/// characters are padded with spaces; longer ones are rejected.
pub fn encode_scores(entries: &[ScoreEntry], layout: &BlockLayout) -> HtResult<Vec<u8>> {
    if entries.len() != layout.score_count {
        return Err(HtError::RowCount {
            table: "scores",
            expected: layout.score_count,
            found: entries.len(),
        });
    }

    let mut bytes = Vec::with_capacity(layout.len_of(Section::Times));
    for (index, entry) in entries.iter().enumerate() {
        check_track(index, Track::for_score(index), entry.track)?;
        check_initials(&entry.initials)?;

        bytes.push(entry.boat.id());
        bytes.extend_from_slice(format!("{:<3}", entry.initials).as_bytes());
        bytes.extend_from_slice(&duration::encode(&entry.time)?);
    }

    debug_assert_eq!(bytes.len(), layout.len_of(Section::Times));
    Ok(bytes)
}

/// Decode all split records from a block
pub fn decode_splits(block: &[u8], layout: &BlockLayout) -> HtResult<Vec<SplitEntry>> {
    let splits = section_bytes(block, layout, Section::Splits)?;

    splits
        .chunks_exact(SPLIT_RECORD_SIZE)
        .enumerate()
        .map(|(index, record)| {
            let mut times: [String; SPLITS_PER_TRACK] = Default::default();
            for (time, field) in times.iter_mut().zip(record.chunks_exact(4)) {
                *time = duration::decode(time_field(field))?;
            }

            Ok(SplitEntry {
                track: Track::for_split(index),
                splits: times,
            })
        })
        .collect()
}

/// Encode split records into a splits section
pub fn encode_splits(entries: &[SplitEntry], layout: &BlockLayout) -> HtResult<Vec<u8>> {
    if entries.len() != layout.split_count {
        return Err(HtError::RowCount {
            table: "splits",
            expected: layout.split_count,
            found: entries.len(),
        });
    }

    let mut bytes = Vec::with_capacity(layout.len_of(Section::Splits));
    for (index, entry) in entries.iter().enumerate() {
        check_track(index, Track::for_split(index), entry.track)?;
        for time in &entry.splits {
            bytes.extend_from_slice(&duration::encode(time)?);
        }
    }

    debug_assert_eq!(bytes.len(), layout.len_of(Section::Splits));
    Ok(bytes)
}
