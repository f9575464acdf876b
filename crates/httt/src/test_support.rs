//! Synthetic blocks shared by unit tests

use crate::layout::{HYDRO_THUNDER, SCORE_RECORD_SIZE, SPLIT_RECORD_SIZE, Section};

/// A well-formed block with recognizable contents in every section
///
/// Score slot `i` holds boat `i % 13`, initials of the `i % 26`th letter and
/// a time of `60.5 + i` seconds. Split `k` of track `t` is `20 + t + k`
/// seconds. Opaque sections carry a byte pattern and the checksum slot is 0.
pub fn sample_block() -> Vec<u8> {
    let layout = &HYDRO_THUNDER;
    let mut block: Vec<u8> = (0..layout.size).map(|i| (i * 7 % 251) as u8).collect();

    block[..8].copy_from_slice(&layout.magic);
    let checksum = layout.checksum_offset;
    block[checksum..checksum + 4].fill(0);

    let times = layout.offset_of(Section::Times);
    for slot in 0..layout.score_count {
        let at = times + slot * SCORE_RECORD_SIZE;
        block[at] = (slot % 13) as u8;
        block[at + 1..at + 4].fill(b'A' + (slot % 26) as u8);
        block[at + 4..at + 8].copy_from_slice(&(60.5 + slot as f32).to_le_bytes());
    }

    let splits = layout.offset_of(Section::Splits);
    for track in 0..layout.split_count {
        for split in 0..5 {
            let at = splits + track * SPLIT_RECORD_SIZE + split * 4;
            block[at..at + 4].copy_from_slice(&((20 + track + split) as f32).to_le_bytes());
        }
    }

    block
}
