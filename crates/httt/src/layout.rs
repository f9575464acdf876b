//! Hydro Thunder field data block layout
//!
//! The block is 8192 bytes of little-endian data stored a fixed distance
//! before the end of the cabinet's drive. It holds a magic header, a
//! checksum word, opaque configuration and audit areas, and the two tables
//! this crate edits: the high score times and the best checkpoint splits.

use std::fmt;

/// Size of one score record: boat id, 3 initials, f32 seconds
pub const SCORE_RECORD_SIZE: usize = 8;

/// Number of split times stored per track
pub const SPLITS_PER_TRACK: usize = 5;

/// Size of one split record: 5 x f32 seconds
pub const SPLIT_RECORD_SIZE: usize = SPLITS_PER_TRACK * 4;

/// Number of score slots per track
pub const SCORES_PER_TRACK: usize = 10;

/// Named sections of the block, in storage order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Header,
    Checksum,
    Static1,
    Config,
    Times,
    Static2,
    Splits,
    Audit,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Section::Header => "header",
            Section::Checksum => "checksum",
            Section::Static1 => "static1",
            Section::Config => "config",
            Section::Times => "times",
            Section::Static2 => "static2",
            Section::Splits => "splits",
            Section::Audit => "audit",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of a field data block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    /// Magic bytes at the start of the header
    pub magic: [u8; 8],
    /// Total block size in bytes
    pub size: usize,
    /// Offset of the checksum word from the block start
    pub checksum_offset: usize,
    /// Initial value of the running checksum
    pub checksum_seed: u32,
    /// Distance of each known block variant from the end of the drive
    pub start_offsets: [u64; 2],
    /// Sections in storage order with their lengths
    pub sections: [(Section, usize); 8],
    /// Number of score records in the times section
    pub score_count: usize,
    /// Number of split records (one per track) in the splits section
    pub split_count: usize,
}

impl BlockLayout {
    /// Sum of all section lengths
    pub const fn sections_total(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.sections.len() {
            total += self.sections[i].1;
            i += 1;
        }
        total
    }

    /// Byte offset of `section` from the block start
    pub const fn offset_of(&self, section: Section) -> usize {
        let mut offset = 0;
        let mut i = 0;
        while i < self.sections.len() {
            if self.sections[i].0 as usize == section as usize {
                return offset;
            }
            offset += self.sections[i].1;
            i += 1;
        }
        panic!("section missing from layout")
    }

    /// Length in bytes of `section`
    pub const fn len_of(&self, section: Section) -> usize {
        let mut i = 0;
        while i < self.sections.len() {
            if self.sections[i].0 as usize == section as usize {
                return self.sections[i].1;
            }
            i += 1;
        }
        panic!("section missing from layout")
    }

    /// Number of 32-bit words covered by the checksum
    pub const fn word_count(&self) -> usize {
        self.size / 4
    }
}

/// Layout used by every known Hydro Thunder cabinet
pub const HYDRO_THUNDER: BlockLayout = BlockLayout {
    magic: [0x01, 0x00, 0x00, 0x00, 0x98, 0xBA, 0xDC, 0xFE],
    size: 8192,
    checksum_offset: 12,
    checksum_seed: 0xFEDC_BAF2,
    start_offsets: [530_432, 333_824],
    sections: [
        (Section::Header, 12),
        (Section::Checksum, 4),
        (Section::Static1, 4),
        (Section::Config, 360),
        (Section::Times, 1040),
        (Section::Static2, 4),
        (Section::Splits, 260),
        (Section::Audit, 6508),
    ],
    score_count: 130,
    split_count: 13,
};

const _: () = assert!(HYDRO_THUNDER.sections_total() == HYDRO_THUNDER.size);
const _: () = assert!(HYDRO_THUNDER.size % 4 == 0);
const _: () = assert!(HYDRO_THUNDER.offset_of(Section::Checksum) == HYDRO_THUNDER.checksum_offset);
const _: () = assert!(
    HYDRO_THUNDER.score_count * SCORE_RECORD_SIZE == HYDRO_THUNDER.len_of(Section::Times)
);
const _: () = assert!(
    HYDRO_THUNDER.split_count * SPLIT_RECORD_SIZE == HYDRO_THUNDER.len_of(Section::Splits)
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_offsets() {
        let layout = &HYDRO_THUNDER;
        assert_eq!(layout.offset_of(Section::Header), 0);
        assert_eq!(layout.offset_of(Section::Checksum), 12);
        assert_eq!(layout.offset_of(Section::Static1), 16);
        assert_eq!(layout.offset_of(Section::Config), 20);
        assert_eq!(layout.offset_of(Section::Times), 380);
        assert_eq!(layout.offset_of(Section::Static2), 1420);
        assert_eq!(layout.offset_of(Section::Splits), 1424);
        assert_eq!(layout.offset_of(Section::Audit), 1684);
    }

    #[test]
    fn test_sections_fill_block() {
        assert_eq!(HYDRO_THUNDER.sections_total(), 8192);
        assert_eq!(HYDRO_THUNDER.word_count(), 2048);
    }

    #[test]
    fn test_section_names() {
        let names: Vec<_> = HYDRO_THUNDER.sections.iter().map(|(s, _)| s.name()).collect();
        assert_eq!(
            names,
            ["header", "checksum", "static1", "config", "times", "static2", "splits", "audit"]
        );
    }
}
