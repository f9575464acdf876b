//! Field data block checksum
//!
//! The cabinet validates the block with a 32-bit running sum of its
//! little-endian words, seeded with `0xFEDCBAF2`. Sums past 32 bits are
//! folded with `(sum mod 0xFFFFFFFF) - 1`, which differs from plain 32-bit
//! wraparound when the sum is exactly `2 * 0xFFFFFFFF` (the fold then yields
//! -1). A parity bit, toggled for every even word and once more if the final
//! sum is even, is added to the result. The formula is reproduced exactly as
//! the hardware accepts it.

use crate::common::{HtError, HtResult};
use crate::drive::DriveHandle;
use crate::layout::BlockLayout;
use log::{info, warn};
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};

const FOLD_MODULUS: i64 = 0xFFFF_FFFF;

/// Byte range covered by the running sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumWindow {
    /// The whole block from its first byte
    #[default]
    Block,
    /// The window older PC tools summed: the same number of words,
    /// starting after the static1 slot and running past the block end, with
    /// missing bytes at end of file read as zero
    Legacy,
}

/// Options for a checksum pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChecksumOptions {
    /// Bias added to the final value; some machines need a small correction
    pub lsb_offset: i64,
    pub window: ChecksumWindow,
}

/// Outcome of a checksum pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumReport {
    /// Value in the checksum slot before the pass
    pub found: u32,
    /// Value written by the pass
    pub written: u32,
    /// Whether the magic header matched
    pub header_ok: bool,
}

impl ChecksumReport {
    /// Stored bytes of the previous checksum, as hex
    pub fn found_hex(&self) -> String {
        hex_bytes(&self.found.to_le_bytes())
    }

    /// Stored bytes of the new checksum, as hex
    pub fn written_hex(&self) -> String {
        hex_bytes(&self.written.to_le_bytes())
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fold a running sum that has overflowed 32 bits
pub fn fold(sum: i64) -> i64 {
    if sum > FOLD_MODULUS {
        sum.rem_euclid(FOLD_MODULUS) - 1
    } else {
        sum
    }
}

/// Calculate the checksum over a sequence of words
pub fn calculate_checksum(
    words: impl IntoIterator<Item = u32>,
    seed: u32,
    lsb_offset: i64,
) -> HtResult<u32> {
    let mut sum = i64::from(seed);
    let mut parity = false;

    for word in words {
        sum = fold(sum + i64::from(word));
        if word % 2 == 0 {
            parity = !parity;
        }
    }

    if sum.rem_euclid(2) == 0 {
        parity = !parity;
    }

    let checksum = sum + i64::from(parity) + lsb_offset;
    u32::try_from(checksum).map_err(|_| HtError::ChecksumOverflow(checksum))
}

fn words(bytes: &[u8]) -> impl Iterator<Item = u32> + '_ {
    bytes
        .chunks_exact(4)
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
}

/// Recompute and store the checksum of the block at `block_start`
pub fn update_checksum<F>(
    stream: &mut F,
    block_start: u64,
    layout: &BlockLayout,
    options: ChecksumOptions,
) -> HtResult<ChecksumReport>
where
    F: Read + Write + Seek,
{
    stream.seek(SeekFrom::Start(block_start))?;

    let mut prefix = [0u8; 20];
    stream.read_exact(&mut prefix)?;

    let header = &prefix[..layout.magic.len()];
    let header_ok = header == layout.magic;
    if !header_ok {
        warn!("Bad header [{}] @ {:#x}", hex_bytes(header), block_start);
    }

    let slot = layout.checksum_offset;
    let found = u32::from_le_bytes([prefix[slot], prefix[slot + 1], prefix[slot + 2], prefix[slot + 3]]);

    let mut window = Vec::with_capacity(layout.size);
    match options.window {
        ChecksumWindow::Block => {
            stream.seek(SeekFrom::Start(block_start))?;
            window.resize(layout.size, 0);
            stream.read_exact(&mut window)?;
        }
        ChecksumWindow::Legacy => {
            // The stream already sits right after the static1 slot
            Read::take(&mut *stream, layout.size as u64).read_to_end(&mut window)?;
            window.resize(layout.size, 0);
        }
    }

    let written = calculate_checksum(words(&window), layout.checksum_seed, options.lsb_offset)?;

    stream.seek(SeekFrom::Start(block_start + slot as u64))?;
    stream.write_all(&written.to_le_bytes())?;
    stream.flush()?;

    let report = ChecksumReport {
        found,
        written,
        header_ok,
    };
    info!("Checksum found: {}", report.found_hex());
    info!("Checksum wrote: {}", report.written_hex());

    Ok(report)
}

/// Recompute the checksum of a located block in place
pub fn recompute_checksum(
    handle: &DriveHandle<'_>,
    options: ChecksumOptions,
) -> HtResult<ChecksumReport> {
    let mut file = OpenOptions::new().read(true).write(true).open(handle.path())?;
    update_checksum(&mut file, handle.offset(), handle.layout(), options)
}
