//! Locating the field data block on a drive, image, or raw capture
//!
//! A file no larger than one block is taken to be a raw capture of the
//! block itself. Anything larger is a whole drive (or an image of one) and
//! the block sits a fixed distance before its end; two such distances are
//! known, selected by the block variant.

use crate::common::{HtError, HtResult};
use crate::layout::BlockLayout;
use crate::records::{self, ScoreEntry, SplitEntry};
use crate::writer::Substitutions;
use log::info;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A located block on a drive, image, or raw file
#[derive(Debug, Clone)]
pub struct DriveHandle<'a> {
    path: PathBuf,
    size: u64,
    raw: bool,
    blocks: [Option<u64>; 2],
    variant: usize,
    layout: &'a BlockLayout,
    substitutions: Substitutions,
}

/// Locate the block in `path` for the given variant (0 or 1)
pub fn locate_block<'a>(
    path: impl AsRef<Path>,
    variant: usize,
    layout: &'a BlockLayout,
) -> HtResult<DriveHandle<'a>> {
    let path = path.as_ref();
    if variant >= layout.start_offsets.len() {
        return Err(HtError::InvalidVariant(variant));
    }

    let size = file_size(path)?;
    let raw = size <= layout.size as u64;

    let blocks = layout.start_offsets.map(|distance| {
        if raw {
            Some(0)
        } else {
            size.checked_sub(distance)
        }
    });

    if blocks[variant].is_none() {
        return Err(HtError::DeviceTooSmall {
            size,
            required: layout.start_offsets[variant],
        });
    }

    let handle = DriveHandle {
        path: path.to_path_buf(),
        size,
        raw,
        blocks,
        variant,
        layout,
        substitutions: Substitutions::default(),
    };

    info!(
        "Reading drive: {} (size {}, raw {}, block address {:#x})",
        path.display(),
        size,
        raw,
        handle.offset()
    );

    Ok(handle)
}

/// Size of a file or block device, found by seeking to its end
fn file_size(path: &Path) -> HtResult<u64> {
    let mut file = File::open(path)?;
    Ok(file.seek(SeekFrom::End(0))?)
}

impl<'a> DriveHandle<'a> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether the file is a bare block rather than a whole drive
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn variant(&self) -> usize {
        self.variant
    }

    pub fn layout(&self) -> &'a BlockLayout {
        self.layout
    }

    /// Block address for `variant`, if the drive is large enough to hold it
    pub fn block_address(&self, variant: usize) -> Option<u64> {
        self.blocks.get(variant).copied().flatten()
    }

    /// Block address for the selected variant
    pub fn offset(&self) -> u64 {
        // Checked by `locate_block`
        self.blocks[self.variant].unwrap_or_default()
    }

    pub fn substitutions(&self) -> &Substitutions {
        &self.substitutions
    }

    /// Read the whole block
    pub fn read_block(&self) -> HtResult<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.offset()))?;

        let mut block = Vec::with_capacity(self.layout.size);
        file.take(self.layout.size as u64).read_to_end(&mut block)?;
        if block.len() < self.layout.size {
            return Err(HtError::BlockTooShort {
                expected: self.layout.size,
                found: block.len(),
            });
        }
        Ok(block)
    }

    pub fn read_scores(&self) -> HtResult<Vec<ScoreEntry>> {
        records::decode_scores(&self.read_block()?, self.layout)
    }

    pub fn read_splits(&self) -> HtResult<Vec<SplitEntry>> {
        records::decode_splits(&self.read_block()?, self.layout)
    }

    /// Encode `scores` as the replacement times section for the next write
    pub fn load_times(&mut self, scores: &[ScoreEntry]) -> HtResult<()> {
        self.substitutions.times = Some(records::encode_scores(scores, self.layout)?);
        Ok(())
    }

    /// Encode `splits` as the replacement splits section for the next write
    pub fn load_splits(&mut self, splits: &[SplitEntry]) -> HtResult<()> {
        self.substitutions.splits = Some(records::encode_splits(splits, self.layout)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::HYDRO_THUNDER;
    use crate::test_support::sample_block;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_raw_block() {
        let file = temp_file(&sample_block());
        let handle = locate_block(file.path(), 1, &HYDRO_THUNDER).unwrap();

        assert!(handle.is_raw());
        assert_eq!(handle.size(), 8192);
        assert_eq!(handle.offset(), 0);
        assert_eq!(handle.block_address(0), Some(0));
    }

    #[test]
    fn test_short_raw_file_is_raw() {
        let file = temp_file(&[0u8; 100]);
        let handle = locate_block(file.path(), 0, &HYDRO_THUNDER).unwrap();

        assert!(handle.is_raw());
        assert!(matches!(
            handle.read_block(),
            Err(HtError::BlockTooShort { expected: 8192, found: 100 })
        ));
    }

    #[test]
    fn test_device_variant_one() {
        let size = 333_824 + 8192;
        let file = temp_file(&vec![0u8; size]);
        let handle = locate_block(file.path(), 1, &HYDRO_THUNDER).unwrap();

        assert!(!handle.is_raw());
        assert_eq!(handle.offset(), size as u64 - 333_824);
        // Variant 0 lies before the start of this small image
        assert_eq!(handle.block_address(0), None);
    }

    #[test]
    fn test_device_too_small_for_variant() {
        let file = temp_file(&vec![0u8; 333_824 + 8192]);
        assert!(matches!(
            locate_block(file.path(), 0, &HYDRO_THUNDER),
            Err(HtError::DeviceTooSmall { required: 530_432, .. })
        ));
    }

    #[test]
    fn test_invalid_variant() {
        let file = temp_file(&sample_block());
        assert!(matches!(
            locate_block(file.path(), 2, &HYDRO_THUNDER),
            Err(HtError::InvalidVariant(2))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            locate_block(dir.path().join("missing.img"), 0, &HYDRO_THUNDER),
            Err(HtError::Io(_))
        ));
    }

    #[test]
    fn test_reads_block_from_device_end() {
        let mut device = vec![0xFFu8; 600_000];
        let start = device.len() - 530_432;
        device[start..start + 8192].copy_from_slice(&sample_block());
        let file = temp_file(&device);

        let handle = locate_block(file.path(), 0, &HYDRO_THUNDER).unwrap();
        assert_eq!(handle.offset(), start as u64);
        assert_eq!(handle.read_block().unwrap(), sample_block());
        assert_eq!(handle.read_scores().unwrap().len(), 130);
        assert_eq!(handle.read_splits().unwrap().len(), 13);
    }

    #[test]
    fn test_load_tables_sets_substitutions() {
        let file = temp_file(&sample_block());
        let mut handle = locate_block(file.path(), 0, &HYDRO_THUNDER).unwrap();
        assert!(handle.substitutions().is_empty());

        let scores = handle.read_scores().unwrap();
        handle.load_times(&scores).unwrap();
        assert_eq!(handle.substitutions().times.as_ref().map(Vec::len), Some(1040));
        assert!(handle.substitutions().splits.is_none());

        let splits = handle.read_splits().unwrap();
        handle.load_splits(&splits[..12]).unwrap_err();
        handle.load_splits(&splits).unwrap();
        assert_eq!(handle.substitutions().splits.as_ref().map(Vec::len), Some(260));
    }
}
