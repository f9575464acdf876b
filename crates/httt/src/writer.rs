//! Whole-block copy with table substitution
//!
//! A block is always written in full, section by section. The times and
//! splits sections can be replaced by freshly encoded bytes; every other
//! section, including the stale checksum, is copied from the source
//! unchanged. The checksum must be recomputed afterwards.

use crate::common::{HtError, HtResult};
use crate::drive::DriveHandle;
use crate::layout::{BlockLayout, Section};
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Encoded replacements for the editable sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    pub times: Option<Vec<u8>>,
    pub splits: Option<Vec<u8>>,
}

impl Substitutions {
    pub fn is_empty(&self) -> bool {
        self.times.is_none() && self.splits.is_none()
    }

    /// Where the bytes of `section` come from
    pub fn source_for(&self, section: Section) -> SectionSource<'_> {
        let replacement = match section {
            Section::Times => self.times.as_deref(),
            Section::Splits => self.splits.as_deref(),
            _ => None,
        };
        replacement.map_or(SectionSource::Copy, SectionSource::Replace)
    }
}

/// Source of truth for one section of the written block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionSource<'a> {
    /// Copy the section from the source block
    Copy,
    /// Write these bytes instead
    Replace(&'a [u8]),
}

/// One step of a block copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionStep<'a> {
    pub section: Section,
    pub len: usize,
    pub source: SectionSource<'a>,
}

/// Build the ordered copy plan, checking replacement lengths up front
pub fn section_plan<'a>(
    layout: &BlockLayout,
    substitutions: &'a Substitutions,
) -> HtResult<Vec<SectionStep<'a>>> {
    layout
        .sections
        .iter()
        .map(|&(section, len)| {
            let source = substitutions.source_for(section);
            if let SectionSource::Replace(bytes) = source {
                if bytes.len() != len {
                    return Err(HtError::SectionLength {
                        section: section.name(),
                        expected: len,
                        found: bytes.len(),
                    });
                }
            }
            Ok(SectionStep { section, len, source })
        })
        .collect()
}

/// Copy one block from `src` to `dst`, substituting sections
pub fn copy_block<R, W>(
    src: &mut R,
    src_offset: u64,
    dst: &mut W,
    dst_offset: u64,
    layout: &BlockLayout,
    substitutions: &Substitutions,
) -> HtResult<()>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let plan = section_plan(layout, substitutions)?;

    src.seek(SeekFrom::Start(src_offset))?;
    dst.seek(SeekFrom::Start(dst_offset))?;

    let mut buffer = Vec::new();
    for step in plan {
        match step.source {
            SectionSource::Copy => {
                buffer.resize(step.len, 0);
                src.read_exact(&mut buffer)?;
                dst.write_all(&buffer)?;
            }
            SectionSource::Replace(bytes) => {
                debug!("Replacing {} section ({} bytes)", step.section, step.len);
                src.seek(SeekFrom::Current(step.len as i64))?;
                dst.write_all(bytes)?;
            }
        }
    }

    dst.flush()?;
    Ok(())
}

/// How the destination file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteTarget {
    /// Update an existing drive or image in place
    #[default]
    InPlace,
    /// Create (or truncate) a standalone raw block file
    Create,
}

/// Write `source`'s block, with its loaded substitutions, into `dest_path`
///
/// The source block is read in full before the destination is opened, so
/// the destination may be the source file itself.
pub fn write_block(
    source: &DriveHandle,
    dest_path: &Path,
    dest_offset: u64,
    target: WriteTarget,
) -> HtResult<()> {
    section_plan(source.layout(), source.substitutions())?;
    let mut src = Cursor::new(source.read_block()?);

    let mut dst = match target {
        WriteTarget::InPlace => OpenOptions::new().read(true).write(true).open(dest_path)?,
        WriteTarget::Create => File::create(dest_path)?,
    };

    info!(
        "Writing block from {} @ {:#x} to {} @ {:#x}",
        source.path().display(),
        source.offset(),
        dest_path.display(),
        dest_offset
    );

    copy_block(
        &mut src,
        0,
        &mut dst,
        dest_offset,
        source.layout(),
        source.substitutions(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::HYDRO_THUNDER;
    use crate::test_support::sample_block;
    use crate::drive::locate_block;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn section(block: &[u8], section: Section) -> &[u8] {
        let start = HYDRO_THUNDER.offset_of(section);
        &block[start..start + HYDRO_THUNDER.len_of(section)]
    }

    #[test]
    fn test_plain_copy_is_identical() {
        let block = sample_block();
        let mut src = Cursor::new(block.clone());
        let mut dst = Cursor::new(Vec::new());

        copy_block(&mut src, 0, &mut dst, 0, &HYDRO_THUNDER, &Substitutions::default()).unwrap();
        assert_eq!(dst.into_inner(), block);
    }

    #[test]
    fn test_copy_between_offsets() {
        let block = sample_block();
        let mut source = vec![0xEEu8; 100];
        source.extend_from_slice(&block);
        let mut src = Cursor::new(source);
        let mut dst = Cursor::new(vec![0x11u8; 9000]);

        copy_block(&mut src, 100, &mut dst, 500, &HYDRO_THUNDER, &Substitutions::default()).unwrap();

        let written = dst.into_inner();
        assert_eq!(written.len(), 9000);
        assert!(written[..500].iter().all(|&b| b == 0x11));
        assert_eq!(&written[500..500 + 8192], &block[..]);
        assert!(written[500 + 8192..].iter().all(|&b| b == 0x11));
    }

    #[test]
    fn test_substitutes_only_editable_sections() {
        let block = sample_block();
        let substitutions = Substitutions {
            times: Some(vec![0xAA; 1040]),
            splits: Some(vec![0x55; 260]),
        };
        let mut src = Cursor::new(block.clone());
        let mut dst = Cursor::new(Vec::new());

        copy_block(&mut src, 0, &mut dst, 0, &HYDRO_THUNDER, &substitutions).unwrap();
        let written = dst.into_inner();

        assert_eq!(written.len(), 8192);
        assert!(section(&written, Section::Times).iter().all(|&b| b == 0xAA));
        assert!(section(&written, Section::Splits).iter().all(|&b| b == 0x55));
        for other in [
            Section::Header,
            Section::Checksum,
            Section::Static1,
            Section::Config,
            Section::Static2,
            Section::Audit,
        ] {
            assert_eq!(section(&written, other), section(&block, other), "{other}");
        }
    }

    #[test]
    fn test_times_only_substitution_keeps_splits() {
        let block = sample_block();
        let substitutions = Substitutions {
            times: Some(vec![0; 1040]),
            splits: None,
        };
        let mut src = Cursor::new(block.clone());
        let mut dst = Cursor::new(Vec::new());

        copy_block(&mut src, 0, &mut dst, 0, &HYDRO_THUNDER, &substitutions).unwrap();
        let written = dst.into_inner();

        assert_eq!(section(&written, Section::Splits), section(&block, Section::Splits));
        assert_eq!(section(&written, Section::Audit), section(&block, Section::Audit));
    }

    #[test]
    fn test_wrong_length_substitute_writes_nothing() {
        let substitutions = Substitutions {
            times: None,
            splits: Some(vec![0; 259]),
        };
        let mut src = Cursor::new(sample_block());
        let mut dst = Cursor::new(Vec::new());

        let err = copy_block(&mut src, 0, &mut dst, 0, &HYDRO_THUNDER, &substitutions).unwrap_err();
        assert!(matches!(
            err,
            HtError::SectionLength { section: "splits", expected: 260, found: 259 }
        ));
        assert!(dst.into_inner().is_empty());
    }

    #[test]
    fn test_short_source_fails() {
        let mut src = Cursor::new(vec![0u8; 4000]);
        let mut dst = Cursor::new(Vec::new());

        let err = copy_block(&mut src, 0, &mut dst, 0, &HYDRO_THUNDER, &Substitutions::default())
            .unwrap_err();
        assert!(matches!(err, HtError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_create_over_source_keeps_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block.bin");
        fs::write(&path, sample_block()).unwrap();

        let mut source = locate_block(&path, 0, &HYDRO_THUNDER).unwrap();
        let splits = source.read_splits().unwrap();
        source.load_splits(&splits).unwrap();
        write_block(&source, &path, 0, WriteTarget::Create).unwrap();

        assert_eq!(fs::read(&path).unwrap(), sample_block());
    }

    #[test]
    fn test_create_from_device_writes_bare_block() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("drive.img");
        let raw = dir.path().join("raw.bin");
        let mut device = vec![0x77u8; 340_000];
        let start = device.len() - 333_824;
        device[start..start + 8192].copy_from_slice(&sample_block());
        fs::write(&image, &device).unwrap();

        let source = locate_block(&image, 1, &HYDRO_THUNDER).unwrap();
        write_block(&source, &raw, 0, WriteTarget::Create).unwrap();

        assert_eq!(fs::read(&raw).unwrap(), sample_block());
    }

    #[test]
    fn test_plan_order() {
        let substitutions = Substitutions {
            times: Some(vec![1; 1040]),
            splits: None,
        };
        let plan = section_plan(&HYDRO_THUNDER, &substitutions).unwrap();

        let sections: Vec<_> = plan.iter().map(|step| step.section).collect();
        assert_eq!(sections, HYDRO_THUNDER.sections.map(|(s, _)| s).to_vec());
        assert!(matches!(plan[4].source, SectionSource::Replace(bytes) if bytes.len() == 1040));
        assert_eq!(plan[6].source, SectionSource::Copy);
        assert!(substitutions.source_for(Section::Config) == SectionSource::Copy);
    }
}
