//! Run orchestration: locate, export or import tables, write, checksum

use crate::checksum::{self, ChecksumOptions, ChecksumReport};
use crate::common::{HtError, HtResult};
use crate::drive::{self, DriveHandle};
use crate::layout::{BlockLayout, HYDRO_THUNDER};
use crate::table;
use crate::writer::{self, WriteTarget};
use log::info;
use std::path::{Path, PathBuf};

/// Settings shared by every step of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Block variant (0 or 1)
    pub variant: usize,
    pub checksum: ChecksumOptions,
    pub layout: &'static BlockLayout,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            variant: 0,
            checksum: ChecksumOptions::default(),
            layout: &HYDRO_THUNDER,
        }
    }
}

/// Files named for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Job {
    pub read: Option<PathBuf>,
    pub write: Option<PathBuf>,
    pub write_raw: Option<PathBuf>,
    pub times: Option<PathBuf>,
    pub splits: Option<PathBuf>,
}

impl Job {
    /// Drive the block is read from: `read`, else the write target
    pub fn source(&self) -> Option<&Path> {
        self.read.as_deref().or(self.write.as_deref())
    }

    /// Whether the tables are imported rather than exported
    pub fn is_writing(&self) -> bool {
        self.write.is_some() || self.write_raw.is_some()
    }
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub exported: Vec<PathBuf>,
    pub imported: Vec<PathBuf>,
    /// Checksum pass on the write target
    pub drive_checksum: Option<ChecksumReport>,
    /// Checksum pass on the raw block file
    pub raw_checksum: Option<ChecksumReport>,
}

/// Runs jobs against a fixed configuration
pub struct Pipeline {
    config: RunConfig,
}

impl Pipeline {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    fn locate(&self, path: &Path) -> HtResult<DriveHandle<'static>> {
        drive::locate_block(path, self.config.variant, self.config.layout)
    }

    /// Run `job`
    ///
    /// Both tables are decoded from the source first, so a damaged block is
    /// reported before anything is exported or written. When writing, the
    /// named tables replace the corresponding sections; otherwise they are
    /// exported from the source.
    pub fn run(&self, job: &Job) -> HtResult<RunSummary> {
        let Some(source_path) = job.source() else {
            return Err(HtError::MissingSource);
        };

        // Locate the write target first so a bad target fails before any export
        let write_drive = job.write.as_deref().map(|path| self.locate(path)).transpose()?;
        let mut source = self.locate(source_path)?;

        let scores = source.read_scores()?;
        let splits = source.read_splits()?;

        let mut summary = RunSummary::default();

        if let Some(path) = &job.times {
            if job.is_writing() {
                source.load_times(&table::read_scores_file(path)?)?;
                summary.imported.push(path.clone());
            } else {
                table::write_scores_file(path, &scores)?;
                info!("Exported {} scores to {}", scores.len(), path.display());
                summary.exported.push(path.clone());
            }
        }

        if let Some(path) = &job.splits {
            if job.is_writing() {
                source.load_splits(&table::read_splits_file(path)?)?;
                summary.imported.push(path.clone());
            } else {
                table::write_splits_file(path, &splits)?;
                info!("Exported {} split rows to {}", splits.len(), path.display());
                summary.exported.push(path.clone());
            }
        }

        if let Some(target) = &write_drive {
            writer::write_block(&source, target.path(), target.offset(), WriteTarget::InPlace)?;
            summary.drive_checksum = Some(checksum::recompute_checksum(target, self.config.checksum)?);
        }

        if let Some(path) = &job.write_raw {
            writer::write_block(&source, path, 0, WriteTarget::Create)?;
            let raw = self.locate(path)?;
            summary.raw_checksum = Some(checksum::recompute_checksum(&raw, self.config.checksum)?);
        }

        Ok(summary)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}
