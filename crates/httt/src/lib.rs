//! Hydro Thunder Time Tool - high score and split editor for Hydro Thunder
//! arcade drives
//!
//! The game keeps its high scores, checkpoint splits and settings in an
//! 8192-byte field data block near the end of its hard drive. This library
//! finds that block on a drive, disk image, or raw capture, decodes its score
//! and split tables, writes edited tables back and recomputes the block
//! checksum so the game accepts the result.
//!
//! ## Architecture
//!
//! - **Layout** (`layout`): the fixed section map of the block
//! - **Types** (`types/`): boat and track tables
//! - **Duration** (`duration/`): clock text <-> stored `f32` seconds
//! - **Records** (`records`): score and split table codec
//! - **Drive** (`drive`): locating the block on a file
//! - **Writer** (`writer`): section-by-section block copy with substitution
//! - **Checksum** (`checksum`): block checksum recomputation
//! - **Table** (`table`): CSV import and export
//! - **Driver** (`driver/`): run orchestration for the CLI
//! - **Common** (`common/`): shared infrastructure (errors, spans)

pub mod common;
pub mod layout;
pub mod types;
pub mod duration;
pub mod records;
pub mod drive;
pub mod writer;
pub mod checksum;
pub mod table;
pub mod driver;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use common::{DiagnosticReporter, HtError, HtResult, Span};
pub use layout::{BlockLayout, HYDRO_THUNDER, Section};
pub use types::{Boat, Track};
pub use records::{ScoreEntry, SplitEntry};
pub use drive::{DriveHandle, locate_block};
pub use writer::{WriteTarget, write_block};
pub use checksum::{ChecksumOptions, ChecksumReport, ChecksumWindow, recompute_checksum};
pub use driver::{Job, Pipeline, RunConfig, RunSummary};
