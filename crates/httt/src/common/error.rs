//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use std::path::{Path, PathBuf};
use thiserror::Error;
use super::Span;
use crate::types::Track;

/// Errors raised while locating, decoding, encoding or writing a data block
#[derive(Error, Debug)]
pub enum HtError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown boat id 0x{0:02x}")]
    UnknownBoatId(u8),

    #[error("unknown boat name '{0}'")]
    UnknownBoatName(String),

    #[error("unknown track name '{0}'")]
    UnknownTrack(String),

    #[error("malformed time '{text}': {reason}")]
    MalformedDuration { text: String, reason: String },

    #[error("stored time {0} is not a valid duration")]
    InvalidDuration(f32),

    #[error("invalid initials '{0}': expected at most 3 ASCII characters")]
    InvalidInitials(String),

    #[error("{table} table has {found} rows, expected {expected}")]
    RowCount {
        table: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{section} section is {found} bytes, expected {expected}")]
    SectionLength {
        section: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("block is {found} bytes, expected at least {expected}")]
    BlockTooShort { expected: usize, found: usize },

    #[error("device is {size} bytes, smaller than the {required} byte block distance")]
    DeviceTooSmall { size: u64, required: u64 },

    #[error("block variant {0} does not exist (expected 0 or 1)")]
    InvalidVariant(usize),

    #[error("checksum {0} does not fit in 32 bits")]
    ChecksumOverflow(i64),

    #[error("row {index} is for {found}, but that slot belongs to {expected}")]
    TrackMismatch {
        index: usize,
        expected: Track,
        found: Track,
    },

    #[error("no drive to read from: need --read or --write")]
    MissingSource,

    #[error("{}: line {line}: {message}", .file.display())]
    Table {
        file: PathBuf,
        message: String,
        line: u64,
        span: Span,
    },
}

impl HtError {
    pub fn malformed_duration(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDuration {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub fn table(file: &Path, message: impl Into<String>, line: u64, span: Span) -> Self {
        Self::Table {
            file: file.to_path_buf(),
            message: message.into(),
            line,
            span,
        }
    }
}

pub type HtResult<T> = Result<T, HtError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Build the diagnostic for an error raised while importing `file_id`
    pub fn diagnostic(file_id: usize, error: &HtError) -> Diagnostic<usize> {
        match error {
            HtError::Table { message, span, .. } => Diagnostic::error()
                .with_message("Table import error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            HtError::Csv(err) => {
                let diagnostic = Diagnostic::error().with_message(format!("CSV error: {err}"));
                match err.position() {
                    Some(pos) => {
                        let start = pos.byte() as usize;
                        diagnostic.with_labels(vec![Label::primary(file_id, start..start)])
                    }
                    None => diagnostic,
                }
            }

            other => Diagnostic::error().with_message(other.to_string()),
        }
    }

    pub fn report_error(&self, file_id: usize, error: &HtError) {
        let diagnostic = Self::diagnostic(file_id, error);
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
