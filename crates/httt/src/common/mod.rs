//! Common infrastructure shared by every block component

mod error;
mod span;

pub use error::{DiagnosticReporter, HtError, HtResult};
pub use span::Span;
