use thiserror::Error;

use crate::arena::ArenaError;
use crate::diagnostics::Diagnostic;

/// Errors that stop the front end.
///
/// Recoverable problems in the input never show up here: they are queued in
/// [`Diagnostics`](crate::Diagnostics) and parsing continues.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Alloc(#[from] ArenaError),

    /// A fatal diagnostic was submitted. It has already been rendered.
    #[error("{file}: {diagnostic}")]
    Fatal { file: String, diagnostic: Diagnostic },

    #[error("failed to write diagnostics: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error came from a fatal diagnostic.
    #[must_use]
    pub fn is_fatal_diagnostic(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
