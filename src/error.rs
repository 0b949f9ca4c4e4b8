//! Typed failures for file resolution and persistence

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by file resolution and persistence operations
///
/// [`FileError::EmptyFileName`] is a configuration mistake and is reported
/// before any I/O happens; the remaining variants wrap an underlying I/O
/// failure together with the path it happened on. Callers of the explicit file
/// operations decide whether to retry, log or abort; the implicit write path
/// inside dispatch converts these into a visible error message instead.
#[derive(Debug, Error)]
pub enum FileError {
    /// A file name was explicitly requested but empty.
    #[error("log file name must not be empty")]
    EmptyFileName,

    /// The file could not be created.
    #[error("could not create {}: {}", .path.display(), .source)]
    Create { path: PathBuf, source: io::Error },

    /// Existing file content could not be read back.
    #[error("could not read {}: {}", .path.display(), .source)]
    Read { path: PathBuf, source: io::Error },

    /// The rewritten content could not be written out.
    #[error("could not write {}: {}", .path.display(), .source)]
    Write { path: PathBuf, source: io::Error },
}
