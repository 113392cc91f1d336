//! Error handling for the rhyme sorter

use std::io;
use thiserror::Error;

/// Custom error type for load, sort and write operations
#[derive(Error, Debug)]
pub enum SortError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Permission denied: {file}")]
    PermissionDenied { file: String },

    #[error("No such file or directory: {file}")]
    FileNotFound { file: String },

    #[error("Is a directory: {file}")]
    IsDirectory { file: String },

    #[error("Cannot read {source_name}: {error}")]
    Load {
        source_name: String,
        #[source]
        error: io::Error,
    },

    #[error("Short read from {source_name}: expected {expected} bytes, got {actual}")]
    ShortRead {
        source_name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot write {target}: {error}")]
    Write {
        target: String,
        #[source]
        error: io::Error,
    },

    #[error("Line index {index} out of range ({count} lines)")]
    IndexOutOfBounds { index: usize, count: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("{failed} of {total} outputs could not be written")]
    OutputsFailed { failed: usize, total: usize },
}

impl SortError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SortError::PermissionDenied { .. }
            | SortError::FileNotFound { .. }
            | SortError::IsDirectory { .. }
            | SortError::Load { .. }
            | SortError::ShortRead { .. }
            | SortError::Write { .. }
            | SortError::OutputsFailed { .. }
            | SortError::Io(_) => crate::SORT_FAILURE,

            _ => crate::EXIT_FAILURE,
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(file: &str) -> Self {
        SortError::PermissionDenied {
            file: file.to_string(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(file: &str) -> Self {
        SortError::FileNotFound {
            file: file.to_string(),
        }
    }

    /// Create an is directory error
    pub fn is_directory(file: &str) -> Self {
        SortError::IsDirectory {
            file: file.to_string(),
        }
    }

    /// Create a load error for a byte source
    pub fn load(source_name: &str, error: io::Error) -> Self {
        SortError::Load {
            source_name: source_name.to_string(),
            error,
        }
    }

    /// Create a short read error
    pub fn short_read(source_name: &str, expected: usize, actual: usize) -> Self {
        SortError::ShortRead {
            source_name: source_name.to_string(),
            expected,
            actual,
        }
    }

    /// Create a write error for a sink
    pub fn write(target: &str, error: io::Error) -> Self {
        SortError::Write {
            target: target.to_string(),
            error,
        }
    }

    /// Create an out-of-bounds line access error
    pub fn index_out_of_bounds(index: usize, count: usize) -> Self {
        SortError::IndexOutOfBounds { index, count }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: &str) -> Self {
        SortError::InvalidConfig {
            message: message.to_string(),
        }
    }

    /// Create a parse error
    pub fn parse_error(message: &str) -> Self {
        SortError::ParseError {
            message: message.to_string(),
        }
    }
}

/// Result type for sort operations
pub type SortResult<T> = Result<T, SortError>;

/// Context trait for naming the file behind an error
pub trait SortContext<T> {
    /// Attach `name` to load and write failures, replacing any placeholder name
    fn with_target(self, name: &str) -> SortResult<T>;

    /// Classify an open failure on `filename`
    fn with_file_context(self, filename: &str) -> SortResult<T>;
}

impl<T> SortContext<T> for SortResult<T> {
    fn with_target(self, name: &str) -> SortResult<T> {
        self.map_err(|err| match err {
            SortError::Load { error, .. } => SortError::load(name, error),
            SortError::ShortRead {
                expected, actual, ..
            } => SortError::short_read(name, expected, actual),
            SortError::Write { error, .. } => SortError::write(name, error),
            other => other,
        })
    }

    fn with_file_context(self, filename: &str) -> SortResult<T> {
        self.map_err(|err| match err {
            SortError::Io(io_err) => classify_open_error(io_err, filename),
            other => other,
        })
    }
}

impl<T> SortContext<T> for Result<T, io::Error> {
    fn with_target(self, name: &str) -> SortResult<T> {
        self.map_err(|io_err| SortError::load(name, io_err))
    }

    fn with_file_context(self, filename: &str) -> SortResult<T> {
        self.map_err(|io_err| classify_open_error(io_err, filename))
    }
}

fn classify_open_error(io_err: io::Error, filename: &str) -> SortError {
    match io_err.kind() {
        io::ErrorKind::PermissionDenied => SortError::permission_denied(filename),
        io::ErrorKind::NotFound => SortError::file_not_found(filename),
        _ => SortError::Io(io::Error::new(
            io_err.kind(),
            format!("{}: {}", filename, io_err),
        )),
    }
}
