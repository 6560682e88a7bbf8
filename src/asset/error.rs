//! Typed errors for the asset pipeline
//!
//! A missing material file is *not* an error (materials are optional); all
//! other failure modes surface here so callers can decide whether a bad asset
//! aborts the load or is skipped.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading geometry or material files.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The geometry file itself does not exist.
    #[error("geometry file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A directive or numeric token could not be parsed.
    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A face referenced a vertex position outside the position pool.
    #[error("{path}:{line}: face references position {index} but only {count} positions are defined")]
    Index {
        path: PathBuf,
        line: usize,
        index: usize,
        count: usize,
    },

    /// The file existed but could not be read.
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    /// Wraps an I/O failure, mapping `NotFound` onto the dedicated variant.
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            AssetError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            AssetError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn parse(path: &std::path::Path, line: usize, message: impl Into<String>) -> Self {
        AssetError::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}
