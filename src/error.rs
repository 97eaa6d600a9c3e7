//! Error types for bundle assembly
//!
//! This module provides the error taxonomy shared by every stage of the
//! pipeline. All errors include error codes for categorization and enough
//! context (paths, counts, ids) to locate the failing input.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and archive errors
//! - **E2xxx**: Decoding and encoding errors
//! - **E3xxx**: Model, partition and validation errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error
//! - `E1002`: ZIP archive error
//! - `E1004`: I/O error on a specific input file
//! - `E2005`: XML writing error
//! - `E2006`: Malformed transform text, mesh file or region stream
//! - `E3001`: Invalid model structure
//! - `E3003`: Run sequence does not partition a part's elements
//! - `E3004`: Caller-supplied settings are inconsistent with the merged objects

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for bundle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, merging or writing a bundle
///
/// Every error is terminal for the current conversion; nothing is retried
/// internally and no partial output is written once one is raised.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading or writing
    ///
    /// **Error Code**: E1001
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive error
    ///
    /// **Error Code**: E1002
    ///
    /// **Common Causes**:
    /// - Output stream closed while the package was being written
    /// - Duplicate part names in the package
    #[error("[E1002] ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error tied to a specific input file
    ///
    /// **Error Code**: E1004
    ///
    /// **Common Causes**:
    /// - Mesh or region annotation file not found
    /// - Insufficient permissions
    #[error("[E1004] I/O error on '{}': {source}", path.display())]
    FileAccess {
        /// The file that could not be opened or read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// XML writing error
    ///
    /// **Error Code**: E2005
    ///
    /// **Common Causes**:
    /// - I/O error during writing
    /// - Output stream is not writable
    #[error("[E2005] XML writing error: {0}")]
    XmlWrite(String),

    /// Malformed input that could not be decoded
    ///
    /// **Error Code**: E2006
    ///
    /// **Common Causes**:
    /// - Transform text without exactly 16 numeric tokens
    /// - Truncated or corrupt STL data
    /// - Corrupt region annotation stream or a zero-length run
    ///
    /// **Suggestions**:
    /// - Transforms are 16 whitespace-separated numbers in row-major order
    /// - Re-export the mesh or annotation file
    #[error("[E2006] Decode error: {0}")]
    Decode(String),

    /// Invalid model structure
    ///
    /// **Error Code**: E3001
    ///
    /// **Common Causes**:
    /// - Mesh without any vertices or triangles
    #[error("[E3001] Invalid model: {0}")]
    InvalidModel(String),

    /// A run sequence does not cover its part's elements exactly
    ///
    /// **Error Code**: E3003
    ///
    /// **Common Causes**:
    /// - Annotation file painted against a different version of the mesh
    /// - Annotation file paired with the wrong mesh
    #[error("[E3003] Partition error: {0}")]
    Partition(String),

    /// Caller-supplied settings do not line up with the merged objects
    ///
    /// **Error Code**: E3004
    ///
    /// **Common Causes**:
    /// - Fewer extruder or wipe entries than merged objects
    /// - Fewer volume names than merged regions
    #[error("[E3004] Validation error: {0}")]
    Validation(String),
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::Decode(format!("Failed to parse floating-point number: {}", err))
    }
}

impl Error {
    /// Wrap an I/O error with the path of the file being accessed
    pub fn file_access(path: &Path, source: io::Error) -> Self {
        Error::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a Decode error with context about what was being decoded
    ///
    /// # Arguments
    /// * `what` - The input being decoded (e.g., "transform", "binary STL")
    /// * `message` - Description of the problem
    pub fn decode_with_context(what: &str, message: &str) -> Self {
        Error::Decode(format!("{}: {}", what, message))
    }

    /// Create a Partition error for a run sequence whose total length is wrong
    ///
    /// # Arguments
    /// * `part` - Display name of the part being partitioned
    /// * `expected` - Number of elements in the part's mesh
    /// * `actual` - Sum of the run lengths
    pub fn partition_mismatch(part: &str, expected: usize, actual: usize) -> Self {
        Error::Partition(format!(
            "Runs for part '{}' cover {} elements but the mesh has {}. \
             The annotation must be painted against this exact mesh.",
            part, actual, expected
        ))
    }

    /// Create a Validation error for a settings column of the wrong length
    ///
    /// # Arguments
    /// * `column` - Name of the column (e.g., "extruders")
    /// * `expected` - Number of entries required
    /// * `actual` - Number of entries supplied
    pub fn length_mismatch(column: &str, expected: usize, actual: usize) -> Self {
        Error::Validation(format!(
            "'{}' has {} entries but {} are required",
            column, actual, expected
        ))
    }

    /// Create an XmlWrite error
    ///
    /// # Arguments
    /// * `message` - Description of the writing error
    pub fn xml_write(message: String) -> Self {
        Error::XmlWrite(message)
    }
}
