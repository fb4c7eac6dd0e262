#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use crate::java::{ClassPath, classfile::ClassFormatError};

/// Failures that abort a verification run.
///
/// None of these say anything about whether the submission conforms; they mean
/// a surface could not be built at all.
#[derive(thiserror::Error, Debug)]
pub enum VerifyError {
    /// The reference byte stream could not be read.
    #[error("Could not read the reference artifact")]
    ReadArtifact(#[source] std::io::Error),
    /// The reference artifact is not a readable zip/jar archive.
    #[error("The reference artifact is not a valid jar archive")]
    Archive(#[from] zip::result::ZipError),
    /// A file under the candidate root could not be read.
    #[error("Could not read {}", path.display())]
    Io {
        /// the file being read
        path:   PathBuf,
        /// underlying error
        source: std::io::Error,
    },
    /// The candidate root is missing or not a directory.
    #[error("Compiled classes directory {} does not exist or is not a directory", .0.display())]
    CandidateRoot(PathBuf),
    /// The candidate directory could not be walked.
    #[error("Could not list compiled classes")]
    Walk(#[from] walkdir::Error),
    /// A class file on either side could not be parsed.
    #[error("Could not parse class file {origin}")]
    ClassFormat {
        /// jar entry name or file path
        origin: String,
        /// parser error
        source: ClassFormatError,
    },
    /// More than one candidate method matched a required signature.
    #[error("Class {class} declares `{method}` more than once")]
    AmbiguousMethod {
        /// the candidate class
        class:  ClassPath,
        /// method display name
        method: String,
    },
}
