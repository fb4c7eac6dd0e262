#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Member conformance: exceptions, return type, modifiers.
pub mod conformance;
/// Diagnostics reported to students.
pub mod diagnostics;
/// Internal errors that abort a run.
pub mod error;
/// Exclusion marker handling.
pub mod exclusion;
/// Signature matching between reference and candidate methods.
pub mod matcher;
/// Package and class presence checks.
pub mod presence;
/// Terminal and table rendering.
pub mod report;
/// The verification pipeline and its result.
pub mod verdict;

pub use diagnostics::Diagnostic;
pub use error::VerifyError;
pub use exclusion::{ExclusionFilter, ExclusionMarker};
pub use verdict::{Verification, VerificationResult, verify, verify_surfaces};
