#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fmt::{self, Display},
    path::PathBuf,
};

use serde::Serialize;
use typed_builder::TypedBuilder;

use super::{
    Diagnostic, ExclusionFilter, ExclusionMarker, VerifyError,
    conformance::check_conformance,
    matcher::{MatchOutcome, match_signatures},
    presence::check_presence,
};
use crate::java::{
    CandidateSurface, ReferenceSurface,
    loader::{load_candidate, load_reference_bytes},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "diagnostic", rename_all = "snake_case")]
/// Terminal result of one verification run.
pub enum VerificationResult {
    /// No reference artifact exists for the assignment.
    NoReferenceTests,
    /// The submission matches the required API.
    Pass,
    /// The first nonconformance found.
    Fail(Diagnostic),
}

impl VerificationResult {
    /// True for `Pass`.
    pub fn is_pass(&self) -> bool {
        matches!(self, VerificationResult::Pass)
    }

    /// The diagnostic, for `Fail`.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            VerificationResult::Fail(diag) => Some(diag),
            _ => None,
        }
    }
}

impl Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationResult::NoReferenceTests => {
                f.write_str("There are no verification tests for the assignment")
            }
            VerificationResult::Pass => f.write_str("Passed verification"),
            VerificationResult::Fail(diag) => write!(f, "{diag}"),
        }
    }
}

#[derive(TypedBuilder)]
#[builder(doc)]
/// Inputs for one verification run.
///
/// Everything is passed in explicitly; surfaces are rebuilt on every
/// [`Verification::run`] and dropped when it returns.
pub struct Verification {
    /// Bytes of the reference jar, or `None` when the assignment has none.
    #[builder(default, setter(into))]
    reference:      Option<Vec<u8>>,
    /// Directory holding the submission's compiled classes.
    #[builder(setter(into))]
    candidate_root: PathBuf,
    /// Annotation that excludes reference classes and methods.
    #[builder(default)]
    marker:         ExclusionMarker,
}

impl Verification {
    /// Runs the pipeline: load, filter, presence, signature match, member
    /// conformance. Stops at the first diagnostic.
    pub fn run(&self) -> Result<VerificationResult, VerifyError> {
        let Some(reference) = self.reference.as_deref() else {
            tracing::info!("No reference artifact; nothing to verify");
            return Ok(VerificationResult::NoReferenceTests);
        };

        tracing::debug!("Loading reference artifact ({} bytes)", reference.len());
        let loaded = load_reference_bytes(reference)?;

        tracing::debug!("Applying exclusion marker `{}`", self.marker);
        let required = ExclusionFilter::new(self.marker.clone()).apply(loaded);

        tracing::debug!("Loading candidate classes from {}", self.candidate_root.display());
        let candidate = load_candidate(&self.candidate_root)?;

        let result = verify_surfaces(&required, &candidate)?;
        match &result {
            VerificationResult::Fail(diag) => tracing::info!("Verification failed: {diag}"),
            other => tracing::info!("{other}"),
        }
        Ok(result)
    }
}

/// Compares already-built surfaces.
pub fn verify_surfaces(
    reference: &ReferenceSurface,
    candidate: &CandidateSurface,
) -> Result<VerificationResult, VerifyError> {
    tracing::debug!("Checking packages and classes");
    if let Some(diag) = check_presence(reference, candidate) {
        return Ok(VerificationResult::Fail(diag));
    }

    tracing::debug!("Matching method signatures");
    let pairs = match match_signatures(reference, candidate)? {
        MatchOutcome::Matched(pairs) => pairs,
        MatchOutcome::Missing(diag) => return Ok(VerificationResult::Fail(diag)),
    };

    tracing::debug!("Comparing {} matched methods", pairs.len());
    Ok(match check_conformance(&pairs) {
        Some(diag) => VerificationResult::Fail(diag),
        None => VerificationResult::Pass,
    })
}

/// Convenience wrapper around [`Verification`].
pub fn verify(
    reference: Option<Vec<u8>>,
    candidate_root: impl Into<PathBuf>,
    marker: ExclusionMarker,
) -> Result<VerificationResult, VerifyError> {
    Verification::builder()
        .reference(reference)
        .candidate_root(candidate_root)
        .marker(marker)
        .build()
        .run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_reference_is_no_tests_even_without_candidate() {
        let result = Verification::builder()
            .candidate_root("/definitely/not/here")
            .build()
            .run()
            .unwrap();
        assert_eq!(result, VerificationResult::NoReferenceTests);
    }

    #[test]
    fn malformed_reference_is_an_error() {
        let result = verify(
            Some(b"PK\x03\x04 truncated".to_vec()),
            std::env::temp_dir(),
            ExclusionMarker::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn result_serialization() {
        let pass = serde_json::to_value(VerificationResult::Pass).unwrap();
        assert_eq!(pass["status"], "pass");
        let fail = serde_json::to_value(VerificationResult::Fail(Diagnostic::MissingPackage {
            package: "a/".into(),
        }))
        .unwrap();
        assert_eq!(fail["status"], "fail");
        assert_eq!(fail["diagnostic"]["kind"], "missing_package");
    }
}
