#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::Diagnostic;
use crate::java::{CandidateSurface, ReferenceSurface};

/// Checks that every required package, then every required class, exists in
/// the candidate.
///
/// Packages are checked first so a misspelled package is reported once instead
/// of once per class inside it. The default package is always present.
pub fn check_presence(reference: &ReferenceSurface, candidate: &CandidateSurface) -> Option<Diagnostic> {
    for (prefix, _) in reference.package_prefixes() {
        if prefix.is_empty() {
            continue;
        }
        if !candidate.has_prefix(&prefix) {
            tracing::debug!("No candidate class under {prefix}");
            return Some(Diagnostic::MissingPackage { package: prefix });
        }
    }

    reference
        .classes()
        .iter()
        .find(|class| !candidate.contains(class.path()))
        .map(|class| Diagnostic::MissingClass {
            class: class.path().clone(),
        })
}
