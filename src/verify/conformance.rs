#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::{Diagnostic, matcher::MatchedPair};
use crate::java::MemberSignature;

/// Compares one matched pair: exceptions, then return type, then modifiers.
pub fn check_member(required: &MemberSignature, actual: &MemberSignature) -> Option<Diagnostic> {
    let class = required.owner().clone();
    let method = required.display();

    if required.exceptions() != actual.exceptions() {
        return Some(Diagnostic::ExceptionMismatch {
            class,
            method,
            expected: required.exceptions().iter().cloned().collect(),
            must_add: required
                .exceptions()
                .difference(actual.exceptions())
                .cloned()
                .collect(),
            must_remove: actual
                .exceptions()
                .difference(required.exceptions())
                .cloned()
                .collect(),
        });
    }

    if required.return_type() != actual.return_type() {
        return Some(Diagnostic::ReturnTypeMismatch {
            class,
            method,
            expected: required.return_type().name(),
            actual: actual.return_type().name(),
        });
    }

    if required.modifiers() != actual.modifiers() {
        return Some(Diagnostic::ModifierMismatch {
            class,
            method,
            must_add: required.modifiers().difference(actual.modifiers()),
            must_remove: actual.modifiers().difference(required.modifiers()),
        });
    }

    None
}

/// Checks every pair in order and returns the first failure.
pub fn check_conformance(pairs: &[MatchedPair<'_>]) -> Option<Diagnostic> {
    pairs
        .iter()
        .find_map(|(required, actual)| check_member(required, actual))
}
