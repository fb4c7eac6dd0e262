#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::{Diagnostic, VerifyError};
use crate::java::{CandidateSurface, ClassSurface, MemberSignature, ReferenceSurface};

/// A required method and the candidate method with the same signature.
pub type MatchedPair<'a> = (&'a MemberSignature, &'a MemberSignature);

/// Outcome of pairing every required method.
#[derive(Debug)]
pub enum MatchOutcome<'a> {
    /// Every required method has exactly one candidate.
    Matched(Vec<MatchedPair<'a>>),
    /// The first required method with no candidate.
    Missing(Diagnostic),
}

/// Finds the single method in `class` with the same name and parameter types
/// as `required`.
pub fn find_match<'a>(
    required: &MemberSignature,
    class: &'a ClassSurface,
) -> Result<Option<&'a MemberSignature>, VerifyError> {
    let mut found = class.methods().iter().filter(|m| m.same_signature(required));
    let first = found.next();
    if first.is_some() && found.next().is_some() {
        return Err(VerifyError::AmbiguousMethod {
            class:  class.path().clone(),
            method: required.display(),
        });
    }
    Ok(first)
}

/// Pairs every required method with its candidate, in reference order.
///
/// Every reference class must already be known to exist in `candidate`.
pub fn match_signatures<'a>(
    reference: &'a ReferenceSurface,
    candidate: &'a CandidateSurface,
) -> Result<MatchOutcome<'a>, VerifyError> {
    let mut pairs = Vec::new();

    for class in reference.classes() {
        let Some(candidate_class) = candidate.class(class.path()) else {
            return Ok(MatchOutcome::Missing(Diagnostic::MissingClass {
                class: class.path().clone(),
            }));
        };

        for required in class.methods() {
            match find_match(required, candidate_class)? {
                Some(found) => pairs.push((required, found)),
                None => {
                    tracing::debug!("No match for {} in {}", required.display(), class.path());
                    return Ok(MatchOutcome::Missing(Diagnostic::MissingMethod {
                        class:   class.path().clone(),
                        display: required.display(),
                    }));
                }
            }
        }
    }

    Ok(MatchOutcome::Matched(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java::{ClassPath, JavaType, Primitive};

    fn int() -> JavaType {
        JavaType::Primitive(Primitive::Int)
    }

    fn string() -> JavaType {
        JavaType::Object("java.lang.String".into())
    }

    fn foo_with(methods: &[(&str, Vec<JavaType>)]) -> ClassSurface {
        let path = ClassPath::parse("a/b/Foo").unwrap();
        ClassSurface::builder()
            .path(path.clone())
            .methods(
                methods
                    .iter()
                    .map(|(name, params)| {
                        MemberSignature::builder()
                            .name(*name)
                            .params(params.clone())
                            .owner(path.clone())
                            .build()
                    })
                    .collect(),
            )
            .build()
    }

    #[test]
    fn matches_exact_signature_among_overloads() {
        let reference = ReferenceSurface::new(vec![foo_with(&[("doWork", vec![int(), string()])])]);
        let candidate = CandidateSurface::new(vec![foo_with(&[
            ("doWork", vec![int()]),
            ("doWork", vec![int(), string()]),
            ("doWork", vec![string(), int()]),
        ])]);

        let MatchOutcome::Matched(pairs) = match_signatures(&reference, &candidate).unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1.params(), &[int(), string()]);
    }

    #[test]
    fn parameter_order_matters() {
        let reference = ReferenceSurface::new(vec![foo_with(&[("doWork", vec![int(), string()])])]);
        let candidate = CandidateSurface::new(vec![foo_with(&[("doWork", vec![string(), int()])])]);

        let MatchOutcome::Missing(diag) = match_signatures(&reference, &candidate).unwrap() else {
            panic!("expected a missing method");
        };
        assert_eq!(diag, Diagnostic::MissingMethod {
            class:   ClassPath::parse("a/b/Foo").unwrap(),
            display: "doWork(int, String)".into(),
        });
    }

    #[test]
    fn no_widening() {
        let long = JavaType::Primitive(Primitive::Long);
        let reference = ReferenceSurface::new(vec![foo_with(&[("f", vec![int()])])]);
        let candidate = CandidateSurface::new(vec![foo_with(&[("f", vec![long])])]);
        assert!(matches!(
            match_signatures(&reference, &candidate).unwrap(),
            MatchOutcome::Missing(Diagnostic::MissingMethod { .. })
        ));
    }

    #[test]
    fn duplicate_candidates_are_an_internal_error() {
        let required = foo_with(&[("f", vec![])]);
        let candidate = foo_with(&[("f", vec![]), ("f", vec![])]);
        let err = find_match(&required.methods()[0], &candidate).unwrap_err();
        assert!(matches!(err, VerifyError::AmbiguousMethod { .. }));
    }
}
