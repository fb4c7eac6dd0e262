#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::{self, Display};

use itertools::Itertools;
use serde::Serialize;

use crate::java::{ClassPath, Modifiers};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// The first way in which a submission does not match the reference API.
pub enum Diagnostic {
    /// No candidate class lives in a required package.
    MissingPackage {
        /// package path, e.g. `a/b/`
        package: String,
    },
    /// A required class is absent.
    MissingClass {
        /// the missing class
        class: ClassPath,
    },
    /// No candidate method has the required name and parameter types.
    MissingMethod {
        /// class that should declare the method
        class:   ClassPath,
        /// e.g. `doWork(int, String)`
        display: String,
    },
    /// Declared exceptions differ.
    ExceptionMismatch {
        /// declaring class
        class:       ClassPath,
        /// method display name
        method:      String,
        /// exceptions the reference declares, in canonical order
        expected:    Vec<String>,
        /// exceptions the candidate has to declare
        must_add:    Vec<String>,
        /// exceptions the candidate has to stop declaring
        must_remove: Vec<String>,
    },
    /// Return types differ.
    ReturnTypeMismatch {
        /// declaring class
        class:    ClassPath,
        /// method display name
        method:   String,
        /// reference return type
        expected: String,
        /// candidate return type
        actual:   String,
    },
    /// Modifiers differ.
    ModifierMismatch {
        /// declaring class
        class:       ClassPath,
        /// method display name
        method:      String,
        /// modifiers the candidate is missing
        must_add:    Modifiers,
        /// modifiers the candidate should not have
        must_remove: Modifiers,
    },
}

impl Diagnostic {
    /// Stable, machine-friendly name of the category.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::MissingPackage { .. } => "missing_package",
            Diagnostic::MissingClass { .. } => "missing_class",
            Diagnostic::MissingMethod { .. } => "missing_method",
            Diagnostic::ExceptionMismatch { .. } => "exception_mismatch",
            Diagnostic::ReturnTypeMismatch { .. } => "return_type_mismatch",
            Diagnostic::ModifierMismatch { .. } => "modifier_mismatch",
        }
    }

    /// Short title for dialogs and report headers.
    pub fn title(&self) -> &'static str {
        match self {
            Diagnostic::MissingPackage { .. } => "Package",
            Diagnostic::MissingClass { .. } => "Class",
            _ => "Method",
        }
    }

    /// The message shown to students.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Renders a list of type names as `"A, B"`.
fn quoted_list(items: &[String]) -> String {
    format!("\"{}\"", items.iter().join(", "))
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingPackage { package } => write!(
                f,
                "Couldn't find package \"{}\". Please check that package names are spelled \
                 correctly.",
                package.trim_end_matches('/').replace('/', ".")
            ),
            Diagnostic::MissingClass { class } => {
                if class.in_default_package() {
                    write!(
                        f,
                        "Couldn't find class \"{}\". Please check that class names are spelled \
                         correctly.",
                        class.name()
                    )
                } else {
                    write!(
                        f,
                        "Couldn't find class \"{}\" in package \"{}\". Please check that class \
                         names are spelled correctly.",
                        class.name(),
                        class.dotted_package()
                    )
                }
            }
            Diagnostic::MissingMethod { class, display } => write!(
                f,
                "Method \"{display}\" in class \"{}\" couldn't be found. Please check method \
                 names and parameters.",
                class.dotted()
            ),
            Diagnostic::ExceptionMismatch {
                class,
                method,
                expected,
                must_add,
                must_remove,
            } => {
                write!(f, "Method \"{method}\" in class \"{}\" ", class.dotted())?;
                if expected.is_empty() {
                    write!(f, "shouldn't signify that it throws exceptions")?;
                } else {
                    write!(f, "needs to signify that it can throw {}", quoted_list(expected))?;
                }
                let mut details = Vec::new();
                if !must_add.is_empty() {
                    details.push(format!("add {}", quoted_list(must_add)));
                }
                if !must_remove.is_empty() {
                    details.push(format!("remove {}", quoted_list(must_remove)));
                }
                write!(f, " ({}).", details.join("; "))
            }
            Diagnostic::ReturnTypeMismatch {
                class,
                method,
                expected,
                actual,
            } => write!(
                f,
                "Method \"{method}\" in class \"{}\" needs a return type of \"{expected}\", not \
                 \"{actual}\".",
                class.dotted()
            ),
            Diagnostic::ModifierMismatch {
                class,
                method,
                must_add,
                must_remove,
            } => {
                write!(f, "Method \"{method}\" in class \"{}\" needs to ", class.dotted())?;
                if !must_add.is_empty() {
                    write!(f, "be \"{must_add}\"")?;
                    if !must_remove.is_empty() {
                        write!(f, " and ")?;
                    }
                }
                if !must_remove.is_empty() {
                    write!(f, "not be \"{must_remove}\"")?;
                }
                if must_add.is_empty() && must_remove.is_empty() {
                    write!(f, "have different modifiers")?;
                }
                write!(f, ".")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo() -> ClassPath {
        ClassPath::parse("a/b/Foo").unwrap()
    }

    #[test]
    fn missing_package_message_uses_dots() {
        let diag = Diagnostic::MissingPackage {
            package: "a/b/".into(),
        };
        assert_eq!(
            diag.message(),
            "Couldn't find package \"a.b\". Please check that package names are spelled \
             correctly."
        );
    }

    #[test]
    fn missing_class_names_class_and_package() {
        let diag = Diagnostic::MissingClass { class: foo() };
        assert!(diag.message().contains("class \"Foo\" in package \"a.b\""));
    }

    #[test]
    fn exception_message_lists_both_directions() {
        let diag = Diagnostic::ExceptionMismatch {
            class:       foo(),
            method:      "doWork(int)".into(),
            expected:    vec!["java.lang.Exception".into()],
            must_add:    vec!["java.lang.Exception".into()],
            must_remove: vec!["java.io.IOException".into()],
        };
        let message = diag.message();
        assert!(message.contains("can throw \"java.lang.Exception\""));
        assert!(message.contains("add \"java.lang.Exception\"; remove \"java.io.IOException\""));
    }

    #[test]
    fn modifier_message() {
        let diag = Diagnostic::ModifierMismatch {
            class:       foo(),
            method:      "doWork(int)".into(),
            must_add:    Modifiers::PUBLIC,
            must_remove: Modifiers::STATIC,
        };
        assert_eq!(
            diag.message(),
            "Method \"doWork(int)\" in class \"a.b.Foo\" needs to be \"public\" and not be \
             \"static\"."
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let diag = Diagnostic::ReturnTypeMismatch {
            class:    foo(),
            method:   "doWork(int)".into(),
            expected: "void".into(),
            actual:   "int".into(),
        };
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["kind"], "return_type_mismatch");
        assert_eq!(json["class"], "a/b/Foo");
        assert_eq!(json["expected"], "void");
        assert_eq!(diag.kind(), "return_type_mismatch");
    }
}
