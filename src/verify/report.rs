#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Panel, Style},
};

use super::VerificationResult;
use crate::java::ClassSurface;

#[derive(Tabled, Serialize, Clone, Debug)]
/// One row of a surface listing.
pub struct SurfaceRow {
    /// `a/b/Foo`
    #[tabled(rename = "Class")]
    class:     String,
    /// method display name, empty for a class without methods
    #[tabled(rename = "Method")]
    method:    String,
    /// return type
    #[tabled(rename = "Returns")]
    returns:   String,
    /// declared exceptions
    #[tabled(rename = "Throws")]
    throws:    String,
    /// modifiers
    #[tabled(rename = "Modifiers")]
    modifiers: String,
    /// whether the class or method is excluded
    #[tabled(rename = "Excluded")]
    excluded:  bool,
}

/// Flattens classes into table rows, one per method.
pub fn surface_rows(classes: &[ClassSurface]) -> Vec<SurfaceRow> {
    classes
        .iter()
        .flat_map(|class| {
            if class.methods().is_empty() {
                return vec![SurfaceRow {
                    class:     class.path().to_string(),
                    method:    String::new(),
                    returns:   String::new(),
                    throws:    String::new(),
                    modifiers: String::new(),
                    excluded:  class.is_excluded(),
                }];
            }

            class
                .methods()
                .iter()
                .map(|m| SurfaceRow {
                    class:     class.path().to_string(),
                    method:    m.display(),
                    returns:   m.return_type().simple_name(),
                    throws:    m.exceptions().iter().join(", "),
                    modifiers: m.modifiers().to_string(),
                    excluded:  class.is_excluded() || m.is_excluded(),
                })
                .collect()
        })
        .collect()
}

/// Renders a surface listing as a table.
pub fn surface_table(title: &str, classes: &[ClassSurface]) -> String {
    Table::new(surface_rows(classes))
        .with(Style::modern())
        .with(Panel::header(title))
        .to_string()
}

/// Renders a verdict for a terminal.
pub fn render_result(result: &VerificationResult) -> String {
    match result {
        VerificationResult::Pass => format!("{} {result}", "PASS".green().bold()),
        VerificationResult::NoReferenceTests => format!("{} {result}", "NONE".yellow().bold()),
        VerificationResult::Fail(diag) => {
            format!("{} [{}] {result}", "FAIL".red().bold(), diag.title())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java::{ClassPath, JavaType, MemberSignature, Modifiers};

    #[test]
    fn rows_flatten_methods_and_empty_classes() {
        let path = ClassPath::parse("a/Foo").unwrap();
        let classes = vec![
            ClassSurface::builder()
                .path(path.clone())
                .methods(vec![
                    MemberSignature::builder()
                        .name("size")
                        .return_type(JavaType::Object("java.lang.Integer".into()))
                        .modifiers(Modifiers::PUBLIC)
                        .owner(path.clone())
                        .build(),
                ])
                .build(),
            ClassSurface::builder()
                .path(ClassPath::parse("a/Empty").unwrap())
                .excluded(true)
                .build(),
        ];

        let rows = surface_rows(&classes);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].method, "size()");
        assert_eq!(rows[0].returns, "Integer");
        assert_eq!(rows[0].modifiers, "public");
        assert!(rows[1].excluded);
        assert!(surface_table("a.jar", &classes).contains("a/Empty"));
    }

    #[test]
    fn rendered_result_contains_message() {
        colored::control::set_override(false);
        assert_eq!(render_result(&VerificationResult::Pass), "PASS Passed verification");
    }
}
