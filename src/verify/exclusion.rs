#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::{self, Display};

use serde::Serialize;

use crate::{
    constants::DEFAULT_EXCLUSION_MARKER,
    java::{ClassSurface, ReferenceSurface},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// The annotation that removes a class or method from the required API.
pub struct ExclusionMarker(String);

impl ExclusionMarker {
    /// Creates a marker from a dotted annotation name, e.g.
    /// `canvasProjectManager.annotations.Skip`. A name without a package
    /// matches any annotation with that simple name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().replace('/', "."))
    }

    /// The configured name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether `annotation` (dotted) is this marker.
    pub fn matches(&self, annotation: &str) -> bool {
        if self.0.contains('.') {
            annotation == self.0
        } else {
            annotation.rsplit('.').next() == Some(self.0.as_str())
        }
    }

    /// Whether any of `annotations` is this marker.
    pub fn matches_any(&self, annotations: &[String]) -> bool {
        annotations.iter().any(|a| self.matches(a))
    }
}

impl Default for ExclusionMarker {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUSION_MARKER)
    }
}

impl Display for ExclusionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default)]
/// Turns the loaded reference classes into the required API.
pub struct ExclusionFilter {
    /// The marker honoured at class and method level.
    marker: ExclusionMarker,
}

impl ExclusionFilter {
    /// Creates a filter for `marker`.
    pub fn new(marker: ExclusionMarker) -> Self {
        Self { marker }
    }

    /// Sets the exclusion flag on every marked class and method without
    /// removing anything.
    pub fn mark(&self, classes: &mut [ClassSurface]) {
        for class in classes.iter_mut() {
            class.excluded = self.marker.matches_any(&class.annotations);
            for method in class.methods.iter_mut() {
                method.excluded = self.marker.matches_any(&method.annotations);
            }
        }
    }

    /// Marks, then drops marked classes entirely and marked methods of the
    /// classes that remain.
    pub fn apply(&self, mut classes: Vec<ClassSurface>) -> ReferenceSurface {
        self.mark(&mut classes);

        let before = classes.len();
        classes.retain(|c| {
            if c.excluded {
                tracing::debug!("Skipping excluded class {}", c.path);
            }
            !c.excluded
        });

        for class in classes.iter_mut() {
            class.methods.retain(|m| {
                if m.excluded {
                    tracing::debug!("Skipping excluded method {} in {}", m.display(), class.path);
                }
                !m.excluded
            });
        }

        tracing::debug!(
            "{} of {} reference classes are required (marker `{}`)",
            classes.len(),
            before,
            self.marker
        );
        ReferenceSurface::new(classes)
    }
}
