#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, time::Duration};

use crate::{
    constants::{
        BUILD_DIR_ENV, DEFAULT_FETCH_TIMEOUT_SECS, MARKER_ENV, REFERENCE_ENV, TIMEOUT_ENV,
    },
    java::ProjectPaths,
    verify::ExclusionMarker,
};

/// Settings for a verification run, resolved once by the caller.
///
/// The verifier itself never reads the environment; the binary builds one of
/// these and passes its parts along explicitly.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Annotation that excludes classes and methods.
    marker:        ExclusionMarker,
    /// Reference artifact location (path or URL), if any.
    reference:     Option<String>,
    /// Project layout; `build_dir` is the candidate root.
    paths:         ProjectPaths,
    /// Timeout for fetching a remote reference.
    fetch_timeout: Duration,
}

/// Returns the trimmed value, or `None` when unset or blank.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl VerifyConfig {
    /// Reads `UMM_VERIFY_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from any key lookup, applying defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let marker = non_empty(lookup(MARKER_ENV))
            .map(ExclusionMarker::new)
            .unwrap_or_default();
        let reference = non_empty(lookup(REFERENCE_ENV));

        let paths = ProjectPaths::default();
        let paths = match non_empty(lookup(BUILD_DIR_ENV)) {
            Some(dir) => paths.with_build_dir(dir),
            None => paths,
        };

        let timeout_secs = non_empty(lookup(TIMEOUT_ENV))
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        Self {
            marker,
            reference,
            paths,
            fetch_timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        reference: Option<String>,
        classes: Option<PathBuf>,
        marker: Option<String>,
    ) -> Self {
        if let Some(reference) = non_empty(reference) {
            self.reference = Some(reference);
        }
        if let Some(classes) = classes {
            self.paths = self.paths.with_build_dir(classes);
        }
        if let Some(marker) = non_empty(marker) {
            self.marker = ExclusionMarker::new(marker);
        }
        self
    }

    /// Annotation that excludes classes and methods.
    pub fn marker(&self) -> &ExclusionMarker {
        &self.marker
    }

    /// Reference artifact location, if configured.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Directory of compiled submission classes.
    pub fn candidate_root(&self) -> PathBuf {
        self.paths.build_dir().to_path_buf()
    }

    /// Timeout for remote reference fetches.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::constants::DEFAULT_EXCLUSION_MARKER;

    #[test]
    fn defaults() {
        let config = VerifyConfig::default();
        assert_eq!(config.marker().name(), DEFAULT_EXCLUSION_MARKER);
        assert_eq!(config.reference(), None);
        assert_eq!(config.candidate_root(), PathBuf::from(".").join("target"));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn environment_values_and_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (MARKER_ENV, "Skip"),
            (REFERENCE_ENV, " ref.jar "),
            (BUILD_DIR_ENV, "out/classes"),
            (TIMEOUT_ENV, "not a number"),
        ]);
        let config = VerifyConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.marker().name(), "Skip");
        assert_eq!(config.reference(), Some("ref.jar"));
        assert_eq!(config.candidate_root(), PathBuf::from("out/classes"));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(20));

        let config = config.with_overrides(Some("https://x/y.jar".into()), None, Some("".into()));
        assert_eq!(config.reference(), Some("https://x/y.jar"));
        assert_eq!(config.marker().name(), "Skip");
    }
}
