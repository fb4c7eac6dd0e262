#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Annotation that instructors put on reference classes and methods students
/// are not required to implement.
pub const DEFAULT_EXCLUSION_MARKER: &str = "canvasProjectManager.annotations.Skip";

/// Extension of reference artifacts picked from an assignment folder.
pub const REFERENCE_EXTENSION: &str = "jar";

/// Seconds to wait for a remote reference artifact.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

/// Environment variable overriding the exclusion marker.
pub const MARKER_ENV: &str = "UMM_VERIFY_MARKER";

/// Environment variable naming the reference artifact (path or URL).
pub const REFERENCE_ENV: &str = "UMM_VERIFY_REFERENCE";

/// Environment variable overriding the compiled classes directory.
pub const BUILD_DIR_ENV: &str = "UMM_VERIFY_BUILD_DIR";

/// Environment variable overriding the fetch timeout.
pub const TIMEOUT_ENV: &str = "UMM_VERIFY_TIMEOUT_SECS";

/// Process exit status when a run aborts before reaching a verdict.
pub const INTERNAL_ERROR_EXIT_CODE: u8 = 2;
