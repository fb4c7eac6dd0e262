#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use crate::{constants::REFERENCE_EXTENSION, util::find_files};

/// Where a reference artifact comes from.
///
/// Sources own the fetch policy (timeouts, what counts as "no artifact"); the
/// verifier only ever sees the resulting bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    /// A jar on disk.
    File(PathBuf),
    /// An assignment folder; the first jar in it (by name) is the reference.
    Folder(PathBuf),
    /// A jar served over HTTP(S).
    Url(String),
}

impl ReferenceSource {
    /// Interprets a command-line or environment value.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            ReferenceSource::Url(value.to_string())
        } else if Path::new(value).is_dir() {
            ReferenceSource::Folder(PathBuf::from(value))
        } else {
            ReferenceSource::File(PathBuf::from(value))
        }
    }

    /// Fetches the artifact bytes. `Ok(None)` means the assignment has no
    /// reference artifact.
    pub async fn fetch(&self, timeout: Duration) -> Result<Option<Vec<u8>>> {
        match self {
            ReferenceSource::File(path) => read_file(path).await.map(Some),
            ReferenceSource::Folder(dir) => {
                let jars = find_files(REFERENCE_EXTENSION, 0, dir)?;
                match jars.first() {
                    Some(jar) => {
                        tracing::debug!("Using reference artifact {}", jar.display());
                        read_file(jar).await.map(Some)
                    }
                    None => {
                        tracing::info!("No .{REFERENCE_EXTENSION} file in {}", dir.display());
                        Ok(None)
                    }
                }
            }
            ReferenceSource::Url(url) => fetch_url(url, timeout).await,
        }
    }
}

impl Display for ReferenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceSource::File(path) | ReferenceSource::Folder(path) => {
                write!(f, "{}", path.display())
            }
            ReferenceSource::Url(url) => f.write_str(url),
        }
    }
}

/// Reads a local artifact.
async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Could not read reference artifact {}", path.display()))
}

/// Downloads a remote artifact; a 404 means there is none.
async fn fetch_url(url: &str, timeout: Duration) -> Result<Option<Vec<u8>>> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Could not build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Cannot get url: {url}"))?;

    if response.status() == StatusCode::NOT_FOUND {
        tracing::info!("No reference artifact at {url}");
        return Ok(None);
    }

    let bytes = response
        .error_for_status()
        .with_context(|| format!("Unexpected response from {url}"))?
        .bytes()
        .await
        .with_context(|| format!("Could not read the response body from {url}"))?;

    Ok(Some(bytes.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_picks_the_right_kind() {
        assert_eq!(
            ReferenceSource::parse("https://example.com/ref.jar"),
            ReferenceSource::Url("https://example.com/ref.jar".into())
        );
        assert_eq!(
            ReferenceSource::parse("no/such/ref.jar"),
            ReferenceSource::File(PathBuf::from("no/such/ref.jar"))
        );
        let tmp = std::env::temp_dir();
        assert_eq!(
            ReferenceSource::parse(tmp.to_str().unwrap()),
            ReferenceSource::Folder(tmp.clone())
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let source = ReferenceSource::File(PathBuf::from("/no/such/reference.jar"));
        assert!(source.fetch(Duration::from_secs(1)).await.is_err());
    }
}
