use crate::error::{CatalogError, FetchError};
use futures_util::StreamExt;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default catalog file, relative to the working directory.
pub const DEFAULT_CATALOG: &str = "skills-data.json";

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: String,
    #[serde(rename = "categorySlug")]
    pub category_slug: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Where a resource lives: a remote URL or a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Url(Url),
    Path(PathBuf),
}

impl Location {
    /// Resolve `relative` against this location, the way a browser resolves a
    /// relative link against the document it appears in.
    pub fn resolve(&self, relative: &str) -> Option<Location> {
        match self {
            Location::Url(url) => url.join(relative).ok().map(Location::Url),
            Location::Path(path) => {
                let base = path.parent().map(PathBuf::from).unwrap_or_default();
                Some(Location::Path(base.join(relative)))
            }
        }
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Url::parse(s)
                .map(Location::Url)
                .map_err(|e| format!("invalid URL '{}': {}", s, e))
        } else if s.trim().is_empty() {
            Err("catalog location must not be empty".to_string())
        } else {
            Ok(Location::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Url(url) => write!(f, "{}", url),
            Location::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch the raw bytes behind a location. A non-success HTTP status is an error.
pub async fn fetch_bytes(
    location: &Location,
    timeout: Duration,
) -> Result<Vec<u8>, FetchError> {
    match location {
        Location::Url(url) => {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            let response = client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            let mut body = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                body.extend_from_slice(&chunk?);
            }
            Ok(body)
        }
        Location::Path(path) => Ok(tokio::fs::read(path).await?),
    }
}

/// Fetch and parse the catalog, propagating the failure kind.
pub async fn try_load_catalog(
    source: &Location,
    timeout: Duration,
) -> Result<Vec<Skill>, CatalogError> {
    let body = fetch_bytes(source, timeout).await?;
    let skills: Vec<Skill> = serde_json::from_slice(&body)?;
    Ok(skills)
}

/// Load the catalog. Any failure is logged and yields an empty catalog so the
/// rest of the UI stays usable.
pub async fn load_catalog(source: &Location, timeout: Duration) -> Vec<Skill> {
    match try_load_catalog(source, timeout).await {
        Ok(skills) => {
            tracing::info!(count = skills.len(), %source, "catalog loaded");
            skills
        }
        Err(e) => {
            tracing::error!(error = %e, %source, "failed to load skills");
            Vec::new()
        }
    }
}
