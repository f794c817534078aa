use std::fmt;
use thiserror::Error;

/// Transport-level failure shared by catalog and download fetches.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),
}

/// Failure while loading the skill catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog request returned HTTP {0}")]
    Status(u16),

    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while downloading a single skill file.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{resource} returned HTTP {status}")]
    Status { resource: String, status: u16 },

    #[error("could not move download into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Failure reading or writing client-local storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not a JSON object of strings: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<FetchError> for CatalogError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Io(e) => CatalogError::Io(e),
            FetchError::Http(e) => CatalogError::Http(e),
            FetchError::Status(status) => CatalogError::Status(status),
        }
    }
}

impl DownloadError {
    /// Convert a failed fetch of `resource`.
    pub fn from_fetch(e: FetchError, resource: &impl fmt::Display) -> Self {
        match e {
            FetchError::Io(e) => DownloadError::Io(e),
            FetchError::Http(e) => DownloadError::Http(e),
            FetchError::Status(status) => DownloadError::Status {
                resource: resource.to_string(),
                status,
            },
        }
    }

    /// Short message suitable for the status bar.
    pub fn user_message(&self) -> String {
        match self {
            DownloadError::Io(e) => format!("File system error: {}", e),
            DownloadError::Http(e) => format!("Network error: {}", e),
            DownloadError::Status { status, .. } if *status == 404 => {
                "Skill file not found on the server".to_string()
            }
            DownloadError::Status { status, .. } => format!("Server error (HTTP {})", status),
            DownloadError::Persist(e) => format!("Could not save file: {}", e.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_user_message_not_found() {
        let err = DownloadError::Status {
            resource: "skills/x/SKILL.md".to_string(),
            status: 404,
        };
        assert!(err.user_message().contains("not found"));
    }

    #[test]
    fn test_from_fetch_keeps_resource() {
        let err = DownloadError::from_fetch(FetchError::Status(500), &"https://example.com/skills/x/SKILL.md");
        assert_eq!(err.to_string(), "https://example.com/skills/x/SKILL.md returned HTTP 500");
        assert!(matches!(
            DownloadError::from_fetch(FetchError::Io(std::io::ErrorKind::NotFound.into()), &"x"),
            DownloadError::Io(_)
        ));
    }

    #[test]
    fn test_fetch_status_maps_to_catalog_status() {
        assert!(matches!(CatalogError::from(FetchError::Status(404)), CatalogError::Status(404)));
    }

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Status(500);
        assert_eq!(err.to_string(), "catalog request returned HTTP 500");
    }
}
