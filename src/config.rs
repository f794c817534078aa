use crate::catalog::Location;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: Location,
    pub download_dir: PathBuf,
    pub storage_path: PathBuf,
    pub timeout: Duration,
    pub log_file: PathBuf,
}

impl Config {
    /// Fill in platform defaults for anything not given on the command line.
    pub fn resolve(
        catalog: Location,
        download_dir: Option<PathBuf>,
        storage_path: Option<PathBuf>,
        timeout_secs: u64,
        log_file: Option<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            download_dir: download_dir.unwrap_or_else(default_download_dir),
            storage_path: storage_path.unwrap_or_else(|| config_dir().join("storage.json")),
            timeout: Duration::from_secs(timeout_secs.max(1)),
            log_file: log_file.unwrap_or_else(|| data_dir().join("skill-explorer.log")),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "skill-explorer", "skill-explorer")
}

pub fn config_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./.config/skill-explorer"))
}

pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// The user's Downloads folder, or the current directory.
pub fn default_download_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|u| u.download_dir().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_values_win() {
        let config = Config::resolve(
            Location::Path(PathBuf::from("catalog.json")),
            Some(PathBuf::from("/tmp/dl")),
            Some(PathBuf::from("/tmp/storage.json")),
            5,
            Some(PathBuf::from("/tmp/log")),
        );
        assert_eq!(config.download_dir, PathBuf::from("/tmp/dl"));
        assert_eq!(config.storage_path, PathBuf::from("/tmp/storage.json"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.log_file, PathBuf::from("/tmp/log"));
    }

    #[test]
    fn test_defaults_are_filled() {
        let config = Config::resolve(Location::Path(PathBuf::from("c.json")), None, None, 0, None);
        assert!(config.storage_path.ends_with("storage.json"));
        assert!(config.log_file.ends_with("skill-explorer.log"));
        assert_eq!(config.timeout, Duration::from_secs(1));
    }
}
