use crate::catalog::{fetch_bytes, Location, Skill};
use crate::error::DownloadError;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::LazyLock;
use std::time::Duration;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("valid regex"));

/// Folder name for a skill: lowercase, whitespace runs collapsed to `-`.
pub fn skill_folder(name: &str) -> String {
    WHITESPACE_RUN.replace_all(&name.to_lowercase(), "-").into_owned()
}

/// Path of a skill's file relative to the catalog.
pub fn skill_path(name: &str) -> String {
    format!("skills/{}/SKILL.md", skill_folder(name))
}

/// Local file name for a skill: `<name>.md` with path separators and other
/// characters file systems reject replaced by `_`. Always a single path
/// component.
pub fn download_file_name(name: &str) -> String {
    let cleaned = UNSAFE_FILE_CHARS.replace_all(name.trim(), "_");
    if cleaned.is_empty() {
        "skill.md".to_string()
    } else {
        format!("{}.md", cleaned)
    }
}

/// Everything needed to fetch one skill file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub name: String,
    pub resource: Location,
    pub file_name: String,
}

impl DownloadRequest {
    /// Build the request for `skill`, resolving its path against the catalog.
    pub fn for_skill(skill: &Skill, catalog: &Location) -> Option<Self> {
        let resource = catalog.resolve(&skill_path(&skill.name))?;
        Some(Self {
            name: skill.name.clone(),
            resource,
            file_name: download_file_name(&skill.name),
        })
    }
}

/// Outcome of a background download, delivered to the UI loop.
#[derive(Debug)]
pub enum DownloadMessage {
    Finished { name: String, saved_to: PathBuf },
    Failed { name: String, error: DownloadError },
}

/// Fetch the skill file and write it into `download_dir`.
///
/// The file is written to a temporary sibling first and renamed into place so
/// a failed transfer never leaves a truncated file behind.
pub async fn download(
    request: &DownloadRequest,
    download_dir: &Path,
    timeout: Duration,
) -> Result<PathBuf, DownloadError> {
    let body = fetch_bytes(&request.resource, timeout)
        .await
        .map_err(|e| DownloadError::from_fetch(e, &request.resource))?;

    std::fs::create_dir_all(download_dir)?;
    let target = download_dir.join(&request.file_name);
    let mut temp = tempfile::NamedTempFile::new_in(download_dir)?;
    temp.write_all(&body)?;
    temp.persist(&target)?;
    Ok(target)
}

/// Start a download in the background. The result arrives on `tx`.
pub fn trigger_download(
    request: DownloadRequest,
    download_dir: PathBuf,
    timeout: Duration,
    tx: Sender<DownloadMessage>,
) {
    tracing::debug!(name = %request.name, resource = %request.resource, "download requested");
    tokio::spawn(async move {
        let message = match download(&request, &download_dir, timeout).await {
            Ok(saved_to) => {
                tracing::info!(name = %request.name, from = %request.resource, to = %saved_to.display(), "downloaded skill");
                DownloadMessage::Finished {
                    name: request.name,
                    saved_to,
                }
            }
            Err(error) => {
                tracing::error!(name = %request.name, %error, "skill download failed");
                DownloadMessage::Failed {
                    name: request.name,
                    error,
                }
            }
        };
        let _ = tx.send(message);
    });
}
