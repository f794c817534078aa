use crate::error::StorageError;
use ratatui::style::Color;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Storage key holding the theme preference.
pub const THEME_KEY: &str = "theme";

/// Two-state colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                bg: Color::Reset,
                fg: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                highlight: Color::Yellow,
                chip_fg: Color::Black,
                chip_bg: Color::Cyan,
                selected_border: Color::Yellow,
                error: Color::Red,
            },
            Theme::Light => Palette {
                bg: Color::White,
                fg: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                highlight: Color::Magenta,
                chip_fg: Color::White,
                chip_bg: Color::Blue,
                selected_border: Color::Magenta,
                error: Color::Red,
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colours applied to every widget for the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
    pub chip_fg: Color,
    pub chip_bg: Color,
    pub selected_border: Color,
    pub error: Color,
}

/// Persistent string key/value store backed by a JSON object file.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) if s.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(s) => Ok(serde_json::from_str(&s)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    /// Write one key, keeping every other key already in the file.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking the write.
        let mut items = self.read_all().unwrap_or_default();
        items.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&items)?)?;
        Ok(())
    }
}

/// Owns the applied theme and its persisted copy.
#[derive(Debug)]
pub struct ThemeManager {
    storage: LocalStorage,
    current: Theme,
}

impl ThemeManager {
    /// Read the persisted theme, defaulting to dark when absent or unreadable.
    pub fn init(storage: LocalStorage) -> Self {
        let current = match storage.get_item(THEME_KEY) {
            Ok(Some(value)) => Theme::parse(&value).unwrap_or_else(|| {
                tracing::warn!(%value, "unrecognised theme in storage, using dark");
                Theme::Dark
            }),
            Ok(None) => Theme::Dark,
            Err(e) => {
                tracing::warn!(error = %e, path = %storage.path().display(), "could not read storage");
                Theme::Dark
            }
        };
        tracing::debug!(theme = %current, "theme applied");
        Self { storage, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn palette(&self) -> Palette {
        self.current.palette()
    }

    /// Flip the theme and persist it. The applied theme flips even when the
    /// write fails; the error is returned for reporting.
    pub fn toggle(&mut self) -> Result<Theme, StorageError> {
        self.current = self.current.toggled();
        tracing::debug!(theme = %self.current, "theme toggled");
        self.storage.set_item(THEME_KEY, self.current.as_str())?;
        Ok(self.current)
    }
}
