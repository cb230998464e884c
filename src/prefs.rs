//! UI preferences behind a key-value store.
//!
//! The browser keeps these in `localStorage`; the server side reads the same
//! keys through [`KeyValueStore`] so generated pages can start with the
//! reader's theme, sidebar width and open folders.
//!
//! | key                | value                           |
//! |--------------------|---------------------------------|
//! | `theme`            | `dark` or `light`               |
//! | `sidebarWidth`     | integer pixels                  |
//! | `collapsedFolders` | JSON array of folder ids        |
//!
//! Missing or malformed values fall back to defaults; they are never errors.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::SidebarConfig;
use crate::manifest::ManifestRoot;
use crate::nav::NavState;

pub const THEME_KEY: &str = "theme";
pub const SIDEBAR_WIDTH_KEY: &str = "sidebarWidth";
pub const COLLAPSED_KEY: &str = "collapsedFolders";

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Preferences file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
    fn remove(&mut self, key: &str) -> Result<(), PrefsError>;
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        self.values.remove(key);
        Ok(())
    }
}

/// A flat JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open a store file. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, PrefsError> {
        let values = if path.exists() {
            serde_json::from_str(&fs::read_to_string(path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    fn flush(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
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

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Reader-facing UI state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiPreferences {
    /// Explicit collapsed folder ids; `None` means "all collapsed".
    pub collapsed: Option<BTreeSet<String>>,
    pub theme: Theme,
    pub sidebar_width: u32,
}

impl UiPreferences {
    pub fn defaults(sidebar: &SidebarConfig) -> Self {
        Self {
            collapsed: None,
            theme: Theme::default(),
            sidebar_width: sidebar.default_width,
        }
    }

    /// Read preferences, ignoring anything missing or malformed.
    ///
    /// The stored width is clamped to the configured bounds.
    pub fn load(store: &dyn KeyValueStore, sidebar: &SidebarConfig) -> Self {
        let mut prefs = Self::defaults(sidebar);

        if let Some(theme) = store.get(THEME_KEY).as_deref().and_then(Theme::parse) {
            prefs.theme = theme;
        }
        if let Some(width) = store
            .get(SIDEBAR_WIDTH_KEY)
            .and_then(|w| w.trim().parse::<u32>().ok())
            .filter(|w| *w > 0)
        {
            prefs.sidebar_width = sidebar.clamp(width);
        }
        if let Some(raw) = store.get(COLLAPSED_KEY) {
            match serde_json::from_str::<BTreeSet<String>>(&raw) {
                Ok(set) => prefs.collapsed = Some(set),
                Err(e) => tracing::debug!(error = %e, "ignoring malformed collapsed folders"),
            }
        }
        prefs
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PrefsError> {
        store.set(THEME_KEY, self.theme.as_str())?;
        store.set(SIDEBAR_WIDTH_KEY, &self.sidebar_width.to_string())?;
        match &self.collapsed {
            Some(set) => store.set(COLLAPSED_KEY, &serde_json::to_string(set)?),
            None => store.remove(COLLAPSED_KEY),
        }
    }

    /// Navigation state these preferences describe for a manifest.
    pub fn nav_state(&self, root: &ManifestRoot) -> NavState {
        match &self.collapsed {
            Some(set) => NavState::from_collapsed(set.iter().cloned()),
            None => NavState::new(root),
        }
    }

    /// Remember the collapse state of a navigation tree.
    pub fn remember(&mut self, state: &NavState) {
        self.collapsed = Some(state.collapsed().clone());
    }
}
