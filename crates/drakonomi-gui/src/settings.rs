use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Show the tag highlight panel on the left.
    pub show_tag_panel: bool,
    /// Draw directional flow particles along edges.
    pub show_edge_particles: bool,
    /// How many related dragons the detail view lists.
    pub related_limit: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            show_tag_panel: true,
            show_edge_particles: true,
            related_limit: drakonomi_catalog::DEFAULT_RELATED_LIMIT,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "Drakonomi")
}

/// Where the favorites database lives.
pub fn favorites_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("favorites.db"))
}

fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("settings.json"))
}

impl AppSettings {
    /// Load persisted settings, falling back to defaults on any problem;
    /// a broken settings file must never stop the app from starting.
    pub fn load() -> Self {
        let Some(path) = settings_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(?path, %err, "unreadable settings file, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) {
        let Some(path) = settings_path() else {
            return;
        };
        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let raw = serde_json::to_string_pretty(self)?;
            std::fs::write(&path, raw)
        };
        if let Err(err) = write() {
            tracing::warn!(?path, %err, "failed to persist settings");
        }
    }
}
