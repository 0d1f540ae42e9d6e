//! Optional JSON settings file and resolved file locations
//!
//! Every field is optional. Anything not set falls back to the standard
//! Hyprland/Waybar locations under the user config dir, and the
//! `HYPR_CONFIG`, `WAYBAR_CONFIG` and `DRM_DIR` environment variables
//! override the result.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::constants::{self, drm, hypr, waybar};
use crate::monitor::MonitorRole;
use crate::probe::MatchPolicy;

/// Contents of `config.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypr_config: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypr_backup: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waybar_config: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waybar_backup: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drm_dir: Option<PathBuf>,

    /// Order in which roles are tried when attributing a connector.
    /// Defaults to builtin first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_order: Option<Vec<MonitorRole>>,
}

impl Settings {
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::config::APP_DIR);
        path.push(constants::config::FILENAME);
        path
    }

    /// Load settings from `path`. A missing file means defaults; a file that
    /// exists but does not parse is an error and is left untouched.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .context(format!("Failed to read settings file {}", path.display()))?;
        let settings: Self = serde_json::from_str(&contents)
            .context(format!("Failed to parse settings file {}", path.display()))?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn match_policy(&self) -> MatchPolicy {
        match &self.match_order {
            Some(order) => {
                if !order.contains(&MonitorRole::Builtin) {
                    warn!(
                        ?order,
                        "match_order has no builtin entry, builtin outputs will never match"
                    );
                }
                MatchPolicy::new(order.clone())
            }
            None => MatchPolicy::default(),
        }
    }

    /// Resolve file locations using the process environment
    pub fn paths(&self) -> Paths {
        self.paths_with_env(|key| std::env::var_os(key))
    }

    /// Resolve file locations with an injectable environment lookup
    pub fn paths_with_env<F>(&self, env: F) -> Paths
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        let env_path = |key: &str| env(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        let wm_config = env_path(constants::env::HYPR_CONFIG)
            .or_else(|| self.hypr_config.clone())
            .unwrap_or_else(|| config_dir.join(hypr::APP_DIR).join(hypr::FILENAME));
        let status_bar_config = env_path(constants::env::WAYBAR_CONFIG)
            .or_else(|| self.waybar_config.clone())
            .unwrap_or_else(|| config_dir.join(waybar::APP_DIR).join(waybar::FILENAME));
        let drm_dir = env_path(constants::env::DRM_DIR)
            .or_else(|| self.drm_dir.clone())
            .unwrap_or_else(|| PathBuf::from(drm::DEFAULT_DIR));

        Paths {
            wm_backup: self.hypr_backup.clone().unwrap_or_else(|| backup_path(&wm_config)),
            status_bar_backup: self
                .waybar_backup
                .clone()
                .unwrap_or_else(|| backup_path(&status_bar_config)),
            wm_config,
            status_bar_config,
            drm_dir,
        }
    }
}

/// `hyprland.conf` -> `hyprland.conf.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(constants::config::BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Every file location the tool touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub wm_config: PathBuf,
    pub wm_backup: PathBuf,
    pub status_bar_config: PathBuf,
    pub status_bar_backup: PathBuf,
    pub drm_dir: PathBuf,
}
