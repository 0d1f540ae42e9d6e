//! Connectivity probing through the kernel's DRM connector directories
//!
//! Each connector shows up as `<drm_dir>/cardN-<output>` with a `status`
//! file. Connectors are attributed to configured roles by a [`MatchPolicy`].

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, trace};

use crate::constants::drm;
use crate::monitor::{MonitorRole, MonitorSet};

static OUTPUT_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(drm::OUTPUT_DIR_PATTERN).expect("output dir pattern is valid"));

/// Ordered list of roles to try when attributing a connector to a role.
///
/// The first role whose configured name is a proper suffix of the connector
/// directory name wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPolicy {
    order: Vec<MonitorRole>,
}

impl Default for MatchPolicy {
    /// Builtin first: `card0-eDP-1` also ends with `DP-1`, so trying an
    /// external named `DP-1` first would steal the laptop panel.
    fn default() -> Self {
        Self::new(vec![
            MonitorRole::Builtin,
            MonitorRole::Left,
            MonitorRole::Center,
            MonitorRole::Right,
        ])
    }
}

impl MatchPolicy {
    pub fn new(order: Vec<MonitorRole>) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &[MonitorRole] {
        &self.order
    }

    /// Role owning the connector directory `dir_name`, if any
    pub fn role_for(&self, dir_name: &str, monitors: &MonitorSet) -> Option<MonitorRole> {
        self.order.iter().copied().find(|&role| {
            monitors.get(role).is_some_and(|config| {
                dir_name.len() > config.name.len() && dir_name.ends_with(&config.name)
            })
        })
    }
}

/// Which configured roles are currently connected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectivityReport {
    connected: BTreeSet<MonitorRole>,
    /// Output names of connected roles in discovery order, no duplicates
    pub connected_names: Vec<String>,
}

impl ConnectivityReport {
    pub fn is_connected(&self, role: MonitorRole) -> bool {
        self.connected.contains(&role)
    }

    pub fn is_name_connected(&self, name: &str) -> bool {
        self.connected_names.iter().any(|n| n == name)
    }

    /// Record one connector's state for `role`. A role stays connected once
    /// any of its connectors reported connected.
    pub fn record(&mut self, role: MonitorRole, name: &str, connected: bool) {
        if connected && self.connected.insert(role) {
            self.connected_names.push(name.to_string());
        }
    }
}

/// Reads connector state from a DRM directory
pub struct Prober<'a> {
    drm_dir: &'a Path,
    policy: &'a MatchPolicy,
}

impl<'a> Prober<'a> {
    pub fn new(drm_dir: &'a Path, policy: &'a MatchPolicy) -> Self {
        Self { drm_dir, policy }
    }

    /// Probe every connector and attribute it to a configured role
    pub fn probe(&self, monitors: &MonitorSet) -> Result<ConnectivityReport> {
        let mut report = ConnectivityReport::default();
        debug!(
            drm_dir = %self.drm_dir.display(),
            order = ?self.policy.order(),
            "Probing connectors"
        );

        for dir_name in self.output_dirs()? {
            let Some(role) = self.policy.role_for(&dir_name, monitors) else {
                trace!(output = %dir_name, "Connector matches no configured monitor");
                continue;
            };
            let Some(config) = monitors.get(role) else {
                continue;
            };

            let connected = self.read_connected(&dir_name)?;
            debug!(output = %dir_name, role = %role, connected, "Probed connector");
            report.record(role, &config.name, connected);
        }

        Ok(report)
    }

    /// Connector directory names in lexical order
    fn output_dirs(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(self.drm_dir)
            .context(format!("Failed to read DRM directory {}", self.drm_dir.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .context(format!("Failed to read entry in {}", self.drm_dir.display()))?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if OUTPUT_DIR_RE.is_match(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_connected(&self, dir_name: &str) -> Result<bool> {
        let status_path = self.drm_dir.join(dir_name).join(drm::STATUS_FILE);
        let status = fs::read_to_string(&status_path)
            .context(format!("Failed to read connector status {}", status_path.display()))?;
        Ok(status.trim() == drm::CONNECTED)
    }
}
