//! Rendering and rewriting of the Hyprland and Waybar config files

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::config::Paths;
use crate::constants::{hypr, waybar};
use crate::monitor::{MonitorConfig, MonitorSet};
use crate::persistence::write_atomically;
use crate::probe::ConnectivityReport;

static OUTPUT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(waybar::OUTPUT_LINE_PATTERN).expect("output line pattern is valid")
});
static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(hypr::DIRECTIVE_PATTERN).expect("directive pattern is valid"));

/// `monitor = DP-1, 1920x1080@60, 0x0, 1`, commented out when inactive
pub fn directive_line(config: &MonitorConfig, active: bool) -> String {
    let directive = format!(
        "monitor = {}, {}@{}, {}, {}",
        config.name, config.resolution, config.refresh_rate, config.position, config.scale
    );
    if active {
        directive
    } else {
        format!("{}{directive}", hypr::COMMENT_PREFIX)
    }
}

/// One directive per configured role, Left, Center, Right, Builtin.
/// A directive is active iff its output was probed as connected.
pub fn monitor_directives(monitors: &MonitorSet, report: &ConnectivityReport) -> Vec<String> {
    monitors
        .iter()
        .map(|(_, config)| directive_line(config, report.is_name_connected(&config.name)))
        .collect()
}

/// Waybar's output line for `name`, byte for byte what waybar expects
pub fn status_bar_line(name: &str) -> String {
    format!("{}{name}{}", waybar::OUTPUT_START, waybar::OUTPUT_END)
}

/// Split a line from `split_inclusive('\n')` into its body and line ending
fn split_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

pub fn has_status_bar_output_line(contents: &str) -> bool {
    contents
        .split_inclusive('\n')
        .any(|line| OUTPUT_LINE_RE.is_match(split_ending(line).0))
}

/// Replace every `"output": [...]` line with one pointing at `target`.
/// All other bytes are kept as they are.
pub fn rewrite_status_bar(contents: &str, target: &str) -> String {
    let replacement = status_bar_line(target);
    let mut rewritten = String::with_capacity(contents.len());

    for line in contents.split_inclusive('\n') {
        let (body, ending) = split_ending(line);
        if OUTPUT_LINE_RE.is_match(body) {
            rewritten.push_str(&replacement);
            rewritten.push_str(ending);
        } else {
            rewritten.push_str(line);
        }
    }

    rewritten
}

/// Swap the monitor directives for `names` with `directives`.
///
/// Existing directives (active or commented) for any of `names` are dropped
/// and the new block goes where the first of them was, or at the end of the
/// file when there was none. Directives for other outputs are untouched.
pub fn rewrite_wm_config(contents: &str, directives: &[String], names: &[&str]) -> String {
    let mut rewritten = String::with_capacity(contents.len());
    let mut inserted = false;

    for line in contents.split_inclusive('\n') {
        let (body, _) = split_ending(line);
        let ours = DIRECTIVE_RE
            .captures(body)
            .and_then(|caps| caps.get(1))
            .is_some_and(|name| names.contains(&name.as_str()));

        if !ours {
            rewritten.push_str(line);
            continue;
        }
        if !inserted {
            for directive in directives {
                rewritten.push_str(directive);
                rewritten.push('\n');
            }
            inserted = true;
        }
    }

    if !inserted && !directives.is_empty() {
        if !rewritten.is_empty() && !rewritten.ends_with('\n') {
            rewritten.push('\n');
        }
        for directive in directives {
            rewritten.push_str(directive);
            rewritten.push('\n');
        }
    }

    rewritten
}

/// Writes the computed layout into the Hyprland and Waybar config files
pub struct Emitter<'a> {
    paths: &'a Paths,
    dry_run: bool,
}

impl<'a> Emitter<'a> {
    pub fn new(paths: &'a Paths, dry_run: bool) -> Self {
        Self { paths, dry_run }
    }

    /// Rewrite both config files. In dry-run mode the new contents go to
    /// `out` and nothing on disk changes.
    pub fn emit<W: Write>(
        &self,
        out: &mut W,
        monitors: &MonitorSet,
        directives: &[String],
        bar_target: Option<&str>,
    ) -> Result<()> {
        let names: Vec<&str> = monitors.iter().map(|(_, config)| config.name.as_str()).collect();

        let wm_path = &self.paths.wm_config;
        let wm_contents = read(wm_path)?;
        let wm_rewritten = rewrite_wm_config(&wm_contents, directives, &names);
        self.commit(out, wm_path, &wm_contents, &wm_rewritten)?;

        let Some(target) = bar_target else {
            warn!("No status bar target, leaving waybar config unchanged");
            return Ok(());
        };

        let bar_path = &self.paths.status_bar_config;
        let bar_contents = read(bar_path)?;
        if !has_status_bar_output_line(&bar_contents) {
            warn!(path = %bar_path.display(), "No \"output\" line found in waybar config");
        }
        let bar_rewritten = rewrite_status_bar(&bar_contents, target);
        self.commit(out, bar_path, &bar_contents, &bar_rewritten)?;
        info!(target = %target, "Status bar target set");

        Ok(())
    }

    fn commit<W: Write>(&self, out: &mut W, path: &Path, old: &str, new: &str) -> Result<()> {
        if self.dry_run {
            writeln!(out, "==> {} <==", path.display()).context("Failed to write preview")?;
            out.write_all(new.as_bytes()).context("Failed to write preview")?;
            if !new.ends_with('\n') {
                writeln!(out).context("Failed to write preview")?;
            }
            return Ok(());
        }

        if old == new {
            debug!(path = %path.display(), "Already up to date");
            return Ok(());
        }
        write_atomically(path, new)
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).context(format!("Failed to read {}", path.display()))
}
