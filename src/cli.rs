//! Command line interface

use clap::Parser;
use std::path::PathBuf;

use crate::monitor::{MONITOR_ARG_COUNT, MonitorRole, SecondarySide};

/// Set up Hyprland monitors and the Waybar output for whichever of up to
/// three side-by-side external monitors and a builtin laptop panel are
/// currently connected.
#[derive(Parser, Debug)]
#[command(name = "hypr-monitor-layout", version)]
#[command(
    after_help = "For help with monitor values, see https://wiki.hyprland.org/configuring/monitors/"
)]
pub struct Cli {
    /// Left monitor configuration
    #[arg(short = 'l', long, num_args = MONITOR_ARG_COUNT, value_names = MONITOR_VALUE_NAMES)]
    pub left_monitor: Option<Vec<String>>,

    /// Center monitor configuration
    #[arg(short = 'c', long, num_args = MONITOR_ARG_COUNT, value_names = MONITOR_VALUE_NAMES)]
    pub center_monitor: Option<Vec<String>>,

    /// Right monitor configuration
    #[arg(short = 'r', long, num_args = MONITOR_ARG_COUNT, value_names = MONITOR_VALUE_NAMES)]
    pub right_monitor: Option<Vec<String>>,

    /// Builtin (laptop) monitor configuration
    #[arg(short = 'b', long, num_args = MONITOR_ARG_COUNT, value_names = MONITOR_VALUE_NAMES)]
    pub builtin_monitor: Option<Vec<String>>,

    /// Side of the secondary monitor when only two externals are connected;
    /// the status bar goes on the other one
    #[arg(short = 's', long, value_enum)]
    pub secondary_monitor: SecondarySide,

    /// Log what is happening and print the monitor lines
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print the new config files instead of writing them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Settings file with alternate config locations
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

const MONITOR_VALUE_NAMES: [&str; MONITOR_ARG_COUNT] =
    ["NAME", "RESOLUTION", "REFRESH_RATE", "COORDINATE", "SCALE"];

impl Cli {
    /// Raw monitor values for every role given on the command line
    pub fn monitor_args(&self) -> Vec<(MonitorRole, &[String])> {
        [
            (MonitorRole::Left, &self.left_monitor),
            (MonitorRole::Center, &self.center_monitor),
            (MonitorRole::Right, &self.right_monitor),
            (MonitorRole::Builtin, &self.builtin_monitor),
        ]
        .into_iter()
        .filter_map(|(role, values)| values.as_deref().map(|values| (role, values)))
        .collect()
    }
}
