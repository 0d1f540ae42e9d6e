//! Application-wide constants
//!
//! Field patterns, host paths and the exact text the status bar expects,
//! kept in one place so the rewriting code never embeds literals.

/// Syntactic patterns for monitor fields passed on the command line
///
/// Numbers never carry leading zeros, so a parsed value renders back to the
/// text it came from.
pub mod patterns {
    /// Output name: non-empty, no whitespace or commas, since both would
    /// break the `monitor = <name>, ...` directive
    pub const NAME: &str = r"^[^\s,]+$";

    /// `WxH` with a 4-digit width and 3-4 digit height
    pub const RESOLUTION: &str = r"^[1-9][0-9]{3}x[1-9][0-9]{2,3}$";

    /// Refresh rate in Hz, 2-3 digits
    pub const REFRESH_RATE: &str = r"^[1-9][0-9]{1,2}$";

    /// Horizontal start coordinate, y is always 0
    pub const POSITION: &str = r"^(0|[1-9][0-9]{0,3})x0$";

    /// Single digit scale factor, 1-9
    pub const SCALE: &str = r"^[1-9]$";
}

/// Kernel DRM connector layout under sysfs
pub mod drm {
    /// Default location of the connector directories
    pub const DEFAULT_DIR: &str = "/sys/class/drm";

    /// Connector directory names look like `card0-DP-1`
    pub const OUTPUT_DIR_PATTERN: &str = r"^card[0-9]+-\S+$";

    /// File inside a connector directory holding its connection state
    pub const STATUS_FILE: &str = "status";

    /// Trimmed status content for a connected output
    pub const CONNECTED: &str = "connected";
}

/// Hyprland config file
pub mod hypr {
    /// Directory under the user config dir
    pub const APP_DIR: &str = "hypr";

    pub const FILENAME: &str = "hyprland.conf";

    /// Prefix that disables a line in hyprland.conf
    pub const COMMENT_PREFIX: &str = "# ";

    /// Matches a monitor directive, active or commented out, capturing the output name
    pub const DIRECTIVE_PATTERN: &str = r"^\s*#?\s*monitor\s*=\s*([^,\s]+)\s*,";
}

/// Waybar config file
pub mod waybar {
    pub const APP_DIR: &str = "waybar";

    pub const FILENAME: &str = "config";

    /// The line selecting which output the bar is drawn on
    pub const OUTPUT_LINE_PATTERN: &str = r#"^\s*"output":\s*\[\S+\s*\],\s*$"#;

    /// Replacement is `OUTPUT_START` + name + `OUTPUT_END`, byte for byte
    pub const OUTPUT_START: &str = r#"    "output": [""#;
    pub const OUTPUT_END: &str = r#"", ],"#;
}

/// Settings file for this tool
pub mod config {
    pub const APP_DIR: &str = "hypr-monitor-layout";

    pub const FILENAME: &str = "config.json";

    /// Suffix appended to a config file name to form its backup
    pub const BACKUP_SUFFIX: &str = ".bak";
}

/// Environment variables that override configured paths
pub mod env {
    pub const HYPR_CONFIG: &str = "HYPR_CONFIG";
    pub const WAYBAR_CONFIG: &str = "WAYBAR_CONFIG";
    pub const DRM_DIR: &str = "DRM_DIR";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}
