//! Monitor roles and per-role configuration
//!
//! Command line values are checked against fixed syntactic patterns and
//! turned into typed [`MonitorConfig`]s. Validation never stops at the first
//! bad field: every field of every role is checked so the user sees all
//! problems in one run.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::patterns;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::NAME).expect("name pattern is valid"));
static RESOLUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::RESOLUTION).expect("resolution pattern is valid"));
static REFRESH_RATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::REFRESH_RATE).expect("refresh rate pattern is valid"));
static POSITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::POSITION).expect("position pattern is valid"));
static SCALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::SCALE).expect("scale pattern is valid"));

/// Number of values each `--*-monitor` option takes
pub const MONITOR_ARG_COUNT: usize = 5;

/// Logical monitor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorRole {
    Left,
    Center,
    Right,
    /// The laptop's own panel
    Builtin,
}

impl MonitorRole {
    /// All roles in emission order
    pub const ALL: [MonitorRole; 4] = [Self::Left, Self::Center, Self::Right, Self::Builtin];

    /// Roles placed side by side in the external row, left to right
    pub const EXTERNAL: [MonitorRole; 3] = [Self::Left, Self::Center, Self::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Builtin => "builtin",
        }
    }
}

impl fmt::Display for MonitorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side the secondary monitor sits on when exactly two externals are connected.
/// The status bar goes to the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SecondarySide {
    #[value(name = "l")]
    Left,
    #[value(name = "r")]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u16,
    pub height: u16,
}

impl Resolution {
    fn parse(value: &str) -> Option<Self> {
        if !RESOLUTION_RE.is_match(value) {
            return None;
        }
        let (width, height) = value.split_once('x')?;
        Some(Self {
            width: width.parse().ok()?,
            height: height.parse().ok()?,
        })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Start coordinate of a monitor in the layout. Monitors only ever sit in a
/// single row, so y is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: u16,
}

impl Position {
    pub fn new(x: u16) -> Self {
        Self { x }
    }

    fn parse(value: &str) -> Option<Self> {
        if !POSITION_RE.is_match(value) {
            return None;
        }
        let (x, _) = value.split_once('x')?;
        Some(Self::new(x.parse().ok()?))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x0", self.x)
    }
}

fn parse_refresh_rate(value: &str) -> Option<u16> {
    REFRESH_RATE_RE
        .is_match(value)
        .then(|| value.parse().ok())
        .flatten()
}

fn parse_scale(value: &str) -> Option<u8> {
    SCALE_RE.is_match(value).then(|| value.parse().ok()).flatten()
}

/// A single invalid command line field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{role} monitor expects 5 values, got {count}")]
    ArgCount { role: MonitorRole, count: usize },
    #[error("invalid output name for {role} monitor -> {value:?}")]
    Name { role: MonitorRole, value: String },
    #[error("invalid resolution for {role} monitor {name} -> {value}")]
    Resolution { role: MonitorRole, name: String, value: String },
    #[error("invalid refresh rate for {role} monitor {name} -> {value}")]
    RefreshRate { role: MonitorRole, name: String, value: String },
    #[error("invalid starting coordinate for {role} monitor {name} -> {value}")]
    Position { role: MonitorRole, name: String, value: String },
    #[error("invalid scale for {role} monitor {name} -> {value}")]
    Scale { role: MonitorRole, name: String, value: String },
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("{} invalid monitor field(s)", .0.len())]
    Invalid(Vec<FieldError>),
}

/// Static configuration for one monitor role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Output name as the host reports it, e.g. `DP-1` or `eDP-1`
    pub name: String,
    pub resolution: Resolution,
    pub refresh_rate: u16,
    /// The only field the layout resolver changes
    pub position: Position,
    pub scale: u8,
}

impl MonitorConfig {
    /// Parse `name resolution refresh-rate coordinate scale`, reporting every bad field
    pub fn parse(role: MonitorRole, values: &[String]) -> Result<Self, Vec<FieldError>> {
        let [name, resolution, refresh_rate, position, scale] = values else {
            return Err(vec![FieldError::ArgCount { role, count: values.len() }]);
        };

        let mut errors = Vec::new();
        if !NAME_RE.is_match(name) {
            errors.push(FieldError::Name { role, value: name.clone() });
        }
        let invalid = |value: &String| (name.clone(), value.clone());

        let parsed_resolution = Resolution::parse(resolution);
        if parsed_resolution.is_none() {
            let (name, value) = invalid(resolution);
            errors.push(FieldError::Resolution { role, name, value });
        }

        let parsed_refresh_rate = parse_refresh_rate(refresh_rate);
        if parsed_refresh_rate.is_none() {
            let (name, value) = invalid(refresh_rate);
            errors.push(FieldError::RefreshRate { role, name, value });
        }

        let parsed_position = Position::parse(position);
        if parsed_position.is_none() {
            let (name, value) = invalid(position);
            errors.push(FieldError::Position { role, name, value });
        }

        let parsed_scale = parse_scale(scale);
        if parsed_scale.is_none() {
            let (name, value) = invalid(scale);
            errors.push(FieldError::Scale { role, name, value });
        }

        match (parsed_resolution, parsed_refresh_rate, parsed_position, parsed_scale) {
            (Some(resolution), Some(refresh_rate), Some(position), Some(scale))
                if errors.is_empty() =>
            {
                Ok(Self {
                    name: name.clone(),
                    resolution,
                    refresh_rate,
                    position,
                    scale,
                })
            }
            _ => Err(errors),
        }
    }
}

/// One optional configuration slot per role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorSet {
    pub left: Option<MonitorConfig>,
    pub center: Option<MonitorConfig>,
    pub right: Option<MonitorConfig>,
    pub builtin: Option<MonitorConfig>,
}

impl MonitorSet {
    pub fn get(&self, role: MonitorRole) -> Option<&MonitorConfig> {
        self.slot(role).as_ref()
    }

    pub fn get_mut(&mut self, role: MonitorRole) -> Option<&mut MonitorConfig> {
        self.slot_mut(role).as_mut()
    }

    pub fn insert(&mut self, role: MonitorRole, config: MonitorConfig) {
        *self.slot_mut(role) = Some(config);
    }

    pub fn is_configured(&self, role: MonitorRole) -> bool {
        self.get(role).is_some()
    }

    /// Configured roles in Left, Center, Right, Builtin order
    pub fn iter(&self) -> impl Iterator<Item = (MonitorRole, &MonitorConfig)> {
        MonitorRole::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|config| (role, config)))
    }

    fn slot(&self, role: MonitorRole) -> &Option<MonitorConfig> {
        match role {
            MonitorRole::Left => &self.left,
            MonitorRole::Center => &self.center,
            MonitorRole::Right => &self.right,
            MonitorRole::Builtin => &self.builtin,
        }
    }

    fn slot_mut(&mut self, role: MonitorRole) -> &mut Option<MonitorConfig> {
        match role {
            MonitorRole::Left => &mut self.left,
            MonitorRole::Center => &mut self.center,
            MonitorRole::Right => &mut self.right,
            MonitorRole::Builtin => &mut self.builtin,
        }
    }
}

/// Validate every supplied role and build the monitor set.
///
/// All-or-nothing: a single bad field anywhere rejects the whole input, with
/// every bad field listed in the error.
pub fn parse_monitors<'a, I>(raw: I) -> Result<MonitorSet, IntakeError>
where
    I: IntoIterator<Item = (MonitorRole, &'a [String])>,
{
    let mut monitors = MonitorSet::default();
    let mut errors = Vec::new();

    for (role, values) in raw {
        match MonitorConfig::parse(role, values) {
            Ok(config) => monitors.insert(role, config),
            Err(field_errors) => errors.extend(field_errors),
        }
    }

    if errors.is_empty() {
        Ok(monitors)
    } else {
        Err(IntakeError::Invalid(errors))
    }
}
