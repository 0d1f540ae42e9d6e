//! Layout resolution
//!
//! Decides which monitors form the visible row, rewrites their start
//! coordinates so the row has no gaps, and picks the monitor the status bar
//! is drawn on.
//!
//! Configured coordinates describe a fully populated row. When a monitor is
//! missing, the monitors to its right slide left into the offsets it leaves
//! behind, and the builtin panel takes the first offset left over. No
//! width arithmetic is needed.

use crate::monitor::{MonitorRole, MonitorSet, Position, SecondarySide};
use crate::probe::ConnectivityReport;

use MonitorRole::{Builtin, Center, Left, Right};

/// Outcome of layout resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutResult {
    /// Input monitors with adjusted positions
    pub monitors: MonitorSet,
    /// Roles shown left to right
    pub row: Vec<MonitorRole>,
    /// Role the status bar is drawn on. None only when nothing is configured.
    pub bar_target: Option<MonitorRole>,
    /// Human description of the connectivity case
    pub case: &'static str,
}

impl LayoutResult {
    /// Output name of the bar target
    pub fn bar_target_name(&self) -> Option<&str> {
        self.bar_target
            .and_then(|role| self.monitors.get(role))
            .map(|config| config.name.as_str())
    }
}

/// Row, bar target and description for one connectivity combination
struct Arrangement {
    row: &'static [MonitorRole],
    bar: MonitorRole,
    case: &'static str,
}

fn arrangement(left: bool, center: bool, right: bool, secondary: SecondarySide) -> Arrangement {
    let secondary_left = secondary == SecondarySide::Left;

    match (left, center, right) {
        (true, true, true) => Arrangement {
            row: &[Left, Center, Right],
            bar: Center,
            case: "all monitors connected",
        },
        (false, true, true) => Arrangement {
            row: &[Center, Right, Builtin],
            bar: if secondary_left { Right } else { Center },
            case: "left monitor not connected",
        },
        (true, false, true) => Arrangement {
            row: &[Left, Right, Builtin],
            bar: if secondary_left { Right } else { Left },
            case: "center monitor not connected",
        },
        (true, true, false) => Arrangement {
            row: &[Left, Center, Builtin],
            bar: if secondary_left { Center } else { Left },
            case: "right monitor not connected",
        },
        (true, false, false) => Arrangement {
            row: &[Left, Builtin],
            bar: Left,
            case: "center and right monitors not connected",
        },
        (false, true, false) => Arrangement {
            row: &[Center, Builtin],
            bar: Center,
            case: "left and right monitors not connected",
        },
        (false, false, true) => Arrangement {
            row: &[Right, Builtin],
            bar: Right,
            case: "left and center monitors not connected",
        },
        (false, false, false) => Arrangement {
            row: &[Builtin],
            bar: Builtin,
            case: "no external monitors connected",
        },
    }
}

/// Resolve the layout for the probed connectivity.
///
/// External roles that are not configured count as disconnected. The
/// builtin's own connectivity does not matter: it is the fallback.
pub fn resolve(
    monitors: &MonitorSet,
    report: &ConnectivityReport,
    secondary: SecondarySide,
) -> LayoutResult {
    let present = |role| monitors.is_configured(role) && report.is_connected(role);
    let Arrangement { row, bar, case } =
        arrangement(present(Left), present(Center), present(Right), secondary);

    // Offsets of a fully populated row, taken before anything moves
    let slots: Vec<Position> = MonitorRole::EXTERNAL
        .iter()
        .filter_map(|&role| monitors.get(role).map(|config| config.position))
        .collect();

    let row: Vec<MonitorRole> = row
        .iter()
        .copied()
        .filter(|&role| monitors.is_configured(role))
        .collect();

    let mut adjusted = monitors.clone();
    for (&role, &slot) in row.iter().zip(&slots) {
        if let Some(config) = adjusted.get_mut(role) {
            config.position = slot;
        }
    }

    let bar_target = if monitors.is_configured(bar) {
        Some(bar)
    } else {
        monitors.iter().map(|(role, _)| role).next()
    };

    LayoutResult {
        monitors: adjusted,
        row,
        bar_target,
        case,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::tests::monitor;

    const L: u16 = 0;
    const C: u16 = 1920;
    const R: u16 = 3840;
    const B: u16 = 5760;

    fn full_set() -> MonitorSet {
        let mut set = MonitorSet::default();
        set.insert(Left, monitor("DP-1", L));
        set.insert(Center, monitor("DP-2", C));
        set.insert(Right, monitor("DP-3", R));
        set.insert(Builtin, monitor("eDP-1", B));
        set
    }

    fn report(monitors: &MonitorSet, connected: &[MonitorRole]) -> ConnectivityReport {
        let mut report = ConnectivityReport::default();
        for &role in connected {
            if let Some(config) = monitors.get(role) {
                report.record(role, &config.name, true);
            }
        }
        report
    }

    fn x(result: &LayoutResult, role: MonitorRole) -> u16 {
        result.monitors.get(role).unwrap().position.x
    }

    /// (connected, expected x for L, C, R, B, bar with secondary=l, bar with secondary=r)
    fn table() -> Vec<(Vec<MonitorRole>, [u16; 4], MonitorRole, MonitorRole)> {
        vec![
            (vec![Left, Center, Right], [L, C, R, B], Center, Center),
            (vec![Center, Right], [L, L, C, R], Right, Center),
            (vec![Left, Right], [L, C, C, R], Right, Left),
            (vec![Left, Center], [L, C, R, R], Center, Left),
            (vec![Left], [L, C, R, C], Left, Left),
            (vec![Center], [L, L, R, C], Center, Center),
            (vec![Right], [L, C, L, C], Right, Right),
            (vec![], [L, C, R, L], Builtin, Builtin),
        ]
    }

    #[test]
    fn test_all_eight_combinations_both_sides() {
        let monitors = full_set();
        for (connected, positions, bar_secondary_left, bar_secondary_right) in table() {
            let report = report(&monitors, &connected);

            for (secondary, expected_bar) in [
                (SecondarySide::Left, bar_secondary_left),
                (SecondarySide::Right, bar_secondary_right),
            ] {
                let result = resolve(&monitors, &report, secondary);
                let actual = [
                    x(&result, Left),
                    x(&result, Center),
                    x(&result, Right),
                    x(&result, Builtin),
                ];
                assert_eq!(
                    actual, positions,
                    "positions for {connected:?} secondary={secondary:?}"
                );
                assert_eq!(
                    result.bar_target,
                    Some(expected_bar),
                    "bar for {connected:?} secondary={secondary:?}"
                );
            }
        }
    }

    #[test]
    fn test_connected_monitors_form_contiguous_row() {
        let monitors = full_set();
        for (connected, ..) in table() {
            let result = resolve(&monitors, &report(&monitors, &connected), SecondarySide::Left);
            let xs: Vec<u16> = result.row.iter().map(|&role| x(&result, role)).collect();
            let expected: Vec<u16> = [L, C, R, B].into_iter().take(xs.len()).collect();
            assert_eq!(xs, expected, "row for {connected:?}");
        }
    }

    #[test]
    fn test_left_and_right_tie_break() {
        let monitors = full_set();
        let report = report(&monitors, &[Left, Right, Builtin]);

        let result = resolve(&monitors, &report, SecondarySide::Left);
        assert_eq!(result.bar_target_name(), Some("DP-3"));

        let result = resolve(&monitors, &report, SecondarySide::Right);
        assert_eq!(result.bar_target_name(), Some("DP-1"));
    }

    #[test]
    fn test_no_externals_falls_back_to_builtin() {
        let monitors = full_set();
        let result = resolve(&monitors, &report(&monitors, &[Builtin]), SecondarySide::Right);

        assert_eq!(result.bar_target_name(), Some("eDP-1"));
        assert_eq!(x(&result, Builtin), L);
        assert_eq!(result.row, vec![Builtin]);
        assert_eq!(result.case, "no external monitors connected");
    }

    #[test]
    fn test_builtin_connectivity_irrelevant() {
        let monitors = full_set();
        let with_builtin = resolve(
            &monitors,
            &report(&monitors, &[Left, Builtin]),
            SecondarySide::Left,
        );
        let without_builtin =
            resolve(&monitors, &report(&monitors, &[Left]), SecondarySide::Left);

        assert_eq!(with_builtin.monitors, without_builtin.monitors);
        assert_eq!(with_builtin.bar_target, without_builtin.bar_target);
    }

    #[test]
    fn test_only_position_changes() {
        let monitors = full_set();
        let result = resolve(&monitors, &report(&monitors, &[Right]), SecondarySide::Left);

        for (role, original) in monitors.iter() {
            let adjusted = result.monitors.get(role).unwrap();
            assert_eq!(adjusted.name, original.name);
            assert_eq!(adjusted.resolution, original.resolution);
            assert_eq!(adjusted.refresh_rate, original.refresh_rate);
            assert_eq!(adjusted.scale, original.scale);
        }
    }

    #[test]
    fn test_unconfigured_role_never_bar_target() {
        // Center absent from the input entirely, left and right connected
        let mut monitors = full_set();
        monitors.center = None;
        let report = report(&monitors, &[Left, Right]);

        let result = resolve(&monitors, &report, SecondarySide::Left);
        assert_eq!(result.bar_target, Some(Right));
        assert!(!result.row.contains(&Center));
        // Slots are left's and right's configured offsets
        assert_eq!(x(&result, Left), L);
        assert_eq!(x(&result, Right), R);
        assert_eq!(x(&result, Builtin), B);
    }

    #[test]
    fn test_unconfigured_connected_role_counts_as_disconnected() {
        let mut monitors = full_set();
        let report = report(&monitors, &[Left, Center, Right]);
        monitors.center = None;

        let result = resolve(&monitors, &report, SecondarySide::Right);
        assert_eq!(result.case, "center monitor not connected");
        assert_eq!(result.bar_target, Some(Left));
    }

    #[test]
    fn test_no_builtin_configured() {
        let mut monitors = full_set();
        monitors.builtin = None;

        let result = resolve(&monitors, &report(&monitors, &[Center]), SecondarySide::Left);
        assert_eq!(result.row, vec![Center]);
        assert_eq!(x(&result, Center), L);

        let result = resolve(&monitors, &report(&monitors, &[]), SecondarySide::Left);
        assert_eq!(result.bar_target, Some(Left));
        assert!(result.row.is_empty());
    }

    #[test]
    fn test_nothing_configured() {
        let monitors = MonitorSet::default();
        let result = resolve(&monitors, &ConnectivityReport::default(), SecondarySide::Left);

        assert_eq!(result.bar_target, None);
        assert_eq!(result.bar_target_name(), None);
    }
}
