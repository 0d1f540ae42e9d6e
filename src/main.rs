#![forbid(unsafe_code)]

mod cli;
mod config;
mod constants;
mod emit;
mod layout;
mod monitor;
mod persistence;
mod probe;

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{debug, info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use config::{Paths, Settings};
use emit::{monitor_directives, Emitter};
use layout::{resolve, LayoutResult};
use monitor::{parse_monitors, IntakeError, MonitorRole, MonitorSet, SecondarySide};
use persistence::ensure_backup;
use probe::{MatchPolicy, Prober};

/// Per-invocation switches that shape what `apply` does
#[derive(Debug, Clone, Copy)]
struct RunOptions {
    secondary: SecondarySide,
    verbose: bool,
    dry_run: bool,
}

fn init_logging(verbose: bool) -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var(constants::env::LOG_LEVEL)
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "info" => TraceLevel::INFO,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::WARN,
    };
    // --verbose never lowers an explicitly chattier LOG_LEVEL
    let log_level = if verbose { log_level.max(TraceLevel::DEBUG) } else { log_level };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Back up, probe, resolve and emit for an already validated monitor set
fn apply<W: Write>(
    monitors: &MonitorSet,
    paths: &Paths,
    policy: &MatchPolicy,
    options: RunOptions,
    out: &mut W,
) -> Result<LayoutResult> {
    if !monitors.is_configured(MonitorRole::Builtin) {
        warn!("No builtin monitor configured, nothing to fall back on when externals are absent");
    }

    if options.dry_run {
        debug!("Dry run, not creating backups");
    } else {
        if ensure_backup(&paths.wm_config, &paths.wm_backup)? {
            info!("No hyprland.conf backup found, created one");
        }
        if ensure_backup(&paths.status_bar_config, &paths.status_bar_backup)? {
            info!("No waybar config backup found, created one");
        }
    }

    let report = Prober::new(&paths.drm_dir, policy).probe(monitors)?;
    let layout = resolve(monitors, &report, options.secondary);
    info!(case = layout.case, row = ?layout.row, bar = ?layout.bar_target, "Resolved layout");

    let directives = monitor_directives(&layout.monitors, &report);
    if options.verbose {
        for directive in &directives {
            writeln!(out, "{directive}")?;
        }
    }

    Emitter::new(paths, options.dry_run).emit(
        out,
        &layout.monitors,
        &directives,
        layout.bar_target_name(),
    )?;

    Ok(layout)
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    // Validate everything before any file is looked at
    let monitors = parse_monitors(cli.monitor_args())?;

    let settings_path = cli.settings.clone().unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&settings_path)?;
    let paths = settings.paths();
    debug!(?paths, "Using paths");

    let options = RunOptions {
        secondary: cli.secondary_monitor,
        verbose: cli.verbose,
        dry_run: cli.dry_run,
    };
    apply(&monitors, &paths, &settings.match_policy(), options, out)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let stdout = io::stdout();
    match run(&cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(IntakeError::Invalid(errors)) = err.downcast_ref::<IntakeError>() {
                for field_error in errors {
                    eprintln!("Error, {field_error}");
                }
            } else {
                eprintln!("Error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
