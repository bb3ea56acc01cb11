mod cli;
mod logging;
mod observe;
mod run;

use std::path::Path;
use std::process::ExitCode;

use axial_core::AxisRegistry;
use axial_device::{DeviceRegistry, Inputs, SdlEventSource};
use axial_workspace::{parse_profile, Workspace};
use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Command};
use crate::run::RunOptions;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::setup(cli.verbose, cli.no_color) {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("failed to set up logger: {e}");
        }
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Command::Run { rate, observe } => open_workspace(cli.workspace.as_deref())
            .and_then(|workspace| {
                run::run(
                    &workspace,
                    &RunOptions {
                        rate: *rate,
                        observe: *observe,
                    },
                )
            }),
        Command::Devices => list_devices(),
        Command::Check { path } => match path {
            Some(path) => check(path),
            None => open_workspace(cli.workspace.as_deref())
                .and_then(|workspace| check(&workspace.profile_path())),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn open_workspace(path: Option<&Path>) -> Result<Workspace, String> {
    Workspace::new(path).map_err(|e| format!("failed to open workspace: {e}"))
}

fn list_devices() -> Result<(), String> {
    let mut source =
        SdlEventSource::new().map_err(|e| format!("failed to start SDL: {e}"))?;
    let mut inputs = Inputs::new();
    inputs.apply(source.poll());

    let devices = inputs.devices();
    if devices.is_empty() {
        print_info!("no devices connected");
        return Ok(());
    }
    for (index, device) in devices.connected().enumerate() {
        let kind = if device.is_game_controller() {
            "controller"
        } else {
            "joystick"
        };
        print_info!(
            "{index}: {} [{kind}] id={} axes={} buttons={} hats={}",
            device.name().bold(),
            device.id(),
            device.axis_count(),
            device.button_count(),
            device.hat_count()
        );
        for axis in 0..device.axis_count() {
            if let Some(name) = device.axis_name(axis) {
                print_debug!("    axis {axis}: {name}");
            }
        }
    }
    Ok(())
}

/// Parse a profile and load it into a scratch registry without devices.
fn check(path: &Path) -> Result<(), String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let profile = parse_profile(&content)
        .map_err(|e| format!("invalid profile {}: {e}", path.display()))?;

    let mut registry = AxisRegistry::new();
    let report = profile.apply(&mut registry, &DeviceRegistry::new());
    for name in &report.skipped {
        print_warning!("embedded axis {name} duplicates a local one");
    }
    for error in &report.chain_errors {
        print_warning!("{error}");
    }

    let mut roots: Vec<&str> = registry
        .local_axes()
        .chain(registry.embedded_axes())
        .map(|axis| axis.name())
        .collect();
    roots.sort_unstable();
    for name in registry.save_order(roots) {
        if let Some(axis) = registry.get(&name) {
            print_info!("{name}: {}", axis.kind().type_name());
        }
    }
    print_info!(
        "{}: {} local, {} embedded axes",
        path.display(),
        registry.local_axes().count(),
        registry.embedded_axes().count()
    );

    if report.chain_errors.is_empty() {
        Ok(())
    } else {
        Err(format!("{} chain links closed a cycle", report.chain_errors.len()))
    }
}
