use std::time::{Duration, Instant};

use axial_core::{AxisRegistry, Scheduler};
use axial_device::{DeviceChanges, DeviceId, SdlEventSource};
use axial_workspace::{Profile, ProfileEvent, Workspace};
use colored::Colorize;
use crossbeam_channel::{select, unbounded};

use crate::observe::Observer;
use crate::{print_debug, print_error, print_info, print_warning};

pub(crate) struct RunOptions {
    pub rate: u32,
    pub observe: bool,
}

/// Foreground loop: SDL events in, axis values out, profile hot reload.
///
/// SDL is polled on this thread; everything else arrives over channels.
pub(crate) fn run(workspace: &Workspace, options: &RunOptions) -> Result<(), String> {
    let (stop_tx, stop_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .map_err(|e| format!("failed to set Ctrl+C handler: {e}"))?;

    let (_watcher, profile_std_rx) = workspace
        .start_profile_watcher()
        .map_err(|e| format!("failed to watch profile: {e}"))?;
    let (profile_tx, profile_rx) = unbounded::<ProfileEvent>();
    std::thread::spawn(move || {
        while let Ok(event) = profile_std_rx.recv() {
            let _ = profile_tx.send(event);
        }
    });

    let mut source =
        SdlEventSource::new().map_err(|e| format!("failed to start SDL: {e}"))?;
    let mut scheduler = Scheduler::new(AxisRegistry::new());
    let mut observer = options.observe.then(Observer::new);

    let period = Duration::from_secs_f64(1.0 / f64::from(options.rate.max(1)));
    let ticker = crossbeam_channel::tick(period);
    let mut last_tick = Instant::now();

    scheduler.start();
    print_info!(
        "axiald started at {} Hz. Watching {}",
        options.rate.max(1),
        workspace.profile_path().display()
    );
    loop {
        select! {
            recv(stop_rx) -> _ => {
                break;
            }
            recv(profile_rx) -> msg => {
                match msg {
                    Ok(ProfileEvent::Changed(profile)) => {
                        load(&mut scheduler, &profile);
                        if let Some(observer) = observer.as_mut() {
                            observer.clear();
                        }
                    }
                    Ok(ProfileEvent::Removed) => {
                        print_warning!("profile removed, axes cleared");
                        scheduler.replace_registry(AxisRegistry::new());
                    }
                    Ok(ProfileEvent::Error(e)) => {
                        print_error!("failed to load profile: {e}");
                    }
                    Err(_) => {
                        print_error!("profile channel closed");
                        break;
                    }
                }
            }
            recv(ticker) -> _ => {
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f32();
                last_tick = now;

                let changes = scheduler.tick(dt, source.poll());
                if !changes.is_empty() {
                    report_devices(&mut scheduler, &changes);
                }
                if let Some(observer) = observer.as_mut() {
                    for change in observer.poll(scheduler.registry()) {
                        if change.status.is_ok() {
                            print_info!("{} = {:.3}", change.name, change.value);
                        } else {
                            print_info!("{} = {:.3} ({})", change.name, change.value, change.status);
                        }
                    }
                }
            }
        }
    }

    scheduler.stop();
    print_info!("axiald stopped after {} ticks", scheduler.ticks());
    Ok(())
}

/// Replace every axis with the ones a profile describes.
fn load(scheduler: &mut Scheduler, profile: &Profile) {
    let mut registry = AxisRegistry::new();
    let report = profile.apply(&mut registry, scheduler.inputs().devices());
    for name in &report.skipped {
        print_debug!("embedded axis {name} duplicates a local one, skipped");
    }
    for error in &report.chain_errors {
        print_warning!("{error}");
    }
    if report.rebound > 0 {
        print_info!("{} embedded axes bound to the first device", report.rebound);
    }
    print_info!(
        "profile loaded: {} local, {} embedded axes",
        profile.local.len(),
        profile.embedded.len() - report.skipped.len()
    );
    scheduler.replace_registry(registry);
}

fn report_devices(scheduler: &mut Scheduler, changes: &DeviceChanges) {
    for id in &changes.removed {
        print_info!("device disconnected: {id}");
    }
    for id in &changes.added {
        print_info!("device connected: {}", describe(scheduler, id));
    }
    if !changes.added.is_empty() {
        let rebound = scheduler.rebind_embedded();
        if rebound > 0 {
            print_info!("{rebound} embedded axes bound to the first device");
        }
    }
}

fn describe(scheduler: &Scheduler, id: &DeviceId) -> String {
    match scheduler.inputs().devices().get(id) {
        Some(device) => format!("{} ({id})", device.name()),
        None => id.to_string(),
    }
}
