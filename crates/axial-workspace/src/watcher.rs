use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use std::fs;

use log::debug;
use notify::{Config, Error as NotifyError, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer_opt, DebounceEventResult, DebouncedEventKind, Debouncer};
use thiserror::Error;

use crate::{parse_profile, Profile, ProfileError};

const DEBOUNCE_TIMEOUT: Duration = Duration::from_millis(1000);
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ProfileError),
}

pub enum ProfileEvent {
    Changed(Profile),
    Removed,
    Error(WatcherError),
}

type ProfileEventSender = mpsc::Sender<ProfileEvent>;
pub type ProfileEventReceiver = mpsc::Receiver<ProfileEvent>;

/// Debounced watcher of one profile file.
///
/// The parent directory is watched so that a profile created after start is
/// picked up too.
pub struct ProfileWatcher<W: Watcher> {
    #[allow(dead_code)]
    watcher: Debouncer<W>,
}

fn send_profile_event(path: &Path, tx: &ProfileEventSender) {
    if !path.exists() {
        let _ = tx.send(ProfileEvent::Removed);
        return;
    }
    match fs::read_to_string(path) {
        Ok(content) => match parse_profile(&content) {
            Ok(profile) => {
                let _ = tx.send(ProfileEvent::Changed(profile));
            }
            Err(e) => {
                let _ = tx.send(ProfileEvent::Error(WatcherError::Parse(e)));
            }
        },
        Err(e) => {
            let _ = tx.send(ProfileEvent::Error(WatcherError::Io(e)));
        }
    };
}

impl<W: Watcher> ProfileWatcher<W> {
    pub fn new_with_sender(path: &Path, tx: ProfileEventSender) -> Result<Self, WatcherError> {
        let path_c = path.to_owned();
        let file_name = path.file_name().map(ToOwned::to_owned);
        let dir: PathBuf = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_owned(),
            _ => PathBuf::from("."),
        };

        let debouncer_config = notify_debouncer_mini::Config::default()
            .with_timeout(DEBOUNCE_TIMEOUT)
            .with_notify_config(Config::default().with_poll_interval(POLL_INTERVAL));
        let mut debouncer = new_debouncer_opt::<_, W>(
            debouncer_config,
            move |events: DebounceEventResult| match events {
                Ok(events) => {
                    let touched = events.iter().any(|event| {
                        matches!(
                            event.kind,
                            DebouncedEventKind::Any | DebouncedEventKind::AnyContinuous
                        ) && event.path.file_name() == file_name.as_deref()
                    });
                    if touched {
                        debug!("profile changed: {}", path_c.display());
                        send_profile_event(&path_c, &tx);
                    }
                }
                Err(error) => {
                    let _ = tx.send(ProfileEvent::Error(WatcherError::Notify(error)));
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self { watcher: debouncer })
    }

    pub fn new(path: &Path) -> Result<(Self, ProfileEventReceiver), WatcherError> {
        let (tx, rx) = mpsc::channel();

        Ok((Self::new_with_sender(path, tx)?, rx))
    }

    /// Same as [`ProfileWatcher::new`], with the current profile sent first.
    pub fn new_with_starting_event(
        path: &Path,
    ) -> Result<(Self, ProfileEventReceiver), WatcherError> {
        let (tx, rx) = mpsc::channel();

        send_profile_event(path, &tx);
        Ok((Self::new_with_sender(path, tx)?, rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_event_reports_missing_profile() {
        let path = std::env::temp_dir().join("axial-watcher-test-missing/axes.yaml");
        let (tx, rx) = mpsc::channel();
        send_profile_event(&path, &tx);
        assert!(matches!(rx.try_recv(), Ok(ProfileEvent::Removed)));
    }

    #[test]
    fn starting_event_parses_existing_profile() {
        let dir = std::env::temp_dir().join(format!("axial-watcher-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("axes.yaml");
        fs::write(&path, "version: 1\n").unwrap();

        let (tx, rx) = mpsc::channel();
        send_profile_event(&path, &tx);
        match rx.try_recv() {
            Ok(ProfileEvent::Changed(profile)) => assert!(profile.is_empty()),
            _ => panic!("expected a parsed profile"),
        }

        fs::write(&path, "version: 9\n").unwrap();
        send_profile_event(&path, &tx);
        assert!(matches!(
            rx.try_recv(),
            Ok(ProfileEvent::Error(WatcherError::Parse(_)))
        ));
        let _ = fs::remove_dir_all(&dir);
    }
}
