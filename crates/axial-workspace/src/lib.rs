mod parse;
mod profile;
mod v1;
mod watcher;
mod workspace;

use thiserror::Error;

pub use parse::{parse_profile, serialize_profile};
pub use profile::{ApplyReport, Profile};
pub use v1::Error as ProfileV1Error;
pub use watcher::{ProfileEvent, ProfileEventReceiver, ProfileWatcher, WatcherError};
pub use workspace::Workspace;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),
    #[error("v1 profile error: {0}")]
    V1(#[from] v1::Error),
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("environment variable not set: {0}")]
    EnvVarNotSet(String),
    #[error("path is not a directory: {0}")]
    PathIsNotDirectory(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
    #[error("watcher error: {0}")]
    Watcher(#[from] WatcherError),
}
