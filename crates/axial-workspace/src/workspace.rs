use std::path::{Path, PathBuf};

use crate::{parse_profile, serialize_profile, Profile, WorkspaceError};
use crate::{ProfileEventReceiver, ProfileWatcher};

#[cfg(target_os = "macos")]
const DEFAULT_WORKSPACE_PATH: &str = "Library/Application Support/axial";
#[cfg(not(target_os = "macos"))]
const DEFAULT_WORKSPACE_PATH: &str = ".config/axial";
const PROFILE_FILE_NAME: &str = "axes.yaml";

/// Directory holding the axis profile.
#[derive(Debug, Clone)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Open a workspace, creating the directory when it does not exist.
    pub fn new(path: Option<&Path>) -> Result<Self, WorkspaceError> {
        let path = match path {
            Some(path) => path.to_owned(),
            None => Self::default_path()?,
        };

        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        } else if !path.is_dir() {
            return Err(WorkspaceError::PathIsNotDirectory(
                path.display().to_string(),
            ));
        }

        Ok(Self { path })
    }

    #[cfg(target_os = "macos")]
    pub fn start_profile_watcher(
        &self,
    ) -> Result<(ProfileWatcher<notify::FsEventWatcher>, ProfileEventReceiver), WorkspaceError>
    {
        Ok(ProfileWatcher::<notify::FsEventWatcher>::new_with_starting_event(&self.profile_path())?)
    }

    #[cfg(not(target_os = "macos"))]
    pub fn start_profile_watcher(
        &self,
    ) -> Result<(ProfileWatcher<notify::PollWatcher>, ProfileEventReceiver), WorkspaceError> {
        Ok(ProfileWatcher::<notify::PollWatcher>::new_with_starting_event(&self.profile_path())?)
    }

    /// Read the profile. A missing file is an empty profile.
    pub fn load_profile(&self) -> Result<Profile, WorkspaceError> {
        let path = self.profile_path();
        if !path.exists() {
            return Ok(Profile::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(parse_profile(&content)?)
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<(), WorkspaceError> {
        let content = serialize_profile(profile)?;
        std::fs::write(self.profile_path(), content)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn profile_path(&self) -> PathBuf {
        self.path.join(PROFILE_FILE_NAME)
    }

    pub fn default_path() -> Result<PathBuf, WorkspaceError> {
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(DEFAULT_WORKSPACE_PATH))
            .map_err(|_| WorkspaceError::EnvVarNotSet("HOME".to_string()))
    }
}
