//! Desktop directory resolution.
//!
//! Finds the user's Desktop folder underneath the home profile directory.
//! Cloud-synced desktops are preferred: `<profile>/OneDrive/Desktop` wins over
//! `<profile>/Desktop` when both exist. The locator holds the policy in one
//! place so every operation resolves the desktop the same way.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur while resolving the desktop directory.
#[derive(Debug, Clone)]
pub enum DesktopError {
    /// Neither `USERPROFILE` nor `HOME` is set in the environment.
    ProfileUnset,
    /// No desktop directory exists under the profile directory.
    DesktopNotFound(PathBuf),
}

impl fmt::Display for DesktopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesktopError::ProfileUnset => {
                write!(f, "Neither USERPROFILE nor HOME is set; cannot locate a profile directory")
            }
            DesktopError::DesktopNotFound(profile) => {
                write!(
                    f,
                    "Could not locate a Desktop folder under {}",
                    profile.display()
                )
            }
        }
    }
}

impl std::error::Error for DesktopError {}

/// Resolves the user's Desktop directory from a profile directory.
#[derive(Debug, Clone)]
pub struct DesktopLocator {
    profile: PathBuf,
}

impl DesktopLocator {
    /// Creates a locator rooted at an explicit profile directory.
    pub fn with_profile(profile: PathBuf) -> Self {
        Self { profile }
    }

    /// Creates a locator from the environment.
    ///
    /// Reads `USERPROFILE` first (Windows convention), then `HOME`.
    ///
    /// # Errors
    ///
    /// Returns `DesktopError::ProfileUnset` when neither variable is set.
    pub fn from_env() -> Result<Self, DesktopError> {
        let profile = env::var_os("USERPROFILE")
            .or_else(|| env::var_os("HOME"))
            .ok_or(DesktopError::ProfileUnset)?;
        Ok(Self::with_profile(PathBuf::from(profile)))
    }

    /// Returns the profile directory this locator is rooted at.
    pub fn profile(&self) -> &Path {
        &self.profile
    }

    /// Resolves the desktop path, preferring the cloud-synced variant.
    ///
    /// Checks `<profile>/OneDrive/Desktop`, then `<profile>/Desktop`, and
    /// returns the first directory that exists.
    ///
    /// # Errors
    ///
    /// Returns `DesktopError::DesktopNotFound` when neither exists.
    pub fn locate(&self) -> Result<PathBuf, DesktopError> {
        let onedrive_desktop = self.profile.join("OneDrive").join("Desktop");
        if onedrive_desktop.exists() {
            return Ok(onedrive_desktop);
        }

        let local_desktop = self.profile.join("Desktop");
        if local_desktop.exists() {
            return Ok(local_desktop);
        }

        Err(DesktopError::DesktopNotFound(self.profile.clone()))
    }
}
