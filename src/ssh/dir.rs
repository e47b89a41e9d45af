//! Resolution and provisioning of the per-user `~/.ssh` directory

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::perms;
use crate::error::{KeyManagerError, Result};

const SSH_DIR: &str = ".ssh";

/// Platform lookup of the SSH directory
pub trait PlatformPaths {
    fn ssh_dir(&self) -> Result<PathBuf>;
}

/// `~/.ssh` under a home directory, by default the current user's
#[derive(Debug, Clone)]
pub struct HomeDir {
    home: Option<PathBuf>,
}

impl HomeDir {
    /// Home of the current user ($HOME, or the profile directory on Windows)
    pub fn current() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    /// Fixed home directory
    pub fn at(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
        }
    }
}

impl PlatformPaths for HomeDir {
    fn ssh_dir(&self) -> Result<PathBuf> {
        match &self.home {
            Some(home) if !home.as_os_str().is_empty() => Ok(home.join(SSH_DIR)),
            _ => Err(KeyManagerError::Configuration(
                "не удалось определить домашний каталог пользователя".into(),
            )),
        }
    }
}

/// Resolve the SSH directory, create it if needed and restrict it to the owner.
///
/// Safe to call repeatedly: the mode is re-asserted every time.
pub fn resolve_and_prepare(paths: &dyn PlatformPaths) -> Result<PathBuf> {
    let ssh_dir = paths.ssh_dir()?;

    if !ssh_dir.exists() {
        debug!(path = %ssh_dir.display(), "creating ssh directory");
        fs::create_dir_all(&ssh_dir).map_err(|e| KeyManagerError::io_at(&ssh_dir, e))?;
    }
    perms::set_mode(&ssh_dir, perms::DIR_MODE)?;

    Ok(ssh_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_nested_ssh_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("users").join("oleg");

        let ssh_dir = resolve_and_prepare(&HomeDir::at(&home)).unwrap();

        assert_eq!(ssh_dir, home.join(".ssh"));
        assert!(ssh_dir.is_dir());
    }

    #[test]
    fn test_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = HomeDir::at(tmp.path());

        let first = resolve_and_prepare(&paths).unwrap();
        fs::write(first.join("config"), "Host x\n").unwrap();
        let second = resolve_and_prepare(&paths).unwrap();

        assert_eq!(first, second);
        assert!(second.join("config").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_mode_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let ssh_dir = tmp.path().join(".ssh");
        fs::create_dir(&ssh_dir).unwrap();
        fs::set_permissions(&ssh_dir, fs::Permissions::from_mode(0o755)).unwrap();

        resolve_and_prepare(&HomeDir::at(tmp.path())).unwrap();

        let mode = fs::metadata(&ssh_dir).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);
    }

    #[test]
    fn test_missing_or_empty_home() {
        let missing = HomeDir { home: None };
        assert!(matches!(
            resolve_and_prepare(&missing),
            Err(KeyManagerError::Configuration(_))
        ));

        let empty = HomeDir::at("");
        assert!(matches!(
            resolve_and_prepare(&empty),
            Err(KeyManagerError::Configuration(_))
        ));
    }
}
