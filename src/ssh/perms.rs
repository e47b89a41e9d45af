//! File permission primitives
//!
//! POSIX modes are applied on Unix only; elsewhere these are no-ops and the
//! OS defaults apply.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use crate::error::{KeyManagerError, Result};

/// rwx for the owner only (`~/.ssh`)
pub const DIR_MODE: u32 = 0o700;
/// rw for the owner only (private keys, `config`)
pub const PRIVATE_MODE: u32 = 0o600;
/// rw for the owner, readable by everyone (public keys, `known_hosts`)
pub const PUBLIC_MODE: u32 = 0o644;

/// Set the permission bits of an existing path
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| KeyManagerError::io_at(path, e))
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Open a file for appending, creating it with `mode` if it does not exist
pub fn open_append(path: &Path, mode: u32) -> Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options.open(path).map_err(|e| KeyManagerError::io_at(path, e))
}

/// Create an empty file with `mode` if it is missing, then re-assert the mode
pub fn ensure_file(path: &Path, mode: u32) -> Result<()> {
    if !path.exists() {
        drop(open_append(path, mode)?);
    }
    set_mode(path, mode)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn mode_of(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn test_ensure_file_creates_with_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");

        ensure_file(&path, PRIVATE_MODE).unwrap();

        assert!(path.exists());
        assert_eq!(mode_of(&path), 0o600);
    }

    #[test]
    fn test_ensure_file_keeps_content_and_fixes_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "Host keep\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o666)).unwrap();

        ensure_file(&path, PRIVATE_MODE).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Host keep\n");
        assert_eq!(mode_of(&path), 0o600);
    }
}
