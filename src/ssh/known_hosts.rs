//! Provider host key entry in `~/.ssh/known_hosts`

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::perms;
use crate::error::{KeyManagerError, Result};
use crate::process::ProcessRunner;

const KNOWN_HOSTS_FILE: &str = "known_hosts";

/// Outcome of [`ensure_host_present`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKeyStatus {
    AlreadyPresent,
    Added,
}

pub fn known_hosts_path(ssh_dir: &Path) -> PathBuf {
    ssh_dir.join(KNOWN_HOSTS_FILE)
}

/// Whether `host` is listed in the host field of any entry.
///
/// The host field is the first whitespace-delimited token of a line and may
/// hold several comma-separated names.
pub fn contains_host(contents: &str, host: &str) -> bool {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next())
        .any(|hosts| hosts.split(',').any(|name| name == host))
}

/// Make sure `host` has an entry, scanning it with `program` (ssh-keyscan) if not.
///
/// A missing known_hosts file counts as "not present". Scan output is appended
/// verbatim.
pub async fn ensure_host_present(
    runner: &dyn ProcessRunner,
    program: &str,
    ssh_dir: &Path,
    host: &str,
) -> Result<HostKeyStatus> {
    let path = known_hosts_path(ssh_dir);

    let existing = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(KeyManagerError::io_at(&path, e)),
    };
    if contains_host(&existing, host) {
        debug!(host, "host key already known");
        return Ok(HostKeyStatus::AlreadyPresent);
    }

    let output = runner.run(program, &[host.to_string()]).await?;
    if !output.success() {
        return Err(KeyManagerError::tool(program, output.failure_message()));
    }
    if output.stdout.trim().is_empty() {
        return Err(KeyManagerError::tool(
            program,
            format!("не получено ни одного ключа для {}", host),
        ));
    }

    let mut file = perms::open_append(&path, perms::PUBLIC_MODE)?;
    let mut entry = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        entry.push('\n');
    }
    entry.push_str(&output.stdout);
    file.write_all(entry.as_bytes())
        .map_err(|e| KeyManagerError::io_at(&path, e))?;

    info!(host, path = %path.display(), "host key added to known_hosts");
    Ok(HostKeyStatus::Added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::{exited, FakeRunner};

    const SCAN: &str = "github.com ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIOMqqnkVzrm0SdG6UOoqKLsabgH5C9okWi0dh2l9GKJl\n";

    #[test]
    fn test_contains_host_first_token() {
        assert!(contains_host("github.com ssh-ed25519 AAAA...", "github.com"));
        assert!(contains_host("somehost,github.com ssh-rsa AAAA...", "github.com"));
        assert!(contains_host("github.com,140.82.121.4 ecdsa-sha2-nistp256 AAAA", "github.com"));
        assert!(!contains_host("notgithub.com ssh-rsa AAAA...", "github.com"));
        assert!(!contains_host("gitlab.com ssh-rsa github.com", "github.com"));
        assert!(!contains_host("# github.com ssh-rsa AAAA", "github.com"));
        assert!(!contains_host("", "github.com"));
    }

    #[test]
    fn test_contains_host_indented_and_multiline() {
        let contents = "example.org ssh-rsa AAAA\n\n   github.com ssh-ed25519 AAAA\n";
        assert!(contains_host(contents, "github.com"));
    }

    #[tokio::test]
    async fn test_present_host_skips_scan() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(known_hosts_path(tmp.path()), SCAN).unwrap();
        let runner = FakeRunner::new();

        let status = ensure_host_present(&runner, "ssh-keyscan", tmp.path(), "github.com")
            .await
            .unwrap();

        assert_eq!(status, HostKeyStatus::AlreadyPresent);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_created_with_scan_output() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = FakeRunner::new().on("ssh-keyscan", |_| Ok(exited(0, SCAN, "# github.com:22 SSH-2.0\n")));

        let status = ensure_host_present(&runner, "ssh-keyscan", tmp.path(), "github.com")
            .await
            .unwrap();

        assert_eq!(status, HostKeyStatus::Added);
        assert_eq!(fs::read_to_string(known_hosts_path(tmp.path())).unwrap(), SCAN);
        assert_eq!(
            runner.calls(),
            vec![("ssh-keyscan".to_string(), vec!["github.com".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_appends_after_existing_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let path = known_hosts_path(tmp.path());
        fs::write(&path, "example.org ssh-rsa AAAA").unwrap();
        let runner = FakeRunner::new().on("ssh-keyscan", |_| Ok(exited(0, SCAN, "")));

        ensure_host_present(&runner, "ssh-keyscan", tmp.path(), "github.com")
            .await
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, format!("example.org ssh-rsa AAAA\n{}", SCAN));

        // second run finds the entry
        let status = ensure_host_present(&runner, "ssh-keyscan", tmp.path(), "github.com")
            .await
            .unwrap();
        assert_eq!(status, HostKeyStatus::AlreadyPresent);
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_scan_failure_when_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = FakeRunner::new().on("ssh-keyscan", |_| Ok(exited(1, "", "getaddrinfo github.com: Name or service not known\n")));

        let err = ensure_host_present(&runner, "ssh-keyscan", tmp.path(), "github.com")
            .await
            .unwrap_err();

        assert!(matches!(err, KeyManagerError::ExternalTool { ref message, .. } if message.contains("getaddrinfo")));
        assert!(!known_hosts_path(tmp.path()).exists());
    }

    #[tokio::test]
    async fn test_empty_scan_output_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = FakeRunner::new().on("ssh-keyscan", |_| Ok(exited(0, "", "")));

        let result = ensure_host_present(&runner, "ssh-keyscan", tmp.path(), "github.com").await;

        assert!(matches!(result, Err(KeyManagerError::ExternalTool { .. })));
    }
}
