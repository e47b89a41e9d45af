//! Ed25519 key pair generation through `ssh-keygen`
//!
//! Keys live at `<ssh_dir>/id_ed25519_<label>` and are never overwritten:
//! an existing private key blocks generation.

use std::fs;
use std::path::{Path, PathBuf};

use ssh_key::{HashAlg, PublicKey};
use tracing::{debug, info};

use super::perms;
use crate::error::{KeyManagerError, Result};
use crate::process::ProcessRunner;

const KEY_PREFIX: &str = "id_ed25519_";

/// Private key path for a label
pub fn private_key_path(ssh_dir: &Path, label: &str) -> PathBuf {
    ssh_dir.join(format!("{}{}", KEY_PREFIX, label))
}

/// Public key path for a label
pub fn public_key_path(ssh_dir: &Path, label: &str) -> PathBuf {
    ssh_dir.join(format!("{}{}.pub", KEY_PREFIX, label))
}

/// Comment embedded in the key (`<label>@<suffix>`)
pub fn key_comment(label: &str, suffix: &str) -> String {
    format!("{}@{}", label, suffix)
}

/// Generate a new key pair for `label` with the given `ssh-keygen` program,
/// commented `<label>@<comment_suffix>`.
///
/// Returns the private key path. Fails with [`KeyManagerError::AlreadyExists`]
/// without spawning anything if the private key is already there.
pub async fn generate(
    runner: &dyn ProcessRunner,
    program: &str,
    ssh_dir: &Path,
    label: &str,
    comment_suffix: &str,
) -> Result<PathBuf> {
    let key_path = private_key_path(ssh_dir, label);
    if key_path.exists() {
        return Err(KeyManagerError::AlreadyExists(key_path));
    }

    let args = vec![
        "-t".to_string(),
        "ed25519".to_string(),
        "-C".to_string(),
        key_comment(label, comment_suffix),
        "-f".to_string(),
        key_path.to_string_lossy().into_owned(),
        "-N".to_string(),
        String::new(),
    ];
    let output = runner.run(program, &args).await?;
    if !output.success() {
        return Err(KeyManagerError::tool(program, output.failure_message()));
    }

    perms::set_mode(&key_path, perms::PRIVATE_MODE)?;
    let pub_path = public_key_path(ssh_dir, label);
    if pub_path.exists() {
        perms::set_mode(&pub_path, perms::PUBLIC_MODE)?;
    }

    info!(path = %key_path.display(), "key pair generated");
    Ok(key_path)
}

/// Read the public key for `label`, trimmed
pub fn read_public_key(ssh_dir: &Path, label: &str) -> Result<String> {
    let path = public_key_path(ssh_dir, label);
    debug!(path = %path.display(), "reading public key");

    let content = fs::read_to_string(&path).map_err(|e| KeyManagerError::io_at(&path, e))?;
    Ok(content.trim().to_string())
}

/// SHA256 fingerprint of an OpenSSH public key line (`SHA256:...`)
pub fn fingerprint(public_key: &str) -> Result<String> {
    let key = PublicKey::from_openssh(public_key.trim()).map_err(|e| {
        KeyManagerError::Validation(format!("Некорректный публичный ключ: {}", e))
    })?;
    Ok(key.fingerprint(HashAlg::Sha256).to_string())
}
