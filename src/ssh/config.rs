//! Host blocks in the OpenSSH client config (`~/.ssh/config`)
//!
//! The file is only ever appended to. Existing blocks, comments and manual
//! edits are left exactly as they are.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::perms;
use crate::error::{KeyManagerError, Result};
use crate::settings::PROVIDER_USER;

const CONFIG_FILE: &str = "config";

/// Outcome of [`ensure_entry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigUpdate {
    /// A `Host` line already declares the alias; nothing was written
    AlreadyPresent,
    Added,
}

pub fn config_path(ssh_dir: &Path) -> PathBuf {
    ssh_dir.join(CONFIG_FILE)
}

/// Tokens of a config line. Keywords may be separated from their
/// arguments by whitespace or `=`.
fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || c == '=')
        .filter(|t| !t.is_empty())
}

/// All aliases declared on `Host` lines, in file order
pub fn declared_aliases(contents: &str) -> Vec<String> {
    let mut aliases = Vec::new();
    for line in contents.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = tokens(line);
        if parts.next().is_some_and(|kw| kw.eq_ignore_ascii_case("host")) {
            aliases.extend(parts.map(str::to_string));
        }
    }
    aliases
}

/// Case-insensitive check against every declared alias
pub fn has_host_alias(contents: &str, alias: &str) -> bool {
    declared_aliases(contents)
        .iter()
        .any(|declared| declared.eq_ignore_ascii_case(alias))
}

/// Key path as written to `IdentityFile`: forward slashes on every platform
pub fn identity_file_value(key_path: &Path) -> String {
    key_path.to_string_lossy().replace('\\', "/")
}

/// Text of a new host block, without the separating blank line
pub fn render_entry(alias: &str, host_name: &str, key_path: &Path) -> String {
    format!(
        "Host {alias}\n  HostName {host_name}\n  User {PROVIDER_USER}\n  IdentityFile \"{}\"\n  AddKeysToAgent yes\n  IdentitiesOnly yes\n",
        identity_file_value(key_path)
    )
}

/// Read the config file, creating an empty owner-only file if it is missing
pub fn read_config(path: &Path) -> Result<String> {
    perms::ensure_file(path, perms::PRIVATE_MODE)?;
    fs::read_to_string(path).map_err(|e| KeyManagerError::io_at(path, e))
}

/// Append a host block for `alias` unless one already exists
pub fn ensure_entry(
    path: &Path,
    alias: &str,
    host_name: &str,
    key_path: &Path,
) -> Result<ConfigUpdate> {
    let existing = read_config(path)?;
    if has_host_alias(&existing, alias) {
        debug!(alias, path = %path.display(), "host alias already configured");
        return Ok(ConfigUpdate::AlreadyPresent);
    }

    let separator = if existing.is_empty() {
        ""
    } else if existing.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    };
    let entry = format!("{}{}", separator, render_entry(alias, host_name, key_path));

    let mut file = perms::open_append(path, perms::PRIVATE_MODE)?;
    file.write_all(entry.as_bytes())
        .map_err(|e| KeyManagerError::io_at(path, e))?;

    info!(alias, path = %path.display(), "host entry appended to ssh config");
    Ok(ConfigUpdate::Added)
}
