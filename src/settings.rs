//! Provider constants and tunables shared by all operations

use std::time::Duration;

/// Canonical hostname of the provider's SSH endpoint
pub const PROVIDER_HOST: &str = "github.com";

/// Default REST API base
pub const API_BASE_URL: &str = "https://api.github.com";

/// Pinned REST API version
pub const API_VERSION: &str = "2022-11-28";

/// Suffix of the key comment (`<label>@github`)
pub const KEY_COMMENT_SUFFIX: &str = "github";

/// SSH login user on the provider side
pub const PROVIDER_USER: &str = "git";

/// Names of the external OpenSSH tools
#[derive(Debug, Clone)]
pub struct Tools {
    pub keygen: String,
    pub keyscan: String,
    pub ssh: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            keygen: "ssh-keygen".to_string(),
            keyscan: "ssh-keyscan".to_string(),
            ssh: "ssh".to_string(),
        }
    }
}

/// Runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Hostname written into `HostName` and scanned into known_hosts
    pub provider_host: String,
    /// Key comment is `<label>@<key_comment_suffix>`
    pub key_comment_suffix: String,
    /// Base URL of the key registration API
    pub api_base_url: String,
    pub api_version: String,
    pub user_agent: String,
    pub tools: Tools,
    /// Upper bound for every spawned tool
    pub command_timeout: Duration,
    /// Upper bound for the registration request
    pub http_timeout: Duration,
}

impl Settings {
    /// Override the subprocess timeout
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider_host: PROVIDER_HOST.to_string(),
            key_comment_suffix: KEY_COMMENT_SUFFIX.to_string(),
            api_base_url: API_BASE_URL.to_string(),
            api_version: API_VERSION.to_string(),
            user_agent: format!("gh-keys/{}", env!("CARGO_PKG_VERSION")),
            tools: Tools::default(),
            command_timeout: Duration::from_secs(60),
            http_timeout: Duration::from_secs(20),
        }
    }
}
