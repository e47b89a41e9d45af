//! `POST /user/keys` client

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{KeyManagerError, Result};
use crate::settings::Settings;

const KEYS_ENDPOINT: &str = "/user/keys";
const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

#[derive(Serialize)]
struct KeyRequest<'a> {
    title: &'a str,
    key: &'a str,
}

/// Body returned by the API on success and on failure alike
#[derive(Debug, Default, Deserialize)]
struct KeyResponse {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl KeyResponse {
    /// Top-level message joined with any per-field error messages
    fn error_message(&self) -> Option<String> {
        let details: Vec<&str> = self
            .errors
            .iter()
            .filter_map(|e| e.message.as_deref())
            .filter(|m| !m.is_empty())
            .collect();

        match self.message.as_deref().filter(|m| !m.is_empty()) {
            Some(message) if details.is_empty() => Some(message.to_string()),
            Some(message) => Some(format!("{}: {}", message, details.join("; "))),
            None if details.is_empty() => None,
            None => Some(details.join("; ")),
        }
    }
}

/// A key accepted by the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredKey {
    pub id: u64,
    pub title: String,
}

/// Client for the key registration endpoint
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    api_version: String,
}

impl GitHubClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.http_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| {
                KeyManagerError::Configuration(format!("не удалось создать HTTP-клиент: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            api_version: settings.api_version.clone(),
        })
    }

    /// Point the client at another API root (GitHub Enterprise, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Register `public_key` under `title` for the token's user.
    ///
    /// Any non-2xx status is a [`KeyManagerError::Remote`] carrying the API's
    /// own message when it sent one.
    pub async fn register(
        &self,
        token: &SecretString,
        title: &str,
        public_key: &str,
    ) -> Result<RegisteredKey> {
        let url = format!("{}{}", self.base_url, KEYS_ENDPOINT);
        debug!(%url, title, "registering public key");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token.expose_secret())
            .header(ACCEPT, GITHUB_JSON)
            .header(API_VERSION_HEADER, &self.api_version)
            .json(&KeyRequest {
                title,
                key: public_key,
            })
            .send()
            .await
            .map_err(|e| KeyManagerError::Remote {
                status: 0,
                message: format!("запрос не выполнен: {}", e),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| KeyManagerError::Remote {
            status: status.as_u16(),
            message: format!("не удалось прочитать ответ: {}", e),
        })?;

        decode_response(status, &body)
    }
}

fn decode_response(status: StatusCode, body: &[u8]) -> Result<RegisteredKey> {
    let decoded = serde_json::from_slice::<KeyResponse>(body);

    if !status.is_success() {
        let message = decoded
            .ok()
            .and_then(|r| r.error_message())
            .unwrap_or_else(|| format!("GitHub API returned status {}", status.as_u16()));
        warn!(status = status.as_u16(), %message, "key registration rejected");
        return Err(KeyManagerError::Remote {
            status: status.as_u16(),
            message,
        });
    }

    let decoded = decoded.map_err(|e| KeyManagerError::Remote {
        status: status.as_u16(),
        message: format!("некорректный ответ GitHub API: {}", e),
    })?;
    info!(id = decoded.id, title = %decoded.title, "public key registered");
    Ok(RegisteredKey {
        id: decoded.id,
        title: decoded.title,
    })
}
