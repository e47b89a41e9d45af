//! Identity lifecycle operations
//!
//! Each operation validates its input before touching the filesystem, a
//! process or the network, then drives the components in `ssh` and `github`
//! and reports progress through the context's sink.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

use crate::context::Context;
use crate::error::Result;
use crate::github::{GitHubClient, RegisteredKey};
use crate::ssh::{self, keygen, ConfigUpdate, ConnectionReport, HostKeyStatus};
use crate::validation::{require_token, validate_host_alias, validate_label};

/// What `create_identity` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityReport {
    pub key_path: PathBuf,
    pub public_key_path: PathBuf,
    /// `None` when the host key scan failed; the key and config are still usable
    pub known_hosts: Option<HostKeyStatus>,
    pub config: ConfigUpdate,
}

/// A public key as stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyInfo {
    pub path: PathBuf,
    pub key: String,
    pub fingerprint: Option<String>,
}

/// Generate the key pair for `label`, trust the provider host key and add a
/// `Host <alias>` block.
///
/// An existing key for `label` stops the operation with
/// [`AlreadyExists`](crate::KeyManagerError::AlreadyExists) before anything is written; the caller
/// reports it. Steps are not rolled back: if the config update fails the new
/// key pair stays.
pub async fn create_identity(ctx: &Context, label: &str, alias: &str) -> Result<IdentityReport> {
    let settings = ctx.settings();
    validate_label(label)?;
    validate_host_alias(alias, &settings.provider_host)?;

    let sink = ctx.sink();

    sink.info(&format!(
        "Генерация SSH-ключа: метка '{}', псевдоним хоста '{}'",
        label, alias
    ));
    let key_path = keygen::generate(
        ctx.runner(),
        &settings.tools.keygen,
        ctx.ssh_dir(),
        label,
        &settings.key_comment_suffix,
    )
    .await?;
    sink.success(&format!("Пара ключей создана: {}", key_path.display()));

    sink.info(&format!("Добавление {} в known_hosts...", settings.provider_host));
    let known_hosts = match ssh::ensure_host_present(
        ctx.runner(),
        &settings.tools.keyscan,
        ctx.ssh_dir(),
        &settings.provider_host,
    )
    .await
    {
        Ok(status) => {
            match status {
                HostKeyStatus::Added => sink.success(&format!(
                    "{} добавлен в known_hosts",
                    settings.provider_host
                )),
                HostKeyStatus::AlreadyPresent => sink.info(&format!(
                    "{} уже есть в known_hosts",
                    settings.provider_host
                )),
            }
            Some(status)
        }
        Err(e) => {
            sink.warn(&format!(
                "Не удалось добавить {} в known_hosts: {}",
                settings.provider_host, e
            ));
            None
        }
    };

    let config_path = ctx.config_path();
    sink.info(&format!("Обновление SSH config: {}", config_path.display()));
    let config = ssh::ensure_entry(&config_path, alias, &settings.provider_host, &key_path)?;
    match config {
        ConfigUpdate::Added => sink.success(&format!("Блок 'Host {}' добавлен в SSH config", alias)),
        ConfigUpdate::AlreadyPresent => sink.warn(&format!(
            "Псевдоним хоста '{}' уже есть в SSH config, файл не изменён",
            alias
        )),
    }

    Ok(IdentityReport {
        public_key_path: keygen::public_key_path(ctx.ssh_dir(), label),
        key_path,
        known_hosts,
        config,
    })
}

/// Read the public key for `label` with its fingerprint
pub fn public_key(ctx: &Context, label: &str) -> Result<PublicKeyInfo> {
    validate_label(label)?;

    let key = keygen::read_public_key(ctx.ssh_dir(), label)?;
    let fingerprint = keygen::fingerprint(&key).ok();
    Ok(PublicKeyInfo {
        path: keygen::public_key_path(ctx.ssh_dir(), label),
        key,
        fingerprint,
    })
}

/// Title under which a key is registered
pub fn key_title(label: &str, alias: &str) -> String {
    format!("{}-{}", label, alias)
}

/// Register the public key of `label` with the provider.
///
/// The token is taken by value and dropped (zeroized) before returning, on
/// every path.
pub async fn upload_key(
    ctx: &Context,
    client: &GitHubClient,
    token: SecretString,
    label: &str,
    alias: &str,
) -> Result<RegisteredKey> {
    validate_label(label)?;
    validate_host_alias(alias, &ctx.settings().provider_host)?;
    require_token(token.expose_secret())?;

    let sink = ctx.sink();
    let key = keygen::read_public_key(ctx.ssh_dir(), label).map_err(|e| {
        sink.warn("Публичный ключ не найден, сначала создайте ключ");
        e
    })?;

    let title = key_title(label, alias);
    sink.info(&format!("Отправка ключа в GitHub (название: {})...", title));
    let result = client.register(&token, &title, &key).await;
    drop(token);

    let registered = result?;
    sink.success(&format!(
        "Ключ загружен: '{}' (ID: {})",
        registered.title, registered.id
    ));
    Ok(registered)
}

/// Check that `git@<alias>` authenticates
pub async fn verify_connection(ctx: &Context, alias: &str) -> Result<ConnectionReport> {
    validate_host_alias(alias, &ctx.settings().provider_host)?;

    let sink = ctx.sink();
    sink.info(&format!("Проверка подключения к git@{}...", alias));
    let report = ssh::test_connection(ctx.runner(), &ctx.settings().tools.ssh, alias).await?;
    if report.ok {
        sink.success(&format!("SSH-подключение к {} успешно", alias));
    } else {
        sink.error(&format!("Проверка SSH не пройдена: {}", report.output));
    }
    Ok(report)
}

/// Current SSH config text
pub fn read_config(ctx: &Context) -> Result<String> {
    ssh::config::read_config(&ctx.config_path())
}

/// Aliases declared on `Host` lines of the SSH config
pub fn configured_aliases(ctx: &Context) -> Result<Vec<String>> {
    Ok(ssh::config::declared_aliases(&read_config(ctx)?))
}
