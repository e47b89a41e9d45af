//! Реализация CLI команд

pub mod config;
pub mod generate;
pub mod pubkey;
pub mod upload;
pub mod verify;

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use secrecy::SecretString;
use zeroize::Zeroize;

use crate::context::{ConsoleSink, Context};
use crate::error::{KeyManagerError, Result};
use crate::process::TokioRunner;
use crate::settings::Settings;
use crate::ssh::PlatformPaths;

/// Параметры, общие для всех команд
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Таймаут внешних утилит (ssh-keygen, ssh-keyscan, ssh)
    pub command_timeout: Option<Duration>,
}

impl Options {
    pub fn settings(&self) -> Settings {
        let settings = Settings::default();
        match self.command_timeout {
            Some(timeout) => settings.with_command_timeout(timeout),
            None => settings,
        }
    }
}

/// Подготовить контекст: ~/.ssh из `paths`, реальные процессы, вывод в терминал.
/// Создаёт каталог, поэтому вызывается только после проверки ввода.
pub fn build_context(paths: &dyn PlatformPaths, settings: Settings) -> Result<Context> {
    let runner = Arc::new(TokioRunner::new(settings.command_timeout));
    Context::prepare(paths, settings, runner, Arc::new(ConsoleSink))
}

/// Async runtime для внешних процессов и HTTP
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| {
        KeyManagerError::Configuration(format!("Не удалось создать async runtime: {}", e))
    })
}

/// Запросить токен GitHub без отображения ввода
pub fn prompt_token() -> Result<SecretString> {
    let mut raw = rpassword::prompt_password("Персональный токен доступа GitHub: ")?;
    let token = SecretString::new(raw.trim().to_string());
    raw.zeroize();
    Ok(token)
}

/// Горизонтальный разделитель
pub fn rule() -> String {
    "─".repeat(60).dimmed().to_string()
}
