//! Per-operation context: resolved SSH directory, settings, process runner
//! and the progress sink the operations report through

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use colored::Colorize;

use crate::error::Result;
use crate::process::ProcessRunner;
use crate::settings::Settings;
use crate::ssh::{self, PlatformPaths};

/// Receiver of human-readable progress messages
pub trait Sink: Send + Sync {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Prints colored lines to the terminal and mirrors them to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn info(&self, message: &str) {
        tracing::debug!(kind = "info", "{}", message);
        println!("{} {}", "•".cyan(), message);
    }

    fn success(&self, message: &str) {
        tracing::debug!(kind = "success", "{}", message);
        println!("{} {}", "✓".green().bold(), message);
    }

    fn warn(&self, message: &str) {
        tracing::debug!(kind = "warn", "{}", message);
        println!("{} {}", "Внимание:".yellow().bold(), message);
    }

    fn error(&self, message: &str) {
        tracing::debug!(kind = "error", "{}", message);
        eprintln!("{} {}", "Ошибка:".red().bold(), message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

/// Collects messages in memory (embedding front ends, tests)
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at `level`
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

impl Sink for MemorySink {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.push(Level::Success, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

/// Everything an operation needs; nothing is held in process-wide state
#[derive(Clone)]
pub struct Context {
    ssh_dir: PathBuf,
    settings: Settings,
    runner: Arc<dyn ProcessRunner>,
    sink: Arc<dyn Sink>,
}

impl Context {
    pub fn new(
        ssh_dir: impl Into<PathBuf>,
        settings: Settings,
        runner: Arc<dyn ProcessRunner>,
        sink: Arc<dyn Sink>,
    ) -> Self {
        Self {
            ssh_dir: ssh_dir.into(),
            settings,
            runner,
            sink,
        }
    }

    /// Resolve and provision the SSH directory, then build the context
    pub fn prepare(
        paths: &dyn PlatformPaths,
        settings: Settings,
        runner: Arc<dyn ProcessRunner>,
        sink: Arc<dyn Sink>,
    ) -> Result<Self> {
        let ssh_dir = ssh::resolve_and_prepare(paths)?;
        Ok(Self::new(ssh_dir, settings, runner, sink))
    }

    pub fn ssh_dir(&self) -> &Path {
        &self.ssh_dir
    }

    pub fn config_path(&self) -> PathBuf {
        ssh::config::config_path(&self.ssh_dir)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn runner(&self) -> &dyn ProcessRunner {
        self.runner.as_ref()
    }

    pub fn sink(&self) -> &dyn Sink {
        self.sink.as_ref()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("ssh_dir", &self.ssh_dir)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
