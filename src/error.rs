use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KeyManagerError>;

#[derive(Debug, Error)]
pub enum KeyManagerError {
    #[error("Ошибка конфигурации: {0}")]
    Configuration(String),

    #[error("Ключ уже существует: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{tool}: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка ввода-вывода ({}): {source}", path.display())]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Ошибка GitHub API ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Ошибка JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl KeyManagerError {
    pub(crate) fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Attach a path to an I/O error so the message says which file failed
    pub(crate) fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoAt {
            path: path.into(),
            source,
        }
    }
}
