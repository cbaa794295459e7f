//! Capability логирования и общие для sink типы

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    io::{self, Write},
    path::PathBuf,
};
use thiserror::Error;

/// Путь файла по умолчанию для `FileLog`
pub const DEFAULT_LOG_FILE: &str = "./Log.txt";

/// Разделитель строк платформы
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

#[derive(Debug, Error)]
pub enum LogError {
    /// Не удалось открыть, записать или закрыть приемник
    #[error("I/O error on {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },
}

/// Вид приемника сообщений
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Console,
    File,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkKind::Console => f.write_str("console"),
            SinkKind::File => f.write_str("file"),
        }
    }
}

/// Capability: умеет записать сообщение
#[cfg_attr(test, mockall::automock)]
pub trait Log: Send + Sync {
    /// Записать сообщение и один разделитель строк
    fn write(&self, message: &str) -> Result<(), LogError>;

    fn kind(&self) -> SinkKind;
}

/// Настройки приемников
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub file_path: PathBuf,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

pub(crate) fn write_line<W: Write + ?Sized>(out: &mut W, message: &str) -> io::Result<()> {
    out.write_all(message.as_bytes())?;
    out.write_all(LINE_ENDING.as_bytes())?;
    out.flush()
}
