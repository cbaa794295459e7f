use parking_lot::Mutex;
use std::{io, sync::Arc};

use crate::log::{write_line, Log, LogError, SinkKind};

#[derive(Debug, Clone, Default)]
enum ConsoleTarget {
    #[default]
    Stdout,
    /// Перехват вывода вместо stdout
    Buffer(Arc<Mutex<Vec<u8>>>),
}

/// Пишет сообщения в stdout
#[derive(Debug, Clone, Default)]
pub struct ConsoleLog {
    target: ConsoleTarget,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Писать в общий буфер вместо stdout
    pub fn capturing(buffer: Arc<Mutex<Vec<u8>>>) -> Self {
        Self {
            target: ConsoleTarget::Buffer(buffer),
        }
    }
}

impl Log for ConsoleLog {
    fn write(&self, message: &str) -> Result<(), LogError> {
        let written = match &self.target {
            ConsoleTarget::Stdout => {
                let mut out = io::stdout().lock();
                write_line(&mut out, message)
            }
            ConsoleTarget::Buffer(buffer) => write_line(&mut *buffer.lock(), message),
        };

        written.map_err(|source| LogError::Io {
            target: "stdout".to_string(),
            source,
        })
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }
}
