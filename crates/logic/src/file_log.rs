use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::log::{write_line, Log, LogError, SinkKind, DEFAULT_LOG_FILE};

/// Пишет сообщения в файл.
///
/// Постоянного дескриптора нет: каждый `write` открывает файл с усечением,
/// пишет одну строку и закрывает его. Файл всегда содержит только последнее
/// сообщение.
#[derive(Debug, Clone)]
pub struct FileLog {
    path: PathBuf,
}

impl Default for FileLog {
    fn default() -> Self {
        Self::with_path(DEFAULT_LOG_FILE)
    }
}

impl FileLog {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LogError {
        LogError::Io {
            target: self.path.display().to_string(),
            source,
        }
    }
}

impl Log for FileLog {
    fn write(&self, message: &str) -> Result<(), LogError> {
        let mut file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        write_line(&mut file, message).map_err(|e| self.io_error(e))?;
        // Drop молча игнорирует ошибки закрытия
        file.sync_all().map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), bytes = message.len(), "Message written to file");
        Ok(())
    }

    fn kind(&self) -> SinkKind {
        SinkKind::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LINE_ENDING;
    use std::fs;

    #[test]
    fn test_default_path() {
        assert_eq!(FileLog::default().path(), Path::new("./Log.txt"));
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Log.txt");

        FileLog::with_path(&path).write("hello").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("hello{LINE_ENDING}")
        );
    }

    #[test]
    fn test_write_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Log.txt");
        fs::write(&path, "a much longer previous line\nand another one\n").unwrap();

        let log = FileLog::with_path(&path);
        log.write("first").unwrap();
        log.write("hello").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("hello{LINE_ENDING}")
        );
    }

    #[test]
    fn test_io_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("Log.txt");

        let err = FileLog::with_path(&path).write("hello").unwrap_err();
        let LogError::Io { target, source } = err;
        assert!(target.contains("missing-dir"));
        assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_kind() {
        assert_eq!(FileLog::default().kind(), SinkKind::File);
    }
}
