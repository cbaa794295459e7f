use di::{injectable, DIError, Inject};
use thiserror::Error;
use tracing::debug;

use crate::log::{Log, LogError};

/// Сообщение, которое `BusinessLogic` пишет по умолчанию
pub const DEFAULT_MESSAGE: &str = "doAnyLog";

#[derive(Debug, Error)]
pub enum LogicError {
    #[error(transparent)]
    Dependency(#[from] DIError),

    #[error(transparent)]
    Log(#[from] LogError),
}

/// Consumer с одним слотом `log`. Ничего не знает о конкретном sink:
/// реализацию подставляет контейнер.
#[derive(Debug)]
pub struct BusinessLogic {
    log: Inject<dyn Log>,
    message: String,
}

injectable!(BusinessLogic { log: dyn Log });

impl Default for BusinessLogic {
    fn default() -> Self {
        Self {
            log: Inject::empty(),
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

impl BusinessLogic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Собрать consumer с уже созданной реализацией, без контейнера
    pub fn with_log(log: Box<dyn Log>) -> Self {
        Self {
            log: Inject::with(log),
            ..Self::default()
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_resolved(&self) -> bool {
        self.log.is_injected()
    }

    /// Выполнить работу и записать сообщение через внедренный log
    pub fn do_any(&self) -> Result<(), LogicError> {
        let log = self.log.get()?;
        debug!(sink = %log.kind(), "Running business logic");
        log.write(&self.message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{MockLog, SinkKind};
    use di::{Container, Injectable};
    use mockall::predicate::eq;
    use std::io;

    #[test]
    fn test_declares_single_log_slot() {
        let deps = BusinessLogic::dependencies();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].slot, "log");
        assert!(deps[0].capability.contains("Log"));
    }

    #[test]
    fn test_do_any_delegates_to_injected_log() {
        let mut mock = MockLog::new();
        mock.expect_kind().return_const(SinkKind::Console);
        mock.expect_write()
            .with(eq("custom"))
            .times(1)
            .returning(|_| Ok(()));

        let mut logic = BusinessLogic::with_message("custom");
        logic.log = Inject::with(Box::new(mock));

        logic.do_any().unwrap();
    }

    #[test]
    fn test_resolved_through_container_with_mock() {
        let container = Container::new();
        container
            .register::<dyn Log, _>("MockLog", || {
                let mut mock = MockLog::new();
                mock.expect_kind().return_const(SinkKind::File);
                mock.expect_write()
                    .with(eq(DEFAULT_MESSAGE))
                    .times(1)
                    .returning(|_| Ok(()));
                Ok(Box::new(mock))
            })
            .unwrap();

        let logic = container.resolve(BusinessLogic::new()).unwrap();
        assert!(logic.is_resolved());
        logic.do_any().unwrap();
    }

    #[test]
    fn test_default_message() {
        assert_eq!(BusinessLogic::new().message(), "doAnyLog");
    }

    #[test]
    fn test_unresolved_consumer_fails_instead_of_panicking() {
        let logic = BusinessLogic::new();

        let err = logic.do_any().unwrap_err();
        assert!(matches!(
            err,
            LogicError::Dependency(DIError::SlotNotInjected { .. })
        ));
    }

    #[test]
    fn test_log_error_is_surfaced() {
        let mut mock = MockLog::new();
        mock.expect_kind().return_const(SinkKind::File);
        mock.expect_write().returning(|_| {
            Err(LogError::Io {
                target: "Log.txt".to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            })
        });

        let logic = BusinessLogic::with_log(Box::new(mock));
        let err = logic.do_any().unwrap_err();

        assert!(matches!(err, LogicError::Log(LogError::Io { .. })));
        assert!(err.to_string().contains("read-only"));
    }
}
