//! Ошибки DI контейнера
//!
//! Все ошибки возвращаются вызывающему коду синхронно, повторов нет.
//! Конвертация в `anyhow::Error` идет автоматически через `std::error::Error`.

use thiserror::Error;

/// Основной error type для регистрации и разрешения зависимостей
#[derive(Debug, Error)]
pub enum DIError {
    /// Binding отклонен при регистрации (например, фабрика не смогла
    /// создать экземпляр при `verify_on_register`)
    #[error("Binding error for {capability} -> {implementation}: {reason}")]
    Binding {
        capability: String,
        implementation: String,
        reason: String,
    },

    /// Повторная регистрация при политике `DuplicatePolicy::Reject`
    #[error("Capability {capability} is already bound to {existing}, refusing {attempted}")]
    DuplicateBinding {
        capability: String,
        existing: String,
        attempted: String,
    },

    /// Для capability слота нет binding
    #[error("Unresolved dependency {capability} for slot '{slot}' of {consumer}")]
    UnresolvedDependency {
        capability: String,
        consumer: String,
        slot: String,
    },

    /// Фабрика реализации вернула ошибку
    #[error("Failed to instantiate {implementation} for {capability}: {source}")]
    Instantiation {
        capability: String,
        implementation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Слот использован до разрешения
    #[error("Slot of type {capability} was used before injection")]
    SlotNotInjected { capability: String },

    /// Фабрика хранится не под тем TypeId
    #[error("Stored factory for {capability} has an unexpected type")]
    TypeMismatch { capability: String },
}

impl DIError {
    /// Имя capability, к которой относится ошибка
    pub fn capability(&self) -> &str {
        match self {
            DIError::Binding { capability, .. }
            | DIError::DuplicateBinding { capability, .. }
            | DIError::UnresolvedDependency { capability, .. }
            | DIError::Instantiation { capability, .. }
            | DIError::SlotNotInjected { capability }
            | DIError::TypeMismatch { capability } => capability,
        }
    }
}

pub type DIResult<T> = Result<T, DIError>;
