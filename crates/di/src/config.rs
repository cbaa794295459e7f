use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Что делать при повторной регистрации той же capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Последняя регистрация побеждает (поведение по умолчанию)
    #[default]
    Overwrite,
    /// Повторная регистрация возвращает `DIError::DuplicateBinding`
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown duplicate policy '{other}', expected 'overwrite' or 'reject'"
            )),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => f.write_str("overwrite"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// Настройки контейнера
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub duplicate_policy: DuplicatePolicy,
    /// Вызывать фабрику один раз при регистрации, чтобы отсеять
    /// реализации, которые не могут быть созданы
    pub verify_on_register: bool,
}

impl ContainerConfig {
    pub fn strict() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            verify_on_register: true,
        }
    }
}
