use tracing::debug;

use crate::container::Container;
use crate::errors::{DIError, DIResult};
use crate::injectable::{Dependency, Injectable};

/// Результат проверки слотов consumer против текущих bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub consumer: &'static str,
    pub satisfied: Vec<Dependency>,
    pub missing: Vec<Dependency>,
}

impl ValidationReport {
    pub(crate) fn check<T: Injectable>(container: &Container) -> Self {
        let (satisfied, missing): (Vec<_>, Vec<_>) = T::dependencies()
            .into_iter()
            .partition(|dep| container.contains_type_id(dep.type_id));

        let report = Self {
            consumer: std::any::type_name::<T>(),
            satisfied,
            missing,
        };
        debug!(
            consumer = report.consumer,
            satisfied = report.satisfied.len(),
            missing = report.missing.len(),
            "Dependency validation finished"
        );
        report
    }

    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    /// Capability всех непокрытых слотов
    pub fn missing_capabilities(&self) -> Vec<&'static str> {
        self.missing.iter().map(|dep| dep.capability).collect()
    }

    /// Первый непокрытый слот как `UnresolvedDependency`
    pub fn into_result(self) -> DIResult<()> {
        match self.missing.first() {
            None => Ok(()),
            Some(dep) => Err(DIError::UnresolvedDependency {
                capability: dep.capability.to_string(),
                consumer: self.consumer.to_string(),
                slot: dep.slot.to_string(),
            }),
        }
    }
}
