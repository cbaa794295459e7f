//! Registry: capability -> фабрика реализации
//!
//! АРХИТЕКТУРНЫЕ РЕШЕНИЯ:
//! - HashMap<TypeId, Binding> для O(1) поиска по capability (`dyn Trait`)
//! - Фабрика хранится type-erased как `Box<dyn Any>` и восстанавливается
//!   через downcast к `Factory<C>`
//! - Binding хранит фабрику, а не экземпляр: каждое разрешение создает
//!   новый объект
//! - Clone-able контейнер: клоны разделяют одни и те же bindings

use parking_lot::RwLock;
use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tracing::{debug, warn};

use crate::builder::ContainerBuilder;
use crate::config::{ContainerConfig, DuplicatePolicy};
use crate::errors::{DIError, DIResult};
use crate::injectable::{Injectable, Injector};
use crate::validation::ValidationReport;

/// Фабрика без аргументов, создающая реализацию capability `C`
pub type Factory<C> = Arc<dyn Fn() -> anyhow::Result<Box<C>> + Send + Sync>;

struct Binding {
    capability: &'static str,
    implementation: String,
    /// Всегда `Factory<C>` для capability, под чьим TypeId лежит binding
    factory: Box<dyn Any + Send + Sync>,
}

/// Описание binding для диагностики
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInfo {
    pub capability: String,
    pub implementation: String,
}

/// Статистика контейнера
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    pub bindings: usize,
    pub resolutions: u64,
    pub failed_resolutions: u64,
    pub instances_created: u64,
}

#[derive(Debug, Default)]
struct Counters {
    resolutions: AtomicU64,
    failed_resolutions: AtomicU64,
    instances_created: AtomicU64,
}

/// DI контейнер
#[derive(Clone, Default)]
pub struct Container {
    bindings: Arc<RwLock<HashMap<TypeId, Binding>>>,
    counters: Arc<Counters>,
    config: ContainerConfig,
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.bindings())
            .field("config", &self.config)
            .finish()
    }
}

impl Container {
    /// Создать пустой контейнер с настройками по умолчанию
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Зарегистрировать реализацию для capability `C`.
    ///
    /// Возвращает `&Self`, так что регистрации можно собирать в цепочку:
    ///
    /// ```ignore
    /// container
    ///     .register::<dyn Log, _>("ConsoleLog", || Ok(Box::new(ConsoleLog::default())))?
    ///     .register::<dyn Clock, _>("SystemClock", || Ok(Box::new(SystemClock)))?;
    /// ```
    pub fn register<C, F>(&self, implementation: impl Into<String>, factory: F) -> DIResult<&Self>
    where
        C: ?Sized + 'static,
        F: Fn() -> anyhow::Result<Box<C>> + Send + Sync + 'static,
    {
        let capability = type_name::<C>();
        let implementation = implementation.into();
        let factory: Factory<C> = Arc::new(factory);

        if self.config.verify_on_register {
            if let Err(e) = (*factory)() {
                return Err(DIError::Binding {
                    capability: capability.to_string(),
                    implementation,
                    reason: format!("factory failed during verification: {e:#}"),
                });
            }
        }

        let mut bindings = self.bindings.write();
        if let Some(existing) = bindings.get(&TypeId::of::<C>()) {
            match self.config.duplicate_policy {
                DuplicatePolicy::Reject => {
                    return Err(DIError::DuplicateBinding {
                        capability: capability.to_string(),
                        existing: existing.implementation.clone(),
                        attempted: implementation,
                    });
                }
                DuplicatePolicy::Overwrite => {
                    warn!(
                        capability,
                        previous = %existing.implementation,
                        replacement = %implementation,
                        "Overwriting existing binding"
                    );
                }
            }
        }

        debug!(capability, implementation = %implementation, "Binding registered");
        bindings.insert(
            TypeId::of::<C>(),
            Binding {
                capability,
                implementation,
                factory: Box::new(factory),
            },
        );

        Ok(self)
    }

    /// Удалить binding, вернуть имя реализации, если он был
    pub fn unregister<C: ?Sized + 'static>(&self) -> Option<String> {
        self.bindings
            .write()
            .remove(&TypeId::of::<C>())
            .map(|binding| binding.implementation)
    }

    pub fn contains<C: ?Sized + 'static>(&self) -> bool {
        self.contains_type_id(TypeId::of::<C>())
    }

    pub(crate) fn contains_type_id(&self, type_id: TypeId) -> bool {
        self.bindings.read().contains_key(&type_id)
    }

    /// Имя реализации, привязанной к capability
    pub fn implementation_of<C: ?Sized + 'static>(&self) -> Option<String> {
        self.bindings
            .read()
            .get(&TypeId::of::<C>())
            .map(|binding| binding.implementation.clone())
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// Очистить все регистрации (полезно для тестов)
    pub fn clear(&self) {
        self.bindings.write().clear();
    }

    /// Список bindings, отсортированный по имени capability
    pub fn bindings(&self) -> Vec<BindingInfo> {
        let mut list: Vec<BindingInfo> = self
            .bindings
            .read()
            .values()
            .map(|binding| BindingInfo {
                capability: binding.capability.to_string(),
                implementation: binding.implementation.clone(),
            })
            .collect();
        list.sort_by(|a, b| a.capability.cmp(&b.capability));
        list
    }

    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            bindings: self.len(),
            resolutions: self.counters.resolutions.load(Ordering::Relaxed),
            failed_resolutions: self.counters.failed_resolutions.load(Ordering::Relaxed),
            instances_created: self.counters.instances_created.load(Ordering::Relaxed),
        }
    }

    /// Создать новый экземпляр capability напрямую, без consumer.
    /// Подходит для передачи зависимостей через конструктор.
    pub fn create<C: ?Sized + 'static>(&self) -> DIResult<Box<C>> {
        self.instantiate::<C>("<direct>", "<direct>")
    }

    /// Заполнить все слоты consumer и вернуть тот же экземпляр.
    /// При ошибке consumer уничтожается, наружу уходит первая ошибка.
    pub fn resolve<T: Injectable>(&self, mut consumer: T) -> DIResult<T> {
        self.resolve_in_place(&mut consumer)?;
        Ok(consumer)
    }

    /// Заполнить слоты consumer на месте. Слоты, заполненные до ошибки,
    /// остаются заполненными.
    pub fn resolve_in_place<T: Injectable>(&self, consumer: &mut T) -> DIResult<()> {
        let consumer_name = type_name::<T>();
        let injector = Injector::new(self, consumer_name);

        self.counters.resolutions.fetch_add(1, Ordering::Relaxed);
        match consumer.inject(&injector) {
            Ok(()) => {
                debug!(
                    consumer = consumer_name,
                    slots = injector.filled(),
                    "Consumer resolved"
                );
                Ok(())
            }
            Err(e) => {
                self.counters
                    .failed_resolutions
                    .fetch_add(1, Ordering::Relaxed);
                debug!(consumer = consumer_name, error = %e, "Resolution failed");
                Err(e)
            }
        }
    }

    /// Проверить, что для всех слотов `T` есть bindings, ничего не создавая
    pub fn validate<T: Injectable>(&self) -> ValidationReport {
        ValidationReport::check::<T>(self)
    }

    pub(crate) fn instantiate<C: ?Sized + 'static>(
        &self,
        consumer: &str,
        slot: &str,
    ) -> DIResult<Box<C>> {
        let capability = type_name::<C>();

        // Фабрику вызываем вне lock: она может сама обращаться к контейнеру
        let (factory, implementation) = {
            let bindings = self.bindings.read();
            let binding = bindings.get(&TypeId::of::<C>()).ok_or_else(|| {
                DIError::UnresolvedDependency {
                    capability: capability.to_string(),
                    consumer: consumer.to_string(),
                    slot: slot.to_string(),
                }
            })?;
            let factory = binding
                .factory
                .downcast_ref::<Factory<C>>()
                .cloned()
                .ok_or_else(|| DIError::TypeMismatch {
                    capability: capability.to_string(),
                })?;
            (factory, binding.implementation.clone())
        };

        let instance = (*factory)().map_err(|source| DIError::Instantiation {
            capability: capability.to_string(),
            implementation: implementation.clone(),
            source,
        })?;

        self.counters
            .instances_created
            .fetch_add(1, Ordering::Relaxed);
        debug!(capability, implementation = %implementation, consumer, slot, "Instance created");
        Ok(instance)
    }
}
