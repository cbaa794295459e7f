//! Минимальный DI контейнер: registry capability -> фабрика реализации и
//! resolver, заполняющий слоты consumer.
//!
//! Capability - это trait object (`dyn Log`), реализация - любой тип,
//! который фабрика без аргументов превращает в `Box<dyn Log>`. Разрешение
//! одноуровневое: созданные реализации сами не сканируются на слоты.

pub mod builder;
pub mod config;
pub mod container;
pub mod errors;
pub mod injectable;
pub mod validation;

pub use builder::ContainerBuilder;
pub use config::{ContainerConfig, DuplicatePolicy};
pub use container::{BindingInfo, Container, ContainerStats, Factory};
pub use errors::{DIError, DIResult};
pub use injectable::{typed_factory, Dependency, Inject, Injectable, Injector};
pub use validation::ValidationReport;
