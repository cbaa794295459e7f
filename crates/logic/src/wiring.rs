//! Готовые контейнеры для двух окружений: консоль и файл.
//! Набор bindings собирается в одном месте на окружение, consumer остается
//! неизменным.

use di::{bind, Container, ContainerConfig, DIResult};
use tracing::info;

use crate::console_log::ConsoleLog;
use crate::file_log::FileLog;
use crate::log::{Log, SinkConfig};

/// Контейнер, в котором `dyn Log` реализован через `ConsoleLog`
pub fn console_container(config: &ContainerConfig) -> DIResult<Container> {
    let container = Container::with_config(config.clone());
    bind!(container, dyn Log => ConsoleLog)?;

    info!(bindings = container.len(), "Console container ready");
    Ok(container)
}

/// Контейнер, в котором `dyn Log` реализован через `FileLog`
pub fn file_container(config: &ContainerConfig, sinks: &SinkConfig) -> DIResult<Container> {
    let container = Container::with_config(config.clone());
    let path = sinks.file_path.clone();
    bind!(container, dyn Log => FileLog, move || Ok(FileLog::with_path(path.clone())))?;

    info!(
        bindings = container.len(),
        path = %sinks.file_path.display(),
        "File container ready"
    );
    Ok(container)
}
