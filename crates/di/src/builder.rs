use crate::config::{ContainerConfig, DuplicatePolicy};
use crate::container::Container;
use crate::errors::DIResult;

type Registration = Box<dyn FnOnce(&Container) -> DIResult<()>>;

/// Builder для создания контейнера с настройками и регистрациями.
/// Регистрации применяются в порядке добавления при `build()`.
pub struct ContainerBuilder {
    config: ContainerConfig,
    registrations: Vec<Registration>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            registrations: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicate_policy = policy;
        self
    }

    pub fn verify_on_register(mut self, enabled: bool) -> Self {
        self.config.verify_on_register = enabled;
        self
    }

    /// Отложенная регистрация capability `C`
    pub fn bind<C, F>(mut self, implementation: impl Into<String>, factory: F) -> Self
    where
        C: ?Sized + 'static,
        F: Fn() -> anyhow::Result<Box<C>> + Send + Sync + 'static,
    {
        let implementation = implementation.into();
        self.registrations.push(Box::new(move |container: &Container| {
            container.register::<C, F>(implementation, factory).map(|_| ())
        }));
        self
    }

    /// Построить контейнер; первая неудачная регистрация прерывает сборку
    pub fn build(self) -> DIResult<Container> {
        let container = Container::with_config(self.config);
        for registration in self.registrations {
            registration(&container)?;
        }
        Ok(container)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
