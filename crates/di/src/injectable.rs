//! Resolver: слоты для внедрения и их заполнение
//!
//! Вместо runtime-аннотаций consumer явно перечисляет свои слоты через
//! trait `Injectable` (обычно с помощью макроса `injectable!`).

use std::{
    any::{type_name, TypeId},
    cell::Cell,
    fmt,
};

use crate::container::Container;
use crate::errors::{DIError, DIResult};

/// Слот consumer для capability `C`. Пуст до разрешения контейнером.
pub struct Inject<C: ?Sized> {
    value: Option<Box<C>>,
}

impl<C: ?Sized> Inject<C> {
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// Слот, заполненный вручную (например, в тестах без контейнера)
    pub fn with(instance: Box<C>) -> Self {
        Self {
            value: Some(instance),
        }
    }

    pub fn is_injected(&self) -> bool {
        self.value.is_some()
    }

    /// Доступ к внедренной реализации
    pub fn get(&self) -> DIResult<&C> {
        self.value
            .as_deref()
            .ok_or_else(|| DIError::SlotNotInjected {
                capability: type_name::<C>().to_string(),
            })
    }

    /// Заменить содержимое слота. Повторное внедрение перезаписывает, а не
    /// накапливает.
    pub fn set(&mut self, instance: Box<C>) {
        self.value = Some(instance);
    }

    pub fn take(&mut self) -> Option<Box<C>> {
        self.value.take()
    }
}

impl<C: ?Sized> Default for Inject<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C: ?Sized> fmt::Debug for Inject<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("capability", &type_name::<C>())
            .field("injected", &self.is_injected())
            .finish()
    }
}

/// Объявленная зависимость consumer: имя слота и его capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub slot: &'static str,
    pub capability: &'static str,
    pub type_id: TypeId,
}

impl Dependency {
    pub fn of<C: ?Sized + 'static>(slot: &'static str) -> Self {
        Self {
            slot,
            capability: type_name::<C>(),
            type_id: TypeId::of::<C>(),
        }
    }
}

/// Consumer со слотами для внедрения
pub trait Injectable {
    /// Слоты consumer в порядке заполнения
    fn dependencies() -> Vec<Dependency>;

    /// Заполнить все слоты. Первая ошибка прерывает заполнение.
    fn inject(&mut self, injector: &Injector<'_>) -> DIResult<()>;
}

/// Выдается контейнером на время одного разрешения consumer
pub struct Injector<'a> {
    container: &'a Container,
    consumer: &'static str,
    filled: Cell<usize>,
}

impl<'a> Injector<'a> {
    pub(crate) fn new(container: &'a Container, consumer: &'static str) -> Self {
        Self {
            container,
            consumer,
            filled: Cell::new(0),
        }
    }

    /// Создать реализацию capability `C` и положить ее в слот
    pub fn fill<C: ?Sized + 'static>(&self, slot: &'static str, target: &mut Inject<C>) -> DIResult<()> {
        let instance = self.container.instantiate::<C>(self.consumer, slot)?;
        target.set(instance);
        self.filled.set(self.filled.get() + 1);
        Ok(())
    }

    pub fn consumer(&self) -> &'static str {
        self.consumer
    }

    /// Сколько слотов заполнено в этом проходе
    pub fn filled(&self) -> usize {
        self.filled.get()
    }
}

/// Фиксирует сигнатуру фабрики для `bind!`, чтобы `Ok(..)` в замыкании
/// выводился как `anyhow::Result`
#[doc(hidden)]
pub fn typed_factory<T, F>(factory: F) -> F
where
    F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
{
    factory
}

/// Реализовать `Injectable` по списку полей `поле: capability`.
///
/// ```ignore
/// #[derive(Default)]
/// struct Logic {
///     log: Inject<dyn Log>,
/// }
/// injectable!(Logic { log: dyn Log });
/// ```
#[macro_export]
macro_rules! injectable {
    ($consumer:ty { $($field:ident : $capability:ty),+ $(,)? }) => {
        impl $crate::Injectable for $consumer {
            fn dependencies() -> ::std::vec::Vec<$crate::Dependency> {
                ::std::vec![$($crate::Dependency::of::<$capability>(stringify!($field))),+]
            }

            fn inject(&mut self, injector: &$crate::Injector<'_>) -> ::std::result::Result<(), $crate::DIError> {
                $(
                    injector.fill::<$capability>(stringify!($field), &mut self.$field)?;
                )+
                Ok(())
            }
        }
    };
}

/// Зарегистрировать реализацию capability.
///
/// `bind!(container, dyn Log => ConsoleLog)` создает реализацию через
/// `Default`; `bind!(container, dyn Log => FileLog, factory)` вызывает
/// `factory() -> anyhow::Result<FileLog>`.
#[macro_export]
macro_rules! bind {
    ($container:expr, $capability:ty => $implementation:ty) => {
        $container.register::<$capability, _>(stringify!($implementation), || {
            ::std::result::Result::Ok(::std::boxed::Box::new(
                <$implementation as ::std::default::Default>::default(),
            ) as ::std::boxed::Box<$capability>)
        })
    };
    ($container:expr, $capability:ty => $implementation:ty, $factory:expr) => {{
        let factory = $crate::typed_factory::<$implementation, _>($factory);
        $container.register::<$capability, _>(stringify!($implementation), move || {
            let instance: $implementation = factory()?;
            ::std::result::Result::Ok(::std::boxed::Box::new(instance) as ::std::boxed::Box<$capability>)
        })
    }};
}
