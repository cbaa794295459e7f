//! Демонстрационная последовательность: один и тот же consumer
//! разрешается разными контейнерами и ведет себя по-разному.

use anyhow::{Context, Result};
use clap::ValueEnum;
use common::OperationTimer;
use di::Container;
use logic::{console_container, file_container, BusinessLogic, SinkKind};
use tracing::info;

use crate::config::AppConfig;

/// Какие контейнеры прогнать
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkSelection {
    Console,
    File,
    /// Сначала консоль, затем файл
    Both,
}

impl SinkSelection {
    pub fn kinds(self) -> &'static [SinkKind] {
        match self {
            SinkSelection::Console => &[SinkKind::Console],
            SinkSelection::File => &[SinkKind::File],
            SinkSelection::Both => &[SinkKind::Console, SinkKind::File],
        }
    }
}

fn container_for(kind: SinkKind, config: &AppConfig) -> Result<Container> {
    let container = match kind {
        SinkKind::Console => console_container(&config.container),
        SinkKind::File => file_container(&config.container, &config.sinks),
    };
    container.with_context(|| format!("Failed to build {kind} container"))
}

/// Прогнать consumer через выбранные контейнеры. Возвращает sink-и,
/// через которые сообщение было записано.
pub fn run(selection: SinkSelection, message: Option<&str>, config: &AppConfig) -> Result<Vec<SinkKind>> {
    let mut completed = Vec::new();

    for &kind in selection.kinds() {
        let container = container_for(kind, config)?;
        container
            .validate::<BusinessLogic>()
            .into_result()
            .with_context(|| format!("{kind} container cannot satisfy BusinessLogic"))?;

        let consumer = match message {
            Some(text) => BusinessLogic::with_message(text),
            None => BusinessLogic::new(),
        };
        let logic = container
            .resolve(consumer)
            .with_context(|| format!("Failed to resolve BusinessLogic with {kind} container"))?;

        let mut timer = OperationTimer::new("do_any");
        timer.add_field("sink", kind.to_string());
        let result = logic.do_any();
        timer.finish_with_result(&result);
        result.with_context(|| format!("{kind} sink failed"))?;

        info!(sink = %kind, stats = ?container.stats(), "Demo step finished");
        completed.push(kind);
    }

    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logic::LINE_ENDING;
    use std::fs;

    fn config_in(dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.sinks.file_path = dir.join("Log.txt");
        config
    }

    #[test]
    fn test_selection_order() {
        assert_eq!(
            SinkSelection::Both.kinds(),
            &[SinkKind::Console, SinkKind::File]
        );
        assert_eq!(SinkSelection::File.kinds(), &[SinkKind::File]);
    }

    #[test]
    fn test_file_only_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let done = run(SinkSelection::File, Some("hello"), &config).unwrap();

        assert_eq!(done, vec![SinkKind::File]);
        assert_eq!(
            fs::read_to_string(&config.sinks.file_path).unwrap(),
            format!("hello{LINE_ENDING}")
        );
    }

    #[test]
    fn test_file_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.sinks.file_path = dir.path().join("absent").join("Log.txt");

        let err = run(SinkSelection::File, None, &config).unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("file sink failed"));
        assert!(text.contains("I/O error"));
    }
}
