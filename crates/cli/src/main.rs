use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use cli::{AppConfig, SinkSelection};
use common::{init_structured_logging, LoggingConfig};

#[derive(Parser)]
#[command(name = "di-demo")]
#[command(about = "Один consumer, два контейнера: вывод в консоль и в файл")]
#[command(version)]
struct Cli {
    /// Явный путь к файлу конфигурации (toml или json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Какие контейнеры прогнать
    #[arg(long, value_enum, default_value_t = SinkSelection::Both)]
    sink: SinkSelection,

    /// Сообщение, которое запишет consumer
    #[arg(long)]
    message: Option<String>,

    /// Файл для file sink
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// JSON логи в stderr
    #[arg(long)]
    json_logs: bool,

    /// trace | debug | info | warn | error
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Флаги командной строки перекрывают файл и окружение
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(path) = &self.log_file {
            config.sinks.file_path = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.to_lowercase();
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let mut config: AppConfig = cli::loader()
        .load(args.config.as_deref())
        .context("Failed to load configuration")?;
    args.apply_to(&mut config);

    init_structured_logging(LoggingConfig::from_settings(&config.logging)?)?;
    debug!(?config, sink = ?args.sink, "Starting di-demo");

    cli::run(args.sink, args.message.as_deref(), &config)?;
    Ok(())
}
