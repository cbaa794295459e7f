pub mod config_loader;
pub mod structured_logging;

pub use config_loader::{parse_bool, ConfigurationLoader, EnvOverrides};
pub use structured_logging::{
    init_structured_logging, ExecutionContext, JsonFormatter, LoggingConfig, LoggingSettings,
    OperationTimer, StructuredLogEntry,
};
