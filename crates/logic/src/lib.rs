//! Capability `Log`, две его реализации и consumer, который их использует.

pub mod business_logic;
pub mod console_log;
pub mod file_log;
pub mod log;
pub mod wiring;

pub use business_logic::{BusinessLogic, LogicError, DEFAULT_MESSAGE};
pub use console_log::ConsoleLog;
pub use file_log::FileLog;
pub use log::{Log, LogError, SinkConfig, SinkKind, DEFAULT_LOG_FILE, LINE_ENDING};
pub use wiring::{console_container, file_container};
