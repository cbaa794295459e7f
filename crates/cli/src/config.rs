use anyhow::Result;
use common::{parse_bool, ConfigurationLoader, EnvOverrides, LoggingSettings};
use di::{ContainerConfig, DuplicatePolicy};
use logic::SinkConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const APP_NAME: &str = "di-demo";
pub const ENV_PREFIX: &str = "DI_DEMO";

/// Полная конфигурация демо
///
/// ```toml
/// [logging]
/// level = "info"
/// json = false
///
/// [container]
/// duplicate_policy = "reject"
/// verify_on_register = true
///
/// [sinks]
/// file_path = "./Log.txt"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingSettings,
    pub container: ContainerConfig,
    pub sinks: SinkConfig,
}

impl EnvOverrides for AppConfig {
    fn apply_env(&mut self, key: &str, value: &str) -> Result<bool> {
        match key {
            "LOG_LEVEL" => self.logging.level = value.to_lowercase(),
            "LOG_JSON" => self.logging.json = parse_bool(value)?,
            "DUPLICATE_POLICY" => {
                self.container.duplicate_policy =
                    value.parse::<DuplicatePolicy>().map_err(anyhow::Error::msg)?
            }
            "VERIFY_ON_REGISTER" => self.container.verify_on_register = parse_bool(value)?,
            "LOG_FILE" => self.sinks.file_path = PathBuf::from(value),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

pub fn loader() -> ConfigurationLoader {
    ConfigurationLoader::new(APP_NAME, ENV_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.container.duplicate_policy, DuplicatePolicy::Overwrite);
        assert_eq!(config.sinks.file_path, PathBuf::from("./Log.txt"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("di-demo.toml");
        fs::write(
            &path,
            "[container]\nduplicate_policy = \"reject\"\n\n[sinks]\nfile_path = \"out.log\"\n",
        )
        .unwrap();

        let config: AppConfig = loader().load_from_file(&path).unwrap();
        assert_eq!(config.container.duplicate_policy, DuplicatePolicy::Reject);
        assert!(!config.container.verify_on_register);
        assert_eq!(config.sinks.file_path, PathBuf::from("out.log"));
        assert_eq!(config.logging, LoggingSettings::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        loader()
            .apply_environment(
                &mut config,
                vec![
                    ("DI_DEMO_LOG_LEVEL".to_string(), "DEBUG".to_string()),
                    ("DI_DEMO_LOG_JSON".to_string(), "true".to_string()),
                    ("DI_DEMO_DUPLICATE_POLICY".to_string(), "reject".to_string()),
                    ("DI_DEMO_VERIFY_ON_REGISTER".to_string(), "1".to_string()),
                    ("DI_DEMO_LOG_FILE".to_string(), "/tmp/x.log".to_string()),
                ],
            )
            .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.container, ContainerConfig::strict());
        assert_eq!(config.sinks.file_path, PathBuf::from("/tmp/x.log"));
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let mut config = AppConfig::default();
        let err = loader()
            .apply_environment(
                &mut config,
                vec![("DI_DEMO_DUPLICATE_POLICY".to_string(), "append".to_string())],
            )
            .unwrap_err();

        assert!(format!("{err:#}").contains("append"));
    }

    #[test]
    #[serial]
    fn test_load_reads_process_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explicit.toml");
        fs::write(&path, "[sinks]\nfile_path = \"from-file.log\"\n").unwrap();

        std::env::set_var("DI_DEMO_LOG_FILE", "from-env.log");
        let loaded: Result<AppConfig> = loader().load(Some(&path));
        std::env::remove_var("DI_DEMO_LOG_FILE");

        assert_eq!(loaded.unwrap().sinks.file_path, PathBuf::from("from-env.log"));
    }
}
