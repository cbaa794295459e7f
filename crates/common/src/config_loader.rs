//! Configuration Loader
//!
//! Источники в порядке приоритета (последний побеждает):
//! 1. `Default` для типа конфигурации
//! 2. Файл конфигурации (TOML или JSON), явный или найденный в search paths
//! 3. Переменные окружения `<PREFIX>_<KEY>`
//!
//! Флаги командной строки накладываются вызывающим кодом поверх результата.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Конфигурация, умеющая принимать переопределения из окружения
pub trait EnvOverrides {
    /// Применить значение ключа (без префикса, в верхнем регистре).
    /// Возвращает `false`, если ключ не распознан.
    fn apply_env(&mut self, key: &str, value: &str) -> Result<bool>;
}

/// Загрузчик конфигурации из файлов и окружения
#[derive(Debug, Clone)]
pub struct ConfigurationLoader {
    search_paths: Vec<PathBuf>,
    file_names: Vec<String>,
    env_prefix: String,
}

impl ConfigurationLoader {
    /// `app_name` задает имя файла (`<app_name>.toml`) и каталог в
    /// системной директории конфигурации
    pub fn new(app_name: &str, env_prefix: &str) -> Self {
        let mut search_paths = vec![PathBuf::from(".")];
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join(app_name));
        }

        Self {
            search_paths,
            file_names: vec![format!("{app_name}.toml"), format!("{app_name}.json")],
            env_prefix: env_prefix.to_string(),
        }
    }

    /// Заменить search paths (например, на временный каталог в тестах)
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.search_paths = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();
        self
    }

    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Загрузить конфигурацию: default -> файл -> окружение
    pub fn load<T>(&self, explicit_file: Option<&Path>) -> Result<T>
    where
        T: DeserializeOwned + Default + EnvOverrides,
    {
        let mut config = match explicit_file {
            Some(path) => self.load_from_file(path)?,
            None => match self.find_configuration_file() {
                Some(found) => {
                    debug!(path = %found.display(), "Configuration file found");
                    self.load_from_file(&found)?
                }
                None => T::default(),
            },
        };

        let vars = self.prefixed_vars(env::vars_os())?;
        self.apply_environment(&mut config, vars)?;
        Ok(config)
    }

    /// Загрузить конфигурацию из конкретного файла
    pub fn load_from_file<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Invalid TOML in {}", path.display())),
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display())),
            _ => Err(anyhow::anyhow!(
                "Unsupported configuration file format: {}",
                path.display()
            )),
        }
    }

    /// Первый существующий файл конфигурации в search paths
    pub fn find_configuration_file(&self) -> Option<PathBuf> {
        self.search_paths
            .iter()
            .flat_map(|dir| self.file_names.iter().map(move |name| dir.join(name)))
            .find(|candidate| candidate.is_file())
    }

    /// Отобрать переменные с префиксом. Чужие переменные не проверяются,
    /// значение с префиксом обязано быть UTF-8.
    pub fn prefixed_vars<I>(&self, vars: I) -> Result<Vec<(String, String)>>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let prefix = format!("{}_", self.env_prefix);
        let mut selected = Vec::new();

        for (key, value) in vars {
            let Some(key) = key.to_str().filter(|k| k.starts_with(&prefix)) else {
                continue;
            };
            let value = value.into_string().map_err(|raw| {
                anyhow::anyhow!("Environment variable {key} is not valid UTF-8: {raw:?}")
            })?;
            selected.push((key.to_string(), value));
        }

        Ok(selected)
    }

    /// Применить переменные `<PREFIX>_*` из переданного набора
    pub fn apply_environment<T, I>(&self, config: &mut T, vars: I) -> Result<()>
    where
        T: EnvOverrides,
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = format!("{}_", self.env_prefix);

        for (key, value) in vars {
            let Some(config_key) = key.strip_prefix(&prefix) else {
                continue;
            };

            let applied = config
                .apply_env(&config_key.to_uppercase(), &value)
                .with_context(|| format!("Invalid value for {key}"))?;
            if !applied {
                warn!(variable = %key, "Unknown configuration variable ignored");
            }
        }

        Ok(())
    }
}

/// Разобрать булево значение переменной окружения
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("expected a boolean, got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        name: String,
        verbose: bool,
    }

    impl EnvOverrides for Sample {
        fn apply_env(&mut self, key: &str, value: &str) -> Result<bool> {
            match key {
                "NAME" => self.name = value.to_string(),
                "VERBOSE" => self.verbose = parse_bool(value)?,
                _ => return Ok(false),
            }
            Ok(true)
        }
    }

    fn loader_in(dir: &Path) -> ConfigurationLoader {
        ConfigurationLoader::new("sample", "SAMPLE").with_search_paths([dir])
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = loader_in(dir.path());

        assert!(loader.find_configuration_file().is_none());
        let mut config = Sample::default();
        loader
            .apply_environment(&mut config, Vec::<(String, String)>::new())
            .unwrap();
        assert_eq!(config, Sample::default());
    }

    #[test]
    fn test_finds_toml_in_search_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sample.toml"), "name = \"from-file\"\n").unwrap();

        let loader = loader_in(dir.path());
        let found = loader.find_configuration_file().unwrap();
        let config: Sample = loader.load_from_file(&found).unwrap();

        assert_eq!(config.name, "from-file");
        assert!(!config.verbose);
    }

    #[test]
    fn test_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"verbose": true}"#).unwrap();

        let config: Sample = loader_in(dir.path()).load_from_file(&path).unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.ini");
        fs::write(&path, "name=x").unwrap();

        let err = loader_in(dir.path())
            .load_from_file::<Sample>(&path)
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = loader_in(dir.path());
        let mut config = Sample {
            name: "from-file".to_string(),
            verbose: false,
        };

        loader
            .apply_environment(
                &mut config,
                vec![
                    ("SAMPLE_NAME".to_string(), "from-env".to_string()),
                    ("SAMPLE_VERBOSE".to_string(), "yes".to_string()),
                    ("SAMPLE_UNKNOWN".to_string(), "x".to_string()),
                    ("OTHER_NAME".to_string(), "ignored".to_string()),
                ],
            )
            .unwrap();

        assert_eq!(config.name, "from-env");
        assert!(config.verbose);
    }

    #[test]
    fn test_invalid_env_value_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Sample::default();

        let err = loader_in(dir.path())
            .apply_environment(
                &mut config,
                vec![("SAMPLE_VERBOSE".to_string(), "maybe".to_string())],
            )
            .unwrap_err();
        assert!(err.to_string().contains("SAMPLE_VERBOSE"));
    }

    #[cfg(unix)]
    #[test]
    fn test_foreign_non_utf8_variables_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let dir = tempfile::tempdir().unwrap();
        let vars = vec![
            (OsString::from("UNRELATED"), OsString::from_vec(b"\xff\xfe".to_vec())),
            (OsString::from_vec(b"\xffKEY".to_vec()), OsString::from("x")),
            (OsString::from("SAMPLE_NAME"), OsString::from("from-env")),
        ];

        let selected = loader_in(dir.path()).prefixed_vars(vars).unwrap();
        assert_eq!(
            selected,
            vec![("SAMPLE_NAME".to_string(), "from-env".to_string())]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_prefixed_non_utf8_value_is_an_error() {
        use std::os::unix::ffi::OsStringExt;

        let dir = tempfile::tempdir().unwrap();
        let vars = vec![(
            OsString::from("SAMPLE_NAME"),
            OsString::from_vec(b"\xff".to_vec()),
        )];

        let err = loader_in(dir.path()).prefixed_vars(vars).unwrap_err();
        assert!(err.to_string().contains("SAMPLE_NAME"));
    }
}
