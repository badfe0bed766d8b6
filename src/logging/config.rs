use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use topicast_error::{ensure, StatusCode, TopicastResult};
use tracing_subscriber::EnvFilter;

/// Формат вывода событий.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Конфигурация логирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Уровень или директива `EnvFilter` ("info", "topicast=debug,warn").
    /// Переменная `RUST_LOG` имеет приоритет.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub with_ansi: bool,
    #[serde(default = "default_true")]
    pub with_target: bool,
    /// Дублировать логи в файл с ежедневной ротацией.
    #[serde(default)]
    pub file_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl LoggingConfig {
    /// Директива для `EnvFilter`.
    pub fn build_filter_directive(&self) -> String {
        self.level.trim().to_string()
    }

    pub fn validate(&self) -> TopicastResult<()> {
        let directive = self.build_filter_directive();
        ensure!(
            !directive.is_empty(),
            StatusCode::InvalidConfig,
            "logging.level cannot be empty"
        );
        ensure!(
            EnvFilter::try_new(&directive).is_ok(),
            StatusCode::InvalidFilter,
            "invalid log filter directive: '{}'",
            directive
        );
        ensure!(
            !self.file_enabled || !self.file_name.trim().is_empty(),
            StatusCode::InvalidConfig,
            "logging.file_name cannot be empty when file logging is enabled"
        );
        Ok(())
    }

    /// Создаёт каталог логов, если включён файловый вывод.
    pub fn ensure_log_dir(&self) -> TopicastResult<()> {
        if self.file_enabled {
            std::fs::create_dir_all(&self.log_dir)?;
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            with_ansi: true,
            with_target: true,
            file_enabled: false,
            log_dir: default_log_dir(),
            file_name: default_file_name(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_file_name() -> String {
    "topicast.log".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = LoggingConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.build_filter_directive(), "info");
    }

    #[test]
    fn test_empty_level_rejected() {
        let cfg = LoggingConfig {
            level: "   ".into(),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::InvalidConfig);
    }

    /// Тест проверяет, что некорректная директива фильтра отклоняется.
    #[test]
    fn test_invalid_directive_rejected() {
        let cfg = LoggingConfig {
            level: "topicast=loud".into(),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::InvalidFilter);
    }

    #[test]
    fn test_file_name_required_for_file_sink() {
        let cfg = LoggingConfig {
            file_enabled: true,
            file_name: String::new(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_ensure_log_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("logs");
        let cfg = LoggingConfig {
            file_enabled: true,
            log_dir: dir.clone(),
            ..Default::default()
        };

        cfg.ensure_log_dir().unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_format_deserialize_lowercase() {
        let cfg: LoggingConfig =
            serde_json::from_str(r#"{ "level": "debug", "format": "pretty" }"#).unwrap();
        assert_eq!(cfg.format, LogFormat::Pretty);
        assert_eq!(cfg.file_name, "topicast.log");
        assert!(cfg.with_ansi);
    }
}
