use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use topicast_error::{ensure, ResultExt, StatusCode, TopicastResult};

use crate::{error::SettingsError, logging::LoggingConfig};

/// Переменная окружения с путём к файлу настроек.
pub const CONFIG_PATH_ENV: &str = "TOPICAST_CONFIG";
/// Файл настроек по умолчанию (расширение подбирается автоматически).
pub const DEFAULT_CONFIG_FILE: &str = "topicast";

const MAX_INITIAL_LOG_CAPACITY: usize = 1 << 24;

/// Настройки брокера.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Начальная ёмкость лога каждой новой темы.
    #[serde(default = "default_initial_log_capacity")]
    pub initial_log_capacity: usize,
    /// Порог, после которого обработчик считается медленным (мс).
    /// `0` отключает предупреждения.
    #[serde(default = "default_slow_handler_threshold_ms")]
    pub slow_handler_threshold_ms: u64,
}

/// Настройки процесса-хоста: брокер и логирование.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub broker: BrokerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Загружает настройки: значения по умолчанию, затем файл (из
    /// `TOPICAST_CONFIG` или `topicast.*` в текущем каталоге, если есть),
    /// затем переменные окружения `TOPICAST_*`.
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// То же, что [`Settings::load`], но с явным путём к файлу.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let defaults = BrokerConfig::default();
        let logging = LoggingConfig::default();

        let cfg = Config::builder()
            // Значения по умолчанию
            .set_default("broker.initial_log_capacity", defaults.initial_log_capacity as u64)?
            .set_default(
                "broker.slow_handler_threshold_ms",
                defaults.slow_handler_threshold_ms,
            )?
            .set_default("logging.level", logging.level)?
            .add_source(File::from(path).required(false))
            // TOPICAST_BROKER__INITIAL_LOG_CAPACITY=128
            .add_source(
                Environment::with_prefix("TOPICAST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(cfg.try_deserialize()?)
    }

    /// Проверяет согласованность настроек.
    pub fn validate(&self) -> TopicastResult<()> {
        self.broker.validate().context("invalid [broker] settings")?;
        self.logging.validate().context("invalid [logging] settings")
    }
}

impl BrokerConfig {
    pub fn validate(&self) -> TopicastResult<()> {
        ensure!(
            self.initial_log_capacity <= MAX_INITIAL_LOG_CAPACITY,
            StatusCode::InvalidConfig,
            "broker.initial_log_capacity too large: {} (max {})",
            self.initial_log_capacity,
            MAX_INITIAL_LOG_CAPACITY
        );
        Ok(())
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            initial_log_capacity: default_initial_log_capacity(),
            slow_handler_threshold_ms: default_slow_handler_threshold_ms(),
        }
    }
}

fn default_initial_log_capacity() -> usize {
    64
}

fn default_slow_handler_threshold_ms() -> u64 {
    100
}
