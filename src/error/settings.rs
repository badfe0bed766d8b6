use thiserror::Error;
use topicast_error::{ErrorExt, StatusCode};

/// Ошибка загрузки настроек.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

impl ErrorExt for SettingsError {
    fn status_code(&self) -> StatusCode {
        StatusCode::InvalidConfig
    }
}
