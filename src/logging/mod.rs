//! Логирование на `tracing`: фильтр из конфигурации или `RUST_LOG`,
//! console layer и опциональный файловый layer с ротацией.

pub mod config;
mod filters;
pub mod formatter;
pub mod handle;
pub mod sinks;

pub use config::{LogFormat, LoggingConfig};
pub use handle::LoggingHandle;
use topicast_error::{bail, ResultExt, StatusCode, TopicastResult};
use tracing_subscriber::{
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use self::formatter::BoxedLayer;

type FilteredRegistry = Layered<EnvFilter, Registry>;

/// Инициализация глобального логирования с конфигурацией.
///
/// Может быть вызвана один раз на процесс; повторный вызов возвращает
/// ошибку.
pub fn init_logging(config: LoggingConfig) -> TopicastResult<LoggingHandle> {
    config.validate()?;
    config
        .ensure_log_dir()
        .with_context(|| format!("creating log directory {}", config.log_dir.display()))?;

    let env_filter = filters::build_filter_from_config(&config);
    let mut layers: Vec<BoxedLayer<FilteredRegistry>> = Vec::new();

    layers.push(sinks::console::layer_with_config(&config));

    let file_guard = if config.file_enabled {
        let (file_layer, guard) = sinks::file::layer_with_config(&config);
        layers.push(file_layer);
        Some(guard)
    } else {
        None
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
    {
        bail!(StatusCode::Internal, "failed to install log subscriber: {}", e);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = ?config.format,
        log_dir = %config.log_dir.display(),
        file_enabled = config.file_enabled,
        "Logging system initialized"
    );

    Ok(LoggingHandle::new(file_guard))
}
