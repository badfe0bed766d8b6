use tracing_subscriber::EnvFilter;

use crate::logging::config::LoggingConfig;

/// Фильтр событий: `RUST_LOG` имеет приоритет над конфигурацией.
///
/// Некорректная директива из конфигурации не роняет процесс: используется
/// уровень `info` (`LoggingConfig::validate` ловит такие директивы раньше).
pub fn build_filter_from_config(config: &LoggingConfig) -> EnvFilter {
    if let Ok(env_filter) = EnvFilter::try_from_default_env() {
        return env_filter;
    }

    let directive = config.build_filter_directive();
    EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Invalid log filter directive from config ('{directive}'): {e}; falling back to 'info'");
        EnvFilter::new("info")
    })
}
