use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::registry::LookupSpan;

use crate::logging::{
    config::LoggingConfig,
    formatter::{self, BoxedLayer},
};

/// File layer с ежедневной ротацией.
///
/// Запись идёт через неблокирующий writer; возвращённый `WorkerGuard`
/// нужно держать живым, пока нужны логи (при drop он сбрасывает буфер).
pub fn layer_with_config<S>(config: &LoggingConfig) -> (BoxedLayer<S>, WorkerGuard)
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let appender = rolling::daily(&config.log_dir, &config.file_name);
    let (writer, guard) = non_blocking(appender);

    let layer = formatter::build_formatter_from_config(config, writer, false);
    (layer, guard)
}
