use std::error::Error;

use crate::StatusCode;

/// Общее расширение для всех ошибок брокера: статус-код и теги, которые
/// попадают в структурированные логи.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// Статус ошибки. По умолчанию [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Пары ключ–значение для полей лога.
    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![("status_code", self.status_code().to_string())]
    }
}
