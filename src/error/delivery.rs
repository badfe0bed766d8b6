use thiserror::Error;
use topicast_error::{ErrorExt, StatusCode};

/// Ошибка обработчика при получении сообщения.
///
/// Возвращается реализациями [`MessageHandler`](crate::MessageHandler).
/// Публикующей стороне не передаётся: курсор подписчика всё равно
/// сдвигается (доставка at-most-once), ошибка логируется вместе с
/// [`ErrorExt::metrics_tags`] и учитывается в статистике брокера.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Обработчик отказался принять конкретное сообщение.
    #[error("handler rejected message {sequence}: {reason}")]
    Rejected { sequence: u64, reason: String },

    /// Получатель за обработчиком больше не существует (например, закрыт
    /// канал, в который обработчик пересылает сообщения). Брокер не
    /// отписывает такой обработчик сам: это делает владелец через
    /// `Broker::unsubscribe` или `Broker::remove_subscriber`.
    #[error("handler is closed")]
    Closed,
}

impl DeliveryError {
    pub fn rejected(
        sequence: u64,
        reason: impl Into<String>,
    ) -> Self {
        Self::Rejected {
            sequence,
            reason: reason.into(),
        }
    }
}

impl ErrorExt for DeliveryError {
    fn status_code(&self) -> StatusCode {
        StatusCode::DeliveryFailed
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let kind = match self {
            Self::Rejected { .. } => "rejected",
            Self::Closed => "closed",
        };
        vec![
            ("status_code", self.status_code().to_string()),
            ("kind", kind.to_string()),
        ]
    }
}
