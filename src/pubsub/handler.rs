use std::sync::Arc;

use crate::{error::DeliveryError, Message};

/// Способность подписчика принимать сообщения.
///
/// Вызывается синхронно в потоке, ведущем доставку темы; блокировки темы
/// при этом не удерживаются. Обработчик может публиковать в любую тему, в
/// том числе в свою: такое сообщение доставляется после текущего прохода,
/// а вложенный `publish` возвращается, не дожидаясь его доставки. Цикл
/// публикаций, который никогда не затухает, не завершится.
pub trait MessageHandler: Send + Sync + 'static {
    /// Получить сообщение `message` из темы `topic`.
    fn on_message(
        &self,
        topic: &str,
        message: &Message,
    ) -> Result<(), DeliveryError>;
}

/// Обработчик, разделяемый директорией и брокером.
pub type SharedHandler = Arc<dyn MessageHandler>;

/// Любое замыкание `Fn(&str, &Message)` является обработчиком.
impl<F> MessageHandler for F
where
    F: Fn(&str, &Message) + Send + Sync + 'static,
{
    fn on_message(
        &self,
        topic: &str,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        self(topic, message);
        Ok(())
    }
}

/// Обработчик, который пишет каждое полученное сообщение в лог.
#[derive(Debug, Clone)]
pub struct LoggingHandler {
    subscriber_id: Arc<str>,
}

impl LoggingHandler {
    pub fn new(subscriber_id: impl Into<Arc<str>>) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
        }
    }
}

impl MessageHandler for LoggingHandler {
    fn on_message(
        &self,
        topic: &str,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        tracing::info!(
            subscriber = %self.subscriber_id,
            topic,
            sequence = message.sequence(),
            content = %message.content(),
            "message received"
        );
        Ok(())
    }
}
