use std::sync::Arc;

use dashmap::DashMap;

use super::{MessageHandler, SharedHandler};

/// Идентификатор подписчика, заданный вызывающим кодом.
pub type SubscriberId = Arc<str>;

/// Справочник подписчиков: id → обработчик.
///
/// Принадлежит брокеру. Темы хранят только id и находят обработчик здесь в
/// момент доставки.
#[derive(Default)]
pub struct SubscriberDirectory {
    handlers: DashMap<SubscriberId, SharedHandler>,
}

impl SubscriberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Регистрирует обработчик. Прежняя регистрация с тем же id
    /// перезаписывается и возвращается.
    pub fn register<H>(
        &self,
        id: impl Into<SubscriberId>,
        handler: H,
    ) -> Option<SharedHandler>
    where
        H: MessageHandler,
    {
        self.register_shared(id.into(), Arc::new(handler))
    }

    pub(crate) fn register_shared(
        &self,
        id: SubscriberId,
        handler: SharedHandler,
    ) -> Option<SharedHandler> {
        self.handlers.insert(id, handler)
    }

    /// Возвращает копию обработчика; блокировка шарда снимается до возврата,
    /// так что обработчик можно вызывать без удержания карты.
    pub fn lookup(
        &self,
        id: &str,
    ) -> Option<SharedHandler> {
        self.handlers.get(id).map(|entry| entry.value().clone())
    }

    /// Удаляет регистрацию. Возвращает `true`, если она существовала.
    pub fn unregister(
        &self,
        id: &str,
    ) -> bool {
        self.handlers.remove(id).is_some()
    }

    pub fn contains(
        &self,
        id: &str,
    ) -> bool {
        self.handlers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for SubscriberDirectory {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SubscriberDirectory")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}
