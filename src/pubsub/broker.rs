use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use dashmap::{mapref::entry::Entry, DashMap};

use super::{
    DeliveryReport, MessageHandler, MessagePayload, SubscriberDirectory, SubscriberId, Topic,
};
use crate::{config::BrokerConfig, error::BrokerError};

type TopicKey = Arc<str>;

/// Брокер Pub/Sub сообщений.
///
/// Единственная точка входа: владеет темами и директорией подписчиков.
/// Поддерживает:
/// - Создание тем с уникальными именами
/// - Подписку без повторной отправки старых сообщений
/// - Синхронную доставку в порядке лога при каждой публикации
/// - Статистику публикаций, доставок и ошибок обработчиков
pub struct Broker {
    /// Имя темы → тема
    topics: DashMap<TopicKey, Arc<Topic>>,
    /// id подписчика → обработчик
    directory: SubscriberDirectory,
    config: BrokerConfig,
    /// Общее количество успешных `publish`
    published_count: AtomicUsize,
    /// Успешные вызовы обработчиков
    delivered_count: AtomicUsize,
    /// Сообщения, не доставленные из-за отсутствия подписчика в директории
    skipped_count: AtomicUsize,
    /// Ошибки и паники обработчиков
    handler_error_count: AtomicUsize,
}

/// Снимок статистики брокера.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerStats {
    pub topics: usize,
    pub subscribers: usize,
    pub published: usize,
    pub delivered: usize,
    pub skipped: usize,
    pub handler_errors: usize,
}

impl Broker {
    pub fn new(config: BrokerConfig) -> Self {
        Self {
            topics: DashMap::new(),
            directory: SubscriberDirectory::new(),
            config,
            published_count: AtomicUsize::new(0),
            delivered_count: AtomicUsize::new(0),
            skipped_count: AtomicUsize::new(0),
            handler_error_count: AtomicUsize::new(0),
        }
    }

    /// Создаёт пустую тему.
    ///
    /// Повторное создание не перезаписывает существующую тему (её лог и
    /// курсоры остаются нетронутыми), а возвращает
    /// [`BrokerError::DuplicateTopic`].
    pub fn create_topic(
        &self,
        name: &str,
    ) -> Result<Arc<Topic>, BrokerError> {
        match self.topics.entry(Arc::from(name)) {
            Entry::Occupied(_) => Err(BrokerError::duplicate_topic(name)),
            Entry::Vacant(slot) => {
                let threshold = match self.config.slow_handler_threshold_ms {
                    0 => None,
                    ms => Some(Duration::from_millis(ms)),
                };
                let topic = Arc::new(Topic::new(
                    slot.key().clone(),
                    self.config.initial_log_capacity,
                    threshold,
                ));
                slot.insert(topic.clone());
                tracing::debug!(topic = name, "topic created");
                Ok(topic)
            }
        }
    }

    /// Публикует сообщение и доставляет его всем подписчикам темы.
    ///
    /// Доставка идёт в вызывающем потоке. Если тему в этот момент уже
    /// разносит другой вызов, сообщение доставит он, и `publish`
    /// возвращается сразу. Возвращает номер нового сообщения. Ошибки
    /// обработчиков на результат не влияют.
    pub fn publish(
        &self,
        topic: &str,
        payload: impl Into<MessagePayload>,
    ) -> Result<u64, BrokerError> {
        let topic = self.get(topic)?;
        let (message, report) = topic.publish(payload.into(), &self.directory);

        self.published_count.fetch_add(1, Ordering::Relaxed);
        self.record(report);
        tracing::trace!(
            topic = topic.name(),
            sequence = message.sequence(),
            delivered = report.delivered,
            failed = report.failed,
            "message published"
        );

        Ok(message.sequence())
    }

    /// Подписывает `subscriber_id` на тему.
    ///
    /// Обработчик регистрируется в директории (перезаписывая прежний), курсор
    /// ставится на текущий конец лога. Повторная подписка курсор не
    /// перематывает.
    pub fn subscribe<H>(
        &self,
        topic: &str,
        subscriber_id: &str,
        handler: H,
    ) -> Result<(), BrokerError>
    where
        H: MessageHandler,
    {
        let topic = self.get(topic)?;
        let id: SubscriberId = Arc::from(subscriber_id);
        let attached = topic.subscribe(id, Arc::new(handler), &self.directory);

        tracing::debug!(
            topic = topic.name(),
            subscriber = subscriber_id,
            attached,
            "subscribed"
        );
        Ok(())
    }

    /// Удаляет курсор подписчика в теме. Регистрация в директории остаётся:
    /// подписчик может быть подписан на другие темы.
    pub fn unsubscribe(
        &self,
        topic: &str,
        subscriber_id: &str,
    ) -> Result<(), BrokerError> {
        let topic = self.get(topic)?;
        let removed = topic.detach(subscriber_id);

        tracing::debug!(
            topic = topic.name(),
            subscriber = subscriber_id,
            removed,
            "unsubscribed"
        );
        Ok(())
    }

    /// Полностью удаляет подписчика: регистрацию и курсоры во всех темах.
    ///
    /// Возвращает `true`, если подписчик был зарегистрирован.
    pub fn remove_subscriber(
        &self,
        subscriber_id: &str,
    ) -> bool {
        // Сначала регистрация: конкурентный `subscribe` после этого
        // регистрирует id заново, и курсор без обработчика не появится.
        let registered = self.directory.unregister(subscriber_id);
        let mut detached = 0usize;
        for topic in self.topics() {
            if topic.detach(subscriber_id) {
                detached += 1;
            }
        }

        tracing::debug!(
            subscriber = subscriber_id,
            registered,
            detached,
            "subscriber removed"
        );
        registered
    }

    pub fn topic(
        &self,
        name: &str,
    ) -> Option<Arc<Topic>> {
        self.topics.get(name).map(|entry| entry.value().clone())
    }

    /// Имена всех тем в алфавитном порядке.
    pub fn topic_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .topics
            .iter()
            .map(|entry| entry.key().to_string())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn directory(&self) -> &SubscriberDirectory {
        &self.directory
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    pub fn stats(&self) -> BrokerStats {
        BrokerStats {
            topics: self.topics.len(),
            subscribers: self.directory.len(),
            published: self.published_count.load(Ordering::Relaxed),
            delivered: self.delivered_count.load(Ordering::Relaxed),
            skipped: self.skipped_count.load(Ordering::Relaxed),
            handler_errors: self.handler_error_count.load(Ordering::Relaxed),
        }
    }

    /// Копия списка тем: итерация по `DashMap` не должна держать шарды,
    /// пока берётся блокировка темы.
    fn topics(&self) -> Vec<Arc<Topic>> {
        self.topics
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn get(
        &self,
        name: &str,
    ) -> Result<Arc<Topic>, BrokerError> {
        self.topic(name)
            .ok_or_else(|| BrokerError::topic_not_found(name))
    }

    fn record(
        &self,
        report: DeliveryReport,
    ) {
        self.delivered_count
            .fetch_add(report.delivered, Ordering::Relaxed);
        self.skipped_count
            .fetch_add(report.skipped, Ordering::Relaxed);
        self.handler_error_count
            .fetch_add(report.failed, Ordering::Relaxed);
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new(BrokerConfig::default())
    }
}

impl std::fmt::Debug for Broker {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Broker")
            .field("topics", &self.topic_names())
            .field("directory", &self.directory)
            .field("config", &self.config)
            .finish()
    }
}
