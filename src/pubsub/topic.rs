use std::{
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use super::{Message, MessagePayload, SharedHandler, SubscriberDirectory, SubscriberId};
use crate::error::{DeliveryError, ErrorExt};

/// Тема: упорядоченный лог сообщений только на добавление и таблица
/// курсоров подписчиков.
///
/// Лог и курсоры живут под короткой блокировкой `state`, которая никогда не
/// удерживается во время вызова обработчиков. Саму доставку в каждый
/// момент ведёт только один вызов: тот, кто захватил `delivery`. Вызов, не
/// получивший право на доставку, оставляет свои сообщения в логе, и их
/// разносит текущий владелец права до того, как отпустить его. Поэтому
/// обработчик может публиковать в любую тему (включая свою собственную),
/// подписываться и отписываться, и ни один вызов не ждёт другой.
///
/// Снаружи тема доступна только на чтение; изменяет её брокер.
pub struct Topic {
    name: Arc<str>,
    slow_handler_threshold: Option<Duration>,
    state: Mutex<TopicState>,
    /// Право на доставку; берётся только через `try_lock`.
    delivery: Mutex<()>,
}

struct TopicState {
    log: Vec<Arc<Message>>,
    /// id подписчика → индекс следующего сообщения, ещё не взятого в
    /// доставку. Всегда `0 <= cursor <= log.len()`.
    cursors: HashMap<SubscriberId, usize>,
}

/// Сообщения, взятые в доставку одному подписчику.
struct Batch {
    subscriber_id: SubscriberId,
    messages: Vec<Arc<Message>>,
}

/// Итог одного прохода доставки.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Успешные вызовы обработчиков.
    pub delivered: usize,
    /// Сообщения, пропущенные из-за отсутствия подписчика в директории.
    pub skipped: usize,
    /// Вызовы, завершившиеся ошибкой или паникой обработчика.
    pub failed: usize,
}

impl Topic {
    pub(crate) fn new(
        name: Arc<str>,
        initial_capacity: usize,
        slow_handler_threshold: Option<Duration>,
    ) -> Self {
        Self {
            name,
            slow_handler_threshold,
            state: Mutex::new(TopicState {
                log: Vec::with_capacity(initial_capacity),
                cursors: HashMap::new(),
            }),
            delivery: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Количество сообщений в логе.
    pub fn len(&self) -> usize {
        self.state.lock().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().log.is_empty()
    }

    /// Количество записей в таблице курсоров.
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().cursors.len()
    }

    pub fn is_attached(
        &self,
        subscriber_id: &str,
    ) -> bool {
        self.state.lock().cursors.contains_key(subscriber_id)
    }

    /// Индекс следующего сообщения, которое получит подписчик.
    pub fn cursor(
        &self,
        subscriber_id: &str,
    ) -> Option<usize> {
        self.state.lock().cursors.get(subscriber_id).copied()
    }

    /// Сколько сообщений ещё не взято в доставку подписчику.
    pub fn pending(
        &self,
        subscriber_id: &str,
    ) -> Option<usize> {
        let state = self.state.lock();
        state
            .cursors
            .get(subscriber_id)
            .map(|cursor| state.log.len() - cursor)
    }

    /// Сообщение по его номеру.
    pub fn message(
        &self,
        sequence: u64,
    ) -> Option<Arc<Message>> {
        let index = usize::try_from(sequence).ok()?;
        self.state.lock().log.get(index).cloned()
    }

    /// Копия лога на текущий момент.
    pub fn snapshot(&self) -> Vec<Arc<Message>> {
        self.state.lock().log.clone()
    }

    /// Добавляет сообщение в конец лога без доставки.
    #[cfg(test)]
    pub(crate) fn append(
        &self,
        payload: MessagePayload,
    ) -> Arc<Message> {
        self.state.lock().append(payload)
    }

    /// Ставит курсор подписчика на текущую длину лога. Существующий курсор
    /// не трогается: повторная подписка не перематывает лог.
    #[cfg(test)]
    pub(crate) fn attach(
        &self,
        subscriber_id: SubscriberId,
    ) -> bool {
        self.state.lock().attach(subscriber_id)
    }

    /// Удаляет курсор подписчика. Сообщения, уже взятые в доставку, до
    /// него ещё дойдут.
    pub(crate) fn detach(
        &self,
        subscriber_id: &str,
    ) -> bool {
        self.state.lock().cursors.remove(subscriber_id).is_some()
    }

    /// Добавляет сообщение и доставляет его, если доставкой темы никто
    /// не занят; иначе сообщение разнесёт текущий владелец доставки.
    pub(crate) fn publish(
        &self,
        payload: MessagePayload,
        directory: &SubscriberDirectory,
    ) -> (Arc<Message>, DeliveryReport) {
        let message = self.state.lock().append(payload);
        let report = self.deliver(directory);
        (message, report)
    }

    /// Регистрация обработчика и установка курсора под блокировкой лога:
    /// подписчик получает ровно сообщения, добавленные после подписки.
    pub(crate) fn subscribe(
        &self,
        subscriber_id: SubscriberId,
        handler: SharedHandler,
        directory: &SubscriberDirectory,
    ) -> bool {
        let mut state = self.state.lock();
        directory.register_shared(subscriber_id.clone(), handler);
        state.attach(subscriber_id)
    }

    /// Разносит подписчикам всё, что ещё не взято в доставку.
    ///
    /// Никогда не ждёт: если право на доставку занято (другим потоком или
    /// этим же потоком выше по стеку), сразу возвращает пустой отчёт.
    pub(crate) fn deliver(
        &self,
        directory: &SubscriberDirectory,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        loop {
            let Some(turn) = self.delivery.try_lock() else {
                return report;
            };

            loop {
                let batches = self.state.lock().claim();
                if batches.is_empty() {
                    break;
                }
                for batch in batches {
                    self.dispatch(batch, directory, &mut report);
                }
            }
            drop(turn);

            // Сообщение, добавленное между последним claim и освобождением
            // права, иначе осталось бы без доставки.
            if !self.state.lock().has_pending() {
                return report;
            }
        }
    }

    fn dispatch(
        &self,
        batch: Batch,
        directory: &SubscriberDirectory,
        report: &mut DeliveryReport,
    ) {
        let Batch {
            subscriber_id,
            messages,
        } = batch;

        let Some(handler) = directory.lookup(&subscriber_id) else {
            report.skipped += messages.len();
            tracing::trace!(
                topic = %self.name,
                subscriber = %subscriber_id,
                "subscriber not registered, delivery skipped"
            );
            return;
        };

        for message in &messages {
            match self.invoke(&handler, message) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(
                        topic = %self.name,
                        subscriber = %subscriber_id,
                        sequence = message.sequence(),
                        status = %err.status_code(),
                        tags = ?err.metrics_tags(),
                        error = %err,
                        "handler failed, message dropped"
                    );
                }
            }
        }
    }

    fn invoke(
        &self,
        handler: &SharedHandler,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        let started = self.slow_handler_threshold.map(|_| Instant::now());

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            handler.on_message(&self.name, message)
        }))
        .unwrap_or_else(|_| {
            Err(DeliveryError::rejected(
                message.sequence(),
                "handler panicked",
            ))
        });

        if let (Some(threshold), Some(started)) = (self.slow_handler_threshold, started) {
            let elapsed = started.elapsed();
            if elapsed >= threshold {
                tracing::warn!(
                    topic = %self.name,
                    sequence = message.sequence(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    threshold_ms = threshold.as_millis() as u64,
                    "slow message handler"
                );
            }
        }

        result
    }
}

impl TopicState {
    fn append(
        &mut self,
        payload: MessagePayload,
    ) -> Arc<Message> {
        let message = Arc::new(Message::new(self.log.len() as u64, payload));
        self.log.push(message.clone());
        message
    }

    fn attach(
        &mut self,
        subscriber_id: SubscriberId,
    ) -> bool {
        let len = self.log.len();
        let mut inserted = false;
        self.cursors.entry(subscriber_id).or_insert_with(|| {
            inserted = true;
            len
        });
        inserted
    }

    /// Забирает хвост лога каждого отстающего подписчика и сдвигает его
    /// курсор в конец (at-most-once: курсор не откатывается при ошибке).
    fn claim(&mut self) -> Vec<Batch> {
        let TopicState { log, cursors } = self;
        let len = log.len();

        cursors
            .iter_mut()
            .filter(|(_, cursor)| **cursor < len)
            .map(|(subscriber_id, cursor)| {
                let messages = log[*cursor..].to_vec();
                *cursor = len;
                Batch {
                    subscriber_id: subscriber_id.clone(),
                    messages,
                }
            })
            .collect()
    }

    fn has_pending(&self) -> bool {
        let len = self.log.len();
        self.cursors.values().any(|&cursor| cursor < len)
    }
}

impl std::fmt::Debug for Topic {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Topic")
            .field("name", &self.name)
            .field("len", &state.log.len())
            .field("cursors", &state.cursors)
            .finish()
    }
}
