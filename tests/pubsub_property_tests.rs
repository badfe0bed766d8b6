//! Property-based tests для брокера
//!
//! Случайные последовательности операций сравниваются с простой моделью:
//! лог темы + набор подписанных id. Подписчик обязан получить ровно те
//! сообщения, что были опубликованы, пока он был подписан, и в том же
//! порядке.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use proptest::prelude::*;
use topicast::{Broker, BrokerError, Message};

const PROPTEST_CASES: u32 = 256;

const TOPICS: [&str; 3] = ["tech", "sports", "news"];
const SUBSCRIBERS: [&str; 3] = ["alice", "bob", "carol"];

type Inbox = Arc<Mutex<Vec<(String, String)>>>;

#[derive(Debug, Clone)]
enum Op {
    Publish(usize, String),
    Subscribe(usize, usize),
    Unsubscribe(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..TOPICS.len(), "[a-z0-9]{0,8}").prop_map(|(t, p)| Op::Publish(t, p)),
        2 => (0..TOPICS.len(), 0..SUBSCRIBERS.len()).prop_map(|(t, s)| Op::Subscribe(t, s)),
        1 => (0..TOPICS.len(), 0..SUBSCRIBERS.len()).prop_map(|(t, s)| Op::Unsubscribe(t, s)),
    ]
}

fn recording_handler(inbox: &Inbox) -> impl Fn(&str, &Message) + Send + Sync + 'static {
    let sink = inbox.clone();
    move |topic: &str, msg: &Message| {
        sink.lock()
            .push((topic.to_string(), msg.content().to_string()));
    }
}

/// Модель: лог каждой темы и множество подписанных (тема, подписчик).
#[derive(Default)]
struct Model {
    logs: HashMap<usize, Vec<String>>,
    attached: HashMap<(usize, usize), bool>,
    received: HashMap<usize, Vec<(String, String)>>,
}

impl Model {
    fn apply(
        &mut self,
        op: &Op,
    ) {
        match op {
            Op::Publish(t, payload) => {
                self.logs.entry(*t).or_default().push(payload.clone());
                for s in 0..SUBSCRIBERS.len() {
                    if self.attached.get(&(*t, s)).copied().unwrap_or(false) {
                        self.received
                            .entry(s)
                            .or_default()
                            .push((TOPICS[*t].to_string(), payload.clone()));
                    }
                }
            }
            Op::Subscribe(t, s) => {
                self.attached.insert((*t, *s), true);
            }
            Op::Unsubscribe(t, s) => {
                self.attached.insert((*t, *s), false);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: PROPTEST_CASES,
        .. ProptestConfig::default()
    })]

    /// Подписчик получает ровно сообщения, опубликованные после подписки.
    #[test]
    fn subscriber_sees_exactly_the_tail(
        before in prop::collection::vec("[a-z]{1,6}", 0..20),
        after in prop::collection::vec("[a-z]{1,6}", 0..20),
    ) {
        let broker = Broker::default();
        broker.create_topic("tech").unwrap();
        for payload in &before {
            broker.publish("tech", payload.as_str()).unwrap();
        }

        let inbox: Inbox = Arc::new(Mutex::new(Vec::new()));
        broker.subscribe("tech", "alice", recording_handler(&inbox)).unwrap();
        for payload in &after {
            broker.publish("tech", payload.as_str()).unwrap();
        }

        let got: Vec<String> = inbox.lock().iter().map(|(_, c)| c.clone()).collect();
        prop_assert_eq!(got, after.clone());

        let topic = broker.topic("tech").unwrap();
        prop_assert_eq!(topic.len(), before.len() + after.len());
        prop_assert_eq!(topic.cursor("alice"), Some(topic.len()));
        prop_assert_eq!(topic.pending("alice"), Some(0));
    }

    /// Номера сообщений образуют непрерывную последовательность с нуля и
    /// совпадают с позицией в логе.
    #[test]
    fn sequences_are_dense(payloads in prop::collection::vec(any::<Vec<u8>>(), 1..30)) {
        let broker = Broker::default();
        let topic = broker.create_topic("bytes").unwrap();

        for (expected, payload) in payloads.iter().enumerate() {
            let seq = broker.publish("bytes", payload.clone()).unwrap();
            prop_assert_eq!(seq, expected as u64);
        }

        for (index, message) in topic.snapshot().iter().enumerate() {
            prop_assert_eq!(message.sequence(), index as u64);
            prop_assert_eq!(message.content().to_bytes().to_vec(), payloads[index].clone());
        }
    }

    /// Произвольная последовательность операций совпадает с моделью.
    #[test]
    fn broker_matches_model(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let broker = Broker::default();
        for name in TOPICS {
            broker.create_topic(name).unwrap();
        }
        let inboxes: Vec<Inbox> = SUBSCRIBERS
            .iter()
            .map(|_| Arc::new(Mutex::new(Vec::new())))
            .collect();
        let mut model = Model::default();

        for op in &ops {
            match op {
                Op::Publish(t, payload) => {
                    broker.publish(TOPICS[*t], payload.as_str()).unwrap();
                }
                Op::Subscribe(t, s) => {
                    broker
                        .subscribe(TOPICS[*t], SUBSCRIBERS[*s], recording_handler(&inboxes[*s]))
                        .unwrap();
                }
                Op::Unsubscribe(t, s) => {
                    broker.unsubscribe(TOPICS[*t], SUBSCRIBERS[*s]).unwrap();
                }
            }
            model.apply(op);
        }

        for (s, inbox) in inboxes.iter().enumerate() {
            let expected = model.received.remove(&s).unwrap_or_default();
            prop_assert_eq!(&*inbox.lock(), &expected);
        }
        for (t, name) in TOPICS.iter().enumerate() {
            let expected = model.logs.remove(&t).unwrap_or_default();
            let log: Vec<String> = broker
                .topic(name)
                .unwrap()
                .snapshot()
                .iter()
                .map(|m| m.content().to_string())
                .collect();
            prop_assert_eq!(log, expected);
        }
    }

    /// Ошибки неизвестной темы не зависят от состояния брокера.
    #[test]
    fn unknown_topic_always_rejected(name in "[a-z]{1,10}") {
        prop_assume!(!TOPICS.contains(&name.as_str()));
        let broker = Broker::default();
        for topic in TOPICS {
            broker.create_topic(topic).unwrap();
        }

        prop_assert_eq!(
            broker.publish(&name, "x"),
            Err(BrokerError::topic_not_found(name.as_str()))
        );
        prop_assert_eq!(
            broker.subscribe(&name, "alice", |_: &str, _: &Message| {}),
            Err(BrokerError::topic_not_found(name.as_str()))
        );
        prop_assert_eq!(broker.stats().published, 0);
    }
}
