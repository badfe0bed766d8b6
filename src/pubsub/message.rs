use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Содержимое сообщения.
///
/// Закрытый набор вариантов вместо произвольного `Any`: брокер не
/// интерпретирует payload, но обработчикам удобно не парсить строки и JSON
/// заново.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    Bytes(Bytes),
    String(String),
    Json(Value),
}

/// Неизменяемое сообщение в логе темы.
///
/// `sequence` совпадает со смещением сообщения в логе темы (начиная с 0),
/// назначается при добавлении и строго возрастает в пределах темы.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    sequence: u64,
    content: MessagePayload,
    created_at: DateTime<Utc>,
}

impl Message {
    pub(crate) fn new(
        sequence: u64,
        content: MessagePayload,
    ) -> Self {
        Self {
            sequence,
            content,
            created_at: Utc::now(),
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn content(&self) -> &MessagePayload {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl MessagePayload {
    /// Байтовое представление payload. Для JSON: компактная сериализация.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::Bytes(b) => b.clone(),
            Self::String(s) => Bytes::copy_from_slice(s.as_bytes()),
            Self::Json(v) => Bytes::from(v.to_string()),
        }
    }

    /// Строка, если payload текстовый.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Bytes(b) => std::str::from_utf8(b).ok(),
            Self::Json(_) => None,
        }
    }

    /// Размер payload в байтах.
    pub fn len(&self) -> usize {
        match self {
            Self::Bytes(b) => b.len(),
            Self::String(s) => s.len(),
            Self::Json(v) => v.to_string().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for MessagePayload {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Self::String(s) => f.write_str(s),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for MessagePayload {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for MessagePayload {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Bytes> for MessagePayload {
    fn from(b: Bytes) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<u8>> for MessagePayload {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(v))
    }
}

impl From<&'static [u8]> for MessagePayload {
    fn from(s: &'static [u8]) -> Self {
        Self::Bytes(Bytes::from_static(s))
    }
}

impl From<Value> for MessagePayload {
    fn from(v: Value) -> Self {
        Self::Json(v)
    }
}
