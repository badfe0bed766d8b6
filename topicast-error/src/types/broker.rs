use crate::{ErrorExt, StatusCode};

/// Ошибки операций брокера, возвращаемые вызывающему коду.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// Операция над темой, которая не была создана.
    TopicNotFound { topic: String },
    /// Тема с таким именем уже существует.
    DuplicateTopic { topic: String },
}

impl BrokerError {
    pub fn topic_not_found(topic: impl Into<String>) -> Self {
        Self::TopicNotFound {
            topic: topic.into(),
        }
    }

    pub fn duplicate_topic(topic: impl Into<String>) -> Self {
        Self::DuplicateTopic {
            topic: topic.into(),
        }
    }

    /// Имя темы, к которой относится ошибка.
    pub fn topic(&self) -> &str {
        match self {
            Self::TopicNotFound { topic } | Self::DuplicateTopic { topic } => topic,
        }
    }
}

impl std::fmt::Display for BrokerError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::TopicNotFound { topic } => write!(f, "Topic not found: {topic}"),
            Self::DuplicateTopic { topic } => write!(f, "Topic already exists: {topic}"),
        }
    }
}

impl std::error::Error for BrokerError {}

impl ErrorExt for BrokerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::TopicNotFound { .. } => StatusCode::NotFound,
            Self::DuplicateTopic { .. } => StatusCode::AlreadyExists,
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("status_code", self.status_code().to_string()),
            ("topic", self.topic().to_string()),
        ]
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
