//! Подсистема Publish–Subscribe (pub/sub).
//!
//! Внутрипроцессный брокер с упорядоченным логом в каждой теме:
//!
//! - `broker`: создание тем, публикация, подписка и отписка.
//! - `directory`: справочник подписчиков (id → обработчик).
//! - `handler`: интерфейс обработчика сообщений.
//! - `message`: неизменяемое сообщение и его payload.
//! - `topic`: лог темы, курсоры подписчиков и доставка.

pub mod broker;
pub mod directory;
pub mod handler;
pub mod message;
pub mod topic;

// Публичный экспорт всех типов из вложенных модулей, чтобы упростить доступ к
// ним из внешнего кода.
pub use broker::*;
pub use directory::*;
pub use handler::*;
pub use message::*;
pub use topic::*;
