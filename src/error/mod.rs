pub mod delivery;
pub mod settings;

// Публичный экспорт всех типов ошибок из вложенных модулей.
pub use delivery::DeliveryError;
pub use settings::SettingsError;
// Ошибки брокера и общий стек ошибок живут в отдельном крейте.
pub use topicast_error::{BrokerError, ErrorExt, StackError, StatusCode, TopicastResult};
