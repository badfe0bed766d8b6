/// Broker settings and their loading from files and environment.
pub mod config;
/// Error types of the root crate and re-exports from `topicast-error`.
pub mod error;
/// Logging setup on top of `tracing` (filters, formats, sinks).
pub mod logging;
/// Pub/Sub: Broker, Topic, SubscriberDirectory, Message.
pub mod pubsub;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Settings.
pub use config::{BrokerConfig, Settings};
/// Operation errors and result types.
pub use error::{
    BrokerError, DeliveryError, ErrorExt, SettingsError, StackError, StatusCode, TopicastResult,
};
/// Logging.
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingHandle};
/// Pub/Sub API.
pub use pubsub::{
    Broker, BrokerStats, DeliveryReport, LoggingHandler, Message, MessageHandler, MessagePayload,
    SharedHandler, SubscriberDirectory, SubscriberId, Topic,
};
