use anyhow::Context;
use topicast::{init_logging, Broker, ErrorExt, LoggingHandler, Settings};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    settings.validate().context("validating settings")?;

    let logging = init_logging(settings.logging.clone()).context("initializing logging")?;
    let broker = Broker::new(settings.broker.clone());

    broker.create_topic("tech")?;
    broker.create_topic("sports")?;

    // Опубликовано до подписки: подписчики этого не увидят.
    broker.publish("tech", "Rust LLD is fun!")?;
    broker.publish("sports", "Ronaldo scored a hat trick!")?;

    broker.subscribe("tech", "alice", LoggingHandler::new("alice"))?;
    broker.subscribe("sports", "bob", LoggingHandler::new("bob"))?;

    broker.publish("tech", "Tokio runtime internals explained")?;
    broker.publish("sports", "India wins the match!")?;

    if let Err(e) = broker.publish("nonexistent", "Z") {
        tracing::warn!(
            status = %e.status_code(),
            tags = ?e.metrics_tags(),
            error = %e,
            "publish rejected"
        );
    }

    let stats = broker.stats();
    tracing::info!(
        topics = stats.topics,
        subscribers = stats.subscribers,
        published = stats.published,
        delivered = stats.delivered,
        "demo finished"
    );

    logging.shutdown();
    Ok(())
}
