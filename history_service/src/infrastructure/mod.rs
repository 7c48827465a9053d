pub mod kafka_consumer;
pub mod persistence;
