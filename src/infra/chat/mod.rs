// Implementations for the chat send flow.

pub mod local_publisher;

pub use local_publisher::LocalPublisher;
