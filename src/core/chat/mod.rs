// Core chat module - the message-send flow and its publish port.

pub mod chat_models;
pub mod chat_service;

pub use chat_models::*;
pub use chat_service::*;
