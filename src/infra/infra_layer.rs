// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "chat/mod.rs"]
pub mod chat;

#[path = "moderation/mod.rs"]
pub mod moderation;
