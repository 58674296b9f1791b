//! The conversation driver.
//!
//! Walks the ordered placeholder list one question at a time, validates and
//! stores answers, and keeps the chat transcript. One `Conversation` per
//! uploaded document; a new upload starts a fresh one.

pub mod driver;

pub use driver::{Conversation, ConversationState};
