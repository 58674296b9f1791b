pub mod error;
pub mod message;
pub mod types;

pub use error::ChatfillError;
pub use message::{ChatMessage, ChatRole};
pub use types::Placeholder;
