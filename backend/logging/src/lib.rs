//! Structured logging for the Chatfill service.

pub mod logger;

pub use logger::init_logger;
