//! Streaming AI chat client

pub mod client;
pub mod conversation;
pub mod decoder;

pub use client::{ChatStreamClient, ChatStreamHandler};
pub use conversation::ChatConversation;
pub use decoder::{SseDecoder, SseFrame};
