pub mod batch;
pub mod chat;
pub mod envelope;
pub mod file;
pub mod filter;
