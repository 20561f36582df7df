//! Shared DTOs between the crawler console and the management backend.

pub mod domain;
pub mod shared;
