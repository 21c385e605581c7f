//! Infrastructure adapters. Implement outbound ports.
//!
//! SQLite, AI backend, console chat, rate limiting. Map errors to DomainError.

pub mod ai;
pub mod console;
pub mod persistence;
pub mod ratelimit;
