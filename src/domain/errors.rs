//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Chat gateway error: {0}")]
    Gateway(String),

    #[error("AI backend error: {0}")]
    Ai(String),

    #[error("Config error: {0}")]
    Config(String),
}
