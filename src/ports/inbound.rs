//! Inbound port. The chat-facing adapter calls into the application.

use crate::domain::DomainError;

/// Input port: the chat adapter feeds inbound messages to the application.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the inbound message loop until the transport closes.
    async fn run(&self) -> Result<(), DomainError>;
}
