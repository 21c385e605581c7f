//! Mock AI adapter for testing without API calls.
//!
//! Returns hardcoded responses for development and testing purposes.

use crate::domain::DomainError;
use crate::ports::AiPort;
use std::time::Duration;
use tracing::info;

/// Mock AI adapter for testing.
///
/// Returns predetermined responses without making API calls.
/// Simulates network latency with configurable delay.
pub struct MockAiAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockAiAdapter {
    /// Create a new mock adapter with default delay (100ms).
    pub fn new() -> Self {
        Self { delay_ms: 100 }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }
}

impl Default for MockAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AiPort for MockAiAdapter {
    async fn reply(&self, prompt: &str, context: &str) -> Result<String, DomainError> {
        info!(
            prompt_len = prompt.len(),
            context_len = context.len(),
            "[MOCK] Simulating AI reply"
        );

        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        let context_note = if context.trim().is_empty() {
            "tanpa konteks jadwal".to_string()
        } else {
            format!("dengan {} baris konteks jadwal", context.lines().count())
        };

        Ok(format!(
            "[MOCK] Balasan simulasi untuk \"{}\" ({}). Atur API key AI untuk \
             jawaban sungguhan.",
            prompt.chars().take(80).collect::<String>(),
            context_note
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_adapter() {
        let adapter = MockAiAdapter::with_delay(10);

        let reply = adapter
            .reply("besok ada kelas apa?", "Senin | 08:00 | kuliah AI")
            .await
            .unwrap();

        assert!(reply.starts_with("[MOCK]"));
        assert!(reply.contains("besok ada kelas apa?"));
        assert!(reply.contains("1 baris"));
    }

    #[tokio::test]
    async fn test_mock_adapter_without_context() {
        let adapter = MockAiAdapter::with_delay(10);

        let reply = adapter.reply("halo", "").await.unwrap();

        assert!(reply.contains("tanpa konteks jadwal"));
    }
}
