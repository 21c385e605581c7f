//! Console adapter: a line-oriented chat front-end over stdin/stdout.
//!
//! Stands in for a real chat platform. Every stdin line is one inbound
//! message; replies and announcements are printed to stdout.

use crate::domain::DomainError;
use crate::ports::{ChatGateway, InputPort};
use crate::usecases::ChatService;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

/// ChatGateway that prints to stdout.
pub struct ConsoleGateway;

#[async_trait::async_trait]
impl ChatGateway for ConsoleGateway {
    async fn send_user(&self, user_id: i64, text: &str) -> Result<(), DomainError> {
        println!("[dm → {}] {}", user_id, text);
        Ok(())
    }

    async fn send_channel(&self, channel_id: i64, text: &str) -> Result<(), DomainError> {
        println!("[channel {}] {}", channel_id, text);
        Ok(())
    }
}

/// Reads stdin lines and feeds them through the chat service.
pub struct ConsoleInput {
    chat: Arc<ChatService>,
    user_id: i64,
    is_admin: bool,
}

impl ConsoleInput {
    pub fn new(chat: Arc<ChatService>, user_id: i64, is_admin: bool) -> Self {
        Self {
            chat,
            user_id,
            is_admin,
        }
    }
}

#[async_trait::async_trait]
impl InputPort for ConsoleInput {
    async fn run(&self) -> Result<(), DomainError> {
        info!(user_id = self.user_id, "console input loop started, ctrl-d to exit");
        println!("Ketik pesan (ctrl-d untuk keluar):");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = lines
                .next_line()
                .await
                .map_err(|e| DomainError::Gateway(format!("stdin read failed: {}", e)))?;
            let Some(line) = line else {
                info!("stdin closed, shutting down input loop");
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }

            match self
                .chat
                .handle_message(self.user_id, self.is_admin, &line)
                .await
            {
                Ok(replies) => {
                    for reply in replies {
                        println!("{}", reply);
                    }
                }
                Err(e) => {
                    error!(error = %e, "message handling failed");
                    println!("⚠️ Terjadi kesalahan, coba lagi nanti.");
                }
            }
        }
    }
}
