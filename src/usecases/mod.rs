//! Application use cases. Orchestrate domain logic via ports.

pub mod announcer;
pub mod chat_service;
pub mod command_service;
pub mod reminder_worker;

pub use announcer::Announcer;
pub use chat_service::ChatService;
pub use command_service::CommandService;
pub use reminder_worker::ReminderWorker;
