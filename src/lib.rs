//! jadwalbot: bilingual class-assistant bot with Hexagonal Architecture.
//!
//! The interpreter module is the core: deterministic, pattern-based intent
//! extraction. Everything stateful (store, chat, AI) sits behind ports.

pub mod adapters;
pub mod domain;
pub mod interpreter;
pub mod ports;
pub mod shared;
pub mod usecases;
