//! Photo-to-vocabulary helper for English learners
//!
//! Sends a photographed object to a hosted chat-completion model to obtain
//! vocabulary words, example sentences and conversation starters, and keeps
//! the words a learner chooses to save in a local store.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod practice;
pub mod prompts;
pub mod store;

pub use error::{Error, ErrorKind, Result};
