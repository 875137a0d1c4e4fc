// src/core/mod.rs
pub mod completion;

pub use completion::{ChatMessage, Completion, CompletionClient};
