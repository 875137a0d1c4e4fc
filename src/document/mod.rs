// src/document/mod.rs
//! Markdown document rendering for pipeline outputs.

pub mod letter;
pub mod resume;
