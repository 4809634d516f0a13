//! Language-model extraction of structured orders from free-text summaries.

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::OpenAiExtractor;
pub use error::ExtractorError;
