//! Language model backends.
//!
//! - [`openai`] - OpenAI-compatible chat completions over HTTP
//! - [`mock`] - scripted responses for tests

mod error;
pub mod mock;

#[cfg(feature = "openai")]
pub mod openai;

pub use error::LlmError;
pub use mock::MockProvider;

#[cfg(feature = "openai")]
pub use openai::{OpenAI, OpenAIConfig};
