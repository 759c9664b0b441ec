//! OpenAI-compatible chat completions client.
//!
//! Works against any endpoint speaking the `/chat/completions` protocol
//! (OpenAI, Azure, local gateways) via `OPENAI_BASE_URL`.

mod chat;
mod client;
mod config;

pub use client::OpenAI;
pub use config::OpenAIConfig;
