//! Prompt templates for intent extraction.
//!
//! Each trading action has a fixed template with one substitution point
//! for the user's text. Templates are Jinja2 syntax rendered by
//! [`PromptEngine`] against a [`TemplateContext`].
//!
//! # Example
//!
//! ```rust,ignore
//! use stockbridge::prompts::{PromptEngine, TemplateContext, templates};
//!
//! let context = TemplateContext::new("Buy 5 shares of ACME using 2 AVAX")
//!     .with_native_symbol("AVAX");
//! let prompt = PromptEngine::new().render(templates::MINT_WITH_NATIVE, &context)?;
//! ```

mod engine;
pub mod templates;

pub use engine::{PromptEngine, TemplateContext};
