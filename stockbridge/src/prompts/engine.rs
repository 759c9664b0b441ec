//! Template rendering with minijinja.

use std::collections::BTreeMap;

use minijinja::{Environment, Value};

use crate::error::Result;

/// Variables available to a prompt template.
///
/// - `user_message` - the raw user text
/// - `agent_name` - display name of the agent, if any
/// - `native_symbol` - ticker of the native-settlement network's gas token
/// - anything added with [`with_var`](Self::with_var)
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    user_message: String,
    agent_name: Option<String>,
    native_symbol: Option<String>,
    extra: BTreeMap<String, Value>,
}

impl TemplateContext {
    /// Create a context around the user's text.
    #[must_use]
    pub fn new(user_message: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            ..Self::default()
        }
    }

    /// Set the agent display name.
    #[must_use]
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = Some(name.into());
        self
    }

    /// Set the native token ticker.
    #[must_use]
    pub fn with_native_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.native_symbol = Some(symbol.into());
        self
    }

    /// Add a custom variable.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The user's text.
    #[must_use]
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    // Unset fields stay undefined so `default(...)` applies.
    fn to_value(&self) -> Value {
        let mut vars = self.extra.clone();
        vars.insert("user_message".into(), Value::from(self.user_message.as_str()));
        if let Some(name) = &self.agent_name {
            vars.insert("agent_name".into(), Value::from(name.as_str()));
        }
        if let Some(symbol) = &self.native_symbol {
            vars.insert("native_symbol".into(), Value::from(symbol.as_str()));
        }
        Value::from_serialize(&vars)
    }
}

/// Jinja2-compatible prompt renderer.
#[derive(Debug)]
pub struct PromptEngine {
    env: Environment<'static>,
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptEngine {
    /// Create an engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        Self { env }
    }

    /// Render `template` with `context`.
    ///
    /// # Errors
    ///
    /// Returns a prompt error if the template syntax is invalid or
    /// rendering fails.
    pub fn render(&self, template: &str, context: &TemplateContext) -> Result<String> {
        let tmpl = self.env.template_from_str(template)?;
        Ok(tmpl.render(context.to_value())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn user_text_is_inserted_verbatim() {
        let engine = PromptEngine::new();
        let ctx = TemplateContext::new(r#"buy "ACME" <now> & later"#);
        let out = engine
            .render("User message: \"{{ user_message }}\"", &ctx)
            .expect("renders");
        assert_eq!(out, r#"User message: "buy "ACME" <now> & later""#);
    }

    #[test]
    fn optional_fields_and_extras() {
        let engine = PromptEngine::new();
        let ctx = TemplateContext::new("hi")
            .with_agent_name("Stockbridge")
            .with_var("network", "avalancheFuji");
        let out = engine
            .render(
                "{{ agent_name }}/{{ network }}/{{ native_symbol | default('ETH') }}",
                &ctx,
            )
            .expect("renders");
        assert_eq!(out, "Stockbridge/avalancheFuji/ETH");
    }

    #[test]
    fn syntax_errors_are_prompt_errors() {
        let err = PromptEngine::new()
            .render("{% if %}", &TemplateContext::new("x"))
            .expect_err("invalid");
        assert!(matches!(err, Error::Prompt(_)));
    }
}
