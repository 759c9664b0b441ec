//! One-shot model invocation and schema validation.

use std::collections::HashMap;

use tracing::debug;

use super::{IntentSchema, SYMBOL_FIELD, TradeIntent, normalize_symbol, parse_key_value_tags};
use crate::chat::{ChatRequest, SharedChatProvider};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::prompts::{PromptEngine, TemplateContext, templates};

/// Turns user text into a [`TradeIntent`] with a single model call.
///
/// There is no retry: a malformed or unhelpful response yields `None`.
#[derive(Debug)]
pub struct IntentExtractor {
    provider: SharedChatProvider,
    engine: PromptEngine,
    model: Option<String>,
    temperature: Option<f32>,
}

impl IntentExtractor {
    /// Create an extractor over `provider` with the provider's defaults.
    #[must_use]
    pub fn new(provider: SharedChatProvider) -> Self {
        Self {
            provider,
            engine: PromptEngine::new(),
            model: None,
            temperature: None,
        }
    }

    /// Apply model overrides from configuration.
    #[must_use]
    pub fn with_model_config(mut self, config: &ModelConfig) -> Self {
        self.model = config.model.clone().filter(|m| !m.is_empty());
        self.temperature = config.temperature;
        self
    }

    /// Render `template`, invoke the model once and validate against `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render or the model call
    /// fails. An unusable answer is `Ok(None)`.
    pub async fn extract(
        &self,
        template: &str,
        context: &TemplateContext,
        schema: &IntentSchema,
    ) -> Result<Option<TradeIntent>> {
        let Some(fields) = self.invoke(template, context).await? else {
            return Ok(None);
        };
        let intent = schema.accept(&fields);
        match &intent {
            Some(intent) => debug!(%intent, "intent accepted"),
            None => debug!(
                fields = ?fields.keys().collect::<Vec<_>>(),
                required = ?schema.required_fields(),
                "intent rejected",
            ),
        }
        Ok(intent)
    }

    /// Extract only an upper-cased stock symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails.
    pub async fn extract_symbol(&self, context: &TemplateContext) -> Result<Option<String>> {
        let Some(fields) = self.invoke(templates::STOCK_SYMBOL, context).await? else {
            return Ok(None);
        };
        if fields.contains_key(super::ERROR_FIELD) {
            return Ok(None);
        }
        Ok(fields
            .get(SYMBOL_FIELD)
            .map(|s| normalize_symbol(s))
            .filter(|s| !s.is_empty()))
    }

    async fn invoke(
        &self,
        template: &str,
        context: &TemplateContext,
    ) -> Result<Option<HashMap<String, String>>> {
        let prompt = self.engine.render(template, context)?;

        let model = self
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string());
        let mut request = ChatRequest::new(model).user(prompt);
        if let Some(temperature) = self.temperature {
            request = request.temperature(temperature);
        }

        debug!(
            provider = self.provider.provider_name(),
            model = %request.model,
            "invoking model for intent extraction",
        );
        let response = self.provider.chat(&request).await?;
        Ok(parse_key_value_tags(response.text()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::primitives::U256;

    use super::*;
    use crate::llms::{LlmError, MockProvider};

    const ACME_MINT: &str = "<response><stockSym>acme</stockSym><stockNum>5</stockNum><spendAmount>2</spendAmount></response>";

    #[tokio::test]
    async fn extracts_with_one_call() {
        let model = Arc::new(MockProvider::new([ACME_MINT]));
        let extractor = IntentExtractor::new(model.clone());

        let intent = extractor
            .extract(
                templates::MINT_WITH_NATIVE,
                &TemplateContext::new("Buy 5 shares of ACME using 2 AVAX"),
                &IntentSchema::MINT_WITH_NATIVE,
            )
            .await
            .expect("no failure")
            .expect("intent");

        assert_eq!(intent.symbol, "ACME");
        assert_eq!(intent.quantity, U256::from(5u64));
        assert_eq!(model.calls(), 1);

        let prompt = &model.requests()[0].messages[0].content;
        assert!(prompt.contains("Buy 5 shares of ACME using 2 AVAX"));
    }

    #[tokio::test]
    async fn error_sentinel_is_absent_intent() {
        let model = Arc::new(MockProvider::new([
            "<response><error>Not a stock buy request</error></response>",
        ]));
        let extractor = IntentExtractor::new(model.clone());

        let intent = extractor
            .extract(
                templates::MINT_WITH_NATIVE,
                &TemplateContext::new("what's the weather"),
                &IntentSchema::MINT_WITH_NATIVE,
            )
            .await
            .expect("no failure");
        assert!(intent.is_none());
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn model_failure_is_not_retried() {
        let model = Arc::new(MockProvider::failing(LlmError::transport("offline")));
        let extractor = IntentExtractor::new(model.clone());

        let result = extractor
            .extract(
                templates::REDEEM,
                &TemplateContext::new("sell 3 ACME"),
                &IntentSchema::REDEEM,
            )
            .await;
        assert!(result.is_err());
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn model_config_overrides_request() {
        let model = Arc::new(MockProvider::new(["<stockSym>nvda</stockSym>"]));
        let extractor = IntentExtractor::new(model.clone()).with_model_config(&ModelConfig {
            model: Some("gpt-4o".to_string()),
            temperature: Some(0.0),
        });

        let symbol = extractor
            .extract_symbol(&TemplateContext::new("how is nvidia doing"))
            .await
            .expect("no failure");
        assert_eq!(symbol.as_deref(), Some("NVDA"));

        let request = &model.requests()[0];
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.temperature, Some(0.0));
    }
}
