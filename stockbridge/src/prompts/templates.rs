//! Built-in extraction templates.
//!
//! Every template asks for a flat `<response>` block with one tag per
//! field, or a single `<error>` tag when the message is not the kind of
//! request the action handles.

/// Buy with the native token: symbol, share count, native spend amount.
pub const MINT_WITH_NATIVE: &str = r#"Extract the stock name, provide its official stock symbol, the number of shares the user wants to buy, and the {{ native_symbol | default("AVAX") }} amount the user wants to spend, from the user's message. In <spendAmount> keep only the amount, no token symbol.

User message: "{{ user_message }}"

Return in this format:
<response>
<stockSym>STOCK_SYMBOL</stockSym>
<stockNum>STOCK_NUM</stockNum>
<spendAmount>amount_{{ native_symbol | default("AVAX") }}</spendAmount>
</response>

If no stock is mentioned or it's not a stock buying inquiry, return:
<response>
<error>Not a stock buy request</error>
</response>"#;

/// Sell: symbol and share count.
pub const REDEEM: &str = r#"Extract the stock name, provide its official stock symbol, and the number of shares the user wants to sell, from the user's message.

User message: "{{ user_message }}"

Return in this format:
<response>
<stockSym>STOCK_SYMBOL</stockSym>
<stockNum>STOCK_NUM</stockNum>
</response>

If no stock is mentioned or it's not a stock selling intent, return:
<response>
<error>Not a stock sell request</error>
</response>"#;

/// Buy with the stablecoin on another network: symbol, share count, USDC amount.
pub const MINT_WITH_STABLECOIN: &str = r#"Extract the stock name, provide its official stock symbol, the number of shares the user wants to buy, and the USDC amount the user wants to use for the purchase. In <spendAmount> keep only the amount, no token symbol.

User message: "{{ user_message }}"

Return in this format:
<response>
<stockSym>STOCK_SYMBOL</stockSym>
<stockNum>STOCK_NUM</stockNum>
<spendAmount>amount_USDC</spendAmount>
</response>

If no stock with USDC is mentioned or it's not a stock buying inquiry using USDC, return:
<response>
<error>Not a stock buy request using usdc</error>
</response>"#;

/// Price lookup: symbol only.
pub const STOCK_SYMBOL: &str = r#"Extract the stock name and provide its official stock symbol from the user's message.

User message: "{{ user_message }}"

Return in this format:
<response>
<stockSym>STOCK_SYMBOL</stockSym>
</response>

If no stock is mentioned or it's not a stock inquiry, return:
<response>
<error>Not a stock related request</error>
</response>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::{PromptEngine, TemplateContext};

    #[test]
    fn every_template_renders_the_message_once() {
        let engine = PromptEngine::new();
        for template in [MINT_WITH_NATIVE, REDEEM, MINT_WITH_STABLECOIN, STOCK_SYMBOL] {
            let out = engine
                .render(template, &TemplateContext::new("sell 3 ACME"))
                .expect("renders");
            assert_eq!(out.matches("sell 3 ACME").count(), 1);
            assert!(out.contains("<error>"));
        }
    }

    #[test]
    fn native_symbol_follows_the_network() {
        let engine = PromptEngine::new();
        let fuji = engine
            .render(MINT_WITH_NATIVE, &TemplateContext::new("x"))
            .expect("renders");
        assert!(fuji.contains("amount_AVAX"));

        let sepolia = engine
            .render(
                MINT_WITH_NATIVE,
                &TemplateContext::new("x").with_native_symbol("ETH"),
            )
            .expect("renders");
        assert!(sepolia.contains("amount_ETH"));
        assert!(!sepolia.contains("AVAX"));
    }
}
