//! Flat `<key>value</key>` extraction from model output.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z][A-Za-z0-9_-]*)>").expect("valid regex"));

static RESPONSE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<response>(.*?)</response>").expect("valid regex"));

/// Extract the flat tag pairs of a model response.
///
/// Only the first `<response>` block is read when one exists, otherwise
/// the whole text. Values are trimmed and entity-unescaped; a value that
/// itself contains markup is ignored. The first occurrence of a key wins.
/// Returns `None` when no pair is found.
#[must_use]
pub fn parse_key_value_tags(text: &str) -> Option<HashMap<String, String>> {
    let body = RESPONSE_BLOCK
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or(text, |m| m.as_str());

    let mut fields = HashMap::new();
    for open in OPEN_TAG.captures_iter(body) {
        let (Some(whole), Some(name)) = (open.get(0), open.get(1)) else {
            continue;
        };
        let name = name.as_str();
        if name == "response" {
            continue;
        }

        let rest = &body[whole.end()..];
        let Some(close) = rest.find(&format!("</{name}>")) else {
            continue;
        };
        let raw = &rest[..close];
        if raw.contains('<') {
            continue;
        }

        fields
            .entry(name.to_string())
            .or_insert_with(|| unescape(raw.trim()));
    }

    (!fields.is_empty()).then_some(fields)
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_the_response_block() {
        let text = "Sure!\n<response>\n<stockSym> acme </stockSym>\n<stockNum>5</stockNum>\n<spendAmount>2</spendAmount>\n</response>\nanything else";
        let fields = parse_key_value_tags(text).expect("fields");

        assert_eq!(fields.len(), 3);
        assert_eq!(fields["stockSym"], "acme");
        assert_eq!(fields["stockNum"], "5");
        assert_eq!(fields["spendAmount"], "2");
    }

    #[test]
    fn falls_back_to_whole_text() {
        let fields = parse_key_value_tags("<error>Not a stock buy request</error>").expect("fields");
        assert_eq!(fields["error"], "Not a stock buy request");
    }

    #[test]
    fn unescapes_entities() {
        let fields = parse_key_value_tags("<response><stockSym>AT&amp;T</stockSym></response>")
            .expect("fields");
        assert_eq!(fields["stockSym"], "AT&T");
    }

    #[test]
    fn mismatched_and_nested_tags_are_skipped() {
        assert!(parse_key_value_tags("<a>1</b>").is_none());

        let fields = parse_key_value_tags("<outer><stockNum>7</stockNum></outer>").expect("fields");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["stockNum"], "7");
    }

    #[test]
    fn plain_text_has_no_fields() {
        assert!(parse_key_value_tags("I can't help with that.").is_none());
        assert!(parse_key_value_tags("").is_none());
    }
}
