// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Re-identification: swap tokens in analysis output back to original values

use indexmap::IndexMap;
use regex::{Captures, Regex, RegexBuilder};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::info;

use super::error::VaultResult;
use super::store::VaultStore;
use super::value::Value;

// Large vaults produce one alternation branch per token
const MATCHER_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Replaces every token occurrence in a string with its original value
///
/// All tokens are compiled into one alternation ordered longest-first, so at
/// any position the longest token wins (`ENTITY_12` is never read as
/// `ENTITY_1` followed by `2`). Each string is scanned once, left to right;
/// inserted originals are never rescanned.
#[derive(Debug, Clone)]
pub struct TokenReplacer {
    matcher: Option<Regex>,
    originals: HashMap<String, String>,
}

impl TokenReplacer {
    /// Build a replacer from (token, original) pairs
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Matcher` if the token alternation cannot be compiled.
    pub fn new<'a, I>(pairs: I) -> VaultResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut pairs: Vec<(&str, &str)> = pairs
            .into_iter()
            .filter(|(token, _)| !token.is_empty())
            .collect();
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
        pairs.dedup_by(|a, b| a.0 == b.0);

        if pairs.is_empty() {
            return Ok(Self {
                matcher: None,
                originals: HashMap::new(),
            });
        }

        let alternation = pairs
            .iter()
            .map(|(token, _)| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");
        let matcher = RegexBuilder::new(&alternation)
            .size_limit(MATCHER_SIZE_LIMIT)
            .build()?;

        let originals = pairs
            .into_iter()
            .map(|(token, original)| (token.to_string(), original.to_string()))
            .collect();

        Ok(Self {
            matcher: Some(matcher),
            originals,
        })
    }

    /// Replace tokens in one string (zero-copy when nothing matches)
    pub fn replace_str<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let Some(matcher) = &self.matcher else {
            return Cow::Borrowed(text);
        };

        matcher.replace_all(text, |caps: &Captures<'_>| {
            let token = &caps[0];
            self.originals
                .get(token)
                .cloned()
                .unwrap_or_else(|| token.to_string())
        })
    }

    /// Walk any value shape, replacing tokens inside every string value
    ///
    /// Map keys are left as they are.
    pub fn replace(&self, node: &Value) -> Value {
        match node {
            Value::String(text) => Value::String(self.replace_str(text).into_owned()),
            Value::Sequence(items) => {
                Value::Sequence(items.iter().map(|item| self.replace(item)).collect())
            }
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), self.replace(value)))
                    .collect::<IndexMap<String, Value>>(),
            ),
            Value::Null | Value::Bool(_) | Value::Number(_) => node.clone(),
        }
    }

    pub fn token_count(&self) -> usize {
        self.originals.len()
    }
}

/// Restore original values in `output` using the vault `vault_id`
///
/// With `destroy_after` the vault is taken out of the store before
/// substitution, so of several concurrent calls on one id only one succeeds
/// and every later call fails with `NotFound`. A matcher build failure still
/// consumes the vault in that mode. Pass `false` to keep the vault for
/// further passes.
///
/// # Errors
///
/// `VaultError::NotFound` if the vault is absent, `VaultError::Expired` if its
/// TTL elapsed (the vault is removed), `VaultError::Matcher` if the token
/// matcher cannot be built.
pub fn re_identify(
    store: &VaultStore,
    output: &Value,
    vault_id: &str,
    destroy_after: bool,
) -> VaultResult<Value> {
    let vault = if destroy_after {
        store.take(vault_id)?
    } else {
        store.checkout(vault_id)?
    };
    let replacer = TokenReplacer::new(vault.token_pairs())?;

    let result = replacer.replace(output);

    info!(
        tokens = replacer.token_count(),
        vault_id,
        destroyed = destroy_after,
        "Re-identified tokens from privacy vault"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn replacer(pairs: &[(&str, &str)]) -> TokenReplacer {
        TokenReplacer::new(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_exact_and_embedded_tokens() {
        let r = replacer(&[("ENTITY_001", "Acme Pty Ltd"), ("EMAIL_002", "ap@acme.test")]);

        assert_eq!(r.replace_str("ENTITY_001"), "Acme Pty Ltd");
        assert_eq!(
            r.replace_str("ENTITY_001 (EMAIL_002) owes ENTITY_001 nothing"),
            "Acme Pty Ltd (ap@acme.test) owes Acme Pty Ltd nothing"
        );
    }

    #[test]
    fn test_shared_prefix_tokens() {
        let r = replacer(&[("ENTITY_1", "Alice"), ("ENTITY_12", "Bob")]);

        assert_eq!(
            r.replace_str("...ENTITY_12 contacted ENTITY_1..."),
            "...Bob contacted Alice..."
        );
        assert_eq!(r.replace_str("ENTITY_12ENTITY_1"), "BobAlice");
    }

    #[test]
    fn test_order_of_pairs_irrelevant() {
        let a = replacer(&[("ENTITY_1", "Alice"), ("ENTITY_12", "Bob")]);
        let b = replacer(&[("ENTITY_12", "Bob"), ("ENTITY_1", "Alice")]);
        let text = "ENTITY_1, ENTITY_12, ENTITY_123";
        assert_eq!(a.replace_str(text), b.replace_str(text));
        assert_eq!(a.replace_str(text), "Alice, Bob, Bob3");
    }

    #[test]
    fn test_originals_not_rescanned() {
        let r = replacer(&[("ENTITY_001", "see ENTITY_002"), ("ENTITY_002", "Bob")]);
        assert_eq!(r.replace_str("ENTITY_001"), "see ENTITY_002");
    }

    #[test]
    fn test_regex_metacharacters_escaped() {
        let r = replacer(&[("[TOKEN.1]", "x")]);
        assert_eq!(r.replace_str("a [TOKEN.1] b [TOKENx1]"), "a x b [TOKENx1]");
    }

    #[test]
    fn test_no_match_borrows() {
        let r = replacer(&[("ENTITY_001", "Alice")]);
        assert!(matches!(r.replace_str("nothing here"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_empty_replacer() {
        let r = replacer(&[]);
        assert_eq!(r.token_count(), 0);
        assert!(matches!(r.replace_str("ENTITY_001"), Cow::Borrowed("ENTITY_001")));
    }

    #[test]
    fn test_replace_nested_value() {
        let r = replacer(&[("ENTITY_001", "Acme"), ("PHONE_002", "0400 111 222")]);
        let output = Value::from(json!({
            "summary": "ENTITY_001 is insolvent",
            "ENTITY_001": ["PHONE_002", 3, null, {"contact": "PHONE_002"}],
            "score": 0.9,
        }));

        let restored = serde_json::Value::from(r.replace(&output));

        assert_eq!(
            restored,
            json!({
                "summary": "Acme is insolvent",
                "ENTITY_001": ["0400 111 222", 3, null, {"contact": "0400 111 222"}],
                "score": 0.9,
            })
        );
    }
}
