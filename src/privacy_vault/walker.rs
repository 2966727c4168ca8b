// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Recursive traversal of nested data, tokenizing sensitive leaves

use indexmap::IndexMap;
use std::collections::BTreeMap;

use super::classifier::FieldClassifier;
use super::config::SensitivityCategory;
use super::tokenizer::Tokenizer;
use super::value::Value;
use super::vault::SessionVault;

/// Tokenized field observations per category
pub type FieldCounts = BTreeMap<SensitivityCategory, usize>;

/// Counts with every category present at zero
pub fn empty_counts() -> FieldCounts {
    SensitivityCategory::ALL
        .iter()
        .map(|category| (*category, 0))
        .collect()
}

/// Walks a `Value` tree and produces an isomorphic sanitized copy
///
/// Only map keys are classified. A map entry is tokenized when its key
/// classifies and its value is a non-blank string; every other value is
/// walked unchanged.
pub struct TreeWalker<'a> {
    classifier: &'a FieldClassifier,
    tokenizer: &'a Tokenizer,
}

impl<'a> TreeWalker<'a> {
    pub fn new(classifier: &'a FieldClassifier, tokenizer: &'a Tokenizer) -> Self {
        Self {
            classifier,
            tokenizer,
        }
    }

    pub fn walk(
        &self,
        node: &Value,
        vault: &mut SessionVault,
        counts: &mut FieldCounts,
        path: &str,
    ) -> Value {
        match node {
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => node.clone(),

            Value::Sequence(items) => Value::Sequence(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| self.walk(item, vault, counts, &format!("{}[{}]", path, idx)))
                    .collect(),
            ),

            Value::Map(map) => {
                let mut result: IndexMap<String, Value> = IndexMap::with_capacity(map.len());

                for (key, value) in map {
                    let field_path = format!("{}.{}", path, key);

                    let sensitive = self
                        .classifier
                        .classify(key)
                        .zip(value.as_str().filter(|s| !s.trim().is_empty()));

                    let new_value = match sensitive {
                        Some((category, text)) => {
                            let token = self.tokenizer.tokenize(text, category, &field_path, vault);
                            *counts.entry(category).or_insert(0) += 1;
                            Value::String(token)
                        }
                        None => self.walk(value, vault, counts, &field_path),
                    };

                    result.insert(key.clone(), new_value);
                }

                Value::Map(result)
            }
        }
    }
}
