// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Property tests for tokenization and re-identification

use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

use privacy_vault::{
    DeIdentifier, DeIdentifierConfig, FieldClassifier, StoreConfig, TokenReplacer, Value,
    VaultStore,
};

fn engine(config: DeIdentifierConfig) -> DeIdentifier {
    let store = Arc::new(VaultStore::new(&StoreConfig::default()).unwrap());
    DeIdentifier::new(config, store)
}

fn original_value() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9@.]{0,15}( [A-Za-z0-9]{1,10})?"
}

fn contact() -> impl Strategy<Value = (String, String, i64)> {
    (original_value(), original_value(), any::<i64>())
}

fn records(contacts: &[(String, String, i64)]) -> Value {
    Value::from(json!(contacts
        .iter()
        .map(|(name, email, amount)| json!({
            "id": amount.to_string(),
            "name": name,
            "details": {"email": email, "amount": amount},
        }))
        .collect::<Vec<_>>()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_restores_records(contacts in prop::collection::vec(contact(), 0..20)) {
        let engine = engine(DeIdentifierConfig::default());
        let data = records(&contacts);

        let result = engine.de_identify(&data);
        let restored = engine
            .re_identify(&result.sanitized_data, &result.vault_id, false)
            .unwrap();

        prop_assert_eq!(restored, data);
    }

    #[test]
    fn prop_same_original_same_token(name in original_value(), copies in 2usize..6) {
        let engine = engine(DeIdentifierConfig::default());
        let contacts: Vec<(String, String, i64)> = (0..copies)
            .map(|i| (name.clone(), format!("user{}@example.test", i), i as i64))
            .collect();

        let result = engine.de_identify(&records(&contacts));
        let items = result.sanitized_data.as_sequence().unwrap();

        let first = items[0].get("name").cloned();
        for item in items {
            prop_assert_eq!(item.get("name").cloned(), first.clone());
        }
    }

    #[test]
    fn prop_sanitized_output_hides_originals(contacts in prop::collection::vec(contact(), 1..10)) {
        let engine = engine(DeIdentifierConfig::default());
        let result = engine.de_identify(&records(&contacts));

        let vault = engine.store().get(&result.vault_id).unwrap();
        for (item, (name, _, _)) in result.sanitized_data.as_sequence().unwrap().iter().zip(&contacts) {
            let token = item.get("name").and_then(Value::as_str).unwrap();
            prop_assert_ne!(token, name.as_str());
            prop_assert_eq!(vault.entry(token).map(|e| e.original.as_str()), Some(name.as_str()));
        }
    }

    #[test]
    fn prop_redact_sentinel_is_uniform(contacts in prop::collection::vec(contact(), 1..10)) {
        let engine = engine(DeIdentifierConfig::default().with_redact_mode(true));
        let result = engine.de_identify(&records(&contacts));

        for item in result.sanitized_data.as_sequence().unwrap() {
            prop_assert_eq!(item.get("name").and_then(Value::as_str), Some("[REDACTED]"));
        }
        prop_assert!(engine.store().get(&result.vault_id).unwrap().is_empty());
    }

    #[test]
    fn prop_classification_is_deterministic(field in "[A-Za-z_]{0,24}") {
        let classifier = FieldClassifier::default();
        prop_assert_eq!(classifier.classify(&field), classifier.classify(&field));
    }

    #[test]
    fn prop_replacement_never_splits_longer_tokens(a in 1u32..200, b in 1u32..200) {
        let short = format!("ENTITY_{}", a);
        let long = format!("ENTITY_{}{}", a, b);
        let pairs = [(short.as_str(), "Alice"), (long.as_str(), "Bob")];

        let text = format!("{} contacted {}", long, short);
        let replacer = TokenReplacer::new(pairs).unwrap();
        let restored = replacer.replace_str(&text).into_owned();

        prop_assert_eq!(restored, "Bob contacted Alice");
    }
}
