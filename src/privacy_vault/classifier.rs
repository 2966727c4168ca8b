// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Field classification: structural field name -> sensitivity category

use super::config::SensitivityCategory;
use super::patterns::{normalize, FIELD_ALLOWLIST, FIELD_PATTERNS};

/// Maps field names to sensitivity categories
///
/// Stateless apart from the caller-supplied extra field names, which are
/// normalized once at construction. Classification is deterministic and
/// side-effect free.
#[derive(Debug, Clone, Default)]
pub struct FieldClassifier {
    extra_fields: Vec<String>,
}

impl FieldClassifier {
    /// Create a classifier with additional sensitive field-name substrings
    pub fn new<S: AsRef<str>>(extra_sensitive_fields: &[S]) -> Self {
        let mut extra_fields: Vec<String> = Vec::new();
        for field in extra_sensitive_fields {
            let normalized = normalize(field.as_ref());
            // An empty needle would match every field
            if !normalized.is_empty() && !extra_fields.contains(&normalized) {
                extra_fields.push(normalized);
            }
        }
        Self { extra_fields }
    }

    /// Classify a field name, or `None` when it is not sensitive
    pub fn classify(&self, field_name: &str) -> Option<SensitivityCategory> {
        let lower = field_name.to_lowercase();
        let normalized = normalize(&lower);

        if is_allowlisted(&lower, &normalized) {
            return None;
        }

        if self
            .extra_fields
            .iter()
            .any(|extra| normalized.contains(extra.as_str()))
        {
            return Some(SensitivityCategory::Name);
        }

        FIELD_PATTERNS
            .iter()
            .find(|entry| {
                entry
                    .patterns
                    .iter()
                    .any(|pattern| normalized.contains(pattern.as_str()))
            })
            .map(|entry| entry.category)
    }
}

fn is_allowlisted(lower: &str, normalized: &str) -> bool {
    FIELD_ALLOWLIST
        .iter()
        .any(|entry| entry == lower || entry == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(field: &str) -> Option<SensitivityCategory> {
        FieldClassifier::default().classify(field)
    }

    #[test]
    fn test_classify_names() {
        assert_eq!(classify("Name"), Some(SensitivityCategory::Name));
        assert_eq!(classify("first_name"), Some(SensitivityCategory::Name));
        assert_eq!(classify("ContactName"), Some(SensitivityCategory::Name));
        assert_eq!(classify("supplier-name"), Some(SensitivityCategory::Name));
    }

    #[test]
    fn test_classify_each_category() {
        assert_eq!(classify("street"), Some(SensitivityCategory::Address));
        assert_eq!(classify("City"), Some(SensitivityCategory::Address));
        assert_eq!(classify("email"), Some(SensitivityCategory::Email));
        assert_eq!(classify("contact_phone"), Some(SensitivityCategory::Phone));
        assert_eq!(classify("MobileNumber"), Some(SensitivityCategory::Phone));
        assert_eq!(classify("ABN"), Some(SensitivityCategory::BusinessNumber));
        assert_eq!(classify("bsb"), Some(SensitivityCategory::BankAccount));
        assert_eq!(classify("account_number"), Some(SensitivityCategory::BankAccount));
        assert_eq!(classify("tax_file_number"), Some(SensitivityCategory::TaxNumber));
        assert_eq!(classify("VATNumber"), Some(SensitivityCategory::TaxNumber));
    }

    #[test]
    fn test_allowlist_wins_over_patterns() {
        assert_eq!(classify("account_code"), None);
        assert_eq!(classify("AccountCode"), None);
        assert_eq!(classify("account_name"), None);
        assert_eq!(classify("id"), None);
        assert_eq!(classify("status"), None);
    }

    #[test]
    fn test_non_sensitive_fields() {
        assert_eq!(classify("amount"), None);
        assert_eq!(classify("date"), None);
        assert_eq!(classify("line_items"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_first_category_wins() {
        // "emailaddress" contains "address", and Address precedes Email
        assert_eq!(classify("EmailAddress"), Some(SensitivityCategory::Address));
    }

    #[test]
    fn test_substring_matching_is_broad() {
        // Known false positive: "state" matches inside unrelated names
        assert_eq!(
            classify("state_machine_status"),
            Some(SensitivityCategory::Address)
        );
    }

    #[test]
    fn test_extra_fields_classified_as_name() {
        let classifier = FieldClassifier::new(&["Beneficiary", "trustee_ref"]);
        assert_eq!(
            classifier.classify("beneficiary_label"),
            Some(SensitivityCategory::Name)
        );
        assert_eq!(classifier.classify("TrusteeRef"), Some(SensitivityCategory::Name));
        assert_eq!(classifier.classify("amount"), None);
    }

    #[test]
    fn test_extra_fields_do_not_override_allowlist() {
        let classifier = FieldClassifier::new(&["notes"]);
        assert_eq!(classifier.classify("notes"), None);
        assert_eq!(
            classifier.classify("private_notes"),
            Some(SensitivityCategory::Name)
        );
    }

    #[test]
    fn test_empty_extra_field_ignored() {
        let classifier = FieldClassifier::new(&["", "--"]);
        assert_eq!(classifier.classify("amount"), None);
    }
}
