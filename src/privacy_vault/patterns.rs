// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Field-name tables for sensitive field detection
// Patterns are normalized once at first use

use once_cell::sync::Lazy;

use super::config::SensitivityCategory;

/// Normalize a field name: lower-case, keep only `[a-z0-9]`
pub fn normalize(field_name: &str) -> String {
    field_name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Category with its normalized field-name patterns
#[derive(Debug, Clone)]
pub struct CategoryPatterns {
    pub category: SensitivityCategory,
    pub patterns: Vec<String>,
}

type PatternDef = (SensitivityCategory, &'static [&'static str]);

// Order matters: the first category with a matching pattern wins
const FIELD_PATTERN_DEFS: &[PatternDef] = &[
    (
        SensitivityCategory::Name,
        &[
            "name", "firstname", "first_name", "lastname", "last_name",
            "contactname", "contact_name", "companyname", "company_name",
            "displayname", "display_name", "fullname", "full_name",
            "payeename", "payee_name", "payername", "payer_name",
            "vendorname", "vendor_name", "suppliername", "supplier_name",
            "directorname", "director_name", "creditorname", "creditor_name",
            "legal_name", "legalname", "trading_name", "tradingname",
            "practitioner_name", "practitionername", "firm_name", "firmname",
            "signer_name", "signername",
        ],
    ),
    (
        SensitivityCategory::Address,
        &[
            "address", "addressline", "address_line", "street", "streetaddress",
            "street_address", "city", "suburb", "state", "postcode", "postalcode",
            "postal_code", "zipcode", "zip_code", "country",
            "deliveryaddress", "delivery_address", "postaladdress", "postal_address",
            "firm_address", "firmaddress",
        ],
    ),
    (
        SensitivityCategory::Email,
        &[
            "email", "emailaddress", "email_address",
            "contact_email", "contactemail",
            "firm_email", "firmemail",
        ],
    ),
    (
        SensitivityCategory::Phone,
        &[
            "phone", "phonenumber", "phone_number", "mobile", "mobilenumber",
            "mobile_number", "fax", "faxnumber", "fax_number", "telephone",
            "contact_phone", "contactphone",
            "firm_phone", "firmphone",
        ],
    ),
    (
        SensitivityCategory::BusinessNumber,
        &["abn", "acn", "businessnumber", "business_number"],
    ),
    (
        SensitivityCategory::BankAccount,
        &[
            "bankaccount", "bank_account", "accountnumber", "account_number",
            "bsb", "routingnumber", "routing_number", "iban",
            "swiftcode", "swift_code",
        ],
    ),
    (
        SensitivityCategory::TaxNumber,
        &[
            "tfn", "taxfilenumber", "tax_file_number",
            "vatnumber", "vat_number",
        ],
    ),
];

/// Structural fields that are never tokenized, even when they contain a
/// sensitive keyword (`account_code` contains "account").
const FIELD_ALLOWLIST_DEFS: &[&str] = &[
    "account_code", "accountcode",
    "account_name", "accountname",
    "source", "external_id", "externalid",
    "id", "company_id", "companyid",
    "transaction_type", "transactiontype",
    "status", "currency", "reference",
    "category", "description",
    "notes", "reason",
];

/// Normalized category patterns in classification order
pub static FIELD_PATTERNS: Lazy<Vec<CategoryPatterns>> = Lazy::new(|| {
    FIELD_PATTERN_DEFS
        .iter()
        .map(|(category, patterns)| {
            let mut normalized: Vec<String> = Vec::with_capacity(patterns.len());
            for pattern in patterns.iter() {
                let pattern = normalize(pattern);
                if !normalized.contains(&pattern) {
                    normalized.push(pattern);
                }
            }
            CategoryPatterns {
                category: *category,
                patterns: normalized,
            }
        })
        .collect()
});

/// Allow-list entries, both as written and normalized
pub static FIELD_ALLOWLIST: Lazy<Vec<String>> = Lazy::new(|| {
    let mut allowlist: Vec<String> = Vec::new();
    for entry in FIELD_ALLOWLIST_DEFS {
        for form in [entry.to_string(), normalize(entry)] {
            if !allowlist.contains(&form) {
                allowlist.push(form);
            }
        }
    }
    allowlist
});
