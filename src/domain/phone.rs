// ============================================================
// PHONE KEY NORMALIZATION
// ============================================================
// Reduce scraped or uploaded phone strings to the E.164 key the
// validation provider echoes back, so both sides join on one form.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

static NON_DIGIT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D+").unwrap());

/// Subscriber number lengths (area code included) accepted as national.
const NATIONAL_LENGTHS: RangeInclusive<usize> = 10..=11;

pub const DEFAULT_COUNTRY_CODE: &str = "55";

/// Normalized phone value used to join lead rows with validation results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneKey(String);

impl PhoneKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNormalizer {
    country_code: String,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }
}

impl PhoneNormalizer {
    /// Create a normalizer that prefixes national numbers with `country_code`.
    /// Non-digit characters in the code are ignored.
    pub fn new(country_code: &str) -> Self {
        let digits = NON_DIGIT_PATTERN.replace_all(country_code, "").to_string();
        if digits.is_empty() {
            return Self::default();
        }
        Self {
            country_code: digits,
        }
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Normalize a raw phone string into its E.164 key.
    ///
    /// Returns `None` when the input carries no digits at all. Normalizing
    /// an existing key yields the same key.
    pub fn normalize(&self, raw: &str) -> Option<PhoneKey> {
        let trimmed = raw.trim();
        let digits = NON_DIGIT_PATTERN.replace_all(trimmed, "");
        if digits.is_empty() {
            return None;
        }

        if trimmed.starts_with('+') {
            return Some(Self::key(&digits));
        }

        if let Some(international) = digits.strip_prefix("00") {
            if international.is_empty() {
                return None;
            }
            return Some(Self::key(international));
        }

        let national = match digits.strip_prefix('0') {
            Some(rest) if NATIONAL_LENGTHS.contains(&rest.len()) => rest,
            _ => &*digits,
        };
        if NATIONAL_LENGTHS.contains(&national.len()) {
            return Some(Self::key(&format!("{}{}", self.country_code, national)));
        }

        // Anything else is taken as already carrying its country code.
        Some(Self::key(&digits))
    }

    fn key(digits: &str) -> PhoneKey {
        PhoneKey(format!("+{}", digits))
    }
}

/// Normalize with the default country code.
pub fn normalize_phone(raw: &str) -> Option<PhoneKey> {
    PhoneNormalizer::default().normalize(raw)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_separator() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just(""),
            Just(""),
            Just(" "),
            Just("-"),
            Just("("),
            Just(") "),
            Just("."),
        ]
    }

    /// A digit string and the same digits written with display separators.
    fn arb_phone_variant() -> impl Strategy<Value = (String, String)> {
        (any::<bool>(), "[0-9]{1,15}").prop_flat_map(|(plus, digits)| {
            let len = digits.len();
            prop::collection::vec(arb_separator(), len..=len).prop_map(move |seps| {
                let prefix = if plus { "+" } else { "" };
                let mut display = prefix.to_string();
                for (sep, digit) in seps.iter().zip(digits.chars()) {
                    display.push_str(sep);
                    display.push(digit);
                }
                (format!("{}{}", prefix, digits), display)
            })
        })
    }

    proptest! {
        #[test]
        fn display_variants_share_a_key((plain, display) in arb_phone_variant()) {
            let normalizer = PhoneNormalizer::default();
            prop_assert_eq!(normalizer.normalize(&display), normalizer.normalize(&plain));
        }

        #[test]
        fn normalizing_a_key_is_a_no_op((_, display) in arb_phone_variant(), code in "[1-9][0-9]{0,3}") {
            let normalizer = PhoneNormalizer::new(&code);
            if let Some(key) = normalizer.normalize(&display) {
                prop_assert_eq!(normalizer.normalize(key.as_str()), Some(key.clone()));
            }
        }
    }
}
