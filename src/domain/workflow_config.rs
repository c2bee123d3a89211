use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

static COUNTRY_CODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,4}$").unwrap());

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
pub const DEFAULT_TOTAL: u32 = 50;

/// Settings for one lead workflow. A single `auto_validate` flag covers the
/// manual and automatic validation flows.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
#[serde(default)]
pub struct WorkflowConfig {
    #[validate(url)]
    pub api_base: String,
    pub auto_validate: bool,
    #[serde(deserialize_with = "deserialize_country_code")]
    #[validate(regex(path = *COUNTRY_CODE_PATTERN, message = "country code must be 1 to 4 digits"))]
    pub default_country_code: String,
    #[validate(range(min = 1, max = 1000))]
    pub default_total: u32,
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

/// Accept the country code as text or as a bare number. TOML `55` and an
/// env value of `351` both arrive as integers.
fn deserialize_country_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct CountryCodeVisitor;

    impl<'de> de::Visitor<'de> for CountryCodeVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a country calling code as digits or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.trim().to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            self.visit_str(&v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(CountryCodeVisitor)
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            auto_validate: false,
            default_country_code: super::phone::DEFAULT_COUNTRY_CODE.to_string(),
            default_total: DEFAULT_TOTAL,
            request_timeout_secs: 120,
        }
    }
}

impl WorkflowConfig {
    /// Backend address with trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(WorkflowConfig::default().validate().is_ok());
    }

    #[test]
    fn test_endpoint_strips_trailing_slashes() {
        let config = WorkflowConfig {
            api_base: "https://leads.example.com///".to_string(),
            ..WorkflowConfig::default()
        };
        assert_eq!(config.endpoint("/api/run"), "https://leads.example.com/api/run");
        assert_eq!(config.endpoint("api/status"), "https://leads.example.com/api/status");
    }

    #[test]
    fn test_rejects_relative_base_and_zero_total() {
        let config = WorkflowConfig {
            api_base: "/api".to_string(),
            default_total: 0,
            ..WorkflowConfig::default()
        };
        let errors = config.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("api_base"));
        assert!(fields.contains_key("default_total"));
    }

    #[test]
    fn test_country_code_must_be_digits() {
        for bad in ["ab", "+351", "", "12345"] {
            let config = WorkflowConfig {
                default_country_code: bad.to_string(),
                ..WorkflowConfig::default()
            };
            let errors = config.validate().unwrap_err();
            assert!(
                errors.field_errors().contains_key("default_country_code"),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_country_code_reads_numbers_and_text() {
        let from_number: WorkflowConfig =
            serde_json::from_str(r#"{"default_country_code": 351}"#).unwrap();
        assert_eq!(from_number.default_country_code, "351");

        let from_text: WorkflowConfig =
            serde_json::from_str(r#"{"default_country_code": " 1 "}"#).unwrap();
        assert_eq!(from_text.default_country_code, "1");
    }
}
