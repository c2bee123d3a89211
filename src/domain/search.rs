use serde::{Deserialize, Serialize};
use validator::Validate;

use super::error::{AppError, Result};
use super::lead::ResultStatus;

/// Body of a lead search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    pub segment: String,
    #[validate(range(min = 1))]
    pub total: u32,
}

impl SearchRequest {
    /// Build a request from user input. City and segment are trimmed; an
    /// empty city is rejected.
    pub fn new(city: &str, segment: &str, total: u32) -> Result<Self> {
        let request = Self {
            city: city.trim().to_string(),
            segment: segment.trim().to_string(),
            total,
        };
        request.validate().map_err(|e| {
            AppError::ValidationInputError(format!("Invalid search request: {}", e))
        })?;
        Ok(request)
    }
}

/// A lead as returned by the search endpoint, after field precedence has
/// been resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLead {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub source: String,
}

/// Successful search answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub rows: Vec<RemoteLead>,
    /// Count reported by the backend; falls back to the number of rows.
    pub total: usize,
    /// Server-rendered export, when the backend provides one.
    pub csv: Option<String>,
}

/// One entry of a validation answer, before its number is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationAnswer {
    pub number: String,
    pub status: ResultStatus,
}

/// Backend capabilities as reported by the status endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendStatus {
    #[serde(default)]
    pub validation_provider: Option<String>,
    #[serde(default)]
    pub search_mode: Option<String>,
    #[serde(default)]
    pub has_places: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims_input() {
        let request = SearchRequest::new("  Curitiba ", " padaria ", 2).unwrap();
        assert_eq!(request.city, "Curitiba");
        assert_eq!(request.segment, "padaria");
        assert_eq!(request.total, 2);
    }

    #[test]
    fn test_blank_city_is_rejected() {
        let err = SearchRequest::new("   ", "padaria", 50).unwrap_err();
        assert!(matches!(err, AppError::ValidationInputError(_)));
        assert!(err.message().contains("city"));
    }

    #[test]
    fn test_status_reads_camel_case() {
        let status: BackendStatus = serde_json::from_str(
            r#"{"validationProvider":"uaz","searchMode":"places","hasPlaces":true}"#,
        )
        .unwrap();
        assert_eq!(status.validation_provider.as_deref(), Some("uaz"));
        assert_eq!(status.search_mode.as_deref(), Some("places"));
        assert_eq!(status.has_places, Some(true));

        let partial: BackendStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(partial, BackendStatus::default());
    }
}
