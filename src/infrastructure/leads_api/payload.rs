// ============================================================
// BACKEND PAYLOAD MAPPING
// ============================================================
// The backend is loose about field names. Every alias is resolved here,
// once, with a fixed precedence per payload type.

use serde_json::Value;

use crate::domain::error::{AppError, Result};
use crate::domain::lead::ResultStatus;
use crate::domain::search::{RemoteLead, SearchPage, ValidationAnswer};

/// Phone of a search row.
pub const ROW_PHONE_FIELDS: &[&str] = &["phone_e164", "phone"];
/// Message of a failed response.
pub const ERROR_FIELDS: &[&str] = &["detail", "error"];
/// Number a validation result refers to.
pub const RESULT_NUMBER_FIELDS: &[&str] = &["e164", "raw"];

/// First field in `fields` holding a non-empty string or a number.
fn first_text(value: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| match value.get(*field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn text(value: &Value, field: &str) -> String {
    first_text(value, &[field]).unwrap_or_default()
}

/// Message carried by an error payload, if any.
pub fn error_message(body: &Value) -> Option<String> {
    first_text(body, ERROR_FIELDS)
}

/// Error for a non-2xx transport status. The body message wins when present.
pub fn http_failure(status: u16, body: Option<&Value>) -> AppError {
    let message = body
        .and_then(error_message)
        .unwrap_or_else(|| format!("Backend returned HTTP {}", status));
    AppError::RemoteError(message)
}

fn ensure_ok(body: &Value, operation: &str) -> Result<()> {
    if body.get("ok").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }
    Err(AppError::RemoteError(
        error_message(body).unwrap_or_else(|| format!("{} failed", operation)),
    ))
}

fn array<'v>(body: &'v Value, field: &str, operation: &str) -> Result<&'v Vec<Value>> {
    body.get(field).and_then(Value::as_array).ok_or_else(|| {
        AppError::RemoteError(format!(
            "Invalid {} response: missing {} array",
            operation, field
        ))
    })
}

/// Map a search response body.
pub fn parse_search_payload(body: &Value) -> Result<SearchPage> {
    ensure_ok(body, "Search")?;
    let rows: Vec<RemoteLead> = array(body, "rows", "search")?
        .iter()
        .map(|row| RemoteLead {
            name: text(row, "name"),
            phone: first_text(row, ROW_PHONE_FIELDS).unwrap_or_default(),
            address: text(row, "address"),
            source: text(row, "source"),
        })
        .collect();

    let total = body
        .get("total")
        .and_then(Value::as_u64)
        .map(|t| t as usize)
        .unwrap_or(rows.len());
    let csv = body
        .get("csv")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(SearchPage { rows, total, csv })
}

/// Map a validation response body. Entries without any number are dropped.
pub fn parse_validation_payload(body: &Value) -> Result<Vec<ValidationAnswer>> {
    ensure_ok(body, "Validation")?;
    let answers = array(body, "results", "validation")?
        .iter()
        .filter_map(|result| {
            let number = first_text(result, RESULT_NUMBER_FIELDS)?;
            let status = result
                .get("status")
                .and_then(Value::as_str)
                .map(ResultStatus::from_provider)
                .unwrap_or(ResultStatus::Unknown);
            Some(ValidationAnswer { number, status })
        })
        .collect();
    Ok(answers)
}
