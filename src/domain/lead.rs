// ============================================================
// LEAD ROW TYPES
// ============================================================
// Business contact candidates and the provider answers merged into them

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::phone::{PhoneKey, PhoneNormalizer};

/// Source tag carried by rows that came from an uploaded CSV.
pub const CSV_SOURCE: &str = "CSV";

/// WhatsApp presence state of a lead row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// No validation attempt was made
    #[default]
    Unvalidated,
    /// An attempt was made but the provider had no definitive answer
    Unknown,
    Valid,
    Invalid,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Unvalidated => "unvalidated",
            ValidationStatus::Unknown => "unknown",
            ValidationStatus::Valid => "valid",
            ValidationStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status a provider can answer with. There is no `Unvalidated` here: a
/// missing answer is what leaves a row unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Valid,
    Invalid,
    Unknown,
}

impl ResultStatus {
    /// Parse a provider status string; anything unrecognised is `Unknown`.
    pub fn from_provider(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "valid" => ResultStatus::Valid,
            "invalid" => ResultStatus::Invalid,
            _ => ResultStatus::Unknown,
        }
    }
}

impl From<ResultStatus> for ValidationStatus {
    fn from(status: ResultStatus) -> Self {
        match status {
            ResultStatus::Valid => ValidationStatus::Valid,
            ResultStatus::Invalid => ValidationStatus::Invalid,
            ResultStatus::Unknown => ValidationStatus::Unknown,
        }
    }
}

/// One provider answer, keyed by the normalized phone it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub phone_key: PhoneKey,
    pub status: ResultStatus,
}

/// Key → answer lookup handed to the reconciler.
pub type ValidationOutcomes = HashMap<PhoneKey, ResultStatus>;

/// A single business contact candidate.
///
/// `phone_key` is derived from `phone_raw` at construction and cannot be
/// set on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadRow {
    pub name: String,
    phone_raw: String,
    phone_key: Option<PhoneKey>,
    pub address: String,
    pub source: String,
    validation_status: ValidationStatus,
}

impl LeadRow {
    pub fn new(
        name: impl Into<String>,
        phone_raw: impl Into<String>,
        normalizer: &PhoneNormalizer,
    ) -> Self {
        let phone_raw = phone_raw.into();
        let phone_key = normalizer.normalize(&phone_raw);
        Self {
            name: name.into(),
            phone_raw,
            phone_key,
            address: String::new(),
            source: String::new(),
            validation_status: ValidationStatus::Unvalidated,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Copy of this row carrying a different validation status.
    pub fn with_validation_status(mut self, status: ValidationStatus) -> Self {
        self.validation_status = status;
        self
    }

    pub fn phone_raw(&self) -> &str {
        &self.phone_raw
    }

    pub fn phone_key(&self) -> Option<&PhoneKey> {
        self.phone_key.as_ref()
    }

    pub fn validation_status(&self) -> ValidationStatus {
        self.validation_status
    }

    /// Phone as written to exports: the key when one exists, else the raw text.
    pub fn export_phone(&self) -> &str {
        self.phone_key
            .as_ref()
            .map(|k| k.as_str())
            .unwrap_or(&self.phone_raw)
    }
}

/// The row set held between workflow operations. Replaced wholesale by a
/// new search or import, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RowSet {
    rows: Vec<LeadRow>,
}

impl RowSet {
    pub fn new(rows: Vec<LeadRow>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[LeadRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LeadRow> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<LeadRow> {
        self.rows
    }

    /// Distinct phone keys in first-seen order. Rows without a key are skipped.
    pub fn phone_keys(&self) -> Vec<PhoneKey> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|row| row.phone_key())
            .filter(|key| seen.insert((*key).clone()))
            .cloned()
            .collect()
    }

    /// Count rows per validation status, in the order statuses first appear.
    pub fn status_counts(&self) -> Vec<(ValidationStatus, usize)> {
        let mut counts: Vec<(ValidationStatus, usize)> = Vec::new();
        for row in &self.rows {
            match counts.iter_mut().find(|(s, _)| *s == row.validation_status) {
                Some((_, n)) => *n += 1,
                None => counts.push((row.validation_status, 1)),
            }
        }
        counts
    }
}

impl FromIterator<LeadRow> for RowSet {
    fn from_iter<I: IntoIterator<Item = LeadRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a LeadRow;
    type IntoIter = std::slice::Iter<'a, LeadRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_row_derives_key_and_starts_unvalidated() {
        let row = LeadRow::new("Padaria X", "(41) 99999-0000", &PhoneNormalizer::default());
        assert_eq!(row.phone_raw(), "(41) 99999-0000");
        assert_eq!(row.phone_key().map(|k| k.as_str()), Some("+5541999990000"));
        assert_eq!(row.validation_status(), ValidationStatus::Unvalidated);
        assert_eq!(row.export_phone(), "+5541999990000");
    }

    #[test]
    fn test_export_phone_falls_back_to_raw() {
        let row = LeadRow::new("Sem telefone", "ligar depois", &PhoneNormalizer::default());
        assert!(row.phone_key().is_none());
        assert_eq!(row.export_phone(), "ligar depois");
    }

    #[test]
    fn test_provider_status_parsing() {
        assert_eq!(ResultStatus::from_provider("valid"), ResultStatus::Valid);
        assert_eq!(ResultStatus::from_provider(" INVALID "), ResultStatus::Invalid);
        assert_eq!(ResultStatus::from_provider("unknown"), ResultStatus::Unknown);
        assert_eq!(ResultStatus::from_provider("pending"), ResultStatus::Unknown);
        assert_eq!(ValidationStatus::from(ResultStatus::Valid), ValidationStatus::Valid);
    }

    #[test]
    fn test_phone_keys_are_distinct_in_first_seen_order() {
        let n = PhoneNormalizer::default();
        let rows = RowSet::new(vec![
            LeadRow::new("A", "41988887777", &n),
            LeadRow::new("B", "", &n),
            LeadRow::new("C", "(41) 99999-0000", &n),
            LeadRow::new("D", "+55 41 98888-7777", &n),
        ]);
        let keys: Vec<String> = rows.phone_keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["+5541988887777", "+5541999990000"]);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ValidationStatus::Unvalidated).unwrap();
        assert_eq!(json, "\"unvalidated\"");
    }
}
