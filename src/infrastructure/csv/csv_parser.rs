// ============================================================
// LEAD CSV PARSER
// ============================================================
// Turn an uploaded CSV into lead rows, locating columns by header name

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::domain::error::AppError;
use crate::domain::lead::{LeadRow, RowSet, CSV_SOURCE};
use crate::domain::phone::PhoneNormalizer;

/// Header names tried, in order, for each imported field.
const NAME_HEADERS: &[&str] = &["name"];
const PHONE_HEADERS: &[&str] = &["phone", "phone_e164"];
const ADDRESS_HEADERS: &[&str] = &["address"];

/// Result of importing a CSV upload.
///
/// Import problems are reported here instead of as an `Err`: the caller
/// gets an empty row set and a message it can show to whoever uploaded
/// the file.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvImport {
    pub rows: RowSet,
    pub problem: Option<AppError>,
}

impl CsvImport {
    fn loaded(rows: RowSet) -> Self {
        Self {
            rows,
            problem: None,
        }
    }

    fn rejected(message: String) -> Self {
        Self {
            rows: RowSet::empty(),
            problem: Some(AppError::ParseError(message)),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.problem.is_none()
    }

    /// Human-readable summary of the import.
    pub fn message(&self) -> String {
        match &self.problem {
            Some(problem) => problem.message().to_string(),
            None => format!("{} rows loaded.", self.rows.len()),
        }
    }
}

/// Column positions resolved from the header line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ColumnMap {
    name: Option<usize>,
    phone: Option<usize>,
    address: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> Self {
        let names: Vec<String> = header
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let find = |candidates: &[&str]| {
            candidates
                .iter()
                .find_map(|candidate| names.iter().position(|n| n == candidate))
        };
        Self {
            name: find(NAME_HEADERS),
            phone: find(PHONE_HEADERS),
            address: find(ADDRESS_HEADERS),
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.address.is_none()
    }

    fn get<'r>(record: &'r StringRecord, idx: Option<usize>) -> &'r str {
        idx.and_then(|i| record.get(i)).unwrap_or("")
    }
}

/// Naive CSV importer for lead uploads.
///
/// Fields are split on the delimiter without any quote handling, so a
/// quoted field containing the delimiter is split in two. Exports written
/// by [`super::LeadCsvWriter`] only re-import exactly when no field
/// contains the delimiter, a quote or a line break.
pub struct LeadCsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
    normalizer: PhoneNormalizer,
}

impl Default for LeadCsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            normalizer: PhoneNormalizer::default(),
        }
    }
}

impl LeadCsvParser {
    pub fn new(normalizer: PhoneNormalizer) -> Self {
        Self {
            normalizer,
            ..Self::default()
        }
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse CSV text into lead rows tagged with the CSV source.
    pub fn parse_content(&self, content: &str) -> CsvImport {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quoting(false)
            .has_headers(false)
            .flexible(true)
            .trim(Trim::None)
            .from_reader(content.as_bytes());

        let mut records = reader.records();

        let header = loop {
            match records.next() {
                Some(Ok(record)) if is_blank(&record) => continue,
                Some(Ok(record)) => break record,
                Some(Err(e)) => {
                    return CsvImport::rejected(format!("Failed to read CSV header: {}", e))
                }
                None => return CsvImport::rejected("CSV file is empty.".to_string()),
            }
        };

        let columns = ColumnMap::from_header(&header);
        if columns.is_empty() {
            warn!(header = ?header, "CSV header has no known columns");
            return CsvImport::rejected(
                "CSV header must contain at least one of: name, phone, address.".to_string(),
            );
        }
        debug!(?columns, "CSV columns resolved");

        let mut rows = Vec::new();
        for (index, result) in records.enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    return CsvImport::rejected(format!(
                        "Failed to parse CSV row {}: {}",
                        index + 1,
                        e
                    ))
                }
            };
            if is_blank(&record) {
                continue;
            }
            rows.push(self.parse_row(&columns, &record));
        }

        if rows.is_empty() {
            return CsvImport::rejected("CSV file has no data rows.".to_string());
        }

        CsvImport::loaded(RowSet::new(rows))
    }

    fn parse_row(&self, columns: &ColumnMap, record: &StringRecord) -> LeadRow {
        LeadRow::new(
            ColumnMap::get(record, columns.name),
            ColumnMap::get(record, columns.phone),
            &self.normalizer,
        )
        .with_address(ColumnMap::get(record, columns.address))
        .with_source(CSV_SOURCE)
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() == 0 || (record.len() == 1 && record[0].is_empty())
}
