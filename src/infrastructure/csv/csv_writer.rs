// ============================================================
// LEAD CSV WRITER
// ============================================================
// Serialize lead rows into the export format

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::error::{AppError, Result};
use crate::domain::lead::LeadRow;

/// Fixed export header.
pub const EXPORT_HEADER: [&str; 5] = ["name", "phone_e164", "wa_status", "address", "source"];

/// Writes rows as `name,phone_e164,wa_status,address,source`.
///
/// A field is quoted only when it contains a comma, a double quote or a
/// line break (`\n` or `\r`); inner quotes are doubled. Every line,
/// including the last, ends with `\n`.
#[derive(Debug, Default)]
pub struct LeadCsvWriter;

impl LeadCsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_rows<'a, I>(&self, rows: I) -> Result<String>
    where
        I: IntoIterator<Item = &'a LeadRow>,
    {
        let mut writer = WriterBuilder::new()
            .delimiter(b',')
            .quote_style(QuoteStyle::Necessary)
            .double_quote(true)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(EXPORT_HEADER).map_err(write_error)?;
        for row in rows {
            let status = row.validation_status();
            writer
                .write_record([
                    row.name.as_str(),
                    row.export_phone(),
                    status.as_str(),
                    row.address.as_str(),
                    row.source.as_str(),
                ])
                .map_err(write_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::IoError(format!("Failed to flush CSV: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::ParseError(format!("CSV output is not UTF-8: {}", e)))
    }
}

fn write_error(e: csv::Error) -> AppError {
    AppError::IoError(format!("Failed to write CSV row: {}", e))
}

/// File name for a download, e.g. `leads_1729300000000.csv`.
pub fn export_file_name(now: chrono::DateTime<chrono::Utc>) -> String {
    format!("leads_{}.csv", now.timestamp_millis())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::phone::PhoneNormalizer;
    use crate::infrastructure::csv::LeadCsvParser;
    use proptest::prelude::*;

    /// Field text free of commas, quotes and line breaks.
    const PLAIN_FIELD: &str = "[A-Za-z0-9 .()/-]{0,16}";

    fn arb_phone() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "[1-9][0-9]{9,10}",
            "\\(?[1-9][0-9]\\)? ?9?[0-9]{4}-?[0-9]{4}",
            "\\+[1-9][0-9]{7,13}",
            "[a-z ]{1,10}",
        ]
    }

    fn arb_rows() -> impl Strategy<Value = Vec<LeadRow>> {
        prop::collection::vec((PLAIN_FIELD, arb_phone(), PLAIN_FIELD), 1..10).prop_map(|rows| {
            let normalizer = PhoneNormalizer::default();
            rows.into_iter()
                .map(|(name, phone, address)| {
                    LeadRow::new(name, phone, &normalizer).with_address(address)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn plain_rows_survive_export_and_import(rows in arb_rows()) {
            let csv = LeadCsvWriter::new().write_rows(&rows).unwrap();
            let import = LeadCsvParser::default().parse_content(&csv);

            prop_assert!(import.is_ok(), "{:?}", import.problem);
            prop_assert_eq!(import.rows.len(), rows.len());
            for (written, parsed) in rows.iter().zip(import.rows.iter()) {
                prop_assert_eq!(&parsed.name, &written.name);
                prop_assert_eq!(parsed.phone_key(), written.phone_key());
                prop_assert_eq!(&parsed.address, &written.address);
            }
        }
    }
}
