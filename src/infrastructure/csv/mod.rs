// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Lead CSV import, export and upload decoding

mod csv_parser;
mod csv_writer;
mod encoding;

pub use csv_parser::{CsvImport, LeadCsvParser};
pub use csv_writer::{export_file_name, LeadCsvWriter, EXPORT_HEADER};
pub use encoding::decode_upload;
