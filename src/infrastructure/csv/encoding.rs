use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::debug;

/// Decode uploaded bytes as UTF-8, dropping a byte-order mark. Files that
/// are not valid UTF-8 (spreadsheet exports on Windows, typically) are
/// read as Windows-1252 instead.
pub fn decode_upload(bytes: &[u8]) -> String {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }

    debug!("Upload is not valid UTF-8, decoding as Windows-1252");
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}
