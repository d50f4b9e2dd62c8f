//! Flat codec entry points used by the read and write paths

use crate::{NdefError, encoder, parser, record::NdefRecord};

pub use encoder::{encode_message, text_record};
pub use parser::parse_message;

/// Decode a well-known text payload into its string
pub fn decode_text_payload(payload: &[u8]) -> Result<String, NdefError> {
    parser::decode_text_payload(payload).map(|text| text.text)
}

/// Lowercase hex, no separators
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Encode a single english text record as a complete message
pub fn encode_text(text: &str) -> Result<Vec<u8>, NdefError> {
    encode_message(&[text_record(text)])
}

/// Decode the text of the first record, if it is a text record
pub fn first_text(records: &[NdefRecord]) -> Option<Result<String, NdefError>> {
    let first = records.first()?;
    if !first.is_text() {
        return None;
    }

    Some(decode_text_payload(&first.payload))
}
