use crate::{
    NdefError,
    header::NdefHeader,
    ndef_type::NdefType,
    payload::{RTD_TEXT, RTD_URI, abbreviate_uri},
    record::NdefRecord,
};

/// Language used for text records unless the caller picks one
pub const DEFAULT_LANGUAGE: &str = "en";

const MAX_LANGUAGE_CODE_LENGTH: usize = 0x3F;
const MAX_SHORT_PAYLOAD_LENGTH: usize = u8::MAX as usize;

/// Serialize records into one NDEF message
pub fn encode_message(records: &[NdefRecord]) -> Result<Vec<u8>, NdefError> {
    if records.is_empty() {
        return Err(NdefError::EmptyMessage);
    }

    let last = records.len() - 1;
    let mut bytes = Vec::with_capacity(records.iter().map(encoded_len).sum());

    for (index, record) in records.iter().enumerate() {
        encode_record(&mut bytes, record, index == 0, index == last)?;
    }

    Ok(bytes)
}

/// Well-known text record, UTF-8 in english
pub fn text_record(text: &str) -> NdefRecord {
    build_text_record(text, DEFAULT_LANGUAGE)
}

/// Well-known text record, UTF-8 with the given IANA language code
pub fn text_record_with_language(text: &str, language: &str) -> Result<NdefRecord, NdefError> {
    if language.len() > MAX_LANGUAGE_CODE_LENGTH {
        return Err(NdefError::LanguageCodeTooLong(language.len() as u32));
    }

    Ok(build_text_record(text, language))
}

/// Well-known URI record, with the prefix abbreviated
pub fn uri_record(uri: &str) -> NdefRecord {
    let (code, rest) = abbreviate_uri(uri);

    let mut payload = Vec::with_capacity(1 + rest.len());
    payload.push(code);
    payload.extend_from_slice(rest.as_bytes());

    NdefRecord::new(NdefType::WellKnown, RTD_URI.to_vec(), payload)
}

pub fn mime_record(mime_type: &str, data: Vec<u8>) -> NdefRecord {
    NdefRecord::new(NdefType::Mime, mime_type.as_bytes().to_vec(), data)
}

fn build_text_record(text: &str, language: &str) -> NdefRecord {
    let mut payload = Vec::with_capacity(1 + language.len() + text.len());
    payload.push(language.len() as u8);
    payload.extend_from_slice(language.as_bytes());
    payload.extend_from_slice(text.as_bytes());

    NdefRecord::new(NdefType::WellKnown, RTD_TEXT.to_vec(), payload)
}

fn encoded_len(record: &NdefRecord) -> usize {
    let payload_length_size = if record.payload.len() <= MAX_SHORT_PAYLOAD_LENGTH { 1 } else { 4 };
    let id_length_size = usize::from(record.id.is_some());
    let id_len = record.id.as_ref().map(Vec::len).unwrap_or_default();

    2 + payload_length_size + id_length_size + record.type_.len() + id_len + record.payload.len()
}

fn encode_record(
    bytes: &mut Vec<u8>,
    record: &NdefRecord,
    message_begin: bool,
    message_end: bool,
) -> Result<(), NdefError> {
    let type_length = checked_len("type", record.type_.len(), u8::MAX as u64)? as u8;
    let id_length = record
        .id
        .as_ref()
        .map(|id| checked_len("id", id.len(), u8::MAX as u64).map(|len| len as u8))
        .transpose()?;
    let payload_length = checked_len("payload", record.payload.len(), u32::MAX as u64)? as u32;

    let header = NdefHeader {
        message_begin,
        message_end,
        chunked: false,
        short_record: record.payload.len() <= MAX_SHORT_PAYLOAD_LENGTH,
        has_id_length: id_length.is_some(),
        type_name_format: record.type_name_format,
        type_length,
        payload_length,
        id_length,
    };

    bytes.push(header.flags_byte());
    bytes.push(header.type_length);

    if header.short_record {
        bytes.push(header.payload_length as u8);
    } else {
        bytes.extend_from_slice(&header.payload_length.to_be_bytes());
    }

    if let Some(id_length) = header.id_length {
        bytes.push(id_length);
    }

    bytes.extend_from_slice(&record.type_);
    if let Some(id) = &record.id {
        bytes.extend_from_slice(id);
    }
    bytes.extend_from_slice(&record.payload);

    Ok(())
}

fn checked_len(field: &str, len: usize, max: u64) -> Result<u64, NdefError> {
    let len = len as u64;
    if len > max {
        return Err(NdefError::FieldTooLong {
            field: field.to_string(),
            max,
            actual: len,
        });
    }

    Ok(len)
}
