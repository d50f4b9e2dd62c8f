use crate::{
    NdefError, codec, encoder,
    hardware::RawTag,
    record::NdefRecord,
    tag::{ReadResult, TagInfo, TagSnapshot},
    tlv,
};

#[uniffi::export]
fn ndef_decode_text_payload(payload: Vec<u8>) -> Result<String, NdefError> {
    codec::decode_text_payload(&payload)
}

#[uniffi::export]
fn ndef_encode_message(records: Vec<NdefRecord>) -> Result<Vec<u8>, NdefError> {
    codec::encode_message(&records)
}

#[uniffi::export]
fn ndef_parse_message(message: Vec<u8>) -> Result<Vec<NdefRecord>, NdefError> {
    codec::parse_message(&message)
}

#[uniffi::export]
fn ndef_text_record(text: String) -> NdefRecord {
    codec::text_record(&text)
}

#[uniffi::export]
fn ndef_text_record_with_language(text: String, language: String) -> Result<NdefRecord, NdefError> {
    encoder::text_record_with_language(&text, &language)
}

#[uniffi::export]
fn ndef_uri_record(uri: String) -> NdefRecord {
    encoder::uri_record(&uri)
}

#[uniffi::export]
fn ndef_mime_record(mime_type: String, data: Vec<u8>) -> NdefRecord {
    encoder::mime_record(&mime_type, data)
}

#[uniffi::export]
fn ndef_bytes_to_hex(bytes: Vec<u8>) -> String {
    codec::bytes_to_hex(&bytes)
}

#[uniffi::export]
fn ndef_tlv_wrap_message(message: Vec<u8>) -> Result<Vec<u8>, NdefError> {
    tlv::wrap_message(&message)
}

#[uniffi::export]
fn ndef_tlv_find_message(memory: Vec<u8>) -> Result<Option<Vec<u8>>, NdefError> {
    tlv::find_message(&memory)
}

#[uniffi::export]
fn tag_snapshot_from_raw(raw: RawTag) -> Result<TagSnapshot, NdefError> {
    TagSnapshot::parse(raw.id, raw.tech_types, raw.ndef_message.as_deref())
}

#[uniffi::export]
fn tag_read_result(tag: TagSnapshot) -> ReadResult {
    ReadResult::from_tag(&tag)
}

#[uniffi::export]
fn read_result_to_string(result: ReadResult) -> String {
    result.to_string()
}

#[uniffi::export]
fn tag_info(tag: TagSnapshot) -> TagInfo {
    TagInfo::from_tag(&tag)
}
