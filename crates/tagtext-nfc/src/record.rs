use crate::{
    NdefError,
    ndef_type::NdefType,
    parser,
    payload::{NdefPayload, RTD_TEXT, RTD_URI, TextPayload},
};

/// A single NDEF record, immutable once built or parsed
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct NdefRecord {
    pub type_name_format: NdefType,
    pub type_: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

impl NdefRecord {
    pub fn new(type_name_format: NdefType, type_: Vec<u8>, payload: Vec<u8>) -> Self {
        Self {
            type_name_format,
            type_,
            id: None,
            payload,
        }
    }

    pub fn with_id(mut self, id: Vec<u8>) -> Self {
        self.id = Some(id);
        self
    }

    /// Well-known `T` record
    pub fn is_text(&self) -> bool {
        self.type_name_format == NdefType::WellKnown && self.type_ == RTD_TEXT
    }

    /// Well-known `U` record
    pub fn is_uri(&self) -> bool {
        self.type_name_format == NdefType::WellKnown && self.type_ == RTD_URI
    }

    pub fn text(&self) -> Result<TextPayload, NdefError> {
        if !self.is_text() {
            return Err(NdefError::NotTextRecord);
        }

        parser::decode_text_payload(&self.payload)
    }

    /// Interpret the payload by record type, anything that fails to decode is returned as data
    pub fn payload(&self) -> NdefPayload {
        if self.is_text() {
            if let Ok(text) = parser::decode_text_payload(&self.payload) {
                return NdefPayload::Text(text);
            }
        }

        if self.is_uri() {
            if let Ok(uri) = parser::decode_uri_payload(&self.payload) {
                return NdefPayload::Uri(uri);
            }
        }

        NdefPayload::Data(self.payload.clone())
    }

    pub fn type_string(&self) -> Option<String> {
        String::from_utf8(self.type_.clone()).ok()
    }
}

// only used for uniffi
mod ffi {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
    pub struct NdefRecordReader {
        record: NdefRecord,
    }

    #[uniffi::export]
    impl NdefRecordReader {
        #[uniffi::constructor]
        pub fn new(record: NdefRecord) -> Self {
            Self { record }
        }

        pub fn type_(&self) -> Option<String> {
            self.record.type_string()
        }

        pub fn id(&self) -> Option<String> {
            let id = self.record.id.as_ref()?;
            String::from_utf8(id.clone()).ok()
        }

        pub fn is_text(&self) -> bool {
            self.record.is_text()
        }

        pub fn payload(&self) -> NdefPayload {
            self.record.payload()
        }
    }
}
