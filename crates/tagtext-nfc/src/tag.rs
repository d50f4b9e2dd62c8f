use tagtext_util::{NOT_AVAILABLE, or_not_available};

use crate::{NdefError, codec, record::NdefRecord};

const UNKNOWN_TYPE: &str = "Unknown";

/// Tag as presented by the reader, never mutated after it is created
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct TagSnapshot {
    pub id: Option<Vec<u8>>,
    pub tech_types: Vec<String>,
    pub records: Vec<NdefRecord>,
}

impl TagSnapshot {
    pub fn new(id: Option<Vec<u8>>, tech_types: Vec<String>, records: Vec<NdefRecord>) -> Self {
        Self {
            id,
            tech_types,
            records,
        }
    }

    /// Build a snapshot from the raw NDEF message bytes read off the tag
    ///
    /// A missing or empty message is a tag without NDEF data, not an error
    pub fn parse(
        id: Option<Vec<u8>>,
        tech_types: Vec<String>,
        ndef_message: Option<&[u8]>,
    ) -> Result<Self, NdefError> {
        let records = match ndef_message {
            Some(bytes) if !bytes.is_empty() => codec::parse_message(bytes)?,
            _ => Vec::new(),
        };

        Ok(Self::new(id, tech_types, records))
    }

    pub fn has_ndef_data(&self) -> bool {
        !self.records.is_empty()
    }
}

/// What the read path shows for a scanned tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Enum, derive_more::Display)]
pub enum ReadResult {
    #[display("No NDEF data.")]
    NoData,

    #[display("{_0}")]
    Text(String),

    /// Lowercase hex of the first record's payload
    #[display("Raw payload: {_0}")]
    Raw(String),
}

impl ReadResult {
    pub fn from_tag(tag: &TagSnapshot) -> Self {
        let Some(first) = tag.records.first() else {
            return Self::NoData;
        };

        match codec::first_text(&tag.records) {
            Some(Ok(text)) => Self::Text(text),
            Some(Err(error)) => {
                tracing::debug!("text record could not be decoded, showing raw: {error}");
                Self::Raw(codec::bytes_to_hex(&first.payload))
            }
            None => Self::Raw(codec::bytes_to_hex(&first.payload)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct TagInfo {
    pub id: String,
    pub tech_types: String,
    pub records: Vec<RecordInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct RecordInfo {
    pub type_: String,
    pub payload: String,
}

impl TagInfo {
    pub fn from_tag(tag: &TagSnapshot) -> Self {
        let id = tag
            .id
            .as_deref()
            .map(codec::bytes_to_hex)
            .unwrap_or_default();

        Self {
            id: or_not_available(id),
            tech_types: or_not_available(tag.tech_types.join(", ")),
            records: tag.records.iter().map(RecordInfo::from_record).collect(),
        }
    }
}

impl RecordInfo {
    pub fn from_record(record: &NdefRecord) -> Self {
        let type_ = if record.type_.is_empty() {
            UNKNOWN_TYPE.to_string()
        } else {
            String::from_utf8_lossy(&record.type_).to_string()
        };

        let payload = if record.payload.is_empty() {
            NOT_AVAILABLE.to_string()
        } else if record.is_text() {
            codec::decode_text_payload(&record.payload)
                .unwrap_or_else(|_| codec::bytes_to_hex(&record.payload))
        } else {
            codec::bytes_to_hex(&record.payload)
        };

        Self { type_, payload }
    }
}
