uniffi::setup_scaffolding!();

pub mod codec;
pub mod encoder;
pub mod ffi;
pub mod hardware;
pub mod header;
pub mod ndef_type;
pub mod parser;
pub mod payload;
pub mod record;
pub mod session;
pub mod tag;
pub mod tlv;

pub use hardware::{NfcHardware, NfcHardwareAccess, NfcTech, RawTag};
pub use record::NdefRecord;
pub use session::{NdefSession, with_ndef_async};
pub use tag::{ReadResult, TagInfo, TagSnapshot};

/// Prompt shown by the native side while waiting for a tag, when the caller gives none
pub const DEFAULT_ALERT_MESSAGE: &str = "Hold your device near an NFC tag";

/// Errors surfaced by the NFC hardware and the scoped session
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum NfcError {
    #[error("NFC not supported")]
    UnsupportedHardware,

    #[error("NFC disabled")]
    RadioDisabled,

    #[error("NFC hardware manager is not initialized")]
    NotInitialized,

    /// The reader could not be acquired: no tag presented, timeout or user cancellation
    #[error("unable to acquire NFC session: {0}")]
    HardwareUnavailable(String),

    #[error("NFC operation failed: {0}")]
    OperationFailure(String),
}

/// Errors from encoding or decoding NDEF data
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum NdefError {
    #[error("not enough data to parse the NDEF message")]
    NotEnoughData,

    #[error("error parsing the NDEF message: {0}")]
    ParsingError(String),

    #[error("record is not a well-known text record")]
    NotTextRecord,

    #[error("invalid text payload: {0}")]
    InvalidTextPayload(String),

    #[error("language code too long, max 63 bytes, found {0}")]
    LanguageCodeTooLong(u32),

    #[error("{field} too long, max {max} bytes, found {actual}")]
    FieldTooLong {
        field: String,
        max: u64,
        actual: u64,
    },

    #[error("an NDEF message needs at least one record")]
    EmptyMessage,
}

impl From<NdefError> for NfcError {
    fn from(error: NdefError) -> Self {
        NfcError::OperationFailure(error.to_string())
    }
}
