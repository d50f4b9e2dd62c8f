#[cfg(test)]
pub(crate) mod fake;

use std::{
    fmt::Debug,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tracing::{debug, info};

use crate::{NfcError, tag::TagSnapshot};

/// Tag technologies the reader can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum, derive_more::Display)]
pub enum NfcTech {
    Ndef,
    NfcA,
    NfcB,
    NfcF,
    NfcV,
    IsoDep,
    MifareClassic,
    MifareUltralight,
    NdefFormatable,
}

/// Tag exactly as the platform reader hands it over, before any NDEF parsing
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, uniffi::Record)]
pub struct RawTag {
    pub id: Option<Vec<u8>>,
    pub tech_types: Vec<String>,
    pub ndef_message: Option<Vec<u8>>,
}

/// The platform NFC capability
///
/// Implementations block until the platform answers, `request_technology` blocks until
/// a tag is presented or the request is cancelled
pub trait NfcHardwareAccess: Send + Sync + Debug + 'static {
    fn is_supported(&self) -> Result<bool, NfcError>;
    fn start(&self) -> Result<(), NfcError>;
    fn is_enabled(&self) -> Result<bool, NfcError>;
    fn request_technology(&self, tech: NfcTech, alert_message: &str) -> Result<(), NfcError>;
    fn cancel_technology_request(&self) -> Result<(), NfcError>;
    fn get_tag(&self) -> Result<RawTag, NfcError>;
    fn write_ndef_message(&self, message: &[u8]) -> Result<(), NfcError>;
}

/// Hardware facade with explicit initialization state, cheap to clone
#[derive(Debug, Clone)]
pub struct NfcHardware {
    access: Arc<dyn NfcHardwareAccess>,
    initialized: Arc<AtomicBool>,
}

impl NfcHardware {
    pub fn new(access: Arc<dyn NfcHardwareAccess>) -> Self {
        Self {
            access,
            initialized: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_supported(&self) -> Result<bool, NfcError> {
        self.access.is_supported()
    }

    /// One time platform setup, calling it again after it succeeded is a no-op
    pub fn start(&self) -> Result<(), NfcError> {
        if self.is_initialized() {
            debug!("nfc hardware already started");
            return Ok(());
        }

        self.access.start()?;
        self.initialized.store(true, Ordering::SeqCst);
        info!("nfc hardware started");

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn is_enabled(&self) -> Result<bool, NfcError> {
        self.ensure_initialized()?;
        self.access.is_enabled()
    }

    /// Blocks until a tag with the technology is presented
    pub fn request_technology(&self, tech: NfcTech, alert_message: &str) -> Result<(), NfcError> {
        self.ensure_initialized()?;
        debug!("requesting {tech} technology");

        self.access.request_technology(tech, alert_message).map_err(|error| match error {
            NfcError::HardwareUnavailable(reason) => NfcError::HardwareUnavailable(reason),
            error => NfcError::HardwareUnavailable(error.to_string()),
        })
    }

    /// Release the reader, safe to call when nothing was requested
    pub fn cancel_technology_request(&self) -> Result<(), NfcError> {
        debug!("cancelling technology request");
        self.access.cancel_technology_request()
    }

    pub fn get_tag(&self) -> Result<TagSnapshot, NfcError> {
        self.ensure_initialized()?;

        let RawTag {
            id,
            tech_types,
            ndef_message,
        } = self.access.get_tag()?;

        let tag = TagSnapshot::parse(id, tech_types, ndef_message.as_deref())?;
        debug!("got tag with {} records", tag.records.len());

        Ok(tag)
    }

    pub fn write_ndef_message(&self, message: &[u8]) -> Result<(), NfcError> {
        self.ensure_initialized()?;
        debug!("writing ndef message of {} bytes", message.len());

        self.access.write_ndef_message(message)
    }

    fn ensure_initialized(&self) -> Result<(), NfcError> {
        if !self.is_initialized() {
            return Err(NfcError::NotInitialized);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{fake::*, *};
    use crate::codec;

    #[test]
    fn test_calls_before_start_fail() {
        let (fake, hardware) = FakeHardware::default().into_hardware();

        assert_eq!(hardware.is_supported(), Ok(true));
        assert_eq!(hardware.is_enabled(), Err(NfcError::NotInitialized));
        assert_eq!(
            hardware.request_technology(NfcTech::Ndef, "hold"),
            Err(NfcError::NotInitialized)
        );
        assert_eq!(hardware.get_tag(), Err(NfcError::NotInitialized));
        assert_eq!(hardware.write_ndef_message(&[]), Err(NfcError::NotInitialized));
        assert_eq!(hardware.cancel_technology_request(), Ok(()));

        assert_eq!(fake.calls(), vec![Call::IsSupported, Call::Cancel]);
    }

    #[test]
    fn test_start_is_idempotent() {
        let (fake, hardware) = FakeHardware::default().into_hardware();

        hardware.start().unwrap();
        hardware.start().unwrap();

        assert!(hardware.is_initialized());
        assert!(hardware.clone().is_initialized());
        assert_eq!(fake.calls(), vec![Call::Start]);
    }

    #[test]
    fn test_failed_start_stays_uninitialized() {
        let fake = FakeHardware {
            start_error: Some(NfcError::UnsupportedHardware),
            ..Default::default()
        };
        let (_fake, hardware) = fake.into_hardware();

        assert_eq!(hardware.start(), Err(NfcError::UnsupportedHardware));
        assert!(!hardware.is_initialized());
    }

    #[test]
    fn test_request_failures_are_hardware_unavailable() {
        let fake = FakeHardware {
            request_error: Some(NfcError::OperationFailure("user cancelled".into())),
            ..Default::default()
        };
        let (fake, hardware) = fake.into_hardware();
        hardware.start().unwrap();

        assert!(matches!(
            hardware.request_technology(NfcTech::Ndef, "hold"),
            Err(NfcError::HardwareUnavailable(_))
        ));
        assert_eq!(fake.prompts(), vec!["hold".to_string()]);
    }

    #[test]
    fn test_get_tag_parses_message() {
        let fake = FakeHardware::default().with_tag(RawTag {
            id: Some(vec![0x01, 0x02]),
            tech_types: vec!["Ndef".into()],
            ndef_message: Some(codec::encode_text("on the tag").unwrap()),
        });
        let (_fake, hardware) = fake.into_hardware();
        hardware.start().unwrap();

        let tag = hardware.get_tag().unwrap();
        assert_eq!(tag.id, Some(vec![0x01, 0x02]));
        assert_eq!(tag.records[0].text().unwrap().text, "on the tag");
    }

    #[test]
    fn test_get_tag_with_invalid_message() {
        let fake = FakeHardware::default().with_tag(RawTag {
            ndef_message: Some(vec![0xD1, 0x01, 0x10]),
            ..Default::default()
        });
        let (_fake, hardware) = fake.into_hardware();
        hardware.start().unwrap();

        assert!(matches!(hardware.get_tag(), Err(NfcError::OperationFailure(_))));
    }

    #[test]
    fn test_write_passes_bytes_through() {
        let (fake, hardware) = FakeHardware::default().into_hardware();
        hardware.start().unwrap();

        let message = codec::encode_text("written").unwrap();
        hardware.write_ndef_message(&message).unwrap();

        assert_eq!(fake.written(), vec![message]);
    }
}
