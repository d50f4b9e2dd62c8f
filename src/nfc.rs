//! Bridge from the platform NFC stack to the hardware facade

use std::sync::Arc;

pub use tagtext_nfc::{
    NdefError, NdefRecord, NdefSession, NfcError, NfcHardware, NfcHardwareAccess, NfcTech,
    RawTag, ReadResult, TagInfo, TagSnapshot, codec,
};

/// Implemented by the platform, wraps the native NFC manager
#[uniffi::export(callback_interface)]
pub trait NfcHardwareProtocol: Send + Sync + std::fmt::Debug + 'static {
    fn is_supported(&self) -> Result<bool, NfcHardwareError>;

    fn is_enabled(&self) -> Result<bool, NfcHardwareError>;

    fn start(&self) -> Result<(), NfcHardwareError>;

    /// Blocks until a tag is presented, the user cancels, or the platform times out
    fn request_technology(
        &self,
        tech: NfcTech,
        alert_message: Option<String>,
    ) -> Result<(), NfcHardwareError>;

    fn cancel_technology_request(&self) -> Result<(), NfcHardwareError>;

    fn get_tag(&self) -> Result<RawTag, NfcHardwareError>;

    fn write_ndef_message(&self, message: Vec<u8>) -> Result<(), NfcHardwareError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum NfcHardwareError {
    #[error("NFC not supported")]
    NotSupported,

    #[error("NFC disabled")]
    Disabled,

    #[error("cancelled by user")]
    Cancelled,

    #[error("timed out waiting for a tag")]
    Timeout,

    #[error("{0}")]
    Failure(String),

    #[error("unexpected error from the platform: {0}")]
    Unexpected(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for NfcHardwareError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Unexpected(error.reason)
    }
}

impl From<NfcHardwareError> for NfcError {
    fn from(error: NfcHardwareError) -> Self {
        match error {
            NfcHardwareError::NotSupported => NfcError::UnsupportedHardware,
            NfcHardwareError::Disabled => NfcError::RadioDisabled,
            error @ (NfcHardwareError::Cancelled | NfcHardwareError::Timeout) => {
                NfcError::HardwareUnavailable(error.to_string())
            }
            NfcHardwareError::Failure(reason) => NfcError::OperationFailure(reason),
            error @ NfcHardwareError::Unexpected(_) => NfcError::OperationFailure(error.to_string()),
        }
    }
}

/// Adapts the platform callback to [`NfcHardwareAccess`]
#[derive(Debug)]
pub struct FfiNfcHardware(Box<dyn NfcHardwareProtocol>);

impl FfiNfcHardware {
    pub fn new(protocol: Box<dyn NfcHardwareProtocol>) -> Self {
        Self(protocol)
    }

    pub fn into_hardware(self) -> NfcHardware {
        NfcHardware::new(Arc::new(self))
    }
}

impl NfcHardwareAccess for FfiNfcHardware {
    fn is_supported(&self) -> Result<bool, NfcError> {
        Ok(self.0.is_supported()?)
    }

    fn start(&self) -> Result<(), NfcError> {
        Ok(self.0.start()?)
    }

    fn is_enabled(&self) -> Result<bool, NfcError> {
        Ok(self.0.is_enabled()?)
    }

    fn request_technology(&self, tech: NfcTech, alert_message: &str) -> Result<(), NfcError> {
        Ok(self.0.request_technology(tech, Some(alert_message.to_string()))?)
    }

    fn cancel_technology_request(&self) -> Result<(), NfcError> {
        Ok(self.0.cancel_technology_request()?)
    }

    fn get_tag(&self) -> Result<RawTag, NfcError> {
        Ok(self.0.get_tag()?)
    }

    fn write_ndef_message(&self, message: &[u8]) -> Result<(), NfcError> {
        Ok(self.0.write_ndef_message(message.to_vec())?)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use parking_lot::Mutex;

    use super::*;

    /// Scripted platform, shared between the test and the manager under test
    #[derive(Debug, Clone, Default)]
    pub struct FakePlatform(pub Arc<FakePlatformState>);

    #[derive(Debug)]
    pub struct FakePlatformState {
        pub supported: Mutex<bool>,
        pub enabled: Mutex<bool>,
        pub start_error: Mutex<Option<NfcHardwareError>>,
        pub request_error: Mutex<Option<NfcHardwareError>>,
        pub write_error: Mutex<Option<NfcHardwareError>>,
        pub tag: Mutex<RawTag>,
        pub written: Mutex<Vec<Vec<u8>>>,
        pub prompts: Mutex<Vec<Option<String>>>,
        pub cancels: Mutex<usize>,
    }

    impl Default for FakePlatformState {
        fn default() -> Self {
            Self {
                supported: Mutex::new(true),
                enabled: Mutex::new(true),
                start_error: Mutex::new(None),
                request_error: Mutex::new(None),
                write_error: Mutex::new(None),
                tag: Mutex::new(RawTag::default()),
                written: Mutex::new(Vec::new()),
                prompts: Mutex::new(Vec::new()),
                cancels: Mutex::new(0),
            }
        }
    }

    fn scripted(error: &Mutex<Option<NfcHardwareError>>) -> Result<(), NfcHardwareError> {
        match error.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    impl NfcHardwareProtocol for FakePlatform {
        fn is_supported(&self) -> Result<bool, NfcHardwareError> {
            Ok(*self.0.supported.lock())
        }

        fn is_enabled(&self) -> Result<bool, NfcHardwareError> {
            Ok(*self.0.enabled.lock())
        }

        fn start(&self) -> Result<(), NfcHardwareError> {
            scripted(&self.0.start_error)
        }

        fn request_technology(
            &self,
            _tech: NfcTech,
            alert_message: Option<String>,
        ) -> Result<(), NfcHardwareError> {
            self.0.prompts.lock().push(alert_message);
            scripted(&self.0.request_error)
        }

        fn cancel_technology_request(&self) -> Result<(), NfcHardwareError> {
            *self.0.cancels.lock() += 1;
            Ok(())
        }

        fn get_tag(&self) -> Result<RawTag, NfcHardwareError> {
            Ok(self.0.tag.lock().clone())
        }

        fn write_ndef_message(&self, message: Vec<u8>) -> Result<(), NfcHardwareError> {
            scripted(&self.0.write_error)?;
            self.0.written.lock().push(message);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{fake::FakePlatform, *};

    #[test]
    fn test_error_mapping() {
        assert_eq!(NfcError::from(NfcHardwareError::NotSupported), NfcError::UnsupportedHardware);
        assert_eq!(NfcError::from(NfcHardwareError::Disabled), NfcError::RadioDisabled);
        assert_eq!(
            NfcError::from(NfcHardwareError::Cancelled),
            NfcError::HardwareUnavailable("cancelled by user".to_string())
        );
        assert_eq!(
            NfcError::from(NfcHardwareError::Failure("tag lost".to_string())),
            NfcError::OperationFailure("tag lost".to_string())
        );
    }

    #[test]
    fn test_unexpected_callback_error() {
        let error = NfcHardwareError::from(uniffi::UnexpectedUniFFICallbackError {
            reason: "panic in swift".to_string(),
        });

        assert_eq!(error, NfcHardwareError::Unexpected("panic in swift".to_string()));
    }

    #[test]
    fn test_session_through_bridge() {
        let platform = FakePlatform::default();
        *platform.0.tag.lock() = RawTag {
            id: Some(vec![0xAA]),
            tech_types: vec!["Ndef".to_string()],
            ndef_message: Some(codec::encode_text("bridged").unwrap()),
        };

        let hardware = FfiNfcHardware::new(Box::new(platform.clone())).into_hardware();
        hardware.start().unwrap();

        let text = hardware
            .with_ndef(Some("Approach tag to read"), |session| {
                let tag = session.tag()?;
                Ok::<_, NfcError>(ReadResult::from_tag(&tag).to_string())
            })
            .unwrap();

        assert_eq!(text, "bridged");
        assert_eq!(*platform.0.prompts.lock(), vec![Some("Approach tag to read".to_string())]);
        assert_eq!(*platform.0.cancels.lock(), 1);
    }

    #[test]
    fn test_request_timeout_is_hardware_unavailable() {
        let platform = FakePlatform::default();
        *platform.0.request_error.lock() = Some(NfcHardwareError::Timeout);

        let hardware = FfiNfcHardware::new(Box::new(platform.clone())).into_hardware();
        hardware.start().unwrap();

        let result = hardware.with_ndef(None, |_| Ok::<_, NfcError>(()));

        assert_eq!(
            result,
            Err(NfcError::HardwareUnavailable("timed out waiting for a tag".to_string()))
        );
        assert_eq!(*platform.0.cancels.lock(), 1);
    }
}
