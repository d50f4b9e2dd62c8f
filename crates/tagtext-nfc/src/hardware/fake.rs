use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;

use super::{NfcHardware, NfcHardwareAccess, NfcTech, RawTag};
use crate::NfcError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    IsSupported,
    Start,
    IsEnabled,
    Request(NfcTech),
    RequestReturned,
    Cancel,
    GetTag,
    Write,
    Marker(&'static str),
}

/// In memory hardware that records every call in order
#[derive(Debug)]
pub struct FakeHardware {
    pub supported: bool,
    pub enabled: bool,
    pub start_error: Option<NfcError>,
    pub request_error: Option<NfcError>,
    pub cancel_error: Option<NfcError>,
    pub write_error: Option<NfcError>,
    pub request_delay: Option<Duration>,
    /// A cancel while a delayed request is pending makes that request fail
    pub cancel_aborts_request: bool,
    pub tag: RawTag,
    pub pending: AtomicBool,
    pub aborted: AtomicBool,
    pub calls: Mutex<Vec<Call>>,
    pub prompts: Mutex<Vec<String>>,
    pub written: Mutex<Vec<Vec<u8>>>,
}

impl Default for FakeHardware {
    fn default() -> Self {
        Self {
            supported: true,
            enabled: true,
            start_error: None,
            request_error: None,
            cancel_error: None,
            write_error: None,
            request_delay: None,
            cancel_aborts_request: true,
            tag: RawTag::default(),
            pending: AtomicBool::new(false),
            aborted: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            written: Mutex::new(Vec::new()),
        }
    }
}

impl FakeHardware {
    pub fn with_tag(mut self, tag: RawTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn into_hardware(self) -> (Arc<Self>, NfcHardware) {
        let fake = Arc::new(self);
        let hardware = NfcHardware::new(fake.clone());
        (fake, hardware)
    }

    pub fn started(self) -> (Arc<Self>, NfcHardware) {
        let (fake, hardware) = self.into_hardware();
        hardware.start().expect("fake start");
        fake.calls.lock().clear();

        (fake, hardware)
    }

    pub fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.written.lock().clone()
    }

    fn result(&self, error: &Option<NfcError>) -> Result<(), NfcError> {
        match error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl NfcHardwareAccess for FakeHardware {
    fn is_supported(&self) -> Result<bool, NfcError> {
        self.record(Call::IsSupported);
        Ok(self.supported)
    }

    fn start(&self) -> Result<(), NfcError> {
        self.record(Call::Start);
        self.result(&self.start_error)
    }

    fn is_enabled(&self) -> Result<bool, NfcError> {
        self.record(Call::IsEnabled);
        Ok(self.enabled)
    }

    fn request_technology(&self, tech: NfcTech, alert_message: &str) -> Result<(), NfcError> {
        self.record(Call::Request(tech));
        self.prompts.lock().push(alert_message.to_string());

        if let Some(delay) = self.request_delay {
            self.pending.store(true, Ordering::SeqCst);
            std::thread::sleep(delay);
            self.pending.store(false, Ordering::SeqCst);
            self.record(Call::RequestReturned);

            if self.cancel_aborts_request && self.aborted.swap(false, Ordering::SeqCst) {
                return Err(NfcError::HardwareUnavailable("request cancelled".to_string()));
            }
        }

        self.result(&self.request_error)
    }

    fn cancel_technology_request(&self) -> Result<(), NfcError> {
        self.record(Call::Cancel);
        if self.pending.load(Ordering::SeqCst) {
            self.aborted.store(true, Ordering::SeqCst);
        }

        self.result(&self.cancel_error)
    }

    fn get_tag(&self) -> Result<RawTag, NfcError> {
        self.record(Call::GetTag);
        Ok(self.tag.clone())
    }

    fn write_ndef_message(&self, message: &[u8]) -> Result<(), NfcError> {
        self.record(Call::Write);
        self.result(&self.write_error)?;
        self.written.lock().push(message.to_vec());

        Ok(())
    }
}
