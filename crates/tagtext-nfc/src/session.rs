//! Scoped NFC sessions
//!
//! Every session acquires the reader once and releases it exactly once, whether the
//! operation succeeds, fails, panics or, for the async variant, is dropped mid-flight.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
};

use tracing::{debug, warn};

use crate::{
    DEFAULT_ALERT_MESSAGE, NfcError, codec,
    hardware::{NfcHardware, NfcTech},
    record::NdefRecord,
    tag::TagSnapshot,
};

/// Handle to the reader while a session is active
#[derive(Debug, Clone)]
pub struct NdefSession {
    hardware: NfcHardware,
    tech: NfcTech,
}

impl NdefSession {
    pub fn tech(&self) -> NfcTech {
        self.tech
    }

    pub fn tag(&self) -> Result<TagSnapshot, NfcError> {
        self.hardware.get_tag()
    }

    pub fn write_message(&self, message: &[u8]) -> Result<(), NfcError> {
        self.hardware.write_ndef_message(message)
    }

    pub fn write_records(&self, records: &[NdefRecord]) -> Result<(), NfcError> {
        let message = codec::encode_message(records)?;
        self.write_message(&message)
    }
}

/// Releases the reader when dropped
struct ReleaseGuard {
    hardware: NfcHardware,
    acquire: Option<Arc<PendingAcquire>>,
}

impl ReleaseGuard {
    fn arm(hardware: &NfcHardware) -> Self {
        Self {
            hardware: hardware.clone(),
            acquire: None,
        }
    }

    /// Guard for an acquire that runs on another thread and may outlive the guard
    fn arm_pending(hardware: &NfcHardware, acquire: Arc<PendingAcquire>) -> Self {
        Self {
            hardware: hardware.clone(),
            acquire: Some(acquire),
        }
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        // still waiting for a tag: this cancel aborts the request, the acquiring
        // thread releases if the platform hands over the reader anyway
        if let Some(acquire) = &self.acquire {
            if acquire.abandon() {
                debug!("session dropped while acquiring, aborting request");
            }
        }

        release(&self.hardware);
    }
}

fn release(hardware: &NfcHardware) {
    if let Err(error) = hardware.cancel_technology_request() {
        warn!("unable to release nfc session: {error}");
    }

    debug!("nfc session released");
}

/// Hand-off between an acquire on the blocking pool and the future waiting for it
#[derive(Debug, Default)]
struct PendingAcquire(AtomicU8);

impl PendingAcquire {
    const PENDING: u8 = 0;
    const SETTLED: u8 = 1;
    const ABANDONED: u8 = 2;

    /// The platform answered, false if the waiting future was already dropped
    fn settle(&self) -> bool {
        self.transition(Self::SETTLED)
    }

    /// The waiting future was dropped, false if the platform already answered
    fn abandon(&self) -> bool {
        self.transition(Self::ABANDONED)
    }

    fn transition(&self, to: u8) -> bool {
        self.0
            .compare_exchange(Self::PENDING, to, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

impl NfcHardware {
    /// Run `op` with exclusive access to a tag supporting `tech`
    ///
    /// The reader is released after `op` returns. If acquiring fails `op` is never called,
    /// the acquire error is returned after the release.
    pub fn with_technology<T, E, F>(&self, tech: NfcTech, alert_message: Option<&str>, op: F) -> Result<T, E>
    where
        F: FnOnce(&NdefSession) -> Result<T, E>,
        E: From<NfcError>,
    {
        let alert_message = alert_message.unwrap_or(DEFAULT_ALERT_MESSAGE);

        let _guard = ReleaseGuard::arm(self);
        self.request_technology(tech, alert_message)?;
        debug!("nfc session acquired for {tech}");

        let session = NdefSession {
            hardware: self.clone(),
            tech,
        };

        op(&session)
    }

    pub fn with_ndef<T, E, F>(&self, alert_message: Option<&str>, op: F) -> Result<T, E>
    where
        F: FnOnce(&NdefSession) -> Result<T, E>,
        E: From<NfcError>,
    {
        self.with_technology(NfcTech::Ndef, alert_message, op)
    }
}

/// Async version of [`NfcHardware::with_ndef`]
///
/// Acquiring runs on the blocking pool. Dropping the returned future releases the reader,
/// including while still waiting for a tag.
pub async fn with_ndef_async<T, E, F, Fut>(
    hardware: &NfcHardware,
    alert_message: Option<&str>,
    op: F,
) -> Result<T, E>
where
    F: FnOnce(NdefSession) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<NfcError>,
{
    let alert_message = alert_message.unwrap_or(DEFAULT_ALERT_MESSAGE).to_string();

    let acquire = Arc::new(PendingAcquire::default());
    let _guard = ReleaseGuard::arm_pending(hardware, acquire.clone());

    let acquiring = hardware.clone();
    tokio::task::spawn_blocking(move || {
        let result = acquiring.request_technology(NfcTech::Ndef, &alert_message);

        if !acquire.settle() && result.is_ok() {
            debug!("acquired after the session was dropped");
            release(&acquiring);
        }

        result
    })
    .await
    .unwrap_or_else(|error| Err(NfcError::HardwareUnavailable(error.to_string())))?;

    debug!("nfc session acquired for {}", NfcTech::Ndef);

    let session = NdefSession {
        hardware: hardware.clone(),
        tech: NfcTech::Ndef,
    };

    op(session).await
}
