//! View model behind the NFC read/write screen

use std::sync::Arc;

use flume::Receiver;
use parking_lot::RwLock;
use tagtext_macros::impl_default_for;
use tagtext_nfc::encoder;
use tracing::{debug, trace, warn};

use crate::{
    config::NfcConfig,
    logging,
    manager::deferred_sender::{self, DeferredSender, MessageSender},
    nfc::{FfiNfcHardware, NfcError, NfcHardware, NfcHardwareProtocol, ReadResult, TagInfo, TagSnapshot},
};

type Message = NfcManagerReconcileMessage;
type Action = NfcManagerAction;
type State = NfcManagerState;
type Reconciler = dyn NfcManagerReconciler;
type SingleOrMany = deferred_sender::SingleOrMany<Message>;

#[derive(Debug, Clone, Hash, Eq, PartialEq, uniffi::Enum)]
pub enum NfcManagerReconcileMessage {
    NfcSupported(bool),
    NfcEnabled(bool),
    ScannedTag(Option<TagSnapshot>),
    WriteText(String),
    Message(String),
}

#[uniffi::export(callback_interface)]
pub trait NfcManagerReconciler: Send + Sync + std::fmt::Debug + 'static {
    /// Tells the frontend to reconcile the manager changes
    fn reconcile(&self, message: Message);
    fn reconcile_many(&self, messages: Vec<Message>);
}

#[derive(Debug, Clone, Hash, Eq, PartialEq, uniffi::Enum)]
pub enum NfcManagerAction {
    Initialize,
    ReadTag,
    WriteTag,
    UpdateWriteText(String),
}

#[derive(Debug, Clone, Hash, Eq, PartialEq, uniffi::Record)]
pub struct NfcManagerState {
    pub nfc_supported: bool,
    pub nfc_enabled: bool,
    pub scanned_tag: Option<TagSnapshot>,
    pub write_text: String,
    pub message: String,
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, uniffi::Enum)]
pub enum MessageTone {
    Info,
    Success,
    Error,
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, uniffi::Enum)]
pub enum NfcStatus {
    Unsupported,
    Disabled,
    Ready,
}

#[derive(Clone, Debug, uniffi::Object)]
pub struct RustNfcManager {
    pub state: Arc<RwLock<State>>,
    hardware: NfcHardware,
    config: NfcConfig,
    reconciler: MessageSender<Message>,
    reconcile_receiver: Arc<Receiver<SingleOrMany>>,
}

#[uniffi::export]
impl RustNfcManager {
    #[uniffi::constructor]
    pub fn new(hardware: Box<dyn NfcHardwareProtocol>) -> Self {
        logging::init();

        let hardware = FfiNfcHardware::new(hardware).into_hardware();
        Self::with_hardware(hardware, NfcConfig::global().clone())
    }

    #[uniffi::method]
    pub fn state(&self) -> State {
        self.state.read().clone()
    }

    #[uniffi::method]
    pub fn message(&self) -> String {
        self.state.read().message.clone()
    }

    #[uniffi::method]
    pub fn message_tone(&self) -> MessageTone {
        message_tone(&self.state.read().message)
    }

    #[uniffi::method]
    pub fn nfc_status(&self) -> NfcStatus {
        let state = self.state.read();
        match (state.nfc_supported, state.nfc_enabled) {
            (false, _) => NfcStatus::Unsupported,
            (true, false) => NfcStatus::Disabled,
            (true, true) => NfcStatus::Ready,
        }
    }

    /// Details of the last scanned tag
    #[uniffi::method]
    pub fn tag_info(&self) -> Option<TagInfo> {
        self.state.read().scanned_tag.as_ref().map(TagInfo::from_tag)
    }

    /// Check support, start the hardware and check the radio, blocks
    #[uniffi::method]
    pub fn initialize(&self) {
        if let Err(error) = self.try_initialize() {
            warn!("nfc initialization error: {error}");
            self.apply([Message::Message(format!("NFC init error: {error}"))]);
        }
    }

    /// Wait for a tag and read its first record, blocks
    #[uniffi::method]
    pub fn read_tag(&self) {
        if !self.ensure_ready("NFC disabled; enable in settings") {
            return;
        }

        self.apply([
            Message::Message("Ready to scan...".to_string()),
            Message::ScannedTag(None),
        ]);

        let result = self.hardware.with_ndef(Some(&self.config.read_prompt), |session| {
            let tag = session.tag()?;
            let read = ReadResult::from_tag(&tag);
            debug!("read tag: {read:?}");

            self.apply([
                Message::ScannedTag(Some(tag)),
                Message::Message(format!("Tag read: {read}")),
            ]);

            Ok::<_, NfcError>(())
        });

        if let Err(error) = result {
            warn!("unable to read tag: {error}");
            self.apply([Message::Message(format!("Read error: {error}"))]);
        }
    }

    /// Wait for a tag and write the current text to it, blocks
    #[uniffi::method]
    pub fn write_tag(&self) {
        if !self.ensure_ready("Enable NFC first") {
            return;
        }

        let text = self.state.read().write_text.clone();
        if text.trim().is_empty() {
            self.apply([Message::Message("Enter text to write".to_string())]);
            return;
        }

        self.apply([Message::Message("Ready to write...".to_string())]);

        let result = self.hardware.with_ndef(Some(&self.config.write_prompt), |session| {
            let record = encoder::text_record_with_language(&text, &self.config.text_language)?;
            session.write_records(&[record])?;

            self.apply([Message::Message(format!("Wrote: \"{text}\""))]);
            Ok::<_, NfcError>(())
        });

        if let Err(error) = result {
            warn!("unable to write tag: {error}");
            self.apply([Message::Message(format!("Write error: {error}"))]);
        }
    }

    // MARK: boilerplate

    #[uniffi::method]
    pub fn listen_for_updates(&self, reconciler: Box<Reconciler>) {
        let reconcile_receiver = self.reconcile_receiver.clone();

        std::thread::spawn(move || {
            while let Ok(field) = reconcile_receiver.recv() {
                trace!("reconcile_receiver: {field:?}");
                match field {
                    SingleOrMany::Single(message) => reconciler.reconcile(message),
                    SingleOrMany::Many(messages) => reconciler.reconcile_many(messages),
                }
            }
        });
    }

    /// Action from the frontend to change the state of the view model
    ///
    /// Anything that talks to the hardware runs on a background thread
    #[uniffi::method]
    pub fn dispatch(self: Arc<Self>, action: Action) {
        debug!("dispatch: {action:?}");

        match action {
            Action::Initialize => {
                std::thread::spawn(move || self.initialize());
            }
            Action::ReadTag => {
                std::thread::spawn(move || self.read_tag());
            }
            Action::WriteTag => {
                std::thread::spawn(move || self.write_tag());
            }
            Action::UpdateWriteText(text) => self.apply([Message::WriteText(text)]),
        }
    }
}

impl RustNfcManager {
    pub fn with_hardware(hardware: NfcHardware, config: NfcConfig) -> Self {
        let (sender, receiver) = flume::bounded(1000);

        Self {
            state: Arc::new(RwLock::new(State::with_write_text(config.default_write_text.clone()))),
            hardware,
            config,
            reconciler: MessageSender::new(sender),
            reconcile_receiver: Arc::new(receiver),
        }
    }

    fn try_initialize(&self) -> Result<(), NfcError> {
        let supported = self.hardware.is_supported()?;
        self.apply([Message::NfcSupported(supported)]);

        if !supported {
            return Ok(());
        }

        self.hardware.start()?;

        let enabled = self.hardware.is_enabled()?;
        self.apply([Message::NfcEnabled(enabled)]);

        Ok(())
    }

    /// Sets the message and returns false unless NFC is supported and enabled
    fn ensure_ready(&self, disabled_message: &str) -> bool {
        let message = match self.nfc_status() {
            NfcStatus::Ready => return true,
            NfcStatus::Unsupported => "NFC not supported",
            NfcStatus::Disabled => disabled_message,
        };

        self.apply([Message::Message(message.to_string())]);
        false
    }

    /// Update the state and tell the frontend, as one batch
    fn apply(&self, messages: impl IntoIterator<Item = Message>) {
        let mut sender = DeferredSender::new(self.reconciler.clone());
        let mut state = self.state.write();

        for message in messages {
            state.apply(message.clone());
            sender.queue(message);
        }
    }
}

/// Colour hint for the status message
pub fn message_tone(message: &str) -> MessageTone {
    if message.contains("error") || message.contains("not supported") {
        return MessageTone::Error;
    }

    if message.contains("Ready") || message.contains("Wrote") {
        return MessageTone::Success;
    }

    MessageTone::Info
}

impl_default_for!(NfcManagerState);
impl NfcManagerState {
    pub fn new() -> Self {
        Self::with_write_text(NfcConfig::global().default_write_text.clone())
    }

    pub fn with_write_text(write_text: String) -> Self {
        Self {
            nfc_supported: false,
            nfc_enabled: false,
            scanned_tag: None,
            write_text,
            message: String::new(),
        }
    }

    fn apply(&mut self, message: Message) {
        match message {
            Message::NfcSupported(supported) => self.nfc_supported = supported,
            Message::NfcEnabled(enabled) => self.nfc_enabled = enabled,
            Message::ScannedTag(tag) => self.scanned_tag = tag,
            Message::WriteText(text) => self.write_text = text,
            Message::Message(message) => self.message = message,
        }
    }
}
