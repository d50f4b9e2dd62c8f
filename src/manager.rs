pub mod deferred_sender;
pub mod nfc_manager;
