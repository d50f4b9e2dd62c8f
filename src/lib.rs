pub(crate) mod logging;

pub mod config;
pub mod manager;
pub mod nfc;

uniffi::setup_scaffolding!();
