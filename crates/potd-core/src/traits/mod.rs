//! Traits - ports implemented by the adapter crates

mod ports;

pub use ports::{
    ChatClient, CursorStore, MessageRegistryStore, PortResult, QuestionSource, SettingsSource,
};
