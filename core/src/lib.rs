pub mod audio;
pub mod context;
pub mod draw;
pub mod roster;
pub mod store;
pub mod winners;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use audio::{Announcer, AudioError, AudioHandle, AudioService};
pub use context::{AppConfig, AppConfigExt, ConfigError};
pub use draw::{
    Controls, DrawController, DrawHandle, DrawState, READY_TEXT, SessionSnapshot, ViewReceiver,
    ViewUpdate, create_view_channel,
};
pub use roster::{Participant, RosterError};
pub use store::{ParticipantStore, StoreError};
pub use winners::{ImportedRecord, WinnerEntry, WinnerRecord, WinnersFile};
