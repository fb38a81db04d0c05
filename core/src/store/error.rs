//! Error types for the participant store

use std::path::PathBuf;
use thiserror::Error;

use crate::roster::RosterError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The controller asked for a participant the pool doesn't hold.
    /// Indicates the draw state and the pool have drifted apart.
    #[error("participant {id} is not in the pool")]
    ParticipantNotFound { id: u64 },

    #[error("failed to write winners file {path}")]
    WriteWinners {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode winners")]
    EncodeWinners(#[source] serde_json::Error),

    #[error("failed to update roster")]
    Roster(#[from] RosterError),
}
