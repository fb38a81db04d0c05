//! Draw session state

use std::fmt;

use crate::roster::Participant;
use crate::store::ParticipantStore;
use crate::winners::WinnerRecord;

/// Where the current round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawState {
    #[default]
    Idle,
    /// Names are cycling
    Drawing,
    /// Stop pressed; names still cycle while the music fades
    Stopping,
    /// Winner recorded, announcement playing
    Announcing,
    RoundComplete,
}

impl DrawState {
    /// The animation keeps running until the winner resolves
    pub fn is_drawing(self) -> bool {
        matches!(self, DrawState::Drawing | DrawState::Stopping)
    }

    pub fn accepts_load(self) -> bool {
        matches!(self, DrawState::Idle | DrawState::RoundComplete)
    }
}

impl fmt::Display for DrawState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DrawState::Idle => "idle",
            DrawState::Drawing => "drawing",
            DrawState::Stopping => "stopping",
            DrawState::Announcing => "announcing",
            DrawState::RoundComplete => "round complete",
        };
        f.write_str(label)
    }
}

/// Everything the controller owns for the running session
pub struct Session {
    pub state: DrawState,
    pub store: ParticipantStore,
    /// Participant the animation wrote last
    pub displayed: Option<Participant>,
    pub loading: bool,
}

impl Session {
    pub fn new(store: ParticipantStore) -> Self {
        Self {
            state: DrawState::Idle,
            store,
            displayed: None,
            loading: false,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            pool: self.store.pool().to_vec(),
            winners: self.store.winners().to_vec(),
            initial_count: self.store.initial_count(),
            loading: self.loading,
        }
    }
}

/// Point-in-time copy of the session for status display
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub state: DrawState,
    pub pool: Vec<Participant>,
    pub winners: Vec<WinnerRecord>,
    pub initial_count: usize,
    pub loading: bool,
}
