//! Participant store
//!
//! Holds the remaining pool, the winners drawn this session and the history
//! read from a previous session. All mutation happens on the controller's
//! event loop; loading from disk is split into [`LoadedRoster::read`] (safe to
//! run on a worker) and [`ParticipantStore::install`].

mod error;

pub use error::StoreError;

use std::path::Path;

use crate::roster::{Participant, RosterError, RosterFile};
use crate::winners::{WinnerEntry, WinnerRecord, WinnersFile};

/// A roster read from disk but not yet installed into a store
#[derive(Debug, Clone)]
pub struct LoadedRoster {
    pub roster: RosterFile,
    pub participants: Vec<Participant>,
}

impl LoadedRoster {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let (roster, participants) = RosterFile::read(path)?;
        Ok(Self {
            roster,
            participants,
        })
    }
}

/// Result of recording a winner. Persistence failures don't undo the
/// in-memory update, they're handed back for reporting.
#[derive(Debug)]
pub struct RecordOutcome {
    pub record: WinnerRecord,
    pub persist_errors: Vec<StoreError>,
}

pub struct ParticipantStore {
    roster: Option<RosterFile>,
    pool: Vec<Participant>,
    winners: Vec<WinnerRecord>,
    history: Vec<WinnerEntry>,
    winners_file: WinnersFile,
    initial_count: usize,
}

impl ParticipantStore {
    pub fn new(winners_file: WinnersFile) -> Self {
        Self {
            roster: None,
            pool: Vec::new(),
            winners: Vec::new(),
            history: Vec::new(),
            winners_file,
            initial_count: 0,
        }
    }

    /// Store for a new session: optionally wipe the winners file, then read
    /// whatever history remains.
    pub fn open(winners_file: WinnersFile, clear_on_start: bool) -> Self {
        let mut store = Self::new(winners_file);
        if clear_on_start {
            if let Err(e) = store.clear_winners_file() {
                tracing::error!(error = %e, "Failed to clear winners file");
            }
        }
        store.load_previous_winners();
        store
    }

    /// Blocking load. The pool is only replaced when the whole file validates.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, RosterError> {
        let loaded = LoadedRoster::read(path)?;
        Ok(self.install(loaded))
    }

    /// Replace the pool with a freshly read roster. Returns the pool size.
    pub fn install(&mut self, loaded: LoadedRoster) -> usize {
        let LoadedRoster {
            roster,
            participants,
        } = loaded;

        tracing::info!(
            path = %roster.path().display(),
            participants = participants.len(),
            "Participants loaded"
        );

        self.pool = participants;
        self.roster = Some(roster);
        self.initial_count = self.winners.len() + self.pool.len();
        self.pool.len()
    }

    /// Move a participant from the pool to the winners, then persist both
    /// the winners file and the trimmed roster.
    pub fn remove_and_record_winner(&mut self, id: u64) -> Result<RecordOutcome, StoreError> {
        let idx = self
            .pool
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::ParticipantNotFound { id })?;

        let participant = self.pool.remove(idx);
        let record = WinnerRecord::now(participant);
        self.winners.push(record.clone());

        let mut persist_errors = Vec::new();

        if let Err(e) = self.save_winners() {
            tracing::error!(error = %e, "Failed to save winners");
            persist_errors.push(e);
        }

        if let Some(roster) = self.roster.as_mut() {
            roster.remove_participant(id);
            if let Err(e) = roster.save() {
                tracing::error!(
                    path = %roster.path().display(),
                    error = %e,
                    "Failed to update roster file"
                );
                persist_errors.push(StoreError::Roster(e));
            }
        }

        tracing::info!(id, name = %record.participant.name, "Winner recorded");

        Ok(RecordOutcome {
            record,
            persist_errors,
        })
    }

    /// Read the winners file into the history
    pub fn load_previous_winners(&mut self) -> &[WinnerEntry] {
        self.history = self.winners_file.load();
        if !self.history.is_empty() {
            tracing::info!(count = self.history.len(), "Previous winners loaded");
        }
        &self.history
    }

    /// Overwrite the winners file with an empty list and forget the history
    pub fn clear_winners_file(&mut self) -> Result<(), StoreError> {
        self.history.clear();
        self.winners_file.clear()
    }

    /// History followed by this session's winners, as written to disk
    pub fn entries(&self) -> Vec<WinnerEntry> {
        self.history
            .iter()
            .cloned()
            .chain(self.winners.iter().cloned().map(WinnerEntry::from))
            .collect()
    }

    fn save_winners(&self) -> Result<(), StoreError> {
        self.winners_file.save(&self.entries())
    }

    pub fn pool(&self) -> &[Participant] {
        &self.pool
    }

    pub fn winners(&self) -> &[WinnerRecord] {
        &self.winners
    }

    pub fn history(&self) -> &[WinnerEntry] {
        &self.history
    }

    /// Winners plus pool at the time of the last load
    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    pub fn roster_path(&self) -> Option<&Path> {
        self.roster.as_ref().map(|r| r.path())
    }
}
