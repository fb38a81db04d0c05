//! Updates published to the presentation surface

use tokio::sync::mpsc;

use crate::winners::{WinnerEntry, WinnerRecord};

/// Text shown in the name area between rounds
pub const READY_TEXT: &str = "Ready for Next Draw";

/// Which commands the surface should offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub load: bool,
    pub start: bool,
    pub stop: bool,
    pub next: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    /// Winners read from a previous session, oldest first
    History(Vec<WinnerEntry>),
    Loading,
    /// A load attempt finished; `loaded` is 0 on failure
    LoadFinished {
        loaded: usize,
        error: Option<String>,
    },
    /// Animation frame
    Name(String),
    Winner(WinnerRecord),
    /// Line to prepend to the winners list
    WinnerListed(String),
    PoolSize(usize),
    /// Back to the idle display
    Reset(String),
    Controls(Controls),
    Warning(String),
    Error(String),
}

pub type ViewSender = mpsc::UnboundedSender<ViewUpdate>;
pub type ViewReceiver = mpsc::UnboundedReceiver<ViewUpdate>;

pub fn create_view_channel() -> (ViewSender, ViewReceiver) {
    mpsc::unbounded_channel()
}
