//! Draw controller - owns the session and runs the draw state machine
//!
//! Architecture:
//! - DrawHandle: cloneable command sender used by the presentation surface
//! - DrawController: event loop task that owns all session state; it ends on
//!   `Shutdown` or once every handle is gone
//! - Timers post messages back into the loop (animation, fade, stop delay)
//! - Blocking work (roster load, announcement) runs on `spawn_blocking` and
//!   reports back with a message; workers never touch the session

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tokio::sync::{mpsc, oneshot};

use lucky_draw_types::{AppConfig, AudioSettings, DrawSettings};

use super::scheduler::ScheduledTask;
use super::state::{DrawState, Session, SessionSnapshot};
use super::view::{Controls, READY_TEXT, ViewSender, ViewUpdate};
use crate::audio::{Announcer, AudioError, AudioHandle, FadeOut};
use crate::roster::{Participant, RosterError};
use crate::store::{LoadedRoster, ParticipantStore};
use crate::winners::WinnerEntry;

// ─────────────────────────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────────────────────────

/// Commands from the presentation surface
#[derive(Debug)]
pub enum DrawCommand {
    LoadParticipants(PathBuf),
    StartDraw,
    StopDraw,
    NextRound,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// Internal events: timer fires and worker results
#[derive(Debug)]
enum LoopMessage {
    AnimationTick,
    FadeStep,
    FinishSelection,
    LoadFinished {
        path: PathBuf,
        result: Result<LoadedRoster, RosterError>,
    },
    AnnouncementFinished(Result<(), AudioError>),
}

// ─────────────────────────────────────────────────────────────────────────────
// Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to send commands to the draw controller
#[derive(Clone)]
pub struct DrawHandle {
    tx: mpsc::Sender<DrawCommand>,
}

impl DrawHandle {
    async fn send(&self, cmd: DrawCommand) -> Result<(), String> {
        self.tx.send(cmd).await.map_err(|e| e.to_string())
    }

    /// Load a roster in the background; completion arrives as a view update
    pub async fn load_participants(&self, path: impl Into<PathBuf>) -> Result<(), String> {
        self.send(DrawCommand::LoadParticipants(path.into())).await
    }

    pub async fn start_draw(&self) -> Result<(), String> {
        self.send(DrawCommand::StartDraw).await
    }

    pub async fn stop_draw(&self) -> Result<(), String> {
        self.send(DrawCommand::StopDraw).await
    }

    pub async fn next_round(&self) -> Result<(), String> {
        self.send(DrawCommand::NextRound).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, String> {
        let (reply, rx) = oneshot::channel();
        self.send(DrawCommand::Snapshot(reply)).await?;
        rx.await.map_err(|e| e.to_string())
    }

    pub async fn shutdown(&self) -> Result<(), String> {
        self.send(DrawCommand::Shutdown).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Controller
// ─────────────────────────────────────────────────────────────────────────────

pub struct DrawController {
    session: Session,
    draw: DrawSettings,
    audio_settings: AudioSettings,
    audio: AudioHandle,
    announcer: Arc<Announcer>,
    view: ViewSender,
    rng: StdRng,
    cmd_rx: mpsc::Receiver<DrawCommand>,
    msg_tx: mpsc::Sender<LoopMessage>,
    msg_rx: mpsc::Receiver<LoopMessage>,
    animation: Option<ScheduledTask>,
    fade: Option<FadeOut>,
    fade_timer: Option<ScheduledTask>,
    finish_timer: Option<ScheduledTask>,
}

impl DrawController {
    /// Create a controller and return a handle to communicate with it
    pub fn new(
        store: ParticipantStore,
        config: &AppConfig,
        audio: AudioHandle,
        announcer: Arc<Announcer>,
        view: ViewSender,
    ) -> (Self, DrawHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (msg_tx, msg_rx) = mpsc::channel(64);

        let controller = Self {
            session: Session::new(store),
            draw: config.draw.clone(),
            audio_settings: config.audio.clone(),
            audio,
            announcer,
            view,
            rng: StdRng::from_entropy(),
            cmd_rx,
            msg_tx,
            msg_rx,
            animation: None,
            fade: None,
            fade_timer: None,
            finish_timer: None,
        };

        (controller, DrawHandle { tx: cmd_tx })
    }

    /// Replace the random source (deterministic draws in tests)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Run the event loop until a shutdown command arrives or every
    /// handle has been dropped
    pub async fn run(mut self) {
        self.emit(ViewUpdate::History(self.session.store.history().to_vec()));
        self.publish_controls();

        loop {
            tokio::select! {
                // Events already posted go before newer commands
                biased;

                Some(msg) = self.msg_rx.recv() => self.handle_message(msg),
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(DrawCommand::Shutdown) => break,
                    Some(cmd) => self.handle_command(cmd),
                    None => {
                        tracing::debug!("All draw handles dropped");
                        break;
                    }
                },
            }
        }

        self.animation = None;
        self.fade = None;
        self.fade_timer = None;
        self.finish_timer = None;
        self.audio.stop_background_loop();
        self.audio.shutdown();
        tracing::info!("Draw controller stopped");
    }

    fn handle_command(&mut self, cmd: DrawCommand) {
        tracing::debug!(?cmd, state = %self.session.state, "Command received");
        match cmd {
            DrawCommand::LoadParticipants(path) => self.load_participants(path),
            DrawCommand::StartDraw => self.start_draw(),
            DrawCommand::StopDraw => self.stop_draw(),
            DrawCommand::NextRound => self.next_round(),
            DrawCommand::Snapshot(reply) => {
                let _ = reply.send(self.session.snapshot());
            }
            DrawCommand::Shutdown => {}
        }
    }

    fn handle_message(&mut self, msg: LoopMessage) {
        match msg {
            LoopMessage::AnimationTick => self.on_animation_tick(),
            LoopMessage::FadeStep => self.on_fade_step(),
            LoopMessage::FinishSelection => self.finish_selection(),
            LoopMessage::LoadFinished { path, result } => self.on_load_finished(path, result),
            LoopMessage::AnnouncementFinished(result) => self.on_announcement_finished(result),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    fn load_participants(&mut self, path: PathBuf) {
        if !self.session.state.accepts_load() {
            self.warn("Finish the current round before loading participants");
            return;
        }
        if self.session.loading {
            self.warn("A participant file is already loading");
            return;
        }

        tracing::info!(path = %path.display(), "Loading participants");
        self.session.loading = true;
        self.emit(ViewUpdate::Loading);
        self.publish_controls();

        let tx = self.msg_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = LoadedRoster::read(&path);
            let _ = tx.blocking_send(LoopMessage::LoadFinished { path, result });
        });
    }

    fn on_load_finished(&mut self, path: PathBuf, result: Result<LoadedRoster, RosterError>) {
        self.session.loading = false;

        if !self.session.state.accepts_load() {
            self.warn("Participant file finished loading after a draw started; ignored");
            self.publish_controls();
            return;
        }

        match result {
            Ok(loaded) => {
                let count = self.session.store.install(loaded);
                self.emit(ViewUpdate::LoadFinished {
                    loaded: count,
                    error: None,
                });
                self.emit(ViewUpdate::PoolSize(count));
            }
            Err(e) => {
                if e.is_validation() {
                    tracing::warn!(path = %path.display(), error = %e, "Participant file rejected");
                } else {
                    tracing::error!(path = %path.display(), error = %e, "Failed to read participant file");
                }
                self.emit(ViewUpdate::LoadFinished {
                    loaded: 0,
                    error: Some(describe(&e)),
                });
            }
        }
        self.publish_controls();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Round
    // ─────────────────────────────────────────────────────────────────────────

    fn start_draw(&mut self) {
        if self.session.state != DrawState::Idle {
            self.warn(&format!("Cannot start a draw while {}", self.session.state));
            return;
        }
        if self.session.loading {
            self.warn("Wait for the participant file to finish loading");
            return;
        }
        if self.session.store.pool().is_empty() {
            self.warn("Please load participants first!");
            return;
        }

        tracing::info!(pool = self.session.store.pool().len(), "Draw started");
        self.session.state = DrawState::Drawing;
        self.session.displayed = None;
        self.audio.play_background_loop(self.audio_settings.start_gain());
        self.publish_controls();
        self.on_animation_tick();
    }

    /// One animation frame. Re-arms itself while the draw is running.
    fn on_animation_tick(&mut self) {
        self.animation = None;
        if !self.session.is_drawing() {
            return;
        }

        let Some(pick) = self.session.store.pool().choose(&mut self.rng).cloned() else {
            return;
        };
        self.emit(ViewUpdate::Name(pick.name.clone()));
        self.session.displayed = Some(pick);

        let tick = Duration::from_millis(self.draw.tick_interval_ms);
        self.animation = Some(ScheduledTask::after(
            tick,
            &self.msg_tx,
            LoopMessage::AnimationTick,
        ));
    }

    fn stop_draw(&mut self) {
        if self.session.state != DrawState::Drawing {
            self.warn("No draw is running");
            return;
        }

        tracing::info!("Draw stopping");
        self.session.state = DrawState::Stopping;
        self.publish_controls();

        self.fade = Some(FadeOut::new(
            self.audio_settings.start_gain(),
            self.audio_settings.fade_steps,
        ));
        self.on_fade_step();

        let delay = Duration::from_millis(self.draw.stop_delay_ms);
        self.finish_timer = Some(ScheduledTask::after(
            delay,
            &self.msg_tx,
            LoopMessage::FinishSelection,
        ));
    }

    /// One fade decrement. Re-arms itself until silence, then stops the loop.
    fn on_fade_step(&mut self) {
        self.fade_timer = None;
        let step = self
            .fade
            .as_mut()
            .and_then(|fade| fade.next_volume().map(|v| (v, fade.is_finished())));

        let Some((volume, finished)) = step else {
            self.fade = None;
            return;
        };

        self.audio.set_background_volume(volume);
        if finished {
            self.fade = None;
            self.audio.stop_background_loop();
        } else {
            let interval = Duration::from_millis(self.audio_settings.fade_interval_ms);
            self.fade_timer = Some(ScheduledTask::after(
                interval,
                &self.msg_tx,
                LoopMessage::FadeStep,
            ));
        }
    }

    /// Resolve the winner: whoever the animation showed last.
    fn finish_selection(&mut self) {
        self.finish_timer = None;
        if self.session.state != DrawState::Stopping {
            return;
        }

        self.animation = None;
        self.fade = None;
        self.fade_timer = None;
        self.audio.stop_background_loop();

        let Some(winner) = self.session.displayed.take() else {
            tracing::error!("Draw stopped without a displayed participant");
            self.emit(ViewUpdate::Error("No participant was selected".into()));
            self.session.state = DrawState::RoundComplete;
            self.publish_controls();
            return;
        };

        match self.session.store.remove_and_record_winner(winner.id) {
            Ok(outcome) => {
                for e in &outcome.persist_errors {
                    self.emit(ViewUpdate::Error(describe(e)));
                }
                let record = outcome.record;
                self.emit(ViewUpdate::Winner(record.clone()));
                self.emit(ViewUpdate::WinnerListed(
                    WinnerEntry::from(record.clone()).list_line(),
                ));
                self.emit(ViewUpdate::PoolSize(self.session.store.pool().len()));

                self.session.state = DrawState::Announcing;
                self.publish_controls();
                self.spawn_announcement(record.participant);
            }
            Err(e) => {
                tracing::error!(error = %e, "Winner missing from pool; draw state is inconsistent");
                self.emit(ViewUpdate::Error(describe(&e)));
                self.session.state = DrawState::RoundComplete;
                self.publish_controls();
            }
        }
    }

    fn spawn_announcement(&mut self, winner: Participant) {
        if !self.announcer.is_enabled() {
            self.on_announcement_finished(Ok(()));
            return;
        }

        let announcer = Arc::clone(&self.announcer);
        let tx = self.msg_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = announcer.announce_winner(&winner);
            announcer.cleanup();
            let _ = tx.blocking_send(LoopMessage::AnnouncementFinished(result));
        });
    }

    fn on_announcement_finished(&mut self, result: Result<(), AudioError>) {
        if self.session.state != DrawState::Announcing {
            return;
        }
        if let Err(e) = result {
            tracing::warn!(error = %e, "Winner announcement failed");
            self.emit(ViewUpdate::Error(format!(
                "Announcement failed: {}",
                describe(&e)
            )));
        }

        self.session.state = DrawState::RoundComplete;
        self.publish_controls();
    }

    fn next_round(&mut self) {
        if self.session.state != DrawState::RoundComplete {
            self.warn(&format!("Cannot advance to the next round while {}", self.session.state));
            return;
        }

        self.session.state = DrawState::Idle;
        self.session.displayed = None;
        self.audio.stop_background_loop();
        self.emit(ViewUpdate::Reset(READY_TEXT.to_string()));
        self.publish_controls();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View
    // ─────────────────────────────────────────────────────────────────────────

    fn controls(&self) -> Controls {
        let state = self.session.state;
        Controls {
            load: state.accepts_load() && !self.session.loading,
            start: state == DrawState::Idle
                && !self.session.loading
                && !self.session.store.pool().is_empty(),
            stop: state == DrawState::Drawing,
            next: state == DrawState::RoundComplete,
        }
    }

    fn publish_controls(&self) {
        self.emit(ViewUpdate::Controls(self.controls()));
    }

    fn warn(&self, message: &str) {
        tracing::warn!(state = %self.session.state, "{}", message);
        self.emit(ViewUpdate::Warning(message.to_string()));
    }

    fn emit(&self, update: ViewUpdate) {
        // A closed view only means nobody is watching
        let _ = self.view.send(update);
    }
}

/// Error message including its source chain
fn describe(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}
