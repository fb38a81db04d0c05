//! Spoken winner announcement
//!
//! Speech is rendered into a scratch audio file, played to the end and the
//! file removed again. Everything here blocks, so callers run it on a worker.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::Command;

use rodio::{Decoder, OutputStream, Sink};

use lucky_draw_types::AnnouncementSettings;

use super::error::AudioError;
use crate::roster::Participant;

/// Renders text to a playable audio file
pub trait SpeechEngine: Send + Sync {
    fn render_to_file(&self, text: &str, locale: &str, out: &Path) -> Result<(), AudioError>;
}

/// Plays an audio file and returns once it finished
pub trait ClipPlayer: Send + Sync {
    fn play_to_end(&self, path: &Path) -> Result<(), AudioError>;
}

/// eSpeak-compatible command line synthesizer (`<program> -v <locale> -w <out> <text>`)
pub struct EspeakEngine {
    program: String,
}

impl EspeakEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SpeechEngine for EspeakEngine {
    fn render_to_file(&self, text: &str, locale: &str, out: &Path) -> Result<(), AudioError> {
        let output = Command::new(&self.program)
            .arg("-v")
            .arg(locale)
            .arg("-w")
            .arg(out)
            .arg(text)
            .output()
            .map_err(|source| AudioError::Speech {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AudioError::SpeechExit {
                program: self.program.clone(),
                status: output.status,
            });
        }
        Ok(())
    }
}

/// Plays through the default output device, opened per clip
pub struct RodioClipPlayer;

impl ClipPlayer for RodioClipPlayer {
    fn play_to_end(&self, path: &Path) -> Result<(), AudioError> {
        let (_stream, stream_handle) = OutputStream::try_default().map_err(AudioError::OpenOutput)?;
        let file = File::open(path).map_err(|source| AudioError::Scratch {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let sink = Sink::try_new(&stream_handle).map_err(AudioError::Play)?;

        sink.set_volume(1.0);
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

pub struct Announcer {
    settings: AnnouncementSettings,
    engine: Box<dyn SpeechEngine>,
    player: Box<dyn ClipPlayer>,
}

impl Announcer {
    pub fn new(
        settings: AnnouncementSettings,
        engine: Box<dyn SpeechEngine>,
        player: Box<dyn ClipPlayer>,
    ) -> Self {
        Self {
            settings,
            engine,
            player,
        }
    }

    /// Announcer using the configured speech program and the default output device
    pub fn from_settings(settings: AnnouncementSettings) -> Self {
        let engine = EspeakEngine::new(settings.speech_program.clone());
        Self::new(settings, Box::new(engine), Box::new(RodioClipPlayer))
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn scratch_file(&self) -> &Path {
        &self.settings.scratch_file
    }

    /// "<prefix> <name> - <group> - <department> <suffix>", skipping absent parts
    pub fn text_for(&self, winner: &Participant) -> String {
        let mut text = format!("{} {}", self.settings.prefix, winner.name);
        for part in [&winner.group, &winner.department].into_iter().flatten() {
            text.push_str(" - ");
            text.push_str(part);
        }
        text.push(' ');
        text.push_str(&self.settings.suffix);
        text
    }

    /// Speak the winner. Blocks until playback ends.
    ///
    /// The scratch file is removed before rendering and again afterwards,
    /// whether or not playback succeeded.
    pub fn announce_winner(&self, winner: &Participant) -> Result<(), AudioError> {
        let path = self.scratch_file();
        remove_if_present(path)?;

        let text = self.text_for(winner);
        tracing::info!(winner = %winner.name, locale = %self.settings.locale, "Announcing winner");

        let result = self
            .engine
            .render_to_file(&text, &self.settings.locale, path)
            .and_then(|()| self.player.play_to_end(path));

        if let Err(e) = remove_if_present(path) {
            tracing::warn!(error = %e, "Announcement file left behind");
        }
        result
    }

    /// Best-effort removal of a scratch file a previous round failed to delete
    pub fn cleanup(&self) {
        if let Err(e) = remove_if_present(self.scratch_file()) {
            tracing::warn!(error = %e, "Error cleaning up announcement file");
        }
    }
}

fn remove_if_present(path: &Path) -> Result<(), AudioError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(AudioError::Scratch {
            path: PathBuf::from(path),
            source,
        }),
    }
}
