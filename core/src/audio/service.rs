//! Background music playback service
//!
//! Runs on a dedicated OS thread, receiving AudioEvents via channel. The
//! output stream is owned by that thread and opened on first use, so a
//! machine without a sound device only loses music, never the draw.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tokio::sync::mpsc;

use lucky_draw_types::AudioSettings;

use super::events::AudioEvent;

/// The looping track, held in memory and decoded afresh for each play
pub struct BackgroundTrack {
    path: PathBuf,
    data: Option<Arc<[u8]>>,
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
}

impl BackgroundTrack {
    /// Load the track. A missing or undecodable file leaves a silent track.
    pub fn setup(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = match std::fs::read(&path) {
            Ok(bytes) => {
                let data: Arc<[u8]> = bytes.into();
                match Decoder::new(Cursor::new(Arc::clone(&data))) {
                    Ok(_) => {
                        tracing::info!(path = %path.display(), "Background music loaded");
                        Some(data)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Background music is not decodable, draws will be silent");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Background music unavailable, draws will be silent");
                None
            }
        };

        Self {
            path,
            data,
            output: None,
            sink: None,
        }
    }

    /// Track that never plays (music disabled in settings)
    pub fn silent() -> Self {
        Self {
            path: PathBuf::new(),
            data: None,
            output: None,
            sink: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.sink.is_some()
    }

    /// Restart the loop at `volume`. No-op without a track or output device.
    pub fn play_loop(&mut self, volume: f32) {
        let Some(data) = self.data.clone() else {
            return;
        };
        self.stop();

        if self.output.is_none() {
            match OutputStream::try_default() {
                Ok(output) => self.output = Some(output),
                Err(e) => {
                    tracing::warn!(error = %e, "No audio output device, background music disabled");
                    self.data = None;
                    return;
                }
            }
        }
        let Some((_, handle)) = self.output.as_ref() else {
            return;
        };

        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create background sink");
                return;
            }
        };
        let source = match Decoder::new(Cursor::new(data)) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to decode background music");
                return;
            }
        };

        sink.set_volume(volume);
        sink.append(source.repeat_infinite());
        self.sink = Some(sink);
        tracing::debug!(volume, "Background music started");
    }

    pub fn set_volume(&mut self, volume: f32) {
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            tracing::debug!("Background music stopped");
        }
    }
}

/// Audio service that owns the background track
pub struct AudioService {
    event_rx: mpsc::Receiver<AudioEvent>,
    track: BackgroundTrack,
}

impl AudioService {
    pub fn new(event_rx: mpsc::Receiver<AudioEvent>, track: BackgroundTrack) -> Self {
        Self { event_rx, track }
    }

    /// Start the audio thread. The track is loaded on that thread since the
    /// output stream cannot move between threads.
    pub fn spawn(settings: AudioSettings) -> std::io::Result<(AudioHandle, std::thread::JoinHandle<()>)> {
        let (tx, rx) = create_audio_channel();
        let thread = std::thread::Builder::new()
            .name("lucky-draw-audio".into())
            .spawn(move || {
                let track = if settings.enabled {
                    BackgroundTrack::setup(&settings.background_track)
                } else {
                    BackgroundTrack::silent()
                };
                AudioService::new(rx, track).run();
            })?;
        Ok((AudioHandle::new(tx), thread))
    }

    /// Run the service (blocking loop)
    pub fn run(mut self) {
        while let Some(event) = self.event_rx.blocking_recv() {
            match event {
                AudioEvent::PlayBackground { volume } => self.track.play_loop(volume),
                AudioEvent::SetBackgroundVolume(volume) => self.track.set_volume(volume),
                AudioEvent::StopBackground => self.track.stop(),
                AudioEvent::Shutdown => break,
            }
        }
        self.track.stop();
        tracing::debug!("Audio service stopped");
    }
}

/// Sender handle for sending audio events
pub type AudioSender = mpsc::Sender<AudioEvent>;

/// Create a new audio channel
pub fn create_audio_channel() -> (AudioSender, mpsc::Receiver<AudioEvent>) {
    mpsc::channel(64)
}

/// Non-blocking front for the audio thread, used from the event loop
#[derive(Clone)]
pub struct AudioHandle {
    tx: AudioSender,
}

impl AudioHandle {
    pub fn new(tx: AudioSender) -> Self {
        Self { tx }
    }

    pub fn play_background_loop(&self, volume: f32) {
        self.send(AudioEvent::PlayBackground { volume });
    }

    pub fn set_background_volume(&self, volume: f32) {
        self.send(AudioEvent::SetBackgroundVolume(volume));
    }

    pub fn stop_background_loop(&self) {
        self.send(AudioEvent::StopBackground);
    }

    pub fn shutdown(&self) {
        self.send(AudioEvent::Shutdown);
    }

    fn send(&self, event: AudioEvent) {
        if let Err(e) = self.tx.try_send(event) {
            tracing::warn!(error = %e, "Audio event dropped");
        }
    }
}
