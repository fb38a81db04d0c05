use std::sync::Arc;
use std::thread::JoinHandle as ThreadHandle;

use lucky_draw_core::context::AppConfig;
use lucky_draw_core::{
    Announcer, AudioService, DrawController, DrawHandle, ParticipantStore, WinnersFile,
    create_view_channel,
};
use tokio::task::JoinHandle;

use crate::view;

/// Holds the running services for the terminal application.
/// The draw logic itself lives in the controller task.
pub struct CliContext {
    pub config: AppConfig,
    pub draw: DrawHandle,
    controller: JoinHandle<()>,
    renderer: JoinHandle<()>,
    audio_thread: ThreadHandle<()>,
}

impl CliContext {
    /// Start audio, the draw controller and the terminal renderer
    pub fn start(config: AppConfig) -> Result<Self, String> {
        let store = ParticipantStore::open(
            WinnersFile::new(&config.winners_file),
            config.clear_winners_on_start,
        );

        let (audio, audio_thread) =
            AudioService::spawn(config.audio.clone()).map_err(|e| e.to_string())?;
        let announcer = Arc::new(Announcer::from_settings(config.announcement.clone()));
        announcer.cleanup();

        let (view_tx, view_rx) = create_view_channel();
        let renderer = view::spawn_renderer(view_rx);

        let (controller, draw) = DrawController::new(store, &config, audio, announcer, view_tx);
        let controller = tokio::spawn(controller.run());

        Ok(Self {
            config,
            draw,
            controller,
            renderer,
            audio_thread,
        })
    }

    /// Stop the controller and wait for the audio thread and renderer to finish
    pub async fn shutdown(self) -> Result<(), String> {
        if let Err(e) = self.draw.shutdown().await {
            tracing::warn!(error = %e, "Draw controller already stopped");
        }
        self.controller.await.map_err(|e| e.to_string())?;
        self.renderer.await.map_err(|e| e.to_string())?;
        tokio::task::spawn_blocking(move || self.audio_thread.join())
            .await
            .map_err(|e| e.to_string())?
            .map_err(|_| "audio thread panicked".to_string())
    }
}
