//! Audio subsystem for background music and winner announcements
//!
//! Background music runs on its own thread fed by [`AudioEvent`]s; the
//! announcement is a blocking call made from a worker.

mod announce;
mod error;
mod events;
mod fade;
mod service;

pub use announce::{Announcer, ClipPlayer, EspeakEngine, RodioClipPlayer, SpeechEngine};
pub use error::AudioError;
pub use events::AudioEvent;
pub use fade::FadeOut;
pub use service::{AudioHandle, AudioSender, AudioService, BackgroundTrack, create_audio_channel};
