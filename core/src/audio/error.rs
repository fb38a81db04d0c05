//! Error types for audio playback and speech synthesis

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to run speech program '{program}'")]
    Speech {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("speech program '{program}' exited with {status}")]
    SpeechExit {
        program: String,
        status: std::process::ExitStatus,
    },

    #[error("no audio output device available")]
    OpenOutput(#[source] rodio::StreamError),

    #[error("failed to decode {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("failed to start playback")]
    Play(#[source] rodio::PlayError),

    #[error("failed to access announcement file {path}")]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
