//! Audio event types sent from the draw controller

/// Commands for the background-music thread
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// Start the looping track from the top at the given gain (0.0-1.0)
    PlayBackground { volume: f32 },

    /// Adjust the gain of the running loop (fade steps)
    SetBackgroundVolume(f32),

    /// Stop the loop. Harmless when nothing is playing.
    StopBackground,

    /// Stop playback and end the audio thread
    Shutdown,
}
