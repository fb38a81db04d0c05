//! Shared configuration types for the lucky draw
//!
//! This crate contains the serializable settings shared between the draw
//! engine (lucky-draw-core) and whatever front-end drives it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Draw Timing
// ─────────────────────────────────────────────────────────────────────────────

/// Timing of the name-cycling animation and the stop sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSettings {
    /// Interval between two animation frames
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Delay between `stop` and the winner being resolved
    #[serde(default = "default_stop_delay_ms")]
    pub stop_delay_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_stop_delay_ms() -> u64 {
    3000
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            stop_delay_ms: default_stop_delay_ms(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Background Music
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Master enable for background music
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Looping track played while names cycle. Missing file = silent draws.
    #[serde(default = "default_background_track")]
    pub background_track: PathBuf,

    /// Volume level (0-100) the loop starts at
    #[serde(default = "default_background_volume")]
    pub background_volume: u8,

    /// Number of equal decrements the fade-out takes to reach silence
    #[serde(default = "default_fade_steps")]
    pub fade_steps: u8,

    /// Delay between two fade decrements
    #[serde(default = "default_fade_interval_ms")]
    pub fade_interval_ms: u64,
}

fn default_background_track() -> PathBuf {
    PathBuf::from("audio/music_background.mp3")
}

fn default_background_volume() -> u8 {
    90
}

fn default_fade_steps() -> u8 {
    10
}

fn default_fade_interval_ms() -> u64 {
    300
}

impl AudioSettings {
    /// Start volume as a sink gain (0.0-1.0)
    pub fn start_gain(&self) -> f32 {
        f32::from(self.background_volume.min(100)) / 100.0
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            background_track: default_background_track(),
            background_volume: default_background_volume(),
            fade_steps: default_fade_steps(),
            fade_interval_ms: default_fade_interval_ms(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Winner Announcement
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementSettings {
    /// Speak the winner after each round
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Voice/locale passed to the speech program (e.g. "en", "vi")
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Program that renders speech to a wav file
    #[serde(default = "default_speech_program")]
    pub speech_program: String,

    /// Words spoken before the winner's name
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Words spoken after the winner's details
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Temporary file the announcement is rendered into
    #[serde(default = "default_scratch_file")]
    pub scratch_file: PathBuf,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_speech_program() -> String {
    "espeak-ng".to_string()
}

fn default_prefix() -> String {
    "Congratulations".to_string()
}

fn default_suffix() -> String {
    "HAS WON.".to_string()
}

fn default_scratch_file() -> PathBuf {
    PathBuf::from("winner.wav")
}

impl Default for AnnouncementSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            locale: default_locale(),
            speech_program: default_speech_program(),
            prefix: default_prefix(),
            suffix: default_suffix(),
            scratch_file: default_scratch_file(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// Note: Persistence methods (load/save) are provided by lucky-draw-core via
/// the `AppConfigExt` trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// JSON file the winners of this session are written to
    #[serde(default = "default_winners_file")]
    pub winners_file: PathBuf,

    /// Wipe the winners file when the application starts
    #[serde(default = "default_true")]
    pub clear_winners_on_start: bool,

    /// Debug level for the lucky draw crates
    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default)]
    pub draw: DrawSettings,

    #[serde(default)]
    pub audio: AudioSettings,

    #[serde(default)]
    pub announcement: AnnouncementSettings,
}

fn default_winners_file() -> PathBuf {
    PathBuf::from("winners.json")
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            winners_file: default_winners_file(),
            clear_winners_on_start: true,
            debug_logging: false,
            draw: DrawSettings::default(),
            audio: AudioSettings::default(),
            announcement: AnnouncementSettings::default(),
        }
    }
}
