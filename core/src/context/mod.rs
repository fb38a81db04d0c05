mod config;
mod error;

pub use config::{AnnouncementSettings, AppConfig, AppConfigExt, AudioSettings, DrawSettings};
pub use error::ConfigError;
