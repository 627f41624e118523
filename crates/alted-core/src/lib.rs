pub mod attachment;
pub mod caption;
pub mod config;
pub mod error;

pub use caption::{CaptionBuffer, MAX_CAPTION_CHARS};
pub use config::AltedConfig;
pub use error::{AltedError, Result};
