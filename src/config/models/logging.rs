//! Logging configuration

use crate::utils::logging::LogLevel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub json: bool,
}
