//! Configuration file loading for gov-arena
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./arena.toml` or `./.arena.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/gov-arena/config.toml`
//! 4. Fallback: `~/.config/gov-arena/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigValidationError, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, FileConfig,
    FileDebateConfig, FileGatewayConfig, FileOutputConfig, FileOutputFormat, FileSeatsConfig,
    Severity,
};
pub use loader::ConfigLoader;
