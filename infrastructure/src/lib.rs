//! Infrastructure layer for gov-arena
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod credentials;
pub mod gateway;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileConfig, FileDebateConfig,
    FileGatewayConfig, FileOutputConfig, FileOutputFormat, FileSeatsConfig, Severity,
};
pub use credentials::{ChainedCredentialProvider, EnvCredentialProvider, StaticCredentialProvider};
pub use gateway::AiGatewayClient;
pub use logging::JsonlConversationLogger;
