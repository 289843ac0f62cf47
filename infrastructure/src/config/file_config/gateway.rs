//! Gateway configuration from TOML (`[gateway]` section)

use serde::{Deserialize, Serialize};

/// Default OpenAI-compatible endpoint of the AI gateway
pub const DEFAULT_BASE_URL: &str = "https://ai-gateway.vercel.sh/v1";

/// Default environment variable holding the gateway key
pub const DEFAULT_API_KEY_ENV: &str = "AI_GATEWAY_API_KEY";

/// Raw gateway configuration from TOML
///
/// # Example
///
/// ```toml
/// [gateway]
/// base_url = "https://ai-gateway.vercel.sh/v1"
/// api_key_env = "AI_GATEWAY_API_KEY"
/// # api_key = "..."              # discouraged: prefer the environment
/// request_timeout_secs = 120
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    pub base_url: String,
    /// Environment variable read for the credential
    pub api_key_env: String,
    /// Inline credential, used when the environment variable is unset
    pub api_key: Option<String>,
    /// Transport-level timeout, independent of the per-attempt deadline
    pub request_timeout_secs: Option<u64>,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            request_timeout_secs: None,
        }
    }
}
