//! Credential providers
//!
//! Adapters for the [`CredentialProvider`] port. The binary chains them:
//! `--api-key` first, then the configured environment variable, then the
//! inline `gateway.api_key`.

use crate::config::FileGatewayConfig;
use arena_application::ports::credentials::{CredentialProvider, normalize_credential};
use std::sync::Arc;

/// Reads the credential from an environment variable at call time
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn credential(&self) -> Option<String> {
        normalize_credential(std::env::var(&self.var).ok().as_deref())
    }
}

/// A fixed credential (command line or config file)
pub struct StaticCredentialProvider {
    credential: Option<String>,
}

impl StaticCredentialProvider {
    pub fn new(credential: Option<&str>) -> Self {
        Self {
            credential: normalize_credential(credential),
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn credential(&self) -> Option<String> {
        self.credential.clone()
    }
}

/// First provider with a credential wins
#[derive(Default)]
pub struct ChainedCredentialProvider {
    providers: Vec<Arc<dyn CredentialProvider>>,
}

impl ChainedCredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// `override_key`, then `$api_key_env`, then `gateway.api_key`
    pub fn from_config(config: &FileGatewayConfig, override_key: Option<&str>) -> Self {
        Self::new()
            .with(Arc::new(StaticCredentialProvider::new(override_key)))
            .with(Arc::new(EnvCredentialProvider::new(config.api_key_env.as_str())))
            .with(Arc::new(StaticCredentialProvider::new(
                config.api_key.as_deref(),
            )))
    }
}

impl CredentialProvider for ChainedCredentialProvider {
    fn credential(&self) -> Option<String> {
        self.providers.iter().find_map(|p| p.credential())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_blank_is_absent() {
        assert_eq!(StaticCredentialProvider::new(Some("  ")).credential(), None);
        assert_eq!(
            StaticCredentialProvider::new(Some(" key ")).credential(),
            Some("key".to_string())
        );
    }

    #[test]
    fn test_env_provider_reads_unset_var_as_absent() {
        let provider = EnvCredentialProvider::new("GOV_ARENA_TEST_SURELY_UNSET_VAR");
        assert_eq!(provider.credential(), None);
    }

    #[test]
    fn test_chain_prefers_first_present() {
        let chain = ChainedCredentialProvider::new()
            .with(Arc::new(StaticCredentialProvider::new(None)))
            .with(Arc::new(StaticCredentialProvider::new(Some("second"))))
            .with(Arc::new(StaticCredentialProvider::new(Some("third"))));
        assert_eq!(chain.credential(), Some("second".to_string()));
    }

    #[test]
    fn test_from_config_override_wins() {
        let config = FileGatewayConfig {
            api_key_env: "GOV_ARENA_TEST_SURELY_UNSET_VAR".to_string(),
            api_key: Some("from-file".to_string()),
            ..Default::default()
        };

        let chain = ChainedCredentialProvider::from_config(&config, Some("from-flag"));
        assert_eq!(chain.credential(), Some("from-flag".to_string()));

        let chain = ChainedCredentialProvider::from_config(&config, Some(""));
        assert_eq!(chain.credential(), Some("from-file".to_string()));
    }

    #[test]
    fn test_empty_chain_has_nothing() {
        assert!(ChainedCredentialProvider::new().credential().is_none());
    }
}
