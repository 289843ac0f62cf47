//! Model identifier value object

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a text-generation model routed through the AI gateway (Value Object)
///
/// Identifiers follow the `"<provider>/<model-name>"` convention used by the
/// gateway, e.g. `"openai/gpt-5.1"` or `"anthropic/claude-sonnet-4.5"`.
/// A blank identifier means "no model assigned".
///
/// # Example
///
/// ```
/// use arena_domain::ModelId;
///
/// let model = ModelId::new("anthropic/claude-sonnet-4.5");
/// assert_eq!(model.provider(), "anthropic");
/// assert_eq!(model.name(), "claude-sonnet-4.5");
/// assert!(ModelId::new("  ").is_unassigned());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    /// The unassigned model (empty identifier)
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifier is empty
    pub fn is_unassigned(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Provider part: everything before the first `/`
    ///
    /// An identifier without a separator is its own provider.
    pub fn provider(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    /// Model name part: everything after the first `/`
    pub fn name(&self) -> &str {
        self.0.split_once('/').map(|(_, name)| name).unwrap_or(&self.0)
    }

    /// Default line-up used when no seats are configured
    pub fn default_models() -> Vec<ModelId> {
        vec![
            ModelId::new("openai/gpt-5.1"),
            ModelId::new("anthropic/claude-sonnet-4.5"),
            ModelId::new("google/gemini-3-pro-preview"),
        ]
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(ModelId::new(s))
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        ModelId::new(s)
    }
}

impl Serialize for ModelId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ModelId::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_derivation() {
        assert_eq!(ModelId::new("openai/gpt-5.1").provider(), "openai");
        assert_eq!(ModelId::new("xai/grok-4/fast").provider(), "xai");
        assert_eq!(ModelId::new("xai/grok-4/fast").name(), "grok-4/fast");
        assert_eq!(ModelId::new("local-model").provider(), "local-model");
    }

    #[test]
    fn test_unassigned() {
        assert!(ModelId::unassigned().is_unassigned());
        assert!(ModelId::new("   ").is_unassigned());
        assert!(!ModelId::new("openai/gpt-5").is_unassigned());
    }

    #[test]
    fn test_trims_input() {
        let model: ModelId = "  openai/gpt-5  ".parse().unwrap();
        assert_eq!(model.as_str(), "openai/gpt-5");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ModelId::new("openai/gpt-5")).unwrap();
        assert_eq!(json, "\"openai/gpt-5\"");
        let back: ModelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ModelId::new("openai/gpt-5"));
    }
}
