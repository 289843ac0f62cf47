//! Credential provider port
//!
//! Supplies the key that authorizes generation calls. The core only reads it;
//! where it comes from (environment, config file, command line) is the
//! adapter's business.

/// Source of the gateway credential, read at call time
pub trait CredentialProvider: Send + Sync {
    /// The credential, or `None` when absent. Blank values count as absent.
    fn credential(&self) -> Option<String>;
}

/// Trim a raw credential; blank becomes `None`
pub fn normalize_credential(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}

/// Provider that never has a credential
pub struct NoCredential;

impl CredentialProvider for NoCredential {
    fn credential(&self) -> Option<String> {
        None
    }
}
