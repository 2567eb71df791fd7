//! Caller identity supplied by the authentication gateway.

use std::fmt;

/// Opaque identifier of the authenticated caller.
///
/// This is the raw value the gateway forwards; it becomes a customer id only
/// after [`crate::services::identity::IdentityResolver`] has looked it up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    /// Wrap a non-blank identifier, trimming surrounding whitespace.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
