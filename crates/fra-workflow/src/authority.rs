//! Token-table authority context

use fra_domain::traits::AuthorityContext;
use fra_domain::{Authority, AuthorityError};
use std::collections::HashMap;

/// Resolves session tokens from a fixed table
///
/// Credential issuance lives outside this system; the table is loaded from
/// configuration and only maps opaque tokens to officers.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthority {
    officers: HashMap<String, Authority>,
}

impl StaticAuthority {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an officer under a session token, replacing any previous one
    pub fn insert(&mut self, token: impl Into<String>, authority: Authority) {
        self.officers.insert(token.into(), authority);
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_officer(mut self, token: impl Into<String>, authority: Authority) -> Self {
        self.insert(token, authority);
        self
    }

    /// Number of registered tokens
    pub fn len(&self) -> usize {
        self.officers.len()
    }

    /// Whether no tokens are registered
    pub fn is_empty(&self) -> bool {
        self.officers.is_empty()
    }
}

impl AuthorityContext for StaticAuthority {
    fn resolve(&self, session_token: &str) -> Result<Authority, AuthorityError> {
        let token = session_token.trim();
        if token.is_empty() {
            return Err(AuthorityError::Unauthenticated);
        }
        self.officers
            .get(token)
            .cloned()
            .ok_or(AuthorityError::Unauthenticated)
    }
}
