//! Bearer token providers
//!
//! Tokens are read on every call and never cached here.

use std::sync::{PoisonError, RwLock};

use crate::domain::ports::TokenProvider;

/// Fixed token, replaceable at runtime (e.g. after a re-login)
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    token: RwLock<Option<String>>,
}

impl StaticTokenProvider {
    /// Provider holding `token`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Provider with no token; every call fails with `MissingToken`
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Replace the token; later calls see the new value.
    ///
    /// A poisoned lock still accepts the new token.
    pub fn set(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Reads the token from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    /// Provider reading the variable `var`
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable read on each call
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl TokenProvider for EnvTokenProvider {
    fn token(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_can_be_replaced() {
        let provider = StaticTokenProvider::new("first");
        assert_eq!(provider.token().as_deref(), Some("first"));

        provider.set(Some("second".to_string()));
        assert_eq!(provider.token().as_deref(), Some("second"));

        provider.set(None);
        assert!(provider.token().is_none());
        assert!(StaticTokenProvider::signed_out().token().is_none());
    }

    #[test]
    fn test_static_provider_survives_poisoned_lock() {
        let provider = std::sync::Arc::new(StaticTokenProvider::new("stale"));
        let holder = std::sync::Arc::clone(&provider);
        let panicked = std::thread::spawn(move || {
            let _guard = holder.token.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(panicked.is_err());
        assert!(provider.token.is_poisoned());

        provider.set(Some("fresh".to_string()));
        assert_eq!(provider.token().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_env_provider_reads_each_call() {
        let provider = EnvTokenProvider::new("LEADGEN_TEST_TOKEN_PROVIDER");

        temp_env::with_var("LEADGEN_TEST_TOKEN_PROVIDER", Some("abc"), || {
            assert_eq!(provider.token().as_deref(), Some("abc"));
        });
        temp_env::with_var("LEADGEN_TEST_TOKEN_PROVIDER", Some("  "), || {
            assert!(provider.token().is_none());
        });
        temp_env::with_var_unset("LEADGEN_TEST_TOKEN_PROVIDER", || {
            assert!(provider.token().is_none());
        });
    }
}
