//! Bearer token port

/// Source of the bearer token attached to every generation call.
///
/// The client asks for the token on each call and never caches it, so a
/// provider backed by a refreshing session always hands out the current one.
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` when the caller is not signed in
    fn token(&self) -> Option<String>;
}
