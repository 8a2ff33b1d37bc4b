use std::sync::{Arc, Mutex};

use crate::api::AuthToken;

/// Durable storage for the session token
///
/// The web front implements this over the browser's local storage; native
/// callers and tests use [`MemoryTokenStore`].
pub trait TokenStore {
    fn load(&self) -> Option<AuthToken>;
    fn store(&self, token: &AuthToken);
    fn clear(&self);
}

/// The auth state holder
///
/// Owns the current token and keeps the durable store in sync with it. One
/// session is built at startup and handed to everything that issues
/// requests; nothing else looks at the stored token.
pub struct Session {
    token: Option<AuthToken>,
    store: Box<dyn TokenStore>,
}

impl Session {
    /// Builds the session from whatever the store remembers
    pub fn restore(store: Box<dyn TokenStore>) -> Session {
        let token = store.load();
        Session { token, store }
    }

    pub fn login(&mut self, token: AuthToken) {
        self.store.store(&token);
        self.token = Some(token);
    }

    pub fn logout(&mut self) {
        self.store.clear();
        self.token = None;
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }
}

/// Token store that forgets everything on drop, cloneable so tests can keep
/// a handle on what got persisted
#[derive(Clone, Default)]
pub struct MemoryTokenStore(Arc<Mutex<Option<AuthToken>>>);

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<AuthToken> {
        self.0.lock().expect("token store mutex poisoned").clone()
    }

    fn store(&self, token: &AuthToken) {
        *self.0.lock().expect("token store mutex poisoned") = Some(token.clone());
    }

    fn clear(&self) {
        *self.0.lock().expect("token store mutex poisoned") = None;
    }
}
