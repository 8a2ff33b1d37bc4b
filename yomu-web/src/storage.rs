use gloo_storage::{LocalStorage, Storage};
use yomu_client::api::AuthToken;
use yomu_client::TokenStore;

const TOKEN_KEY: &str = "token";

/// Keeps the session token in the browser's local storage, so that
/// reloading the page does not log the user out.
pub struct BrowserTokenStore;

impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Option<AuthToken> {
        LocalStorage::get(TOKEN_KEY).ok()
    }

    fn store(&self, token: &AuthToken) {
        LocalStorage::set(TOKEN_KEY, token).expect("failed saving token to LocalStorage");
    }

    fn clear(&self) {
        LocalStorage::delete(TOKEN_KEY);
    }
}
