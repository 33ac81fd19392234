//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::DefaultClock;

use crate::inbound::http::state::{HttpState, Repositories};
use crate::outbound::memory::MemoryStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state backed by a fresh in-memory store.
pub fn memory_state() -> (Arc<MemoryStore>, HttpState) {
    let store = Arc::new(MemoryStore::new());
    let state = HttpState::new(
        Repositories {
            users: Arc::clone(&store) as _,
            ingredients: Arc::clone(&store) as _,
            recipes: Arc::clone(&store) as _,
            relations: Arc::clone(&store) as _,
            shopping_list: Arc::clone(&store) as _,
        },
        Arc::new(DefaultClock),
    );
    (store, state)
}
