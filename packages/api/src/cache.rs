//! Where the signed-in session is kept between page loads.

use std::cell::RefCell;

use store::Session;

pub trait SessionCache {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session);
    fn clear(&self);
}

/// Keeps the session for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryCache {
    slot: RefCell<Option<Session>>,
}

impl SessionCache for MemoryCache {
    fn load(&self) -> Option<Session> {
        self.slot.borrow().clone()
    }

    fn save(&self, session: &Session) {
        *self.slot.borrow_mut() = Some(session.clone());
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}

/// Browser `localStorage`, one JSON entry under `key`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageCache {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageCache {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionCache for LocalStorageCache {
    fn load(&self) -> Option<Session> {
        let raw = Self::storage()?.get_item(&self.key).ok()??;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored session");
                self.clear();
                None
            }
        }
    }

    fn save(&self, session: &Session) {
        let Some(storage) = Self::storage() else {
            return;
        };
        match serde_json::to_string(session) {
            Ok(raw) => {
                if let Err(e) = storage.set_item(&self.key, &raw) {
                    tracing::warn!(error = ?e, "Could not persist session");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Could not serialise session"),
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.remove_item(&self.key) {
                tracing::warn!(error = ?e, "Could not clear stored session");
            }
        }
    }
}
