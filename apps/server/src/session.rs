//! Per-user state kept between requests: queued flash messages and the last
//! criteria submitted to each search page.

use std::collections::HashMap;
use std::sync::Mutex;

use asxtrade_core::dashboard::Message;
use serde::{de::DeserializeOwned, Serialize};

#[derive(Default)]
struct UserSession {
    flash: Vec<Message>,
    searches: HashMap<&'static str, serde_json::Value>,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, UserSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_session<T>(&self, user_id: &str, f: impl FnOnce(&mut UserSession) -> T) -> T {
        // A poisoned lock only means another request panicked mid-update.
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(sessions.entry(user_id.to_string()).or_default())
    }

    /// Queues a message for the next page this user sees.
    pub fn flash(&self, user_id: &str, message: Message) {
        self.with_session(user_id, |s| s.flash.push(message));
    }

    pub fn take_flash(&self, user_id: &str) -> Vec<Message> {
        self.with_session(user_id, |s| std::mem::take(&mut s.flash))
    }

    pub fn remember<C: Serialize>(&self, user_id: &str, view: &'static str, criteria: &C) {
        match serde_json::to_value(criteria) {
            Ok(value) => self.with_session(user_id, |s| {
                s.searches.insert(view, value);
            }),
            Err(e) => tracing::warn!("Cannot remember {} criteria: {}", view, e),
        }
    }

    pub fn recall<C: DeserializeOwned>(&self, user_id: &str, view: &'static str) -> Option<C> {
        let value = self.with_session(user_id, |s| s.searches.get(view).cloned())?;
        serde_json::from_value(value).ok()
    }
}
