//! Signed-in user session.
//!
//! # Responsibility
//! - Supply the bearer credential attached to remote task requests.
//! - Persist, restore and clear the signed-in user blob (`userData`).
//! - Decide the start route: sign-in screen or task lists.
//!
//! # Invariants
//! - No global header state: the session is injected where it is needed.
//! - `StoredSession` re-reads the blob on every call, so logout takes effect
//!   on the next request.
//! - Tokens are never logged.

use crate::kv::{KeyValueStore, KvResult, SharedKv};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Blob key holding the signed-in user.
pub const USER_DATA_KEY: &str = "userData";

/// Supplies the credential for outgoing task requests.
pub trait Session: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

pub type SharedSession = Arc<dyn Session>;

/// Session with a fixed token (or none).
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

impl Session for StaticSession {
    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Profile returned by sign-in and kept on device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
struct UserData {
    user: Option<UserProfile>,
}

/// Where the app lands on start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartRoute {
    Auth,
    Home(UserProfile),
}

/// Session backed by the persisted `userData` blob.
pub struct StoredSession {
    kv: SharedKv,
}

impl StoredSession {
    pub fn new(kv: SharedKv) -> Self {
        Self { kv }
    }
}

impl Session for StoredSession {
    fn bearer_token(&self) -> Option<String> {
        load_user(&self.kv).map(|user| user.token)
    }
}

/// Reads the signed-in user; unreadable or corrupt blobs count as signed out.
pub fn load_user(kv: &SharedKv) -> Option<UserProfile> {
    let blob = match kv.get(USER_DATA_KEY) {
        Ok(Some(blob)) => blob,
        Ok(None) => return None,
        Err(err) => {
            warn!("event=session_restore module=session status=error error_code=blob_read_failed error={err}");
            return None;
        }
    };
    match serde_json::from_str::<UserData>(&blob) {
        Ok(data) => data.user.filter(|user| !user.token.trim().is_empty()),
        Err(_) => {
            warn!("event=session_restore module=session status=degraded reason=unparsable_blob");
            None
        }
    }
}

/// Persists the user returned by a successful sign-in.
pub fn save_user(kv: &SharedKv, user: &UserProfile) -> KvResult<()> {
    let blob = serde_json::to_string(&UserData {
        user: Some(user.clone()),
    })
    .map_err(|err| crate::kv::KvError::Unavailable(format!("serialize failed: {err}")))?;
    kv.set(USER_DATA_KEY, &blob)?;
    info!("event=session_save module=session status=ok");
    Ok(())
}

/// Clears the signed-in user.
pub fn logout(kv: &SharedKv) -> KvResult<()> {
    kv.remove(USER_DATA_KEY)?;
    info!("event=session_logout module=session status=ok");
    Ok(())
}

pub fn resolve_start_route(kv: &SharedKv) -> StartRoute {
    match load_user(kv) {
        Some(user) => StartRoute::Home(user),
        None => StartRoute::Auth,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        logout, resolve_start_route, save_user, Session, StartRoute, StoredSession, UserProfile,
        USER_DATA_KEY,
    };
    use crate::kv::{KeyValueStore, MemoryKeyValueStore, SharedKv};
    use std::sync::Arc;

    fn profile() -> UserProfile {
        UserProfile {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            token: "tok-1".to_string(),
        }
    }

    #[test]
    fn start_route_follows_saved_user_and_logout() {
        let kv: SharedKv = Arc::new(MemoryKeyValueStore::new());
        assert_eq!(resolve_start_route(&kv), StartRoute::Auth);

        save_user(&kv, &profile()).unwrap();
        assert_eq!(resolve_start_route(&kv), StartRoute::Home(profile()));

        let session = StoredSession::new(kv.clone());
        assert_eq!(session.bearer_token().as_deref(), Some("tok-1"));

        logout(&kv).unwrap();
        assert_eq!(session.bearer_token(), None);
        assert_eq!(resolve_start_route(&kv), StartRoute::Auth);
    }

    #[test]
    fn corrupt_or_tokenless_blob_routes_to_auth() {
        let kv: SharedKv = Arc::new(MemoryKeyValueStore::new());
        kv.set(USER_DATA_KEY, "{not json").unwrap();
        assert_eq!(resolve_start_route(&kv), StartRoute::Auth);

        kv.set(USER_DATA_KEY, r#"{"user":{"name":"x","email":"y","token":"  "}}"#)
            .unwrap();
        assert_eq!(resolve_start_route(&kv), StartRoute::Auth);

        kv.set(USER_DATA_KEY, "{}").unwrap();
        assert_eq!(resolve_start_route(&kv), StartRoute::Auth);
    }
}
