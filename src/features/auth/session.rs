//! The client-side authentication session and its state machine. The store
//! owns the session, applies every transition, notifies subscribers
//! synchronously, and writes identity fields through to durable storage on
//! each change. In-memory state stays authoritative when persistence fails.
//!
//! A session moves anonymous -> registered-unverified -> verified purely in
//! response to API outcomes applied by the orchestrator; nothing else mutates
//! it.

use crate::app_lib::storage::KeyValueStore;
use serde::{Deserialize, Serialize};

/// Durable-store key for the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Durable-store key for the JSON-serialized user profile.
pub const USER_KEY: &str = "user";

/// Profile attached to a session. The email is the identity anchor; the rest
/// is optional decoration the API may or may not return.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl User {
    pub fn from_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            role: None,
        }
    }
}

/// Outcome of the most recent orchestrated request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// In-memory authentication state.
///
/// Invariant: `verified` is only true while `token` or `user` is present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub verified: bool,
    pub status: RequestStatus,
    pub error: Option<String>,
}

type Subscriber = Box<dyn Fn(&Session)>;

/// Owns the session and the durable store behind it. All mutation goes
/// through the transition methods below; subscribers observe every transition
/// synchronously, before control returns to the caller.
pub struct SessionStore<S: KeyValueStore> {
    session: Session,
    storage: S,
    subscribers: Vec<Subscriber>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Rehydrates the session from durable storage. A corrupt or missing user
    /// entry degrades to an anonymous session; a recovered user seeds
    /// `verified` since only verified sessions ever persist one.
    pub fn initialize(storage: S) -> Self {
        let token = storage.get(TOKEN_KEY);
        let user = storage.get(USER_KEY).and_then(|raw| parse_stored_user(&raw));

        Self {
            session: Session {
                token,
                verified: user.is_some(),
                user,
                status: RequestStatus::Idle,
                error: None,
            },
            storage,
            subscribers: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Registers a subscriber invoked after every transition.
    pub fn subscribe(&mut self, subscriber: impl Fn(&Session) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Stores the bearer token and marks the session verified; a token is
    /// only ever issued after at least one verified step.
    pub fn set_token(&mut self, token: &str) {
        self.session.token = Some(token.to_string());
        self.session.verified = true;
        self.storage.set(TOKEN_KEY, token);
        self.notify();
    }

    /// Stores the user profile and writes the serialized copy through.
    pub fn set_user(&mut self, user: User) {
        if let Ok(raw) = serde_json::to_string(&user) {
            self.storage.set(USER_KEY, &raw);
        }
        self.session.user = Some(user);
        self.notify();
    }

    /// Marks the session verified when identity evidence exists; a no-op
    /// otherwise, which keeps the verified-implies-identity invariant
    /// structural.
    pub fn confirm_verification(&mut self) {
        if self.session.token.is_some() || self.session.user.is_some() {
            self.session.verified = true;
        }
        self.notify();
    }

    pub fn mark_pending(&mut self) {
        self.session.status = RequestStatus::Pending;
        self.session.error = None;
        self.notify();
    }

    pub fn mark_succeeded(&mut self) {
        self.session.status = RequestStatus::Succeeded;
        self.session.error = None;
        self.notify();
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.session.status = RequestStatus::Failed;
        self.session.error = Some(message.into());
        self.notify();
    }

    pub fn clear_error(&mut self) {
        self.session.error = None;
        self.notify();
    }

    /// Resets to the empty session and drops both durable keys. Idempotent.
    pub fn logout(&mut self) {
        self.session = Session::default();
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        self.notify();
    }

    /// Last persisted profile, used as the fetch-info fallback when the API
    /// answers "not modified".
    pub fn cached_user(&self) -> Option<User> {
        self.storage
            .get(USER_KEY)
            .and_then(|raw| parse_stored_user(&raw))
    }

    /// Token as persisted, for callers resolving one outside session state.
    pub fn stored_token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    fn notify(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.session);
        }
    }
}

/// Decodes a persisted profile, treating corrupt JSON and the literal
/// `"undefined"` some storage layers leave behind as absent.
fn parse_stored_user(raw: &str) -> Option<User> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "undefined" {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

#[cfg(test)]
mod tests {
    use super::{RequestStatus, Session, SessionStore, TOKEN_KEY, USER_KEY, User};
    use crate::app_lib::storage::{KeyValueStore, MemoryStore};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn assert_verified_invariant(session: &Session) {
        if session.verified {
            assert!(session.token.is_some() || session.user.is_some());
        }
    }

    #[test]
    fn initialize_recovers_verified_session() {
        let storage = MemoryStore::with_entries(&[
            (TOKEN_KEY, "abc"),
            (USER_KEY, r#"{"email":"a@b.com"}"#),
        ]);
        let store = SessionStore::initialize(storage);

        let session = store.session();
        assert_eq!(session.token.as_deref(), Some("abc"));
        assert_eq!(session.user, Some(User::from_email("a@b.com")));
        assert!(session.verified);
        assert_eq!(session.status, RequestStatus::Idle);
    }

    #[test]
    fn initialize_degrades_on_corrupt_user() {
        for raw in ["{not json", "undefined", "  "] {
            let storage = MemoryStore::with_entries(&[(USER_KEY, raw)]);
            let store = SessionStore::initialize(storage);

            assert_eq!(store.session().user, None);
            assert!(!store.session().verified);
        }
    }

    #[test]
    fn initialize_with_token_only_is_unverified() {
        let storage = MemoryStore::with_entries(&[(TOKEN_KEY, "abc")]);
        let store = SessionStore::initialize(storage);

        assert_eq!(store.session().token.as_deref(), Some("abc"));
        assert!(!store.session().verified);
    }

    #[test]
    fn set_token_persists_and_verifies() {
        let mut store = SessionStore::initialize(MemoryStore::new());
        store.set_token("xyz");

        assert!(store.session().verified);
        assert_eq!(store.stored_token().as_deref(), Some("xyz"));
        assert_verified_invariant(store.session());
    }

    #[test]
    fn set_user_writes_through_serialized() {
        let mut store = SessionStore::initialize(MemoryStore::new());
        store.set_user(User {
            email: "a@b.com".to_string(),
            display_name: Some("Ada".to_string()),
            role: None,
        });

        let cached = store.cached_user().expect("persisted user");
        assert_eq!(cached.email, "a@b.com");
        assert_eq!(cached.display_name.as_deref(), Some("Ada"));
        // A user alone does not verify the session.
        assert!(!store.session().verified);
    }

    #[test]
    fn confirm_verification_requires_evidence() {
        let mut store = SessionStore::initialize(MemoryStore::new());
        store.confirm_verification();
        assert!(!store.session().verified);

        store.set_user(User::from_email("a@b.com"));
        store.confirm_verification();
        assert!(store.session().verified);
        assert_verified_invariant(store.session());
    }

    #[test]
    fn request_markers_only_touch_status_and_error() {
        let mut store = SessionStore::initialize(MemoryStore::new());
        store.set_token("abc");

        store.mark_pending();
        assert_eq!(store.session().status, RequestStatus::Pending);
        assert_eq!(store.session().error, None);

        store.mark_failed("Login failed");
        assert_eq!(store.session().status, RequestStatus::Failed);
        assert_eq!(store.session().error.as_deref(), Some("Login failed"));
        assert_eq!(store.session().token.as_deref(), Some("abc"));

        store.clear_error();
        assert_eq!(store.session().error, None);
        assert_eq!(store.session().status, RequestStatus::Failed);

        store.mark_succeeded();
        assert_eq!(store.session().status, RequestStatus::Succeeded);
    }

    #[test]
    fn logout_is_idempotent_and_clears_storage() {
        let storage = MemoryStore::with_entries(&[
            (TOKEN_KEY, "abc"),
            (USER_KEY, r#"{"email":"a@b.com"}"#),
        ]);
        let mut store = SessionStore::initialize(storage);

        store.logout();
        let first = store.session().clone();
        store.logout();

        assert_eq!(&first, store.session());
        assert_eq!(first, Session::default());
        assert_eq!(store.stored_token(), None);
        assert_eq!(store.cached_user(), None);
    }

    #[test]
    fn subscribers_observe_every_transition() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = SessionStore::initialize(MemoryStore::new());
        let sink = Rc::clone(&seen);
        store.subscribe(move |session: &Session| {
            sink.borrow_mut().push(session.clone());
        });

        store.set_token("abc");
        store.mark_pending();
        store.logout();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].verified);
        assert_eq!(seen[1].status, RequestStatus::Pending);
        assert_eq!(seen[2], Session::default());
    }

    /// Storage that drops every write, as an unavailable browser store would.
    struct BlackholeStore;

    impl KeyValueStore for BlackholeStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn set(&self, _key: &str, _value: &str) {}
        fn remove(&self, _key: &str) {}
    }

    #[test]
    fn in_memory_state_survives_degraded_storage() {
        let mut store = SessionStore::initialize(BlackholeStore);
        store.set_token("abc");
        store.set_user(User::from_email("a@b.com"));

        assert_eq!(store.session().token.as_deref(), Some("abc"));
        assert!(store.session().verified);
        assert_eq!(store.stored_token(), None);
        assert_eq!(store.cached_user(), None);
    }

    #[test]
    fn stored_user_round_trips_through_serde() {
        let user = User {
            email: "c@d.com".to_string(),
            display_name: None,
            role: Some("admin".to_string()),
        };
        let raw = serde_json::to_string(&user).expect("serializable");
        assert_eq!(super::parse_stored_user(&raw), Some(user));
    }
}
