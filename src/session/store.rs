//! session::store
//!
//! The single source of truth for "is someone signed in".
//!
//! # Notification
//!
//! Every change of the current session (sign-in, sign-out, profile refresh,
//! restore, expiry) is fanned out synchronously to all subscribers before
//! the mutating call returns. Listeners run after the internal lock is
//! released, so a listener may read the store.
//!
//! # Persistence
//!
//! With a [`SecretStore`] attached, the session is written as a
//! [`SessionSnapshot`] on every change and deleted on sign-out. Write
//! failures are logged and never undo the in-memory change.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, info, warn};

use super::errors::{AuthError, SessionError};
use super::model::{Session, SessionSnapshot, SESSION_SNAPSHOT_KEY};
use crate::api::{BookingApi, Credentials};
use crate::core::types::User;
use crate::secrets::SecretStore;

/// Callback invoked with the current session after every change.
pub type Listener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

/// Shared handle to the session state. Cloning is cheap and every clone
/// observes the same session.
#[derive(Clone)]
pub struct SessionStore {
    shared: Arc<Shared>,
}

struct Shared {
    api: Arc<dyn BookingApi>,
    persistence: Option<Arc<dyn SecretStore>>,
    ttl: Option<Duration>,
    state: Mutex<State>,
    listeners: Mutex<Listeners>,
}

struct State {
    session: Option<Session>,
    restored: bool,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Builder for [`SessionStore`].
pub struct SessionStoreBuilder {
    api: Arc<dyn BookingApi>,
    persistence: Option<Arc<dyn SecretStore>>,
    ttl: Option<Duration>,
}

impl SessionStoreBuilder {
    /// Persist the session in `store` and require [`SessionStore::restore`]
    /// before the store reports itself restored.
    pub fn persistence(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.persistence = Some(store);
        self
    }

    /// Expire sessions locally after `ttl`.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn build(self) -> SessionStore {
        let restored = self.persistence.is_none();
        SessionStore {
            shared: Arc::new(Shared {
                api: self.api,
                persistence: self.persistence,
                ttl: self.ttl,
                state: Mutex::new(State {
                    session: None,
                    restored,
                }),
                listeners: Mutex::new(Listeners::default()),
            }),
        }
    }
}

impl SessionStore {
    /// In-memory store with no persistence. Starts signed out and restored.
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        Self::builder(api).build()
    }

    pub fn builder(api: Arc<dyn BookingApi>) -> SessionStoreBuilder {
        SessionStoreBuilder {
            api,
            persistence: None,
            ttl: None,
        }
    }

    /// The API client sessions are opened against.
    pub fn api(&self) -> &Arc<dyn BookingApi> {
        &self.shared.api
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Option<Session> {
        self.state().session.clone()
    }

    pub fn is_present(&self) -> bool {
        self.state().session.is_some()
    }

    /// Whether the persisted session (if any) has been loaded.
    pub fn is_restored(&self) -> bool {
        self.state().restored
    }

    /// Open a session with the given credentials.
    ///
    /// On success the new session is stored, persisted, and announced to
    /// subscribers before this returns. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidCredentials` if the server rejects the pair
    /// - `AuthError::Transport` for network or server failures
    pub async fn sign_in(&self, credentials: Credentials) -> Result<Session, AuthError> {
        let grant = self
            .shared
            .api
            .create_session(credentials)
            .await
            .map_err(|e| {
                warn!(api = self.shared.api.name(), error = %e, "sign-in rejected");
                AuthError::from(e)
            })?;

        let session = Session::from_grant(grant, self.shared.ttl);
        info!(
            user_id = %session.user_id,
            token = %session.fingerprint(),
            "signed in"
        );

        self.persist(Some(&session));
        self.replace(Some(session.clone()));
        Ok(session)
    }

    /// Clear the session. Does nothing when already signed out.
    pub fn sign_out(&self) {
        if !self.is_present() {
            debug!("sign-out with no session");
            return;
        }

        info!("signed out");
        self.persist(None);
        self.replace(None);
    }

    /// Refresh the identity fields of the current session after a profile
    /// update. Does nothing when signed out.
    pub fn update_user(&self, user: &User) {
        let Some(updated) = self.current().map(|s| s.with_user(user)) else {
            debug!("user update with no session");
            return;
        };

        self.persist(Some(&updated));
        self.replace(Some(updated));
    }

    /// Load the persisted session, if any.
    ///
    /// Expired or malformed snapshots are deleted and the store stays
    /// signed out. The store is marked restored and subscribers are
    /// notified whether or not this succeeds.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the secret store cannot be read.
    pub fn restore(&self) -> Result<Option<Session>, SessionError> {
        let loaded = self.load_snapshot();

        let session = match &loaded {
            Ok(session) => session.clone(),
            Err(_) => None,
        };

        {
            let mut state = self.state();
            state.session = session.clone();
            state.restored = true;
        }

        match &session {
            Some(s) => info!(
                user_id = %s.user_id,
                token = %s.fingerprint(),
                "session restored"
            ),
            None => debug!("no session to restore"),
        }

        self.notify(session.as_ref());
        loaded
    }

    /// Sign out if the current session has expired at `now`. Returns true
    /// if a session was cleared.
    pub fn expire_if_stale(&self, now: DateTime<Utc>) -> bool {
        let expired = self
            .state()
            .session
            .as_ref()
            .is_some_and(|s| s.is_expired_at(now));

        if expired {
            info!("session expired");
            self.persist(None);
            self.replace(None);
        }
        expired
    }

    /// Register a listener. It is called once immediately with the current
    /// session and then after every change until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(
        &self,
        listener: impl Fn(Option<&Session>) + Send + Sync + 'static,
    ) -> Subscription {
        let listener: Listener = Arc::new(listener);
        let id = {
            let mut listeners = self.listeners();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Arc::clone(&listener)));
            id
        };

        let current = self.current();
        listener(current.as_ref());

        Subscription {
            shared: Arc::downgrade(&self.shared),
            id,
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners().entries.len()
    }

    fn load_snapshot(&self) -> Result<Option<Session>, SessionError> {
        let Some(persistence) = &self.shared.persistence else {
            return Ok(None);
        };

        let Some(json) = persistence.get(SESSION_SNAPSHOT_KEY)? else {
            return Ok(None);
        };

        let session = match SessionSnapshot::parse(&json) {
            Ok(snapshot) => snapshot.session,
            Err(e) => {
                warn!(error = %e, "discarding unreadable session snapshot");
                self.discard_snapshot(persistence.as_ref());
                return Ok(None);
            }
        };

        if session.is_expired_at(Utc::now()) {
            info!(user_id = %session.user_id, "discarding expired session");
            self.discard_snapshot(persistence.as_ref());
            return Ok(None);
        }

        Ok(Some(session))
    }

    fn discard_snapshot(&self, persistence: &dyn SecretStore) {
        if let Err(e) = persistence.delete(SESSION_SNAPSHOT_KEY) {
            warn!(error = %e, "failed to delete session snapshot");
        }
    }

    fn persist(&self, session: Option<&Session>) {
        let Some(persistence) = &self.shared.persistence else {
            return;
        };

        let result = match session {
            Some(session) => SessionSnapshot::new(session.clone())
                .to_json()
                .and_then(|json| Ok(persistence.set(SESSION_SNAPSHOT_KEY, &json)?)),
            None => persistence
                .delete(SESSION_SNAPSHOT_KEY)
                .map_err(SessionError::from),
        };

        if let Err(e) = result {
            warn!(error = %e, "failed to persist session");
        }
    }

    fn replace(&self, session: Option<Session>) {
        {
            let mut state = self.state();
            state.session = session.clone();
        }
        self.notify(session.as_ref());
    }

    fn notify(&self, session: Option<&Session>) {
        let listeners: Vec<Listener> = self
            .listeners()
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(session);
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, Listeners> {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("SessionStore")
            .field("api", &self.shared.api.name())
            .field("session", &state.session)
            .field("restored", &state.restored)
            .finish()
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    shared: Weak<Shared>,
    id: u64,
}

impl Subscription {
    /// Detach the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            let mut listeners = shared
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            listeners.entries.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{FailOn, MockApi};
    use crate::api::ApiError;
    use crate::secrets::MemorySecretStore;
    use crate::session::model::tests::grant;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn mock() -> MockApi {
        MockApi::new().with_user("Ana", "ana@x.com", "secret1")
    }

    fn recorder(store: &SessionStore) -> (Arc<Mutex<Vec<Option<String>>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = store.subscribe(move |s| {
            sink.lock().unwrap().push(s.map(|s| s.email.clone()));
        });
        (seen, sub)
    }

    #[tokio::test]
    async fn sign_in_sets_session_and_notifies() {
        let store = SessionStore::new(Arc::new(mock()));
        let (seen, _sub) = recorder(&store);

        let session = store
            .sign_in(Credentials::new("ana@x.com", "secret1"))
            .await
            .unwrap();

        assert_eq!(session.email, "ana@x.com");
        assert_eq!(store.current(), Some(session));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("ana@x.com".to_string())]
        );
    }

    #[tokio::test]
    async fn wrong_password_leaves_store_unchanged() {
        let store = SessionStore::new(Arc::new(mock()));
        let (seen, _sub) = recorder(&store);

        let err = store
            .sign_in(Credentials::new("ana@x.com", "nope"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        assert!(store.current().is_none());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn network_failure_is_transport() {
        let api = mock().fail_on(FailOn::CreateSession(ApiError::Network("down".into())));
        let store = SessionStore::new(Arc::new(api));

        let err = store
            .sign_in(Credentials::new("ana@x.com", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Transport(ApiError::Network(_))));
        assert!(!store.is_present());
    }

    #[tokio::test]
    async fn sign_out_is_idempotent() {
        let store = SessionStore::new(Arc::new(mock()));
        store
            .sign_in(Credentials::new("ana@x.com", "secret1"))
            .await
            .unwrap();

        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let _sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);

        store.sign_out();
        assert!(store.current().is_none());
        assert_eq!(count.load(Ordering::SeqCst), 2);

        store.sign_out();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let store = SessionStore::new(Arc::new(mock()));
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.subscriber_count(), 1);

        drop(sub);
        assert_eq!(store.subscriber_count(), 0);

        store.update_user(&User {
            id: "u".into(),
            name: "n".into(),
            email: "e@x.com".into(),
            avatar_url: None,
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscription_outliving_store_is_harmless() {
        let store = SessionStore::new(Arc::new(mock()));
        let sub = store.subscribe(|_| {});
        drop(store);
        drop(sub);
    }

    #[test]
    fn listener_may_read_store() {
        let store = SessionStore::new(Arc::new(mock()));
        let reader = store.clone();
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        let _sub = store.subscribe(move |s| {
            sink.lock()
                .unwrap()
                .push((s.is_some(), reader.is_present()));
        });

        store.restore().unwrap();
        assert_eq!(*observed.lock().unwrap(), vec![(false, false), (false, false)]);
    }

    #[tokio::test]
    async fn update_user_refreshes_identity() {
        let store = SessionStore::new(Arc::new(mock()));
        let before = store
            .sign_in(Credentials::new("ana@x.com", "secret1"))
            .await
            .unwrap();

        store.update_user(&User {
            id: before.user_id.clone(),
            name: "Ana Maria".into(),
            email: "ana@x.com".into(),
            avatar_url: None,
        });

        let after = store.current().unwrap();
        assert_eq!(after.display_name, "Ana Maria");
        assert_eq!(after.token(), before.token());
    }

    #[test]
    fn update_user_when_signed_out_is_noop() {
        let store = SessionStore::new(Arc::new(mock()));
        store.update_user(&User {
            id: "u".into(),
            name: "n".into(),
            email: "e@x.com".into(),
            avatar_url: None,
        });
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn persists_and_restores() {
        let secrets: Arc<dyn SecretStore> = Arc::new(MemorySecretStore::new());
        let api: Arc<dyn BookingApi> = Arc::new(mock());

        let first = SessionStore::builder(Arc::clone(&api))
            .persistence(Arc::clone(&secrets))
            .build();
        first.restore().unwrap();
        let session = first
            .sign_in(Credentials::new("ana@x.com", "secret1"))
            .await
            .unwrap();
        assert!(secrets.exists(SESSION_SNAPSHOT_KEY).unwrap());

        let second = SessionStore::builder(api)
            .persistence(Arc::clone(&secrets))
            .build();
        assert!(!second.is_restored());
        assert!(second.current().is_none());

        let restored = second.restore().unwrap();
        assert!(second.is_restored());
        assert_eq!(restored, Some(session.clone()));
        assert_eq!(second.current(), Some(session));
    }

    #[tokio::test]
    async fn sign_out_deletes_snapshot() {
        let secrets: Arc<dyn SecretStore> = Arc::new(MemorySecretStore::new());
        let store = SessionStore::builder(Arc::new(mock()))
            .persistence(Arc::clone(&secrets))
            .build();
        store
            .sign_in(Credentials::new("ana@x.com", "secret1"))
            .await
            .unwrap();

        store.sign_out();
        assert!(!secrets.exists(SESSION_SNAPSHOT_KEY).unwrap());
    }

    #[test]
    fn restore_discards_expired_snapshot() {
        let secrets: Arc<dyn SecretStore> = Arc::new(MemorySecretStore::new());
        let mut session = Session::from_grant(grant("tok"), Some(Duration::hours(1)));
        session.expires_at = Some(Utc::now() - Duration::minutes(1));
        secrets
            .set(
                SESSION_SNAPSHOT_KEY,
                &SessionSnapshot::new(session).to_json().unwrap(),
            )
            .unwrap();

        let store = SessionStore::builder(Arc::new(mock()))
            .persistence(Arc::clone(&secrets))
            .build();
        assert_eq!(store.restore().unwrap(), None);
        assert!(store.is_restored());
        assert!(!secrets.exists(SESSION_SNAPSHOT_KEY).unwrap());
    }

    #[test]
    fn restore_discards_garbage_snapshot() {
        let secrets: Arc<dyn SecretStore> = Arc::new(MemorySecretStore::new());
        secrets.set(SESSION_SNAPSHOT_KEY, "{not json").unwrap();

        let store = SessionStore::builder(Arc::new(mock()))
            .persistence(Arc::clone(&secrets))
            .build();
        assert_eq!(store.restore().unwrap(), None);
        assert!(!secrets.exists(SESSION_SNAPSHOT_KEY).unwrap());
    }

    #[test]
    fn restore_notifies_even_without_session() {
        let store = SessionStore::builder(Arc::new(mock()))
            .persistence(Arc::new(MemorySecretStore::new()))
            .build();
        let (seen, _sub) = recorder(&store);

        store.restore().unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![None, None]);
    }

    #[tokio::test]
    async fn expire_if_stale_clears_expired_session() {
        let store = SessionStore::builder(Arc::new(mock()))
            .ttl(Duration::hours(1))
            .build();
        store
            .sign_in(Credentials::new("ana@x.com", "secret1"))
            .await
            .unwrap();

        assert!(!store.expire_if_stale(Utc::now()));
        assert!(store.is_present());

        assert!(store.expire_if_stale(Utc::now() + Duration::hours(2)));
        assert!(!store.is_present());
    }

    #[tokio::test]
    async fn debug_hides_token() {
        let store = SessionStore::new(Arc::new(mock()));
        let session = store
            .sign_in(Credentials::new("ana@x.com", "secret1"))
            .await
            .unwrap();
        let debug = format!("{:?}", store);
        assert!(!debug.contains(session.token()));
        assert!(debug.contains("mock"));
    }
}
