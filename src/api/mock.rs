//! api::mock
//!
//! In-memory booking API for deterministic testing.
//!
//! # Design
//!
//! The mock keeps registered users and issued tokens in memory and behaves
//! like the real server for the three calls the client makes. Failures can
//! be injected per operation, every call is recorded, and calls can be held
//! open until released to exercise in-flight behavior.
//!
//! # Example
//!
//! ```
//! use bookctl::api::mock::MockApi;
//! use bookctl::api::{BookingApi, Credentials};
//!
//! # tokio_test::block_on(async {
//! let api = MockApi::new().with_user("Ana", "ana@x.com", "123456");
//!
//! let grant = api
//!     .create_session(Credentials::new("ana@x.com", "123456"))
//!     .await
//!     .unwrap();
//! assert_eq!(grant.user.name, "Ana");
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use uuid::Uuid;

use super::traits::{ApiError, BookingApi, Credentials, NewUser, ProfileUpdate, SessionGrant};
use crate::core::types::User;

/// Mock booking API for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    inner: Arc<Mutex<MockApiInner>>,
}

#[derive(Debug, Default)]
struct MockApiInner {
    /// Registered accounts by email.
    accounts: HashMap<String, Account>,
    /// Issued tokens mapped to account email.
    tokens: HashMap<String, String>,
    /// Operation to fail on.
    fail_on: Option<FailOn>,
    /// When set, every call waits on this before completing.
    hold: Option<Arc<Notify>>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    CreateUser(ApiError),
    CreateSession(ApiError),
    UpdateProfile(ApiError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    CreateUser { name: String, email: String },
    CreateSession { email: String },
    UpdateProfile { email: String, changes_password: bool },
}

impl MockApi {
    /// Create an empty mock with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account up front.
    pub fn with_user(self, name: &str, email: &str, password: &str) -> Self {
        {
            let mut inner = self.lock();
            inner.accounts.insert(
                email.to_string(),
                Account {
                    user: User {
                        id: Uuid::new_v4().to_string(),
                        name: name.to_string(),
                        email: email.to_string(),
                        avatar_url: None,
                    },
                    password: password.to_string(),
                },
            );
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.lock().fail_on = None;
    }

    /// Hold every subsequent call open until the returned handle is
    /// notified. Each `notify_one` releases one call.
    pub fn hold(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.lock().hold = Some(Arc::clone(&notify));
        notify
    }

    /// Stop holding calls.
    pub fn release_hold(&self) {
        self.lock().hold = None;
    }

    /// All recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Number of recorded operations.
    pub fn call_count(&self) -> usize {
        self.lock().operations.len()
    }

    /// Look up a registered user by email (for test verification).
    pub fn user(&self, email: &str) -> Option<User> {
        self.lock().accounts.get(email).map(|a| a.user.clone())
    }

    /// Issue a token for an existing account without a remote call.
    pub fn issue_token(&self, email: &str) -> Option<String> {
        let mut inner = self.lock();
        inner.accounts.get(email)?;
        let token = Uuid::new_v4().to_string();
        inner.tokens.insert(token.clone(), email.to_string());
        Some(token)
    }

    fn lock(&self) -> MutexGuard<'_, MockApiInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call, wait on the hold if any, and return the injected
    /// failure for `op` if configured.
    async fn enter(&self, op: MockOperation) -> Result<(), ApiError> {
        let hold = {
            let mut inner = self.lock();
            inner.operations.push(op.clone());
            inner.hold.clone()
        };

        if let Some(hold) = hold {
            hold.notified().await;
        }

        let inner = self.lock();
        match (&inner.fail_on, &op) {
            (Some(FailOn::CreateUser(e)), MockOperation::CreateUser { .. })
            | (Some(FailOn::CreateSession(e)), MockOperation::CreateSession { .. })
            | (Some(FailOn::UpdateProfile(e)), MockOperation::UpdateProfile { .. }) => {
                Err(e.clone())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl BookingApi for MockApi {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_user(&self, request: NewUser) -> Result<User, ApiError> {
        self.enter(MockOperation::CreateUser {
            name: request.name.clone(),
            email: request.email.clone(),
        })
        .await?;

        let mut inner = self.lock();
        if inner.accounts.contains_key(&request.email) {
            return Err(ApiError::Rejected {
                status: 400,
                message: "Email address already used".to_string(),
            });
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            email: request.email.clone(),
            avatar_url: None,
        };
        inner.accounts.insert(
            request.email,
            Account {
                user: user.clone(),
                password: request.password,
            },
        );
        Ok(user)
    }

    async fn create_session(&self, credentials: Credentials) -> Result<SessionGrant, ApiError> {
        self.enter(MockOperation::CreateSession {
            email: credentials.email.clone(),
        })
        .await?;

        let mut inner = self.lock();
        let user = match inner.accounts.get(&credentials.email) {
            Some(account) if account.password == credentials.password => account.user.clone(),
            _ => return Err(ApiError::InvalidCredentials),
        };

        let token = Uuid::new_v4().to_string();
        inner.tokens.insert(token.clone(), credentials.email);
        Ok(SessionGrant { user, token })
    }

    async fn update_profile(
        &self,
        token: &str,
        update: ProfileUpdate,
    ) -> Result<User, ApiError> {
        let owner = self.lock().tokens.get(token).cloned();

        self.enter(MockOperation::UpdateProfile {
            email: owner.clone().unwrap_or_default(),
            changes_password: update.changes_password(),
        })
        .await?;

        let owner = owner.ok_or(ApiError::Unauthorized)?;
        let mut inner = self.lock();

        if update.email != owner && inner.accounts.contains_key(&update.email) {
            return Err(ApiError::Rejected {
                status: 400,
                message: "Email address already used".to_string(),
            });
        }

        let mut account = inner
            .accounts
            .remove(&owner)
            .ok_or(ApiError::Unauthorized)?;

        if let Some(password) = update.password {
            if update.old_password.as_deref() != Some(account.password.as_str()) {
                inner.accounts.insert(owner, account);
                return Err(ApiError::Rejected {
                    status: 400,
                    message: "Old password does not match".to_string(),
                });
            }
            account.password = password;
        }

        account.user.name = update.name;
        account.user.email = update.email.clone();
        let user = account.user.clone();
        inner.accounts.insert(update.email.clone(), account);
        for email in inner.tokens.values_mut() {
            if *email == owner {
                *email = update.email.clone();
            }
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str, password: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn create_user_then_sign_in() {
        let api = MockApi::new();
        let user = api
            .create_user(new_user("Ana", "ana@x.com", "123456"))
            .await
            .unwrap();
        assert_eq!(user.name, "Ana");

        let grant = api
            .create_session(Credentials::new("ana@x.com", "123456"))
            .await
            .unwrap();
        assert_eq!(grant.user, user);
        assert!(!grant.token.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let api = MockApi::new().with_user("Ana", "ana@x.com", "123456");
        let err = api
            .create_user(new_user("Other", "ana@x.com", "abcdef"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let api = MockApi::new().with_user("Ana", "ana@x.com", "123456");
        let err = api
            .create_session(Credentials::new("ana@x.com", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::InvalidCredentials);
    }

    #[tokio::test]
    async fn update_profile_requires_known_token() {
        let api = MockApi::new().with_user("Ana", "ana@x.com", "123456");
        let err = api
            .update_profile(
                "bogus",
                ProfileUpdate {
                    name: "Ana".into(),
                    email: "ana@x.com".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
    }

    #[tokio::test]
    async fn update_profile_changes_name_and_password() {
        let api = MockApi::new().with_user("Ana", "ana@x.com", "123456");
        let token = api.issue_token("ana@x.com").unwrap();

        let user = api
            .update_profile(
                &token,
                ProfileUpdate {
                    name: "Ana Maria".into(),
                    email: "ana@x.com".into(),
                    old_password: Some("123456".into()),
                    password: Some("654321".into()),
                    password_confirmation: Some("654321".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(user.name, "Ana Maria");

        assert!(api
            .create_session(Credentials::new("ana@x.com", "654321"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn update_profile_wrong_old_password_keeps_account() {
        let api = MockApi::new().with_user("Ana", "ana@x.com", "123456");
        let token = api.issue_token("ana@x.com").unwrap();

        let err = api
            .update_profile(
                &token,
                ProfileUpdate {
                    name: "Ana".into(),
                    email: "ana@x.com".into(),
                    old_password: Some("nope".into()),
                    password: Some("654321".into()),
                    password_confirmation: Some("654321".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { .. }));
        assert!(api.user("ana@x.com").is_some());
    }

    #[tokio::test]
    async fn fail_on_injects_error_and_records() {
        let api = MockApi::new().fail_on(FailOn::CreateUser(ApiError::Network(
            "connection refused".into(),
        )));

        let err = api
            .create_user(new_user("Ana", "ana@x.com", "123456"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Network("connection refused".into()));
        assert_eq!(
            api.operations(),
            vec![MockOperation::CreateUser {
                name: "Ana".into(),
                email: "ana@x.com".into()
            }]
        );
        assert!(api.user("ana@x.com").is_none());

        api.clear_fail_on();
        assert!(api
            .create_user(new_user("Ana", "ana@x.com", "123456"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn hold_blocks_until_released() {
        let api = MockApi::new().with_user("Ana", "ana@x.com", "123456");
        let hold = api.hold();

        let call = api.create_session(Credentials::new("ana@x.com", "123456"));
        let (result, ()) = tokio::join!(call, async {
            tokio::task::yield_now().await;
            hold.notify_one();
        });
        assert!(result.is_ok());
        assert_eq!(api.call_count(), 1);
    }
}
