//! forms::actions
//!
//! The remote side of each form.
//!
//! An action receives values that already passed validation. It returns
//! `Ok(())` on success or an [`ActionError`] classified as auth or transport;
//! the pipeline turns that into a notice.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::api::{ApiError, BookingApi, Credentials, NewUser, ProfileUpdate};
use crate::core::types::fields::{EMAIL, NAME, OLD_PASSWORD, PASSWORD, PASSWORD_CONFIRMATION};
use crate::core::types::{FailureKind, FormValues};
use crate::session::{AuthError, SessionStore};

/// A failed remote action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} failure: {detail}")]
pub struct ActionError {
    pub kind: FailureKind,
    pub detail: String,
}

impl ActionError {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl From<ApiError> for ActionError {
    fn from(err: ApiError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<AuthError> for ActionError {
    fn from(err: AuthError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

/// The remote call behind a form.
#[async_trait]
pub trait FormAction: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Perform the remote call with validated values.
    async fn perform(&self, values: &FormValues) -> Result<(), ActionError>;
}

/// Opens a session through the session store.
pub struct SignInAction {
    store: SessionStore,
}

impl SignInAction {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FormAction for SignInAction {
    fn name(&self) -> &'static str {
        "sign-in"
    }

    async fn perform(&self, values: &FormValues) -> Result<(), ActionError> {
        self.store
            .sign_in(Credentials::new(values.get(EMAIL), values.get(PASSWORD)))
            .await?;
        Ok(())
    }
}

/// Registers a new user. Does not sign in.
pub struct CreateUserAction {
    api: Arc<dyn BookingApi>,
}

impl CreateUserAction {
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl FormAction for CreateUserAction {
    fn name(&self) -> &'static str {
        "create-user"
    }

    async fn perform(&self, values: &FormValues) -> Result<(), ActionError> {
        let user = self
            .api
            .create_user(NewUser {
                name: values.get(NAME).to_string(),
                email: values.get(EMAIL).to_string(),
                password: values.get(PASSWORD).to_string(),
            })
            .await?;
        info!(user_id = %user.id, "account created");
        Ok(())
    }
}

/// Updates the signed-in user's profile and refreshes the session.
pub struct UpdateProfileAction {
    store: SessionStore,
}

impl UpdateProfileAction {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Build the request body. Password fields are included only when the
    /// user is changing the password.
    pub fn request(values: &FormValues) -> ProfileUpdate {
        let changing = [OLD_PASSWORD, PASSWORD, PASSWORD_CONFIRMATION]
            .iter()
            .any(|f| values.is_filled(f));

        let password_field = |field: &str| changing.then(|| values.get(field).to_string());

        ProfileUpdate {
            name: values.get(NAME).to_string(),
            email: values.get(EMAIL).to_string(),
            old_password: password_field(OLD_PASSWORD),
            password: password_field(PASSWORD),
            password_confirmation: password_field(PASSWORD_CONFIRMATION),
        }
    }
}

#[async_trait]
impl FormAction for UpdateProfileAction {
    fn name(&self) -> &'static str {
        "update-profile"
    }

    async fn perform(&self, values: &FormValues) -> Result<(), ActionError> {
        let session = self
            .store
            .current()
            .ok_or_else(|| ActionError::new(FailureKind::Auth, "not signed in"))?;

        let update = Self::request(values);
        let user = self
            .store
            .api()
            .update_profile(session.token(), update)
            .await?;

        info!(user_id = %user.id, "profile updated");
        self.store.update_user(&user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{FailOn, MockApi, MockOperation};

    fn sign_up_values() -> FormValues {
        FormValues::new()
            .with(NAME, "Ana")
            .with(EMAIL, "ana@x.com")
            .with(PASSWORD, "123456")
    }

    #[tokio::test]
    async fn create_user_registers_without_session() {
        let api = MockApi::new();
        let action = CreateUserAction::new(Arc::new(api.clone()));

        action.perform(&sign_up_values()).await.unwrap();

        assert!(api.user("ana@x.com").is_some());
        assert_eq!(
            api.operations(),
            vec![MockOperation::CreateUser {
                name: "Ana".into(),
                email: "ana@x.com".into()
            }]
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_transport_failure() {
        let api = MockApi::new().with_user("Ana", "ana@x.com", "secret1");
        let action = CreateUserAction::new(Arc::new(api));

        let err = action.perform(&sign_up_values()).await.unwrap_err();
        assert_eq!(err.kind, FailureKind::Transport);
        assert!(err.detail.contains("already used"));
    }

    #[tokio::test]
    async fn sign_in_failure_is_auth() {
        let api = MockApi::new().with_user("Ana", "ana@x.com", "secret1");
        let store = SessionStore::new(Arc::new(api));
        let action = SignInAction::new(store.clone());

        let values = FormValues::new()
            .with(EMAIL, "ana@x.com")
            .with(PASSWORD, "wrong");
        let err = action.perform(&values).await.unwrap_err();
        assert_eq!(err.kind, FailureKind::Auth);
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn update_profile_requires_session() {
        let store = SessionStore::new(Arc::new(MockApi::new()));
        let action = UpdateProfileAction::new(store);

        let err = action.perform(&sign_up_values()).await.unwrap_err();
        assert_eq!(err.kind, FailureKind::Auth);
    }

    #[tokio::test]
    async fn update_profile_refreshes_session() {
        let api = MockApi::new().with_user("Ana", "ana@x.com", "secret1");
        let store = SessionStore::new(Arc::new(api.clone()));
        store
            .sign_in(Credentials::new("ana@x.com", "secret1"))
            .await
            .unwrap();

        let action = UpdateProfileAction::new(store.clone());
        let values = FormValues::new()
            .with(NAME, "Ana Maria")
            .with(EMAIL, "ana@x.com");
        action.perform(&values).await.unwrap();

        assert_eq!(store.current().unwrap().display_name, "Ana Maria");
        assert!(api.operations().contains(&MockOperation::UpdateProfile {
            email: "ana@x.com".into(),
            changes_password: false
        }));
    }

    #[tokio::test]
    async fn update_profile_server_error_keeps_session() {
        let api = MockApi::new()
            .with_user("Ana", "ana@x.com", "secret1")
            .fail_on(FailOn::UpdateProfile(ApiError::Server {
                status: 503,
                message: "maintenance".into(),
            }));
        let store = SessionStore::new(Arc::new(api));
        let before = store
            .sign_in(Credentials::new("ana@x.com", "secret1"))
            .await
            .unwrap();

        let action = UpdateProfileAction::new(store.clone());
        let values = FormValues::new()
            .with(NAME, "Other")
            .with(EMAIL, "ana@x.com");
        let err = action.perform(&values).await.unwrap_err();

        assert_eq!(err.kind, FailureKind::Transport);
        assert_eq!(store.current(), Some(before));
    }

    #[test]
    fn blank_password_group_is_not_sent() {
        let values = FormValues::new()
            .with(NAME, "Ana")
            .with(EMAIL, "ana@x.com")
            .with(OLD_PASSWORD, " ");
        let update = UpdateProfileAction::request(&values);
        assert!(!update.changes_password());
        assert!(update.old_password.is_none());

        let json = serde_json::to_string(&update).unwrap();
        assert!(!json.contains("password"));
    }

    #[test]
    fn filled_password_group_is_sent() {
        let values = FormValues::new()
            .with(NAME, "Ana")
            .with(EMAIL, "ana@x.com")
            .with(OLD_PASSWORD, "secret1")
            .with(PASSWORD, "newpass1")
            .with(PASSWORD_CONFIRMATION, "newpass1");
        let update = UpdateProfileAction::request(&values);
        assert!(update.changes_password());
        assert_eq!(update.old_password.as_deref(), Some("secret1"));
        assert_eq!(update.password_confirmation.as_deref(), Some("newpass1"));
    }
}
