//! End-to-end form submission against the in-memory API.
//!
//! Each test wires a real session store, navigation gate and pipeline
//! together and checks what the user would see: field errors, notices,
//! screen stack and session.

use std::sync::Arc;

use bookctl::api::mock::{FailOn, MockApi, MockOperation};
use bookctl::api::{ApiError, BookingApi, Credentials};
use bookctl::core::types::fields::{
    EMAIL, NAME, OLD_PASSWORD, PASSWORD, PASSWORD_CONFIRMATION,
};
use bookctl::core::types::{FailureKind, FormValues};
use bookctl::forms::definitions::{self, messages};
use bookctl::forms::{
    CreateUserAction, FormAction, FormContext, FormDefinition, FormPipeline, SignInAction,
    SubmitOutcome, SubmitState, UpdateProfileAction,
};
use bookctl::navigation::{Graph, NavigationGate, Navigator, Screen};
use bookctl::session::SessionStore;
use bookctl::ui::{NoticeLevel, RecordingSurface, SurfaceEvent};

// =============================================================================
// Test Fixtures
// =============================================================================

struct Harness {
    api: MockApi,
    store: SessionStore,
    gate: Arc<NavigationGate>,
    surface: Arc<RecordingSurface>,
}

impl Harness {
    fn new(api: MockApi) -> Self {
        let store = SessionStore::new(Arc::new(api.clone()));
        let gate = Arc::new(NavigationGate::attach(store.clone()));
        Self {
            api,
            store,
            gate,
            surface: Arc::new(RecordingSurface::new()),
        }
    }

    fn with_ana() -> Self {
        Self::new(MockApi::new().with_user("Ana", "ana@x.com", "secret1"))
    }

    fn pipeline(&self, definition: FormDefinition, action: Arc<dyn FormAction>) -> FormPipeline {
        FormPipeline::new(
            definition,
            action,
            FormContext {
                renderer: self.surface.clone(),
                notifier: self.surface.clone(),
                navigator: self.gate.clone(),
            },
        )
    }

    fn sign_up(&self) -> FormPipeline {
        let api: Arc<dyn BookingApi> = Arc::new(self.api.clone());
        self.pipeline(definitions::sign_up(), Arc::new(CreateUserAction::new(api)))
    }

    fn sign_in(&self) -> FormPipeline {
        self.pipeline(
            definitions::sign_in(),
            Arc::new(SignInAction::new(self.store.clone())),
        )
    }

    fn profile(&self) -> FormPipeline {
        self.pipeline(
            definitions::profile(),
            Arc::new(UpdateProfileAction::new(self.store.clone())),
        )
    }

    async fn signed_in(self) -> Self {
        self.store
            .sign_in(Credentials::new("ana@x.com", "secret1"))
            .await
            .expect("sign in");
        self
    }
}

fn sign_up_values() -> FormValues {
    FormValues::new()
        .with(NAME, "Ana")
        .with(EMAIL, "ana@x.com")
        .with(PASSWORD, "123456")
}

// =============================================================================
// Sign-up
// =============================================================================

#[tokio::test]
async fn sign_up_with_every_field_wrong_reports_all_three() {
    let h = Harness::new(MockApi::new());
    h.gate.navigate(Screen::SignUp).unwrap();
    let pipeline = h.sign_up();

    let values = FormValues::new()
        .with(NAME, "")
        .with(EMAIL, "x")
        .with(PASSWORD, "123");
    let outcome = pipeline.submit(values, &h.gate.mount_token()).await;

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure, got {:?}", outcome);
    };
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.get(NAME), Some(messages::NAME_REQUIRED));
    assert_eq!(errors.get(EMAIL), Some(messages::EMAIL_INVALID));
    assert_eq!(errors.get(PASSWORD), Some(messages::PASSWORD_TOO_SHORT));

    assert_eq!(h.api.call_count(), 0);
    assert_eq!(h.surface.last_errors(), Some(errors));
    assert!(h.surface.notices().is_empty());
    assert_eq!(h.gate.current_screen(), Screen::SignUp);
}

#[tokio::test]
async fn sign_up_success_notifies_and_goes_back() {
    let h = Harness::new(MockApi::new());
    h.gate.navigate(Screen::SignUp).unwrap();
    let pipeline = h.sign_up();

    let outcome = pipeline.submit(sign_up_values(), &h.gate.mount_token()).await;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    let notices = h.surface.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Account created");
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(h.gate.stack(), vec![Screen::SignIn]);
    assert!(h.store.current().is_none());
    assert!(h.api.user("ana@x.com").is_some());
}

#[tokio::test]
async fn sign_up_remote_failure_shows_generic_notice_only() {
    let h = Harness::new(
        MockApi::new().fail_on(FailOn::CreateUser(ApiError::Network("offline".into()))),
    );
    h.gate.navigate(Screen::SignUp).unwrap();
    let pipeline = h.sign_up();

    let outcome = pipeline.submit(sign_up_values(), &h.gate.mount_token()).await;

    assert_eq!(outcome, SubmitOutcome::Failed(FailureKind::Transport));
    assert_eq!(pipeline.state(), SubmitState::RemoteFailure);
    assert_eq!(h.surface.notices()[0].title, "Sign-up error");
    assert!(h.surface.last_errors().is_none());
    assert_eq!(h.gate.current_screen(), Screen::SignUp);
}

#[tokio::test]
async fn resubmit_after_failure_can_succeed() {
    let h = Harness::new(
        MockApi::new().fail_on(FailOn::CreateUser(ApiError::Server {
            status: 502,
            message: "bad gateway".into(),
        })),
    );
    h.gate.navigate(Screen::SignUp).unwrap();
    let pipeline = h.sign_up();
    let token = h.gate.mount_token();

    let first = pipeline.submit(sign_up_values(), &token).await;
    assert_eq!(first, SubmitOutcome::Failed(FailureKind::Transport));

    h.api.clear_fail_on();
    let second = pipeline.submit(sign_up_values(), &token).await;
    assert_eq!(second, SubmitOutcome::Succeeded);
    assert_eq!(h.api.call_count(), 2);
}

// =============================================================================
// Sign-in
// =============================================================================

#[tokio::test]
async fn sign_in_wrong_password_stays_on_auth_graph() {
    let h = Harness::with_ana();
    let pipeline = h.sign_in();

    let values = FormValues::new()
        .with(EMAIL, "ana@x.com")
        .with(PASSWORD, "wrong-password");
    let outcome = pipeline.submit(values, &h.gate.mount_token()).await;

    assert_eq!(outcome, SubmitOutcome::Failed(FailureKind::Auth));
    assert!(h.store.current().is_none());
    assert_eq!(h.gate.active_graph(), Graph::Auth);
    assert_eq!(h.gate.stack(), vec![Screen::SignIn]);

    let notices = h.surface.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Authentication error");
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn sign_in_success_swaps_to_app_graph() {
    let h = Harness::with_ana();
    let pipeline = h.sign_in();

    let values = FormValues::new()
        .with(EMAIL, "ana@x.com")
        .with(PASSWORD, "secret1");
    let outcome = pipeline.submit(values, &h.gate.mount_token()).await;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert_eq!(h.gate.active_graph(), Graph::App);
    assert_eq!(h.gate.stack(), vec![Screen::Dashboard]);
    assert!(h.surface.notices().is_empty());
    assert_eq!(h.store.current().unwrap().display_name, "Ana");
}

#[tokio::test]
async fn sign_in_with_empty_email_reports_required_only() {
    let h = Harness::with_ana();
    let pipeline = h.sign_in();

    let outcome = pipeline
        .submit(
            FormValues::new().with(PASSWORD, "secret1"),
            &h.gate.mount_token(),
        )
        .await;

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(EMAIL), Some(messages::EMAIL_REQUIRED));
    assert_eq!(h.api.call_count(), 0);
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn profile_with_blank_password_group_updates_name_only() {
    let h = Harness::with_ana().signed_in().await;
    h.gate.navigate(Screen::Profile).unwrap();
    let pipeline = h.profile();

    let values = FormValues::new()
        .with(NAME, "Ana")
        .with(EMAIL, "ana@x.com")
        .with(OLD_PASSWORD, "")
        .with(PASSWORD, "")
        .with(PASSWORD_CONFIRMATION, "");
    let outcome = pipeline.submit(values, &h.gate.mount_token()).await;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert!(h.api.operations().contains(&MockOperation::UpdateProfile {
        email: "ana@x.com".into(),
        changes_password: false,
    }));
    assert_eq!(h.surface.notices()[0].title, "Profile updated");
    assert_eq!(h.gate.stack(), vec![Screen::Dashboard, Screen::Profile]);
}

#[tokio::test]
async fn profile_new_password_without_old_one_is_invalid() {
    let h = Harness::with_ana().signed_in().await;
    h.gate.navigate(Screen::Profile).unwrap();
    let pipeline = h.profile();
    let calls_before = h.api.call_count();

    let values = FormValues::new()
        .with(NAME, "Ana")
        .with(EMAIL, "ana@x.com")
        .with(OLD_PASSWORD, "")
        .with(PASSWORD, "newpass1")
        .with(PASSWORD_CONFIRMATION, "newpass1");
    let outcome = pipeline.submit(values, &h.gate.mount_token()).await;

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(OLD_PASSWORD), Some(messages::OLD_PASSWORD_REQUIRED));
    assert_eq!(h.api.call_count(), calls_before);
}

#[tokio::test]
async fn profile_password_change_succeeds_and_refreshes_session() {
    let h = Harness::with_ana().signed_in().await;
    h.gate.navigate(Screen::Profile).unwrap();
    let pipeline = h.profile();

    let values = FormValues::new()
        .with(NAME, "Ana Maria")
        .with(EMAIL, "ana@x.com")
        .with(OLD_PASSWORD, "secret1")
        .with(PASSWORD, "newpass1")
        .with(PASSWORD_CONFIRMATION, "newpass1");
    let outcome = pipeline.submit(values, &h.gate.mount_token()).await;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert_eq!(h.store.current().unwrap().display_name, "Ana Maria");
    assert!(h
        .api
        .create_session(Credentials::new("ana@x.com", "newpass1"))
        .await
        .is_ok());
}

#[tokio::test]
async fn profile_wrong_old_password_is_remote_failure() {
    let h = Harness::with_ana().signed_in().await;
    h.gate.navigate(Screen::Profile).unwrap();
    let pipeline = h.profile();
    let before = h.store.current();

    let values = FormValues::new()
        .with(NAME, "Ana")
        .with(EMAIL, "ana@x.com")
        .with(OLD_PASSWORD, "not-it")
        .with(PASSWORD, "newpass1")
        .with(PASSWORD_CONFIRMATION, "newpass1");
    let outcome = pipeline.submit(values, &h.gate.mount_token()).await;

    assert_eq!(outcome, SubmitOutcome::Failed(FailureKind::Transport));
    assert_eq!(h.surface.notices()[0].title, "Update error");
    assert_eq!(h.store.current(), before);
}

// =============================================================================
// In-flight behavior
// =============================================================================

#[tokio::test]
async fn second_submit_while_in_flight_is_ignored() {
    let h = Harness::new(MockApi::new());
    h.gate.navigate(Screen::SignUp).unwrap();
    let pipeline = h.sign_up();
    let token = h.gate.mount_token();
    let hold = h.api.hold();

    let first = pipeline.submit(sign_up_values(), &token);
    let second = async {
        tokio::task::yield_now().await;
        let outcome = pipeline.submit(sign_up_values(), &token).await;
        hold.notify_one();
        outcome
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first, SubmitOutcome::Succeeded);
    assert_eq!(second, SubmitOutcome::Ignored);
    assert_eq!(h.api.call_count(), 1);
    assert_eq!(h.surface.notices().len(), 1);
    let clears = h
        .surface
        .events()
        .into_iter()
        .filter(|e| *e == SurfaceEvent::Cleared)
        .count();
    assert_eq!(clears, 1);
}

#[tokio::test]
async fn leaving_the_screen_discards_the_response() {
    let h = Harness::new(MockApi::new());
    h.gate.navigate(Screen::SignUp).unwrap();
    let pipeline = h.sign_up();
    let token = h.gate.mount_token();
    let _hold = h.api.hold();

    let submit = pipeline.submit(sign_up_values(), &token);
    let leave = async {
        tokio::task::yield_now().await;
        assert!(h.gate.go_back());
    };
    let (outcome, ()) = tokio::join!(submit, leave);

    assert_eq!(outcome, SubmitOutcome::Cancelled);
    assert_eq!(pipeline.state(), SubmitState::Cancelled);
    assert!(h.surface.notices().is_empty());
    assert_eq!(h.gate.stack(), vec![Screen::SignIn]);
    assert!(h.api.user("ana@x.com").is_none());
}

#[tokio::test]
async fn sign_out_while_profile_update_in_flight_discards_it() {
    let h = Harness::with_ana().signed_in().await;
    h.gate.navigate(Screen::Profile).unwrap();
    let pipeline = h.profile();
    let token = h.gate.mount_token();
    let _hold = h.api.hold();

    let values = FormValues::new()
        .with(NAME, "Changed")
        .with(EMAIL, "ana@x.com");
    let submit = pipeline.submit(values, &token);
    let sign_out = async {
        tokio::task::yield_now().await;
        h.store.sign_out();
    };
    let (outcome, ()) = tokio::join!(submit, sign_out);

    assert_eq!(outcome, SubmitOutcome::Cancelled);
    assert!(h.store.current().is_none());
    assert_eq!(h.gate.stack(), vec![Screen::SignIn]);
    assert!(h.surface.notices().is_empty());
}
