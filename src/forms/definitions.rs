//! forms::definitions
//!
//! The three forms of the app: sign-in, sign-up and profile.

use super::focus::FocusChain;
use crate::core::types::fields::{EMAIL, NAME, OLD_PASSWORD, PASSWORD, PASSWORD_CONFIRMATION};
use crate::ui::Notice;
use crate::validation::{FieldSpec, ValidationSchema};

/// Minimum password length for new passwords.
pub const MIN_PASSWORD_LEN: usize = 6;

pub mod messages {
    pub const NAME_REQUIRED: &str = "Name is required";
    pub const EMAIL_REQUIRED: &str = "Email is required";
    pub const EMAIL_INVALID: &str = "Enter a valid email address";
    pub const PASSWORD_REQUIRED: &str = "Password is required";
    pub const PASSWORD_TOO_SHORT: &str = "Use at least 6 characters";
    pub const OLD_PASSWORD_REQUIRED: &str = "Enter your current password";
    pub const NEW_PASSWORD_REQUIRED: &str = "Enter a new password";
    pub const CONFIRMATION_REQUIRED: &str = "Confirm the new password";
    pub const CONFIRMATION_MISMATCH: &str = "Passwords do not match";
}

/// Where the form goes after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessRoute {
    /// Pop the form's screen.
    GoBack,
    /// Remain on the form's screen.
    Stay,
}

/// Everything a pipeline needs to know about one form.
#[derive(Debug, Clone)]
pub struct FormDefinition {
    pub name: &'static str,
    pub schema: ValidationSchema,
    pub focus: FocusChain,
    pub on_success: SuccessRoute,
    pub success_notice: Option<Notice>,
    pub failure_notice: Notice,
}

const SIGN_IN_CHAIN: FocusChain = FocusChain::new(&[EMAIL, PASSWORD]);
const SIGN_UP_CHAIN: FocusChain = FocusChain::new(&[NAME, EMAIL, PASSWORD]);
const PROFILE_CHAIN: FocusChain =
    FocusChain::new(&[NAME, EMAIL, OLD_PASSWORD, PASSWORD, PASSWORD_CONFIRMATION]);

fn email_field() -> FieldSpec {
    FieldSpec::new(EMAIL)
        .required(messages::EMAIL_REQUIRED)
        .email(messages::EMAIL_INVALID)
}

/// Sign-in. A successful sign-in stays put; the session change swaps the
/// screen graph.
pub fn sign_in() -> FormDefinition {
    FormDefinition {
        name: "sign-in",
        schema: ValidationSchema::new()
            .field(email_field())
            .field(FieldSpec::new(PASSWORD).required(messages::PASSWORD_REQUIRED)),
        focus: SIGN_IN_CHAIN,
        on_success: SuccessRoute::Stay,
        success_notice: None,
        failure_notice: Notice::error(
            "Authentication error",
            "Could not sign in. Check your email and password.",
        ),
    }
}

pub fn sign_up() -> FormDefinition {
    FormDefinition {
        name: "sign-up",
        schema: ValidationSchema::new()
            .field(FieldSpec::new(NAME).required(messages::NAME_REQUIRED))
            .field(email_field())
            .field(
                FieldSpec::new(PASSWORD)
                    .required(messages::PASSWORD_REQUIRED)
                    .min_length(MIN_PASSWORD_LEN, messages::PASSWORD_TOO_SHORT),
            ),
        focus: SIGN_UP_CHAIN,
        on_success: SuccessRoute::GoBack,
        success_notice: Some(Notice::success(
            "Account created",
            "You can now sign in with your new account.",
        )),
        failure_notice: Notice::error(
            "Sign-up error",
            "Could not create the account. Please try again.",
        ),
    }
}

/// Profile update. The three password fields are optional as a group: once
/// any of them is filled, all are required, the new password must meet the
/// minimum length and the confirmation must match it.
pub fn profile() -> FormDefinition {
    FormDefinition {
        name: "profile",
        schema: ValidationSchema::new()
            .field(FieldSpec::new(NAME).required(messages::NAME_REQUIRED))
            .field(email_field())
            .field(FieldSpec::new(OLD_PASSWORD).required_when_any(
                [PASSWORD, PASSWORD_CONFIRMATION],
                messages::OLD_PASSWORD_REQUIRED,
            ))
            .field(
                FieldSpec::new(PASSWORD)
                    .required_when_any(
                        [OLD_PASSWORD, PASSWORD_CONFIRMATION],
                        messages::NEW_PASSWORD_REQUIRED,
                    )
                    .min_length(MIN_PASSWORD_LEN, messages::PASSWORD_TOO_SHORT),
            )
            .field(
                FieldSpec::new(PASSWORD_CONFIRMATION)
                    .required_when_any(
                        [OLD_PASSWORD, PASSWORD],
                        messages::CONFIRMATION_REQUIRED,
                    )
                    .matches(PASSWORD, messages::CONFIRMATION_MISMATCH),
            ),
        focus: PROFILE_CHAIN,
        on_success: SuccessRoute::Stay,
        success_notice: Some(Notice::success(
            "Profile updated",
            "Your profile changes were saved.",
        )),
        failure_notice: Notice::error(
            "Update error",
            "Could not update your profile. Please try again.",
        ),
    }
}
