//! Signup form validation workflow.
//!
//! Each text field runs its synchronous validators on every edit. When
//! those pass, a debounced asynchronous check is issued against the
//! user service and its outcome is merged back into the field, unless a
//! newer edit has superseded it. The submit affordance is live only
//! while every field is valid and no check is pending.
//!
//! [`state::SignupForm`] is the pure state machine; [`session::FormSession`]
//! drives it on a tokio runtime with the debounce timer and a
//! [`client::UserClient`] implementation.

pub mod client;
pub mod session;
pub mod state;

pub use client::{HttpUserClient, PasswordStrength, SignupResponse, UserClient};
pub use session::{FormSession, Notification};
pub use state::{Applied, CheckOutcome, CheckResult, FieldState, PendingCheck, SignupData, SignupForm};

use regex::Regex;
use std::time::Duration;

/// Quiet period after an edit before its asynchronous validator fires.
pub const ASYNC_VALIDATION_DELAY: Duration = Duration::from_millis(1000);

/// Minimum password length checked synchronously.
pub const MIN_PASSWORD_LENGTH: usize = 3;

/// A validated form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Email,
    Password,
    Tos,
}

/// A named category of validation failure.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// The field is empty.
    Required,
    /// The value does not look like an email address.
    EmailFormat,
    /// The password is shorter than [`MIN_PASSWORD_LENGTH`].
    TooShort,
    /// The terms-of-service box is not checked.
    MustBeChecked,
    /// The service reported the username as taken.
    UsernameTaken,
    /// The service reported the email as taken.
    EmailTaken,
    /// The password scored below the acceptable strength.
    PasswordStrength { score: u8, suggestions: String },
    /// The asynchronous check failed at the transport level. The field
    /// stays invalid until the user edits it again.
    CheckFailed,
}

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}
