//! Pure form state machine: synchronous validation, per-field async
//! bookkeeping and last-edit-wins supersession of check outcomes.

use serde::{Deserialize, Serialize};

use super::client::PasswordStrength;
use super::{valid_email, ErrorKind, Field, MIN_PASSWORD_LENGTH};

/// Minimum zxcvbn score a password must reach to pass validation.
const ACCEPTABLE_SCORE: u8 = 3;

/// Validation bookkeeping for one field.
#[derive(Clone, Debug, Default)]
pub struct FieldState {
    value: String,
    sync_errors: Vec<ErrorKind>,
    async_pending: bool,
    async_errors: Vec<ErrorKind>,
    generation: u64,
}

impl FieldState {
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Valid iff both error sets are empty and no check is in flight.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.sync_errors.is_empty() && self.async_errors.is_empty() && !self.async_pending
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.async_pending
    }

    pub fn errors(&self) -> impl Iterator<Item = &ErrorKind> {
        self.sync_errors.iter().chain(self.async_errors.iter())
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

/// An asynchronous check issued for a field edit, tagged with the
/// generation it was issued at. Outcomes carrying a stale generation
/// are discarded instead of aborted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingCheck {
    pub field: Field,
    pub value: String,
    pub generation: u64,
}

/// Result of a completed check, before mapping into field errors.
#[derive(Clone, Debug, PartialEq)]
pub enum CheckResult {
    UsernameTaken(bool),
    EmailTaken(bool),
    Password(PasswordStrength),
    /// Transport-level failure of the check itself.
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CheckOutcome {
    pub field: Field,
    pub generation: u64,
    pub result: CheckResult,
}

/// Whether an outcome was merged or discarded as superseded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Updated,
    Stale,
}

/// Payload posted on submit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignupData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub tos: bool,
}

/// The whole signup form: one [`FieldState`] per field plus the derived
/// submittable flag.
#[derive(Clone, Debug)]
pub struct SignupForm {
    username: FieldState,
    email: FieldState,
    password: FieldState,
    tos: FieldState,
}

impl SignupForm {
    #[must_use]
    pub fn new() -> Self {
        let mut form = Self {
            username: FieldState::default(),
            email: FieldState::default(),
            password: FieldState::default(),
            tos: FieldState::default(),
        };

        // A fresh form starts invalid: text fields are required and the
        // terms box is unchecked.
        for field in [Field::Username, Field::Email, Field::Password] {
            form.field_mut(field).sync_errors = sync_validate(field, "");
        }
        form.tos.sync_errors = vec![ErrorKind::MustBeChecked];

        form
    }

    #[must_use]
    pub fn field(&self, field: Field) -> &FieldState {
        match field {
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::Tos => &self.tos,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut FieldState {
        match field {
            Field::Username => &mut self.username,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::Tos => &mut self.tos,
        }
    }

    /// Record an edit and run the synchronous validators.
    ///
    /// Returns the tagged asynchronous check to run when the sync
    /// validators pass. Any outcome still in flight for this field is
    /// superseded by the generation bump.
    pub fn edit(&mut self, field: Field, value: &str) -> Option<PendingCheck> {
        if field == Field::Tos {
            self.set_tos(value == "true");
            return None;
        }

        let state = self.field_mut(field);
        state.value = value.to_string();
        state.generation += 1;
        state.async_errors.clear();
        state.sync_errors = sync_validate(field, value);

        if state.sync_errors.is_empty() {
            state.async_pending = true;
            Some(PendingCheck {
                field,
                value: value.to_string(),
                generation: state.generation,
            })
        } else {
            state.async_pending = false;
            None
        }
    }

    /// Check or uncheck the terms-of-service box. Never issues a check.
    pub fn set_tos(&mut self, accepted: bool) {
        self.tos.value = if accepted { "true" } else { "false" }.to_string();
        self.tos.generation += 1;
        self.tos.sync_errors = if accepted {
            Vec::new()
        } else {
            vec![ErrorKind::MustBeChecked]
        };
    }

    /// Merge a completed check into its field, unless the field has
    /// been edited again since the check was issued.
    pub fn apply(&mut self, outcome: CheckOutcome) -> Applied {
        let state = self.field_mut(outcome.field);
        if outcome.generation != state.generation {
            return Applied::Stale;
        }

        state.async_pending = false;
        state.async_errors = match outcome.result {
            CheckResult::UsernameTaken(true) => vec![ErrorKind::UsernameTaken],
            CheckResult::EmailTaken(true) => vec![ErrorKind::EmailTaken],
            CheckResult::UsernameTaken(false) | CheckResult::EmailTaken(false) => Vec::new(),
            CheckResult::Password(strength) => password_errors(&strength),
            CheckResult::Failed => vec![ErrorKind::CheckFailed],
        };

        Applied::Updated
    }

    /// True iff every field is valid and no check is pending. Holds
    /// continuously, not just at submit time.
    #[must_use]
    pub fn submittable(&self) -> bool {
        [Field::Username, Field::Email, Field::Password, Field::Tos]
            .iter()
            .all(|field| self.field(*field).is_valid())
    }

    /// The submit payload, available only while the form is submittable.
    #[must_use]
    pub fn payload(&self) -> Option<SignupData> {
        self.submittable().then(|| SignupData {
            username: self.username.value.clone(),
            email: self.email.value.clone(),
            password: self.password.value.clone(),
            tos: true,
        })
    }
}

impl Default for SignupForm {
    fn default() -> Self {
        Self::new()
    }
}

fn sync_validate(field: Field, value: &str) -> Vec<ErrorKind> {
    let mut errors = Vec::new();

    if value.is_empty() {
        errors.push(ErrorKind::Required);
        return errors;
    }

    match field {
        Field::Email if !valid_email(value) => errors.push(ErrorKind::EmailFormat),
        Field::Password if value.len() < MIN_PASSWORD_LENGTH => errors.push(ErrorKind::TooShort),
        _ => {}
    }

    errors
}

fn password_errors(strength: &PasswordStrength) -> Vec<ErrorKind> {
    if strength.score < ACCEPTABLE_SCORE {
        vec![ErrorKind::PasswordStrength {
            score: strength.score,
            suggestions: strength.suggestions.join(" "),
        }]
    } else {
        Vec::new()
    }
}
