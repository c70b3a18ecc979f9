//! Async driver for the signup form.
//!
//! Owns the shared [`SignupForm`], schedules the debounced checks and
//! posts the signup. Supersession needs no cancellation primitive:
//! each spawned check carries the generation it was issued at and the
//! state machine discards anything stale.

use std::sync::Arc;
use tokio::{
    sync::{mpsc, Mutex},
    time::sleep,
};
use tracing::{debug, error};

use super::client::UserClient;
use super::state::{Applied, CheckOutcome, CheckResult, PendingCheck, SignupForm};
use super::{Field, ASYNC_VALIDATION_DELAY};

/// Outcome of a submit, for the UI layer to display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Failure(String),
}

pub struct FormSession<C> {
    form: Arc<Mutex<SignupForm>>,
    client: Arc<C>,
    notify_tx: mpsc::UnboundedSender<Notification>,
}

impl<C> FormSession<C>
where
    C: UserClient + 'static,
{
    #[must_use]
    pub fn new(client: C) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();

        (
            Self {
                form: Arc::new(Mutex::new(SignupForm::new())),
                client: Arc::new(client),
                notify_tx,
            },
            notify_rx,
        )
    }

    /// Record a field edit; schedules the debounced check when the
    /// synchronous validators pass.
    pub async fn edit(&self, field: Field, value: &str) {
        let pending = self.form.lock().await.edit(field, value);
        if let Some(pending) = pending {
            self.spawn_check(pending);
        }
    }

    pub async fn set_tos(&self, accepted: bool) {
        self.form.lock().await.set_tos(accepted);
    }

    pub async fn submittable(&self) -> bool {
        self.form.lock().await.submittable()
    }

    /// Inspect the form state, for rendering or assertions.
    pub async fn with_form<R>(&self, f: impl FnOnce(&SignupForm) -> R) -> R {
        f(&*self.form.lock().await)
    }

    /// Post the signup if the form is submittable at this moment.
    ///
    /// Emits a [`Notification`] either way; field values are never
    /// reset on failure.
    pub async fn submit(&self) {
        let Some(payload) = self.form.lock().await.payload() else {
            debug!("submit ignored: form not submittable");
            return;
        };

        match self.client.sign_up(&payload).await {
            Ok(response) => {
                let _ = self.notify_tx.send(Notification::Success(response.message));
            }
            Err(err) => {
                error!("signup failed: {err}");
                let _ = self.notify_tx.send(Notification::Failure(err.to_string()));
            }
        }
    }

    fn spawn_check(&self, pending: PendingCheck) {
        let form = Arc::clone(&self.form);
        let client = Arc::clone(&self.client);

        tokio::spawn(async move {
            sleep(ASYNC_VALIDATION_DELAY).await;

            // Debounce: a newer edit supersedes this check before it
            // ever reaches the service.
            if form.lock().await.field(pending.field).generation() != pending.generation {
                debug!("check for {:?} superseded before firing", pending.field);
                return;
            }

            let result = match pending.field {
                Field::Username => match client.username_taken(&pending.value).await {
                    Ok(taken) => CheckResult::UsernameTaken(taken),
                    Err(err) => {
                        error!("username check failed: {err}");
                        CheckResult::Failed
                    }
                },
                Field::Email => match client.email_taken(&pending.value).await {
                    Ok(taken) => CheckResult::EmailTaken(taken),
                    Err(err) => {
                        error!("email check failed: {err}");
                        CheckResult::Failed
                    }
                },
                Field::Password => match client.password_strength(&pending.value).await {
                    Ok(strength) => CheckResult::Password(strength),
                    Err(err) => {
                        error!("password check failed: {err}");
                        CheckResult::Failed
                    }
                },
                // The terms box has no async validator.
                Field::Tos => return,
            };

            let outcome = CheckOutcome {
                field: pending.field,
                generation: pending.generation,
                result,
            };

            if form.lock().await.apply(outcome) == Applied::Stale {
                debug!("discarding stale check result for {:?}", pending.field);
            }
        });
    }
}
