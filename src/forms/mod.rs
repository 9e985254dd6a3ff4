//! Form state machine shared by the login and registration forms.
//!
//! ```text
//! Idle --submit--> (validate) --invalid--> Idle, errors shown
//!                      |
//!                    valid
//!                      v
//!                 Submitting --ok--> Succeeded
//!                      \----err--> Failed(message)
//! ```
//!
//! A submit while `Submitting` is refused, which is what keeps the submit
//! control disabled. `Failed` and `Succeeded` accept a new submit like `Idle`.

pub mod login;
pub mod signup;

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::validation::{FieldSource, Schema, ValidationErrors};

pub use login::{LoginAction, LoginForm};
pub use signup::{RegisterAction, SignupForm, REGISTERED_MESSAGE};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Result of one submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    /// Validation failed; nothing was sent
    Invalid(ValidationErrors),
    /// A submission is already in flight; nothing was sent
    Busy,
    Succeeded(T),
    Failed(String),
}

impl<T> SubmitOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded(_))
    }
}

/// The network half of a form: what it sends and what success yields
#[async_trait]
pub trait FormAction: Send + Sync {
    type Draft: FieldSource + Clone + Default + Send + Sync;
    type Output: Send;

    fn schema(&self) -> Schema;

    async fn send(&self, draft: &Self::Draft) -> ClientResult<Self::Output>;

    /// Whether a successful submit empties the draft
    fn reset_on_success(&self) -> bool {
        false
    }
}

#[derive(Debug, Default)]
struct FormState<D> {
    draft: D,
    errors: ValidationErrors,
    status: SubmissionStatus,
}

pub struct FormController<A: FormAction> {
    action: A,
    schema: Schema,
    state: Mutex<FormState<A::Draft>>,
}

impl<A: FormAction> FormController<A> {
    pub fn new(action: A) -> Self {
        let schema = action.schema();
        Self {
            action,
            schema,
            state: Mutex::new(FormState {
                draft: A::Draft::default(),
                errors: ValidationErrors::default(),
                status: SubmissionStatus::Idle,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState<A::Draft>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn draft(&self) -> A::Draft {
        self.lock().draft.clone()
    }

    pub fn set_draft(&self, draft: A::Draft) {
        self.lock().draft = draft;
    }

    pub fn edit(&self, f: impl FnOnce(&mut A::Draft)) {
        f(&mut self.lock().draft);
    }

    pub fn errors(&self) -> ValidationErrors {
        self.lock().errors.clone()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.lock().status.clone()
    }

    /// False while a submission is in flight
    pub fn can_submit(&self) -> bool {
        self.lock().status != SubmissionStatus::Submitting
    }

    /// Close the error message
    pub fn dismiss_error(&self) {
        let mut state = self.lock();
        if matches!(state.status, SubmissionStatus::Failed(_)) {
            state.status = SubmissionStatus::Idle;
        }
    }

    /// Close the success confirmation
    pub fn acknowledge(&self) {
        let mut state = self.lock();
        if state.status == SubmissionStatus::Succeeded {
            state.status = SubmissionStatus::Idle;
        }
    }

    pub async fn submit(&self) -> SubmitOutcome<A::Output> {
        let draft = {
            let mut state = self.lock();
            if state.status == SubmissionStatus::Submitting {
                return SubmitOutcome::Busy;
            }

            let errors = self.schema.validate(&state.draft);
            state.errors = errors.clone();
            if !errors.is_empty() {
                state.status = SubmissionStatus::Idle;
                return SubmitOutcome::Invalid(errors);
            }

            state.status = SubmissionStatus::Submitting;
            state.draft.clone()
        };

        match self.action.send(&draft).await {
            Ok(output) => {
                let mut state = self.lock();
                state.status = SubmissionStatus::Succeeded;
                if self.action.reset_on_success() {
                    state.draft = A::Draft::default();
                }
                SubmitOutcome::Succeeded(output)
            }
            Err(e) => {
                let message = e.user_message();
                tracing::error!("form submission failed: {}", e);
                self.lock().status = SubmissionStatus::Failed(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }
}
