use std::sync::Arc;

use async_trait::async_trait;

use super::{FormAction, FormController};
use crate::api::AuthApi;
use crate::error::ClientResult;
use crate::model::Registration;
use crate::validation::{registration_schema, Schema};

/// Confirmation shown after a successful registration
pub const REGISTERED_MESSAGE: &str = "You have successfully registered. Please log in.";

/// POST /register
pub struct RegisterAction {
    api: Arc<dyn AuthApi>,
}

impl RegisterAction {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl FormAction for RegisterAction {
    type Draft = Registration;
    type Output = ();

    fn schema(&self) -> Schema {
        registration_schema()
    }

    async fn send(&self, draft: &Registration) -> ClientResult<()> {
        self.api.register(draft).await?;
        tracing::info!("registered {}", draft.email);
        Ok(())
    }

    fn reset_on_success(&self) -> bool {
        true
    }
}

pub type SignupForm = FormController<RegisterAction>;

impl SignupForm {
    pub fn signup(api: Arc<dyn AuthApi>) -> Self {
        FormController::new(RegisterAction::new(api))
    }

    /// Registration succeeded and the confirmation has not been closed yet
    pub fn confirmation_pending(&self) -> bool {
        self.status() == super::SubmissionStatus::Succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::testing::FakeAuth;
    use crate::forms::{SubmissionStatus, SubmitOutcome};
    use crate::model::Address;

    fn filled(password: &str) -> Registration {
        Registration {
            full_name: "Alan Turing".into(),
            email: "alan@bletchley.uk".into(),
            date_of_birth: "1912-06-23".into(),
            address: Address {
                street: "Sherborne Rd".into(),
                city: "Wilmslow".into(),
                state: "Cheshire".into(),
                zip_code: "SK9".into(),
            },
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn weak_password_blocks_submission() {
        let api = Arc::new(FakeAuth::ok("unused"));
        let form = SignupForm::signup(api.clone());
        form.set_draft(filled("abc"));

        let SubmitOutcome::Invalid(errors) = form.submit().await else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["password"]);
        assert_eq!(errors.messages("password").len(), 4);
        assert_eq!(api.calls(), 0);
        assert_eq!(form.errors(), errors);
    }

    #[tokio::test]
    async fn success_resets_draft_and_awaits_acknowledgement() {
        let api = Arc::new(FakeAuth::ok("unused"));
        let form = SignupForm::signup(api.clone());
        form.set_draft(filled("Enigma#1939"));

        assert!(form.submit().await.is_success());
        assert_eq!(api.calls(), 1);
        assert_eq!(form.draft(), Registration::default());
        assert!(form.confirmation_pending());

        form.acknowledge();
        assert_eq!(form.status(), SubmissionStatus::Idle);
        assert!(!form.confirmation_pending());
    }

    #[tokio::test]
    async fn failure_prefers_message_field() {
        let api = Arc::new(FakeAuth::failing(409, r#"{"message":"Email already exists"}"#));
        let form = SignupForm::signup(api);
        form.set_draft(filled("Enigma#1939"));

        assert_eq!(form.submit().await, SubmitOutcome::Failed("Email already exists".to_string()));
        assert_eq!(form.draft().email, "alan@bletchley.uk");
    }

    #[tokio::test]
    async fn failure_without_message_is_generic() {
        let api = Arc::new(FakeAuth::failing(500, r#"{"error":"db down"}"#));
        let form = SignupForm::signup(api);
        form.set_draft(filled("Enigma#1939"));

        assert_eq!(
            form.submit().await,
            SubmitOutcome::Failed("An error occurred. Please try again.".to_string())
        );
    }
}
