use std::sync::Arc;

use async_trait::async_trait;

use super::{FormAction, FormController};
use crate::api::AuthApi;
use crate::error::{ClientError, ClientResult};
use crate::model::{Credentials, LoginUser};
use crate::session::{Credential, SessionGate};
use crate::validation::{login_schema, Schema};

/// POST /login and keep the returned token as the session credential
pub struct LoginAction {
    api: Arc<dyn AuthApi>,
    gate: SessionGate,
}

impl LoginAction {
    pub fn new(api: Arc<dyn AuthApi>, gate: SessionGate) -> Self {
        Self { api, gate }
    }
}

#[async_trait]
impl FormAction for LoginAction {
    type Draft = Credentials;
    type Output = LoginUser;

    fn schema(&self) -> Schema {
        login_schema()
    }

    async fn send(&self, draft: &Credentials) -> ClientResult<LoginUser> {
        let response = self.api.login(draft).await?;
        let credential = Credential::new(response.access_token)
            .ok_or_else(|| ClientError::malformed("login response carried an empty accessToken"))?;

        self.gate.store(&credential);
        tracing::info!(
            "User successfully logged in: {} (id {})",
            response.user.email,
            response.user.id
        );
        Ok(response.user)
    }
}

pub type LoginForm = FormController<LoginAction>;

impl LoginForm {
    pub fn login(api: Arc<dyn AuthApi>, gate: SessionGate) -> Self {
        FormController::new(LoginAction::new(api, gate))
    }
}
