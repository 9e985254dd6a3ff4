use async_trait::async_trait;

use super::{ApiClient, LOGIN_PATH, REGISTER_PATH};
use crate::error::ClientResult;
use crate::model::{Credentials, LoginResponse, Registration};

/// Public authentication endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// POST /login
    async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse>;

    /// POST /register - no token is issued
    async fn register(&self, registration: &Registration) -> ClientResult<()>;
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse> {
        self.post_json(LOGIN_PATH, credentials).await
    }

    async fn register(&self, registration: &Registration) -> ClientResult<()> {
        self.post(REGISTER_PATH, registration).await
    }
}
