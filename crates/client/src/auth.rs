use vitrine_auth::{Credentials, LoginResponse, UserRecord};
use vitrine_core::UserId;

use crate::rest::{decode, RestClient};
use crate::ClientResult;

/// `POST /login`, `POST /register`, `GET /users/:id`.
///
/// Relays typed responses; persisting the session is the caller's job.
#[derive(Debug, Clone)]
pub struct AuthClient {
    rest: RestClient,
}

impl AuthClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    pub async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse> {
        credentials.validate()?;
        let body = self.rest.post("/login", credentials).await?;
        let resp: LoginResponse = decode("login response", body)?;
        tracing::info!(user_id = %resp.user.id, "logged in");
        Ok(resp)
    }

    /// Only the status matters; the body is ignored.
    pub async fn register(&self, credentials: &Credentials) -> ClientResult<()> {
        credentials.validate()?;
        self.rest.post("/register", credentials).await?;
        tracing::debug!("registered");
        Ok(())
    }

    pub async fn get_user(&self, id: UserId) -> ClientResult<UserRecord> {
        let body = self.rest.get(&format!("/users/{id}")).await?;
        decode("user", body)
    }
}
