use vitrine_auth::{Credentials, SessionStore, UserRecord};
use vitrine_client::{AuthClient, ClientError};

use super::user_message;
use crate::navigator::{Navigation, Navigator};
use crate::notify::Notifications;
use crate::routes::Route;

/// Login, registration and session lifecycle.
#[derive(Debug, Clone)]
pub struct AuthView {
    client: AuthClient,
    session: SessionStore,
}

impl AuthView {
    pub fn new(client: AuthClient, session: SessionStore) -> Self {
        Self { client, session }
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.session.load().user
    }

    /// Log in and persist the session. Returns the logged-in user.
    pub async fn login(
        &self,
        credentials: &Credentials,
        notifications: &mut Notifications,
    ) -> Option<UserRecord> {
        let resp = match self.client.login(credentials).await {
            Ok(resp) => resp,
            Err(err) => {
                notifications.error(format!("Login error: {}", user_message(&err)));
                return None;
            }
        };

        if let Err(err) = self.session.save(resp.access_token, resp.user.clone()) {
            tracing::error!(error = %err, "could not persist session");
            notifications.error(format!("Login error: {err}"));
            return None;
        }
        notifications.success("Login success");
        Some(resp.user)
    }

    pub async fn register(&self, credentials: &Credentials, notifications: &mut Notifications) -> bool {
        match self.client.register(credentials).await {
            Ok(()) => {
                notifications.success("Register success");
                true
            }
            Err(err) => {
                notifications.error(format!("Register error: {}", user_message(&err)));
                false
            }
        }
    }

    /// Clear the session and go to the login page.
    pub fn logout(&self, navigator: &mut Navigator, notifications: &mut Notifications) -> Navigation {
        if let Err(err) = self.session.clear() {
            tracing::error!(error = %err, "could not clear session");
            notifications.error(format!("Logout error: {err}"));
        }
        navigator.go(Route::Login, notifications)
    }

    /// Confirm a stored session with the server.
    ///
    /// A rejected token clears the session. Transport failures keep it so an
    /// offline start does not log the user out. Returns whether a user is
    /// logged in afterwards.
    pub async fn restore(&self, notifications: &mut Notifications) -> bool {
        let session = self.session.load();
        let (Some(token), Some(user)) = (session.token, session.user) else {
            return false;
        };

        match self.client.get_user(user.id).await {
            Ok(fresh) => {
                if let Err(err) = self.session.save(token, fresh) {
                    tracing::warn!(error = %err, "could not refresh stored user");
                }
                true
            }
            Err(ClientError::Unauthorized { status, .. }) => {
                tracing::info!(user_id = %user.id, status, "stored session rejected");
                if let Err(err) = self.session.clear() {
                    tracing::error!(error = %err, "could not clear session");
                }
                notifications.error("Session expired, please log in again");
                false
            }
            Err(err) => {
                tracing::warn!(user_id = %user.id, error = %err, "session not confirmed");
                true
            }
        }
    }
}
