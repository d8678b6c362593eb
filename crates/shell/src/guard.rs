//! Route guard: checks the session before navigation into a protected view.

use vitrine_auth::{authorize, AccessPredicate, AuthzError, Policy, SessionStore};

use crate::notify::Notifications;
use crate::routes::Route;

pub const DENIED_MESSAGE: &str = "You do not have permission to access this page";

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation proceeds unmodified.
    Allow,
    /// Navigation is replaced by `redirect`.
    Deny { redirect: Route, reason: AuthzError },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Decide whether `target` may be entered under `policy`.
    ///
    /// Synchronous: the session is read and the decision made before this
    /// returns. On denial exactly one error notification is emitted and the
    /// login route is the redirect target.
    pub fn can_activate(
        &self,
        target: &Route,
        policy: &Policy,
        notifications: &mut Notifications,
    ) -> GuardDecision {
        match authorize(&self.session.load(), policy) {
            Ok(()) => {
                tracing::debug!(route = %target, policy = %policy.name(), "navigation allowed");
                GuardDecision::Allow
            }
            Err(reason) => {
                tracing::info!(route = %target, policy = %policy.name(), %reason, "navigation denied");
                notifications.error(DENIED_MESSAGE);
                GuardDecision::Deny {
                    redirect: Route::Login,
                    reason,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_auth::{AccessToken, UserRecord};
    use vitrine_core::UserId;

    #[test]
    fn empty_session_is_denied_with_one_notification() {
        let guard = RouteGuard::new(SessionStore::in_memory());
        let mut notes = Notifications::new();

        let decision = guard.can_activate(&Route::ProductCreate, &Policy::UserIs(UserId::new(2)), &mut notes);

        assert_eq!(
            decision,
            GuardDecision::Deny {
                redirect: Route::Login,
                reason: AuthzError::NotAuthenticated,
            }
        );
        assert_eq!(notes.pending().len(), 1);
        assert_eq!(notes.pending()[0].message, DENIED_MESSAGE);
    }

    #[test]
    fn matching_user_is_allowed_silently() {
        let store = SessionStore::in_memory();
        store
            .save(AccessToken::new("abc"), UserRecord::new(UserId::new(2), "u2@shop.io"))
            .unwrap();
        let guard = RouteGuard::new(store);
        let mut notes = Notifications::new();

        let decision = guard.can_activate(&Route::Users, &Policy::UserIs(UserId::new(2)), &mut notes);

        assert!(decision.is_allowed());
        assert!(notes.pending().is_empty());
    }

    #[test]
    fn other_user_is_forbidden() {
        let store = SessionStore::in_memory();
        store
            .save(AccessToken::new("abc"), UserRecord::new(UserId::new(3), "u3@shop.io"))
            .unwrap();
        let guard = RouteGuard::new(store);
        let mut notes = Notifications::new();

        match guard.can_activate(&Route::Users, &Policy::UserIs(UserId::new(2)), &mut notes) {
            GuardDecision::Deny { redirect, reason } => {
                assert_eq!(redirect, Route::Login);
                assert_eq!(reason, AuthzError::Forbidden("user:2".to_string()));
            }
            GuardDecision::Allow => panic!("Expected denial"),
        }
        assert_eq!(notes.pending().len(), 1);
    }
}
