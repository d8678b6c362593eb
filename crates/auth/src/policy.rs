use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vitrine_core::UserId;

use crate::{Capability, Session, SessionStore, UserRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("forbidden: policy '{0}' not satisfied")]
    Forbidden(String),
}

/// A named boolean predicate over a user record.
///
/// Implemented by [`Policy`] and by any `Fn(&UserRecord) -> bool`, so call
/// sites can pass an ad-hoc closure where a declarative policy is overkill.
pub trait AccessPredicate {
    fn name(&self) -> Cow<'_, str>;

    fn allows(&self, user: &UserRecord) -> bool;
}

impl<F> AccessPredicate for F
where
    F: Fn(&UserRecord) -> bool,
{
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("custom")
    }

    fn allows(&self, user: &UserRecord) -> bool {
        self(user)
    }
}

/// Declarative authorization policy.
///
/// Policies are data: they can be built from configuration and logged by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Policy {
    /// Any logged-in user.
    Authenticated,
    /// The user holds this capability (or the wildcard).
    Capability(Capability),
    /// The user is exactly this account.
    UserIs(UserId),
    AnyOf(Vec<Policy>),
    AllOf(Vec<Policy>),
}

impl Policy {
    pub fn capability(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Capability(Capability::new(name))
    }
}

impl AccessPredicate for Policy {
    fn name(&self) -> Cow<'_, str> {
        match self {
            Policy::Authenticated => Cow::Borrowed("authenticated"),
            Policy::Capability(cap) => Cow::Owned(format!("capability:{cap}")),
            Policy::UserIs(id) => Cow::Owned(format!("user:{id}")),
            Policy::AnyOf(ps) => Cow::Owned(format!("any_of({})", join_names(ps))),
            Policy::AllOf(ps) => Cow::Owned(format!("all_of({})", join_names(ps))),
        }
    }

    fn allows(&self, user: &UserRecord) -> bool {
        match self {
            Policy::Authenticated => true,
            Policy::Capability(cap) => user.has_capability(cap),
            Policy::UserIs(id) => user.id == *id,
            Policy::AnyOf(ps) => ps.iter().any(|p| p.allows(user)),
            Policy::AllOf(ps) => ps.iter().all(|p| p.allows(user)),
        }
    }
}

fn join_names(policies: &[Policy]) -> String {
    policies
        .iter()
        .map(|p| p.name().into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// Authorize an already-loaded session.
///
/// - No IO
/// - No panics
pub fn authorize<P>(session: &Session, predicate: &P) -> Result<(), AuthzError>
where
    P: AccessPredicate + ?Sized,
{
    let user = session.user().ok_or(AuthzError::NotAuthenticated)?;
    if predicate.allows(user) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(predicate.name().into_owned()))
    }
}

/// Load the session and check `predicate` against it.
///
/// `false` whenever no user is stored.
pub fn has_permission<P>(store: &SessionStore, predicate: &P) -> bool
where
    P: AccessPredicate + ?Sized,
{
    authorize(&store.load(), predicate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccessToken;

    fn session_for(user: UserRecord) -> Session {
        Session::authenticated(AccessToken::new("abc"), user)
    }

    fn user(id: u64) -> UserRecord {
        UserRecord::new(UserId::new(id), format!("u{id}@shop.io"))
    }

    #[test]
    fn anonymous_session_is_not_authenticated() {
        let err = authorize(&Session::anonymous(), &Policy::Authenticated).unwrap_err();
        assert_eq!(err, AuthzError::NotAuthenticated);
    }

    #[test]
    fn user_is_matches_only_that_id() {
        let policy = Policy::UserIs(UserId::new(2));
        assert!(authorize(&session_for(user(2)), &policy).is_ok());
        assert_eq!(
            authorize(&session_for(user(3)), &policy).unwrap_err(),
            AuthzError::Forbidden("user:2".to_string())
        );
    }

    #[test]
    fn capability_policy_uses_user_capabilities() {
        let policy = Policy::capability("products.write");
        let writer = user(5).with_capabilities([Capability::new("products.write")]);
        let admin = user(6).with_capabilities([Capability::WILDCARD]);

        assert!(authorize(&session_for(writer), &policy).is_ok());
        assert!(authorize(&session_for(admin), &policy).is_ok());
        assert!(authorize(&session_for(user(7)), &policy).is_err());
    }

    #[test]
    fn combinators() {
        let any = Policy::AnyOf(vec![
            Policy::capability("products.write"),
            Policy::UserIs(UserId::new(1)),
        ]);
        let all = Policy::AllOf(vec![
            Policy::capability("products.write"),
            Policy::UserIs(UserId::new(1)),
        ]);
        let root = user(1);

        assert!(any.allows(&root));
        assert!(!all.allows(&root));
        assert_eq!(any.name(), "any_of(capability:products.write,user:1)");
        assert!(!Policy::AnyOf(vec![]).allows(&root));
        assert!(Policy::AllOf(vec![]).allows(&root));
    }

    #[test]
    fn closures_are_predicates() {
        let even = |u: &UserRecord| u.id.get() % 2 == 0;
        assert!(authorize(&session_for(user(4)), &even).is_ok());
        assert_eq!(
            authorize(&session_for(user(5)), &even).unwrap_err(),
            AuthzError::Forbidden("custom".to_string())
        );
    }

    #[test]
    fn policy_serializes_as_tagged_data() {
        let policy = Policy::AnyOf(vec![Policy::capability("products.write"), Policy::UserIs(UserId::new(1))]);
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "any_of",
                "value": [
                    {"kind": "capability", "value": "products.write"},
                    {"kind": "user_is", "value": 1}
                ]
            })
        );
        let back: Policy = serde_json::from_value(json).unwrap();
        assert_eq!(back, policy);
    }

    #[test]
    fn has_permission_reads_through_the_store() {
        let store = SessionStore::in_memory();
        let admin_policy = Policy::UserIs(UserId::new(2));
        assert!(!has_permission(&store, &admin_policy));

        store.save(AccessToken::new("abc"), user(2)).unwrap();
        assert!(has_permission(&store, &admin_policy));

        store.save(AccessToken::new("abc"), user(9)).unwrap();
        assert!(!has_permission(&store, &admin_policy));

        store.clear().unwrap();
        assert!(!has_permission(&store, &Policy::Authenticated));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the admin check holds iff the stored id is the configured one.
            #[test]
            fn admin_check_matches_configured_id(admin in 0u64..50, stored in proptest::option::of(0u64..50)) {
                let store = SessionStore::in_memory();
                if let Some(id) = stored {
                    store.save(AccessToken::new("t"), user(id)).unwrap();
                }
                let expected = stored == Some(admin);
                prop_assert_eq!(has_permission(&store, &Policy::UserIs(UserId::new(admin))), expected);
            }
        }
    }
}
