//! Account records exchanged with the remote auth service.

use serde::{Deserialize, Serialize};

use vitrine_core::{DomainResult, UserId, Validator};

use crate::{AccessToken, Capability};

/// Minimum password length accepted by the login and register forms.
pub const MIN_PASSWORD_LEN: usize = 6;

/// The user identity stored alongside the access token.
///
/// Only `id` and `capabilities` take part in authorization; `email` is kept
/// for display. Servers that know nothing about capabilities simply omit the
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<Capability>,
}

impl UserRecord {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            capabilities: Vec::new(),
        }
    }

    pub fn with_capabilities(mut self, caps: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities.extend(caps);
        self
    }

    pub fn has_capability(&self, required: &Capability) -> bool {
        self.capabilities.iter().any(|c| c.grants(required))
    }
}

/// Login/register form values.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Surrounding whitespace is stripped from the email; the password is
    /// kept verbatim.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Form rules: email required and well-formed, password at least
    /// [`MIN_PASSWORD_LEN`] characters.
    pub fn validate(&self) -> DomainResult<()> {
        let mut v = Validator::new();
        v.required("email", &self.email)
            .email("email", &self.email)
            .required("password", &self.password)
            .min_len("password", &self.password, MIN_PASSWORD_LEN);
        v.finish()
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Successful `POST /login` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: AccessToken,
    pub user: UserRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::DomainError;

    #[test]
    fn user_record_without_capabilities_parses() {
        let user: UserRecord =
            serde_json::from_str(r#"{"id":2,"email":"a@b.io","password":"hash"}"#).unwrap();
        assert_eq!(user.id, UserId::new(2));
        assert!(user.capabilities.is_empty());
    }

    #[test]
    fn has_capability_honours_wildcard() {
        let admin = UserRecord::new(UserId::new(1), "root@shop.io")
            .with_capabilities([Capability::WILDCARD]);
        let clerk = UserRecord::new(UserId::new(2), "clerk@shop.io")
            .with_capabilities([Capability::new("products.read")]);
        let write = Capability::new("products.write");

        assert!(admin.has_capability(&write));
        assert!(!clerk.has_capability(&write));
        assert!(clerk.has_capability(&Capability::new("products.read")));
    }

    #[test]
    fn login_response_uses_camel_case_token() {
        let body = r#"{"accessToken":"abc.def","user":{"id":3,"email":"x@y.io"}}"#;
        let resp: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.access_token.expose(), "abc.def");
        assert_eq!(resp.user.id, UserId::new(3));
    }

    #[test]
    fn credentials_validation() {
        assert!(Credentials::new("a@b.io", "secret1").validate().is_ok());

        let err = Credentials::new("not-an-email", "123").validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => {
                assert!(msg.contains("email"));
                assert!(msg.contains("password"));
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn credentials_validate_the_email_that_is_sent() {
        let creds = Credentials::new("  a@b.io ", " secret1 ");
        assert_eq!(creds.email, "a@b.io");
        assert_eq!(creds.password, " secret1 ");
        assert!(creds.validate().is_ok());

        let padded = Credentials {
            email: " a@b.io".to_string(),
            password: "secret1".to_string(),
        };
        assert!(padded.validate().is_err());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("a@b.io", "hunter22"));
        assert!(!rendered.contains("hunter22"));
    }
}
