use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Capability identifier carried on a user record.
///
/// Capabilities are opaque strings (e.g. "products.write"). The wildcard
/// capability `"*"` grants everything, so an administrator account does not
/// need every capability spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(Cow<'static, str>);

impl Capability {
    pub const WILDCARD: Capability = Capability(Cow::Borrowed("*"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }

    /// Whether holding `self` satisfies a requirement for `required`.
    pub fn grants(&self, required: &Capability) -> bool {
        self.is_wildcard() || self == required
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Capability {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}
