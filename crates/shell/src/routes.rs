//! Route surface and the table of guarded routes.

use core::str::FromStr;

use vitrine_auth::Policy;
use vitrine_core::ProductId;

use crate::navigator::NavError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Products,
    ProductDetail(ProductId),
    ProductCreate,
    ProductUpdate(ProductId),
    Categories,
    Users,
    Login,
    Register,
}

impl Route {
    /// Route pattern, with `:id` for parameterized routes.
    pub fn pattern(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Products => "/products",
            Route::ProductDetail(_) => "/products/:id",
            Route::ProductCreate => "/products/create",
            Route::ProductUpdate(_) => "/products/update/:id",
            Route::Categories => "/categories",
            Route::Users => "/users",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    /// Concrete path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::ProductDetail(id) => format!("/products/{id}"),
            Route::ProductUpdate(id) => format!("/products/update/{id}"),
            other => other.pattern().to_string(),
        }
    }

    /// Parse a navigation path. Query strings, fragments and a trailing
    /// slash are ignored.
    pub fn parse(path: &str) -> Result<Self, NavError> {
        let bare = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let segments: Vec<&str> = bare.split('/').filter(|s| !s.is_empty()).collect();

        let unknown = || NavError::UnknownRoute(path.to_string());
        let id = |raw: &str| raw.parse::<ProductId>().map_err(|_| unknown());

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["products"] => Ok(Route::Products),
            ["products", "create"] => Ok(Route::ProductCreate),
            ["products", "update", raw] => Ok(Route::ProductUpdate(id(*raw)?)),
            ["products", raw] => Ok(Route::ProductDetail(id(*raw)?)),
            ["categories"] => Ok(Route::Categories),
            ["users"] => Ok(Route::Users),
            ["login"] => Ok(Route::Login),
            ["register"] => Ok(Route::Register),
            _ => Err(unknown()),
        }
    }
}

impl FromStr for Route {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Which routes need which policy. Unlisted routes are public.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    guarded: Vec<(&'static str, Policy)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog management and the user list require `admin`; browsing is
    /// public.
    pub fn with_admin_policy(admin: Policy) -> Self {
        Self::new()
            .protect(Route::ProductCreate.pattern(), admin.clone())
            .protect(Route::ProductUpdate(ProductId::new(0)).pattern(), admin.clone())
            .protect(Route::Users.pattern(), admin)
    }

    /// Guard every route matching `pattern` with `policy`, replacing any
    /// earlier policy for it.
    pub fn protect(mut self, pattern: &'static str, policy: Policy) -> Self {
        self.guarded.retain(|(p, _)| *p != pattern);
        self.guarded.push((pattern, policy));
        self
    }

    pub fn policy_for(&self, route: &Route) -> Option<&Policy> {
        self.guarded
            .iter()
            .find(|(p, _)| *p == route.pattern())
            .map(|(_, policy)| policy)
    }
}
