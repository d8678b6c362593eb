//! Navigation: resolve a path, run the guard, then commit the route.

use thiserror::Error;

use crate::guard::{GuardDecision, RouteGuard};
use crate::notify::Notifications;
use crate::routes::{Route, RouteTable};

/// Routes kept for history; older entries are dropped first.
pub const HISTORY_LIMIT: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("no route matches '{0}'")]
    UnknownRoute(String),
}

/// Result of one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: Route,
    pub landed: Route,
    pub decision: GuardDecision,
}

impl Navigation {
    pub fn allowed(&self) -> bool {
        self.decision.is_allowed()
    }
}

#[derive(Debug)]
pub struct Navigator {
    table: RouteTable,
    guard: RouteGuard,
    current: Route,
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(table: RouteTable, guard: RouteGuard) -> Self {
        Self {
            table,
            guard,
            current: Route::Home,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Routes left behind, oldest first, at most [`HISTORY_LIMIT`].
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn navigate(
        &mut self,
        path: &str,
        notifications: &mut Notifications,
    ) -> Result<Navigation, NavError> {
        let target = Route::parse(path)?;
        Ok(self.go(target, notifications))
    }

    /// Navigate to an already-parsed route.
    ///
    /// The current route only changes after the guard has decided; a denied
    /// target is never committed.
    pub fn go(&mut self, target: Route, notifications: &mut Notifications) -> Navigation {
        let decision = match self.table.policy_for(&target) {
            Some(policy) => self.guard.can_activate(&target, policy, notifications),
            None => GuardDecision::Allow,
        };
        let landed = match &decision {
            GuardDecision::Allow => target,
            GuardDecision::Deny { redirect, .. } => *redirect,
        };
        self.commit(landed);

        Navigation {
            requested: target,
            landed,
            decision,
        }
    }

    fn commit(&mut self, route: Route) {
        if route != self.current {
            if self.history.len() == HISTORY_LIMIT {
                self.history.remove(0);
            }
            self.history.push(self.current);
            self.current = route;
        }
    }
}
