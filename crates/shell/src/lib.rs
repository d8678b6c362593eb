//! `vitrine-shell`
//!
//! **Responsibility:** navigation, guarding and view state for the catalog.
//!
//! This crate provides:
//! - The route table and the route guard
//! - A navigator that never commits a route before the guard has decided
//! - Transient user notifications
//! - Catalog and auth view controllers over the REST clients
//!
//! Rendering is left to whatever front end hosts the shell; the bundled
//! `vitrine` binary renders to a terminal.

pub mod app;
pub mod config;
pub mod guard;
pub mod navigator;
pub mod notify;
pub mod routes;
pub mod views;

pub use app::{Shell, ShellError};
pub use config::{ConfigError, ShellConfig};
pub use guard::{GuardDecision, RouteGuard};
pub use navigator::{NavError, Navigation, Navigator};
pub use notify::{Level, Notification, Notifications};
pub use routes::{Route, RouteTable};
