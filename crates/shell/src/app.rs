//! Wiring: one session store shared by the clients, the guard and the views.

use std::sync::Arc;

use thiserror::Error;

use vitrine_auth::{FileStorage, KeyValueStorage, SessionStore, StorageError};
use vitrine_client::{AuthClient, ClientConfig, ClientError, ProductClient, RestClient};

use crate::config::{ConfigError, ShellConfig};
use crate::guard::RouteGuard;
use crate::navigator::{NavError, Navigation, Navigator};
use crate::notify::Notifications;
use crate::routes::{Route, RouteTable};
use crate::views::{AuthView, CatalogView};

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("session storage: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Application state for one front end.
#[derive(Debug)]
pub struct Shell {
    pub session: SessionStore,
    pub navigator: Navigator,
    pub notifications: Notifications,
    pub catalog: CatalogView,
    pub auth: AuthView,
}

impl Shell {
    /// Session persisted under the configured data directory.
    pub fn from_config(config: &ShellConfig) -> Result<Self, ShellError> {
        let storage = FileStorage::open(config.session_dir())?;
        Self::with_storage(config, Arc::new(storage))
    }

    pub fn with_storage(
        config: &ShellConfig,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self, ShellError> {
        let session = SessionStore::new(storage);

        let client_config = ClientConfig::new(&config.api_url)?.with_timeout(config.timeout);
        let rest = RestClient::new(client_config)?.with_session(session.clone());

        let table = RouteTable::with_admin_policy(config.admin_policy());
        let navigator = Navigator::new(table, RouteGuard::new(session.clone()));

        tracing::debug!(api_url = %config.api_url, "shell ready");

        Ok(Self {
            navigator,
            notifications: Notifications::new(),
            catalog: CatalogView::new(ProductClient::new(rest.clone())),
            auth: AuthView::new(AuthClient::new(rest), session.clone()),
            session,
        })
    }

    /// Navigate to `path` and load whatever the landed page shows.
    pub async fn open(&mut self, path: &str) -> Result<Navigation, NavError> {
        let nav = self.navigator.navigate(path, &mut self.notifications)?;
        match nav.landed {
            Route::Home | Route::Products => {
                self.catalog.refresh(&mut self.notifications).await;
            }
            Route::ProductDetail(id) | Route::ProductUpdate(id) => {
                self.catalog.open(id, &mut self.notifications).await;
            }
            _ => {}
        }
        Ok(nav)
    }

    pub fn logout(&mut self) -> Navigation {
        self.auth.logout(&mut self.navigator, &mut self.notifications)
    }
}
