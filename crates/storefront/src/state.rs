//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::broadcast;

use crate::config::StorefrontConfig;
use crate::models::Product;
use crate::services::auth_events::{self, AuthEvent};
use crate::supabase::{AuthClient, RestClient};

/// Catalog cache TTL (5 minutes), matching how rarely the catalog changes.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for the active product list.
pub const ACTIVE_PRODUCTS_KEY: &str = "active";

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the Supabase clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    auth: AuthClient,
    rest: RestClient,
    products_cache: Cache<&'static str, Arc<Vec<Product>>>,
    auth_events: broadcast::Sender<AuthEvent>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let auth = AuthClient::new(&config.supabase);
        let rest = RestClient::new(&config.supabase);

        let products_cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                rest,
                products_cache,
                auth_events: auth_events::channel(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the GoTrue auth client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the PostgREST client.
    #[must_use]
    pub fn rest(&self) -> &RestClient {
        &self.inner.rest
    }

    /// Get a reference to the active-product cache.
    #[must_use]
    pub fn products_cache(&self) -> &Cache<&'static str, Arc<Vec<Product>>> {
        &self.inner.products_cache
    }

    /// Publish an auth event. A missing listener is not an error.
    pub fn publish_auth_event(&self, event: AuthEvent) {
        let _ = self.inner.auth_events.send(event);
    }

    /// Subscribe to auth events (used by the startup listener).
    #[must_use]
    pub fn subscribe_auth_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.auth_events.subscribe()
    }
}
