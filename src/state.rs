use std::sync::Arc;

use crate::auth::profile_cache::ProfileCache;
use crate::auth::rate_limit::RateLimiter;
use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::identity::{HttpIdentityProvider, IdentityProvider};

/// Everything a handler needs, shared across workers via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub backend: BackendClient,
    pub identity: Arc<dyn IdentityProvider>,
    pub profiles: ProfileCache,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: AppConfig, identity: Arc<dyn IdentityProvider>) -> Self {
        AppState {
            backend: BackendClient::new(&config.backend_url, config.http_timeout),
            profiles: ProfileCache::new(config.profile_ttl),
            limiter: RateLimiter::default(),
            identity,
            config,
        }
    }

    /// State wired to the real identity provider named in `config`.
    pub fn from_config(config: AppConfig) -> Self {
        let identity = HttpIdentityProvider::new(&config.identity_url, &config.identity_api_key, config.http_timeout);
        Self::new(config, Arc::new(identity))
    }
}
