use std::sync::Arc;
use shopfront_core::repository::CatalogStore;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub bcrypt_cost: u32,
}

/// Page-size bounds for product listings
#[derive(Clone, Copy)]
pub struct ListingLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub auth: AuthConfig,
    pub listing: ListingLimits,
}
