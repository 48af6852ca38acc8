use std::sync::Arc;

use crate::services::explain::Augmenter;
use crate::services::identity::IdentityResolver;
use crate::store::{CatalogStore, InteractionLog};

/// Shared application state
///
/// The catalog and interaction log are immutable once loaded, so they are
/// shared across request handlers without locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub interactions: Arc<InteractionLog>,
    pub resolver: IdentityResolver,
    pub augmenter: Arc<Augmenter>,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(
        catalog: CatalogStore,
        interactions: InteractionLog,
        resolver: IdentityResolver,
        augmenter: Augmenter,
        cookie_secure: bool,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            interactions: Arc::new(interactions),
            resolver,
            augmenter: Arc::new(augmenter),
            cookie_secure,
        }
    }
}
