use std::collections::{BTreeMap, BTreeSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::Product;
use crate::store::{CatalogStore, InteractionLog};

/// Number of products returned per request
pub const RECOMMENDATION_COUNT: usize = 3;

/// Tiered collaborative-filtering recommendation engine
///
/// Pure computation over the read-only catalog and interaction log. Four
/// fallback tiers, first applicable wins:
///
/// 1. Empty history: sample the whole catalog with replacement.
/// 2. Neighbor profiles exist: rank products viewed by neighbors (minus own
///    history) by distinct-viewer count, ties by ascending product id.
/// 3. No neighbors: products sharing a category with the history, in catalog
///    order, without padding.
/// 4. Neighbors exist but offer nothing new: sample unseen products with
///    replacement (whole catalog if everything has been seen).
///
/// The tier 3 / tier 4 boundary is a contract: an empty post-exclusion pool
/// with neighbors present must NOT fall back to category matching.
pub struct RecommendationEngine<'a> {
    catalog: &'a CatalogStore,
    log: &'a InteractionLog,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(catalog: &'a CatalogStore, log: &'a InteractionLog) -> Self {
        Self { catalog, log }
    }

    /// Picks up to [`RECOMMENDATION_COUNT`] products for the given profile
    ///
    /// Returns an empty list only when the catalog itself is empty. The
    /// random source is injected so tests can seed it; only tiers 1 and 4
    /// draw from it.
    pub fn recommend<R: Rng>(&self, profile_id: u32, rng: &mut R) -> Vec<&'a Product> {
        // History restricted to products the catalog still carries. Ids the
        // catalog does not know cannot create neighbor links or candidates.
        let history: BTreeSet<u32> = self
            .log
            .history(profile_id)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| self.catalog.contains(*id))
                    .collect()
            })
            .unwrap_or_default();

        // Tier 1: cold start
        if history.is_empty() {
            let everything: Vec<&'a Product> = self.catalog.products().iter().collect();
            return Self::sample_with_replacement(&everything, rng);
        }

        let neighbors: Vec<&BTreeSet<u32>> = self
            .log
            .profiles()
            .filter(|(id, viewed)| *id != profile_id && !history.is_disjoint(viewed))
            .map(|(_, viewed)| viewed)
            .collect();

        // Tier 3: no peer signal at all
        if neighbors.is_empty() {
            return self.category_fallback(&history);
        }

        // Tier 2: count distinct neighbor viewers per candidate product
        let mut pool: BTreeMap<u32, usize> = BTreeMap::new();
        for viewed in &neighbors {
            for product_id in viewed.iter().copied() {
                if !history.contains(&product_id) && self.catalog.contains(product_id) {
                    *pool.entry(product_id).or_insert(0) += 1;
                }
            }
        }

        // Tier 4: neighbors exist but have nothing new to offer
        if pool.is_empty() {
            return self.exhausted_pool_fallback(&history, rng);
        }

        let mut ranked: Vec<(u32, usize)> = pool.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        ranked
            .into_iter()
            .take(RECOMMENDATION_COUNT)
            .filter_map(|(product_id, _)| self.catalog.get(product_id))
            .collect()
    }

    fn category_fallback(&self, history: &BTreeSet<u32>) -> Vec<&'a Product> {
        let categories: BTreeSet<&str> = history
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .map(|product| product.category.as_str())
            .collect();

        self.catalog
            .products()
            .iter()
            .filter(|product| {
                categories.contains(product.category.as_str()) && !history.contains(&product.id)
            })
            .take(RECOMMENDATION_COUNT)
            .collect()
    }

    fn exhausted_pool_fallback<R: Rng>(
        &self,
        history: &BTreeSet<u32>,
        rng: &mut R,
    ) -> Vec<&'a Product> {
        let unseen: Vec<&'a Product> = self
            .catalog
            .products()
            .iter()
            .filter(|product| !history.contains(&product.id))
            .collect();

        if unseen.is_empty() {
            let everything: Vec<&'a Product> = self.catalog.products().iter().collect();
            return Self::sample_with_replacement(&everything, rng);
        }

        Self::sample_with_replacement(&unseen, rng)
    }

    fn sample_with_replacement<R: Rng>(candidates: &[&'a Product], rng: &mut R) -> Vec<&'a Product> {
        (0..RECOMMENDATION_COUNT)
            .filter_map(|_| candidates.choose(rng).copied())
            .collect()
    }
}
