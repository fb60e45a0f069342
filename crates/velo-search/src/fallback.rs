//! The in-memory fallback scorer.
//!
//! Keeps a TTL-cached snapshot of the whole catalog and scores it with a
//! simple phrase/token heuristic. The snapshot is replaced as a unit: the
//! new one is fully built before the single assignment that publishes it.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use velo_catalog::Product;
use velo_data::cancel::CancelToken;

use crate::error::SearchError;
use crate::source::ProductSource;

/// How long a snapshot stays fresh.
pub const SNAPSHOT_TTL: Duration = Duration::from_secs(5 * 60);

/// Maximum number of suggestions returned.
const MAX_SUGGESTIONS: usize = 5;

/// Score weights.
const PHRASE_WEIGHT: f64 = 100.0;
const TOKEN_WEIGHT: f64 = 50.0;
const NAME_BONUS: f64 = 75.0;
const BRAND_BONUS: f64 = 25.0;

/// The cached catalog snapshot and its refresh time.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    snapshot: Vec<Product>,
    refreshed_at: Option<Instant>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.refreshed_at
            .map(|at| at.elapsed() < ttl)
            .unwrap_or(false)
    }

    fn has_data(&self) -> bool {
        self.refreshed_at.is_some()
    }

    fn replace(&mut self, snapshot: Vec<Product>) {
        self.snapshot = snapshot;
        self.refreshed_at = Some(Instant::now());
    }
}

/// Full-text search over the TTL-cached snapshot.
pub struct FallbackIndex {
    cache: Mutex<SnapshotCache>,
    ttl: Duration,
}

impl FallbackIndex {
    pub fn new() -> Self {
        Self::with_ttl(SNAPSHOT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(SnapshotCache::new()),
            ttl,
        }
    }

    /// The current snapshot, reloading on expiry.
    ///
    /// A failed reload serves the stale snapshot instead of failing —
    /// availability over freshness. Only a reload with no prior snapshot
    /// surfaces the error.
    async fn snapshot(
        &self,
        source: &dyn ProductSource,
        cancel: &CancelToken,
    ) -> Result<Vec<Product>, SearchError> {
        let mut cache = self.cache.lock().await;
        if cache.is_fresh(self.ttl) {
            return Ok(cache.snapshot.clone());
        }
        match source.all_products(cancel).await {
            Ok(products) => {
                cache.replace(products.clone());
                Ok(products)
            }
            Err(e) if cache.has_data() => {
                tracing::warn!(error = %e, "snapshot reload failed, serving stale snapshot");
                Ok(cache.snapshot.clone())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Search the snapshot, best scores first, rating breaking ties.
    pub async fn search(
        &self,
        source: &dyn ProductSource,
        query: &str,
        limit: usize,
        offset: usize,
        cancel: &CancelToken,
    ) -> Result<Vec<Product>, SearchError> {
        let snapshot = self.snapshot(source, cancel).await?;

        let mut scored: Vec<(f64, Product)> = snapshot
            .into_iter()
            .filter_map(|product| {
                let score = score(query, &product);
                (score > 0.0).then_some((score, product))
            })
            .collect();
        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b
                .total_cmp(score_a)
                .then(b.rating.total_cmp(&a.rating))
        });

        Ok(scored
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, product)| product)
            .collect())
    }

    /// Deduplicated suggestion strings drawn from matching names, brands,
    /// categories, and subcategories. Entries starting with the query rank
    /// first, then shorter entries, capped at five.
    pub async fn suggest(
        &self,
        source: &dyn ProductSource,
        query: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<String>, SearchError> {
        let snapshot = self.snapshot(source, cancel).await?;
        let needle = query.trim().to_lowercase();

        let mut suggestions: Vec<String> = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        for product in &snapshot {
            let candidates = [
                Some(product.name.as_str()),
                product.brand.as_deref(),
                Some(product.category.as_str()),
                Some(product.sub_category.as_str()),
            ];
            for candidate in candidates.into_iter().flatten() {
                let lower = candidate.to_lowercase();
                if lower.contains(&needle) && !seen.contains(&lower) {
                    seen.push(lower);
                    suggestions.push(candidate.to_string());
                }
            }
        }

        suggestions.sort_by(|a, b| {
            let a_prefix = a.to_lowercase().starts_with(&needle);
            let b_prefix = b.to_lowercase().starts_with(&needle);
            b_prefix
                .cmp(&a_prefix)
                .then(a.len().cmp(&b.len()))
                .then_with(|| a.cmp(b))
        });
        suggestions.truncate(MAX_SUGGESTIONS);
        Ok(suggestions)
    }
}

impl Default for FallbackIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Score one product against a query.
///
/// +100 for the full phrase appearing anywhere in the searchable text,
/// +(matched-token-fraction × 50) for partial token overlap, +75 when the
/// name contains the phrase, +25 when the brand does.
pub fn score(query: &str, product: &Product) -> f64 {
    let phrase = query.trim().to_lowercase();
    if phrase.is_empty() {
        return 0.0;
    }
    let tokens: Vec<&str> = phrase.split_whitespace().collect();

    let haystack = [
        Some(product.name.as_str()),
        product.brand.as_deref(),
        Some(product.category.as_str()),
        Some(product.sub_category.as_str()),
        product.description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase();

    let mut score = 0.0;
    if haystack.contains(&phrase) {
        score += PHRASE_WEIGHT;
    }
    let matched = tokens.iter().filter(|t| haystack.contains(**t)).count();
    score += (matched as f64 / tokens.len() as f64) * TOKEN_WEIGHT;
    if product.name.to_lowercase().contains(&phrase) {
        score += NAME_BONUS;
    }
    if let Some(brand) = &product.brand {
        if brand.to_lowercase().contains(&phrase) {
            score += BRAND_BONUS;
        }
    }
    score
}
