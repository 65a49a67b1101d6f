//! Shared application state for the API server.
//!
//! [`AppState`] holds the farm context every handler runs against and a
//! [`RenderCache`] of expensive JSON views keyed by their revalidation
//! path. Entries expire after the configured TTL or as soon as a write
//! publishes their path, whichever comes first.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use finquina_core::{Farm, RevalidationEvent};
use moka::future::Cache;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Upper bound on cached views; there are only a handful of paths.
const MAX_VIEWS: u64 = 64;

/// Rendered JSON views keyed by path.
///
/// A zero TTL disables caching. Every invalidation bumps a generation
/// counter; a render that started before the bump is not stored.
#[derive(Debug, Clone)]
pub struct RenderCache {
    ttl: Duration,
    views: Cache<String, Value>,
    generation: Arc<AtomicU64>,
}

impl RenderCache {
    /// An empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        let views = Cache::builder()
            .max_capacity(MAX_VIEWS)
            .time_to_live(ttl)
            .build();
        Self {
            ttl,
            views,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current invalidation generation. Take it before rendering.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// The fresh view stored under `path`, if any.
    pub async fn get(&self, path: &str) -> Option<Value> {
        self.views.get(path).await
    }

    /// Store a rendered view.
    pub async fn put(&self, path: &str, body: Value) {
        if self.ttl.is_zero() {
            return;
        }
        self.views.insert(path.to_owned(), body).await;
    }

    /// Store a view rendered since `started`, unless an invalidation
    /// happened meanwhile. Returns whether it was stored.
    pub async fn put_rendered(&self, path: &str, body: Value, started: u64) -> bool {
        if self.generation() != started {
            return false;
        }
        self.put(path, body).await;
        // An invalidation may have slipped in between the check and the insert.
        if self.generation() != started {
            self.views.remove(path).await;
            return false;
        }
        true
    }

    /// Drop the views for `paths`. Returns how many were present.
    pub async fn invalidate(&self, paths: &[String]) -> usize {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let mut dropped: usize = 0;
        for path in paths {
            if self.views.remove(path.as_str()).await.is_some() {
                dropped = dropped.saturating_add(1);
            }
        }
        dropped
    }

    /// Drop every view.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.views.invalidate_all();
    }
}

/// Shared state passed to every handler.
#[derive(Debug)]
pub struct AppState {
    /// The farm context.
    pub farm: Arc<Farm>,
    /// Cached dashboard and analytics views.
    pub cache: RenderCache,
}

impl AppState {
    /// Wrap a farm, sizing the cache from its settings.
    pub fn new(farm: Arc<Farm>) -> Self {
        let ttl = farm.config().cache.ttl();
        Self {
            farm,
            cache: RenderCache::new(ttl),
        }
    }

    /// Subscribe to revalidation events.
    pub fn subscribe(&self) -> broadcast::Receiver<RevalidationEvent> {
        self.farm.revalidator().subscribe()
    }

    /// Serve `path` from the cache, rendering it with `render` on a miss.
    pub async fn cached<T, R, F>(&self, path: &str, render: R) -> Result<Value, ApiError>
    where
        T: Serialize,
        R: FnOnce() -> F,
        F: Future<Output = T>,
    {
        if let Some(body) = self.cache.get(path).await {
            debug!(path, "Render cache hit");
            return Ok(body);
        }
        let started = self.cache.generation();
        let body = serde_json::to_value(Box::pin(render()).await)
            .map_err(|e| ApiError::Internal(format!("JSON error: {e}")))?;
        if !self.cache.put_rendered(path, body.clone(), started).await {
            debug!(path, "View invalidated while rendering, not cached");
        }
        Ok(body)
    }

    /// Start the task that evicts cached views when a write touches them.
    ///
    /// A subscriber that lags has missed events, so it clears the whole
    /// cache instead.
    pub fn spawn_cache_invalidation(self: &Arc<Self>) -> JoinHandle<()> {
        let state = Arc::clone(self);
        let mut rx = state.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        let dropped = state.cache.invalidate(&event.paths).await;
                        debug!(paths = ?event.paths, dropped, "Render cache invalidated");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Revalidation listener lagged, clearing render cache");
                        state.cache.clear();
                    }
                    Err(RecvError::Closed) => return,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn views_expire_on_invalidation() {
        let cache = RenderCache::new(Duration::from_secs(60));
        cache.put("/", serde_json::json!({"activeCrops": 3})).await;
        cache.put("/analytics", serde_json::json!([])).await;
        assert!(cache.get("/").await.is_some());

        let dropped = cache.invalidate(&["/".to_owned(), "/crops".to_owned()]).await;
        assert_eq!(dropped, 1);
        assert!(cache.get("/").await.is_none());
        assert!(cache.get("/analytics").await.is_some());
    }

    #[tokio::test]
    async fn view_invalidated_during_render_is_not_stored() {
        let cache = RenderCache::new(Duration::from_secs(60));
        let started = cache.generation();
        cache.invalidate(&["/".to_owned()]).await;
        let stored = cache
            .put_rendered("/", serde_json::json!({"activeCrops": 1}), started)
            .await;
        assert!(!stored);
        assert!(cache.get("/").await.is_none());

        let started = cache.generation();
        assert!(cache.put_rendered("/", Value::Null, started).await);
        assert!(cache.get("/").await.is_some());
    }

    #[tokio::test]
    async fn zero_ttl_stores_nothing() {
        let cache = RenderCache::new(Duration::ZERO);
        cache.put("/", Value::Null).await;
        assert!(cache.get("/").await.is_none());
    }

    #[tokio::test]
    async fn stale_views_are_not_served() {
        let cache = RenderCache::new(Duration::from_millis(10));
        cache.put("/", Value::Bool(true)).await;
        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get("/").await.is_none());
    }
}
