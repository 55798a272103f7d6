use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

use crate::clock::Clock;
use crate::engine::JobListEngine;
use crate::error::AppError;
use crate::sources::JobSource;

/// One engine per page view. Every call on it holds the lock for its
/// whole duration.
pub type SharedEngine = Arc<Mutex<JobListEngine>>;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn JobSource>,
    pub clock: Arc<dyn Clock>,
    pub views: ViewRegistry,
}

impl AppState {
    /// Views idle for longer than `view_ttl` are dropped.
    pub fn new(source: Arc<dyn JobSource>, clock: Arc<dyn Clock>, view_ttl: Duration) -> Self {
        Self {
            source,
            clock,
            views: ViewRegistry::new(view_ttl),
        }
    }

    /// Fetch the job list and load it into `engine`.
    ///
    /// A failed fetch loads an empty list; the error message is returned
    /// for the caller to report alongside the (empty) view.
    pub async fn refresh(&self, engine: &SharedEngine) -> Option<String> {
        let (jobs, notice) = match self.source.fetch_jobs().await {
            Ok(jobs) => (jobs, None),
            Err(e) => {
                tracing::warn!("Job source '{}' failed: {e}", self.source.name());
                (Vec::new(), Some(e.to_string()))
            }
        };

        let mut engine = engine.lock().await;
        engine.load(jobs);
        engine.recompute();
        notice
    }
}

struct ViewEntry {
    engine: SharedEngine,
    last_access: Instant,
}

impl ViewEntry {
    fn expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.last_access) > ttl
    }
}

/// Live page views, keyed by view id.
///
/// A view that goes unused for `ttl` is treated as abandoned: lookups miss
/// it and the next prune drops it.
#[derive(Clone)]
pub struct ViewRegistry {
    views: Arc<RwLock<HashMap<Uuid, ViewEntry>>>,
    ttl: Duration,
}

impl ViewRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            views: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn insert(&self, engine: SharedEngine) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut views = self.views.write().await;
        views.retain(|_, entry| !entry.expired(now, self.ttl));
        views.insert(
            id,
            ViewEntry {
                engine,
                last_access: now,
            },
        );
        id
    }

    /// Look up a view and mark it as used.
    pub async fn get(&self, id: Uuid) -> Result<SharedEngine, AppError> {
        let now = Instant::now();
        let mut views = self.views.write().await;
        match views.get_mut(&id) {
            Some(entry) if !entry.expired(now, self.ttl) => {
                entry.last_access = now;
                Ok(entry.engine.clone())
            }
            Some(_) => {
                views.remove(&id);
                tracing::debug!("View {id} expired");
                Err(AppError::NotFound(format!("View {id} not found")))
            }
            None => Err(AppError::NotFound(format!("View {id} not found"))),
        }
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.views
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("View {id} not found")))
    }

    /// Drop every expired view. Returns how many were dropped.
    pub async fn prune(&self) -> usize {
        let now = Instant::now();
        let mut views = self.views.write().await;
        let before = views.len();
        views.retain(|_, entry| !entry.expired(now, self.ttl));
        before - views.len()
    }

    /// Number of views held, including expired ones not yet pruned.
    pub async fn len(&self) -> usize {
        self.views.read().await.len()
    }

    /// Prune expired views every `period` until the runtime shuts down.
    pub fn spawn_sweeper(&self, period: Duration) -> tokio::task::JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let dropped = registry.prune().await;
                if dropped > 0 {
                    tracing::info!("Dropped {dropped} idle views");
                }
            }
        })
    }
}
