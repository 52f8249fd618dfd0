//! Fire-and-forget image warming
//!
//! Preloading never fails. Empty URLs are skipped, loader errors are logged
//! and dropped, and the returned future resolves once every load settles.

use crate::loader::{ImageData, ImageLoader};
use futures::future::join_all;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Arc, Mutex, PoisonError};

/// Counts from a preload pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreloadReport {
    /// Images decoded during this pass
    pub loaded: usize,
    /// Images that failed to load
    pub failed: usize,
    /// Images already cached before the pass
    pub cached: usize,
}

/// Warm a single image and discard the result
pub async fn preload_image(loader: &dyn ImageLoader, url: &str) {
    if url.trim().is_empty() {
        return;
    }
    if let Err(e) = loader.load(url).await {
        tracing::warn!("Failed to preload {}: {}", url, e);
    }
}

/// Warm every non-empty URL concurrently
pub async fn preload_images<S: AsRef<str>>(loader: &dyn ImageLoader, urls: &[S]) {
    let pending: Vec<_> = urls
        .iter()
        .map(AsRef::as_ref)
        .filter(|url| !url.trim().is_empty())
        .map(|url| preload_image(loader, url))
        .collect();
    if pending.is_empty() {
        return;
    }
    join_all(pending).await;
}

/// Loader front with a decoded-image cache
pub struct ImagePreloader {
    loader: Arc<dyn ImageLoader>,
    cache: Mutex<FxHashMap<String, Arc<ImageData>>>,
}

impl ImagePreloader {
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            loader,
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    /// Load every URL not already cached
    ///
    /// Duplicate URLs within one call are loaded and counted once.
    pub async fn preload<S: AsRef<str>>(&self, urls: &[S]) -> PreloadReport {
        let mut report = PreloadReport::default();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut wanted: Vec<&str> = Vec::new();
        for url in urls.iter().map(AsRef::as_ref) {
            if url.trim().is_empty() || !seen.insert(url) {
                continue;
            }
            if self.is_cached(url) {
                report.cached += 1;
            } else {
                wanted.push(url);
            }
        }

        if wanted.is_empty() {
            return report;
        }

        let loads = wanted.iter().map(|url| async move { (*url, self.loader.load(url).await) });
        for (url, result) in join_all(loads).await {
            match result {
                Ok(data) => {
                    tracing::debug!("Preloaded {} ({}x{})", url, data.width(), data.height());
                    self.lock().insert(url.to_string(), Arc::new(data));
                    report.loaded += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to preload {}: {}", url, e);
                    report.failed += 1;
                }
            }
        }
        report
    }

    pub fn get(&self, url: &str) -> Option<Arc<ImageData>> {
        self.lock().get(url).cloned()
    }

    pub fn is_cached(&self, url: &str) -> bool {
        self.lock().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, Arc<ImageData>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ImagePreloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePreloader")
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}
