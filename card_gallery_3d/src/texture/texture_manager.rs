/// Texture manager - deduplicated, prioritised card-face texture loading.
///
/// Loads run as local futures on a `LocalPool` owned by the manager and are
/// driven cooperatively: `pump()` once per frame starts queued loads (up to
/// `max_concurrent_loads`) and polls them until they stall.
///
/// Every request for the same (url, quality) returns the same shared
/// `TextureLoad`, so each image is fetched once. Requests are counted per
/// key; `release_texture` drops one, and the GPU texture goes away with the
/// last one.

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{select, Either, LocalBoxFuture, Shared};
use futures::task::LocalSpawnExt;
use futures::FutureExt;
use futures_timer::Delay;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, Texture, ResourceId};
use crate::lod::LodLevel;
use crate::metrics::GalleryMetric;
use crate::resource::ResourceManager;
use crate::runtime::GalleryRuntime;
use crate::{gallery_debug, gallery_err, gallery_error, gallery_trace, gallery_warn};
use super::texture_cache::{InMemoryTextureCache, TextureCache, TextureKey};
use super::texture_fetcher::TextureFetcher;
use super::texture_quality::{prepare_texture, TextureQuality};

// ===== PRIORITY & OPTIONS =====

/// Scheduling priority of a queued load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TexturePriority {
    Low,
    Medium,
    High,
}

/// Per-request options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub priority: TexturePriority,
    /// LOD of the requesting card
    pub lod: LodLevel,
}

impl LoadOptions {
    /// High priority for cards at High LOD, Medium otherwise
    pub fn for_lod(lod: LodLevel) -> Self {
        let priority = match lod {
            LodLevel::High => TexturePriority::High,
            LodLevel::Medium | LodLevel::Low => TexturePriority::Medium,
        };
        Self { priority, lod }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::for_lod(LodLevel::Medium)
    }
}

// ===== CONFIGURATION =====

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureManagerConfig {
    /// Fetches running at the same time
    pub max_concurrent_loads: usize,
    /// Upper bound of a single fetch
    pub load_timeout: Duration,
}

impl TextureManagerConfig {
    pub fn desktop() -> Self {
        Self { max_concurrent_loads: 6, load_timeout: Duration::from_secs(10) }
    }

    pub fn mobile() -> Self {
        Self { max_concurrent_loads: 3, load_timeout: Duration::from_secs(10) }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_loads == 0 {
            return Err(Error::InvalidConfig("max_concurrent_loads must be at least 1".to_string()));
        }
        if self.load_timeout.is_zero() {
            return Err(Error::InvalidConfig("load_timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl Default for TextureManagerConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

// ===== LOADED TEXTURE =====

/// A card-face texture uploaded to the GPU and tracked by the resource manager
pub struct CardTexture {
    pub url: String,
    pub quality: TextureQuality,
    pub texture: Arc<dyn Texture>,
    /// Resource manager generation the texture was uploaded under
    pub generation: u64,
}

impl CardTexture {
    pub fn id(&self) -> ResourceId {
        self.texture.id()
    }
}

impl std::fmt::Debug for CardTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardTexture")
            .field("url", &self.url)
            .field("quality", &self.quality)
            .field("texture", &self.texture.id())
            .field("generation", &self.generation)
            .finish()
    }
}

type LoadResult = Result<Arc<CardTexture>>;

// ===== TEXTURE LOAD =====

/// Shared handle on a pending or finished load.
///
/// Cloning is cheap; every clone resolves to the same outcome.
#[derive(Clone)]
pub struct TextureLoad {
    key: TextureKey,
    inner: Shared<LocalBoxFuture<'static, LoadResult>>,
}

impl TextureLoad {
    fn new(key: TextureKey, receiver: oneshot::Receiver<LoadResult>) -> Self {
        let url = key.url.clone();
        let inner = receiver
            .map(move |outcome| match outcome {
                Ok(result) => result,
                // Sender dropped: queue cleared or executor reset
                Err(oneshot::Canceled) => Err(Error::LoadCancelled(url)),
            })
            .boxed_local()
            .shared();
        Self { key, inner }
    }

    pub fn key(&self) -> &TextureKey {
        &self.key
    }

    /// Outcome if already resolved, without blocking
    pub fn try_result(&self) -> Option<LoadResult> {
        self.inner.clone().now_or_never()
    }

    pub fn is_resolved(&self) -> bool {
        self.try_result().is_some()
    }
}

impl Future for TextureLoad {
    type Output = LoadResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

// ===== QUEUE =====

struct QueuedLoad {
    priority: TexturePriority,
    sequence: u64,
    key: TextureKey,
    generation: u64,
    sender: oneshot::Sender<LoadResult>,
}

impl PartialEq for QueuedLoad {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for QueuedLoad {}

impl PartialOrd for QueuedLoad {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedLoad {
    /// Highest priority first, then oldest request first
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

// ===== LOAD JOB =====

/// Everything one running load needs, detached from the manager
struct LoadJob {
    key: TextureKey,
    generation: u64,
    timeout: Duration,
    max_texture_size: u32,
    fetcher: Rc<dyn TextureFetcher>,
    device: Arc<Mutex<dyn GraphicsDevice>>,
    resources: Arc<Mutex<ResourceManager>>,
}

impl LoadJob {
    async fn run(self) -> LoadResult {
        let fetch = self.fetcher.fetch(&self.key.url);
        let fetched = match select(fetch, Delay::new(self.timeout)).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => Err(Error::TextureTimeout {
                url: self.key.url.clone(),
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        };

        let result = fetched.and_then(|bytes| self.upload(&bytes));
        match &result {
            Ok(texture) => gallery_trace!(
                "gallery3d::TextureManager",
                "Loaded '{}' ({}) as texture #{}", self.key.url, self.key.quality.as_str(), texture.id()
            ),
            Err(Error::LoadCancelled(_)) => gallery_debug!(
                "gallery3d::TextureManager",
                "Discarded late texture '{}'", self.key.url
            ),
            Err(err) => {
                gallery_warn!("gallery3d::TextureManager", "{}", err);
                GalleryRuntime::emit(GalleryMetric::TextureLoadFailed { url: self.key.url.clone() });
            }
        }
        result
    }

    fn upload(&self, bytes: &[u8]) -> LoadResult {
        let desc = prepare_texture(&self.key.url, bytes, self.key.quality, self.max_texture_size)?;

        let generation = self.resources
            .lock()
            .map_err(|_| gallery_err!("gallery3d::TextureManager", "Resource manager lock poisoned"))?
            .generation();
        if generation != self.generation {
            return Err(Error::LoadCancelled(self.key.url.clone()));
        }

        let texture = self.device
            .lock()
            .map_err(|_| gallery_err!("gallery3d::TextureManager", "Graphics device lock poisoned"))?
            .create_texture(desc)?;
        let texture = self.resources
            .lock()
            .map_err(|_| gallery_err!("gallery3d::TextureManager", "Resource manager lock poisoned"))?
            .track_texture(texture);

        Ok(Arc::new(CardTexture {
            url: self.key.url.clone(),
            quality: self.key.quality,
            texture,
            generation,
        }))
    }
}

// ===== TEXTURE MANAGER =====

pub struct TextureManager {
    config: TextureManagerConfig,
    device: Arc<Mutex<dyn GraphicsDevice>>,
    resources: Arc<Mutex<ResourceManager>>,
    fetcher: Rc<dyn TextureFetcher>,
    cache: Box<dyn TextureCache>,
    queue: BinaryHeap<QueuedLoad>,
    pool: LocalPool,
    spawner: LocalSpawner,
    in_flight: Rc<Cell<usize>>,
    /// Outstanding `load_texture` requests per key
    users: FxHashMap<TextureKey, usize>,
    /// Unused keys whose load had not resolved when the last user left
    orphans: FxHashSet<TextureKey>,
    max_texture_size: u32,
    next_sequence: u64,
    fetches_started: u64,
}

impl TextureManager {
    /// Create a manager with an in-memory cache
    pub fn new(
        config: TextureManagerConfig,
        device: Arc<Mutex<dyn GraphicsDevice>>,
        resources: Arc<Mutex<ResourceManager>>,
        fetcher: Rc<dyn TextureFetcher>,
    ) -> Self {
        Self::with_cache(config, device, resources, fetcher, Box::new(InMemoryTextureCache::new()))
    }

    /// Create a manager with a host-provided cache
    pub fn with_cache(
        config: TextureManagerConfig,
        device: Arc<Mutex<dyn GraphicsDevice>>,
        resources: Arc<Mutex<ResourceManager>>,
        fetcher: Rc<dyn TextureFetcher>,
        cache: Box<dyn TextureCache>,
    ) -> Self {
        let max_texture_size = device
            .lock()
            .map(|d| d.capabilities().max_texture_size)
            .unwrap_or(0);
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            config,
            device,
            resources,
            fetcher,
            cache,
            queue: BinaryHeap::new(),
            pool,
            spawner,
            in_flight: Rc::new(Cell::new(0)),
            users: FxHashMap::default(),
            orphans: FxHashSet::default(),
            max_texture_size,
            next_sequence: 0,
            fetches_started: 0,
        }
    }

    pub fn config(&self) -> &TextureManagerConfig {
        &self.config
    }

    /// Request a texture. Each call must be paired with a `release_texture`.
    ///
    /// Returns the cached load for (url, quality) when one exists. A load
    /// that failed, or whose texture belongs to a disposed generation, is
    /// evicted and requested again.
    pub fn load_texture(&mut self, url: &str, quality: TextureQuality, options: LoadOptions) -> TextureLoad {
        let key = TextureKey::new(url, quality);
        let generation = self.current_generation();
        *self.users.entry(key.clone()).or_insert(0) += 1;

        if let Some(existing) = self.cache.get(&key) {
            match existing.try_result() {
                Some(Err(_)) => {
                    self.cache.remove(&key);
                }
                Some(Ok(texture)) if texture.generation != generation => {
                    self.cache.remove(&key);
                }
                _ => return existing,
            }
        }

        let (sender, receiver) = oneshot::channel();
        let load = TextureLoad::new(key.clone(), receiver);
        self.queue.push(QueuedLoad {
            priority: options.priority,
            sequence: self.next_sequence,
            key: key.clone(),
            generation,
            sender,
        });
        self.next_sequence += 1;
        self.cache.insert(key, load.clone());

        gallery_trace!(
            "gallery3d::TextureManager",
            "Queued '{}' ({}, {:?} priority, {} LOD)",
            url, quality.as_str(), options.priority, options.lod.as_str()
        );
        load
    }

    /// Drop one request for `key`.
    ///
    /// When no request is left the entry leaves the cache and its GPU
    /// texture is released; a load still running is released once it
    /// resolves. Returns true if a texture was released now.
    pub fn release_texture(&mut self, key: &TextureKey) -> bool {
        let Some(count) = self.users.get_mut(key) else {
            return false;
        };
        *count = count.saturating_sub(1);
        if *count > 0 {
            return false;
        }
        self.users.remove(key);
        self.evict_unused(key)
    }

    /// Start queued loads and poll running ones until none can progress.
    ///
    /// Called once per frame. Never blocks.
    pub fn pump(&mut self) {
        loop {
            self.start_queued();
            self.pool.run_until_stalled();
            if self.queue.is_empty() || self.in_flight.get() >= self.config.max_concurrent_loads {
                break;
            }
        }
        self.collect_orphans();
    }

    /// Block until `load` resolves, driving every other load meanwhile
    pub fn wait(&mut self, load: &TextureLoad) -> LoadResult {
        loop {
            self.start_queued();
            self.pool.run_until_stalled();
            if let Some(result) = load.try_result() {
                return result;
            }
            if self.in_flight.get() == 0 && self.queue.is_empty() {
                return Err(Error::LoadCancelled(load.key().url.clone()));
            }
            if self.in_flight.get() > 0 {
                self.pool.run();
            }
        }
    }

    /// Drop the cache, the queue, and every running load.
    ///
    /// Outstanding `TextureLoad`s resolve with `Error::LoadCancelled`.
    pub fn clear(&mut self) {
        let queued = self.queue.len();
        let running = self.in_flight.get();
        self.queue.clear();
        self.cache.clear();
        self.users.clear();
        self.orphans.clear();
        self.pool = LocalPool::new();
        self.spawner = self.pool.spawner();
        self.in_flight = Rc::new(Cell::new(0));
        gallery_debug!(
            "gallery3d::TextureManager",
            "Cleared texture cache ({} queued, {} running dropped)", queued, running
        );
    }

    // ===== QUERIES =====

    /// Loads waiting for a fetch slot
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Loads currently fetching or uploading
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.get()
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Outstanding requests for `key`
    pub fn user_count(&self, key: &TextureKey) -> usize {
        self.users.get(key).copied().unwrap_or(0)
    }

    /// Fetches started since creation
    pub fn fetches_started(&self) -> u64 {
        self.fetches_started
    }

    // ===== INTERNAL =====

    fn current_generation(&self) -> u64 {
        self.resources.lock().map(|rm| rm.generation()).unwrap_or(0)
    }

    /// Remove an unused entry; release its texture if it already resolved
    fn evict_unused(&mut self, key: &TextureKey) -> bool {
        let Some(load) = self.cache.get(key) else {
            return false;
        };
        match load.try_result() {
            None => {
                self.orphans.insert(key.clone());
                false
            }
            Some(Err(_)) => {
                self.cache.remove(key);
                false
            }
            Some(Ok(texture)) => {
                self.cache.remove(key);
                let released = match self.resources.lock() {
                    Ok(mut resources) => resources.release(texture.id()),
                    Err(_) => {
                        gallery_error!("gallery3d::TextureManager", "Resource manager lock poisoned");
                        false
                    }
                };
                if released {
                    gallery_trace!(
                        "gallery3d::TextureManager",
                        "Released unused texture '{}' ({})", key.url, key.quality.as_str()
                    );
                }
                released
            }
        }
    }

    /// Finish evicting orphans whose load has resolved since
    fn collect_orphans(&mut self) {
        if self.orphans.is_empty() {
            return;
        }
        let orphans: Vec<TextureKey> = self.orphans.drain().collect();
        for key in orphans {
            if !self.users.contains_key(&key) {
                self.evict_unused(&key);
            }
        }
    }

    fn start_queued(&mut self) {
        while self.in_flight.get() < self.config.max_concurrent_loads {
            let Some(queued) = self.queue.pop() else {
                break;
            };
            self.spawn_load(queued);
        }
    }

    fn spawn_load(&mut self, queued: QueuedLoad) {
        let QueuedLoad { key, generation, sender, .. } = queued;
        let job = LoadJob {
            key,
            generation,
            timeout: self.config.load_timeout,
            max_texture_size: self.max_texture_size,
            fetcher: self.fetcher.clone(),
            device: self.device.clone(),
            resources: self.resources.clone(),
        };

        let in_flight = self.in_flight.clone();
        in_flight.set(in_flight.get() + 1);
        self.fetches_started += 1;

        let task = async move {
            let result = job.run().await;
            in_flight.set(in_flight.get().saturating_sub(1));
            // Receiver gone means nobody is interested any more
            let _ = sender.send(result);
        };

        if let Err(err) = self.spawner.spawn_local(task) {
            // The dropped task takes its sender along: waiters see LoadCancelled
            self.in_flight.set(self.in_flight.get().saturating_sub(1));
            gallery_error!("gallery3d::TextureManager", "Failed to spawn texture load: {}", err);
        }
    }
}

#[cfg(test)]
#[path = "texture_manager_tests.rs"]
mod tests;
