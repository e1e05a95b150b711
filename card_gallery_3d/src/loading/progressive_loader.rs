/// Progressive loader - batched card instantiation with load progress.
///
/// State machine: `Idle -> Loading { batch } -> ... -> Complete`.
/// The first batch is larger so the nearest cards appear at once; later
/// batches are paced by `loading_delay` to keep frames smooth.

use std::collections::VecDeque;
use std::time::Duration;
use rustc_hash::FxHashSet;
use crate::card::CardId;
use crate::error::{Error, Result};
use crate::metrics::GalleryMetric;
use crate::runtime::GalleryRuntime;
use crate::{gallery_info, gallery_trace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoaderConfig {
    /// Cards loaded by the first batch
    pub initial_batch_size: usize,
    /// Cards loaded by every later batch
    pub batch_size: usize,
    /// Minimum time between two batches
    pub loading_delay: Duration,
}

impl LoaderConfig {
    pub fn desktop() -> Self {
        Self {
            initial_batch_size: 12,
            batch_size: 8,
            loading_delay: Duration::from_millis(50),
        }
    }

    pub fn mobile() -> Self {
        Self {
            initial_batch_size: 6,
            batch_size: 4,
            loading_delay: Duration::from_millis(100),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_batch_size == 0 || self.batch_size == 0 {
            return Err(Error::InvalidConfig(format!(
                "Batch sizes must be at least 1 (initial {}, batch {})",
                self.initial_batch_size, self.batch_size
            )));
        }
        Ok(())
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

/// Loader phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingPhase {
    /// Card set known, no batch loaded yet
    Idle,
    /// `batch` batches loaded so far
    Loading { batch: usize },
    Complete,
}

/// Snapshot of the loader for display and diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingState {
    pub loaded_cards: usize,
    pub total_cards: usize,
    /// Batches loaded so far
    pub batch_cursor: usize,
    pub is_complete: bool,
}

pub struct ProgressiveLoader {
    config: LoaderConfig,
    /// Current card set, in input order
    cards: Vec<CardId>,
    loaded: FxHashSet<CardId>,
    /// Cards still to load, in load order
    schedule: VecDeque<CardId>,
    phase: LoadingPhase,
    batches: usize,
    started_at: Option<Duration>,
    last_batch_at: Option<Duration>,
}

impl ProgressiveLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            cards: Vec::new(),
            loaded: FxHashSet::default(),
            schedule: VecDeque::new(),
            phase: LoadingPhase::Complete,
            batches: 0,
            started_at: None,
            last_batch_at: None,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Start over with a new card set.
    ///
    /// Duplicate ids are kept once. An empty set is complete immediately.
    pub fn reset(&mut self, card_ids: &[CardId]) {
        let mut seen = FxHashSet::default();
        self.cards = card_ids.iter().filter(|id| seen.insert((*id).clone())).cloned().collect();
        self.loaded.clear();
        self.schedule = self.cards.iter().cloned().collect();
        self.batches = 0;
        self.started_at = None;
        self.last_batch_at = None;
        self.phase = if self.cards.is_empty() { LoadingPhase::Complete } else { LoadingPhase::Idle };
        gallery_trace!("gallery3d::ProgressiveLoader", "Reset with {} cards", self.cards.len());
    }

    /// Schedule `priority_ids` first (in order), then every other unloaded card.
    ///
    /// Loaded cards stay loaded; unknown ids are ignored.
    pub fn set_visible(&mut self, priority_ids: &[CardId]) {
        if self.schedule.is_empty() {
            return;
        }
        let pending: FxHashSet<&CardId> = self.schedule.iter().collect();
        let mut scheduled = FxHashSet::default();
        let mut schedule = VecDeque::with_capacity(self.schedule.len());

        for id in priority_ids {
            if pending.contains(id) && scheduled.insert(id.clone()) {
                schedule.push_back(id.clone());
            }
        }
        for id in &self.cards {
            if pending.contains(id) && !scheduled.contains(id) {
                schedule.push_back(id.clone());
            }
        }
        self.schedule = schedule;
    }

    /// Load the next batch if one is due. Returns the newly loaded ids.
    pub fn tick(&mut self, now: Duration) -> Vec<CardId> {
        if self.phase == LoadingPhase::Complete {
            return Vec::new();
        }
        if let Some(last) = self.last_batch_at {
            if now.saturating_sub(last) < self.config.loading_delay {
                return Vec::new();
            }
        }

        let size = if self.batches == 0 { self.config.initial_batch_size } else { self.config.batch_size };
        let take = size.min(self.schedule.len());
        let batch: Vec<CardId> = self.schedule.drain(..take).collect();
        self.loaded.extend(batch.iter().cloned());

        self.started_at.get_or_insert(now);
        self.last_batch_at = Some(now);
        self.batches += 1;
        self.phase = LoadingPhase::Loading { batch: self.batches };

        gallery_trace!(
            "gallery3d::ProgressiveLoader",
            "Batch {} loaded {} cards ({}/{})",
            self.batches, batch.len(), self.loaded.len(), self.cards.len()
        );

        if self.schedule.is_empty() {
            self.phase = LoadingPhase::Complete;
            let elapsed = now.saturating_sub(self.started_at.unwrap_or(now));
            gallery_info!(
                "gallery3d::ProgressiveLoader",
                "Loaded {} cards in {} batches", self.cards.len(), self.batches
            );
            GalleryRuntime::emit(GalleryMetric::LoadingComplete {
                cards: self.cards.len(),
                elapsed_ms: elapsed.as_millis() as u64,
            });
        }
        batch
    }

    // ===== QUERIES =====

    pub fn phase(&self) -> LoadingPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == LoadingPhase::Complete
    }

    pub fn is_loaded(&self, id: &CardId) -> bool {
        self.loaded.contains(id)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn total_count(&self) -> usize {
        self.cards.len()
    }

    /// Fraction of cards loaded, in `[0, 1]`; exactly 1.0 once complete
    pub fn progress(&self) -> f32 {
        if self.cards.is_empty() || self.is_complete() {
            1.0
        } else {
            self.loaded.len() as f32 / self.cards.len() as f32
        }
    }

    pub fn state(&self) -> LoadingState {
        LoadingState {
            loaded_cards: self.loaded.len(),
            total_cards: self.cards.len(),
            batch_cursor: self.batches,
            is_complete: self.is_complete(),
        }
    }
}

impl Default for ProgressiveLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

#[cfg(test)]
#[path = "progressive_loader_tests.rs"]
mod tests;
