/// LOD system - per-card detail tier from camera distance.
///
/// Three tiers plus a cull flag:
/// - High: full geometry, full-resolution texture
/// - Medium: reduced geometry, half-resolution texture
/// - Low: minimal geometry, quarter-resolution texture
///
/// Cards beyond the cull distance keep an assignment but are not rendered.

use std::time::Duration;
use glam::Vec3;
use rustc_hash::FxHashMap;
use crate::card::CardId;
use crate::error::{Error, Result};
use crate::layout::CardPosition;
use crate::gallery_trace;

/// Detail tier, ordered from most to least detailed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LodLevel {
    High,
    Medium,
    Low,
}

impl LodLevel {
    pub const ALL: [LodLevel; 3] = [LodLevel::High, LodLevel::Medium, LodLevel::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            LodLevel::High => "high",
            LodLevel::Medium => "medium",
            LodLevel::Low => "low",
        }
    }
}

// ===== CONFIGURATION =====

/// Distance thresholds and update rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodConfig {
    /// At or below: High
    pub high_detail_distance: f32,
    /// At or below (and above high): Medium, otherwise Low
    pub medium_detail_distance: f32,
    /// Beyond: not rendered
    pub cull_distance: f32,
    /// Maximum recomputations per second
    pub update_frequency: f32,
}

impl LodConfig {
    pub fn desktop() -> Self {
        Self {
            high_detail_distance: 15.0,
            medium_detail_distance: 30.0,
            cull_distance: 60.0,
            update_frequency: 10.0,
        }
    }

    pub fn mobile() -> Self {
        Self {
            high_detail_distance: 10.0,
            medium_detail_distance: 20.0,
            cull_distance: 40.0,
            update_frequency: 5.0,
        }
    }

    /// Minimum time between two recomputations
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.update_frequency)
    }

    /// Check thresholds are positive and strictly increasing
    pub fn validate(&self) -> Result<()> {
        let thresholds = [self.high_detail_distance, self.medium_detail_distance, self.cull_distance];
        if thresholds.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "LOD distances must be finite and positive, got {:?}", thresholds
            )));
        }
        if !(self.high_detail_distance < self.medium_detail_distance
            && self.medium_detail_distance < self.cull_distance)
        {
            return Err(Error::InvalidConfig(format!(
                "LOD distances must increase (high {} < medium {} < cull {})",
                self.high_detail_distance, self.medium_detail_distance, self.cull_distance
            )));
        }
        if !self.update_frequency.is_finite() || self.update_frequency <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "LOD update frequency must be positive, got {}", self.update_frequency
            )));
        }
        Ok(())
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

// ===== ASSIGNMENT =====

/// Detail decision for one card
#[derive(Debug, Clone, PartialEq)]
pub struct LodAssignment {
    pub card_id: CardId,
    pub lod_level: LodLevel,
    pub should_render: bool,
    /// Distance to the viewer at the last update
    pub distance: f32,
}

impl LodAssignment {
    /// Whether the tier or the visibility differs (distance alone does not count)
    fn differs_from(&self, other: &LodAssignment) -> bool {
        self.lod_level != other.lod_level || self.should_render != other.should_render
    }
}

/// Tier and visibility for a distance. Monotonic: a larger distance never
/// yields a more detailed tier.
pub fn lod_for_distance(distance: f32, config: &LodConfig) -> (LodLevel, bool) {
    let level = if distance <= config.high_detail_distance {
        LodLevel::High
    } else if distance <= config.medium_detail_distance {
        LodLevel::Medium
    } else {
        LodLevel::Low
    };
    (level, distance <= config.cull_distance)
}

/// Compute assignments for every positioned card
pub fn compute_lods(
    positions: &[CardPosition],
    viewer: Vec3,
    config: &LodConfig,
) -> FxHashMap<CardId, LodAssignment> {
    positions
        .iter()
        .map(|p| {
            let distance = p.position.distance(viewer);
            let (lod_level, should_render) = lod_for_distance(distance, config);
            let id = p.card.id.clone();
            (id.clone(), LodAssignment { card_id: id, lod_level, should_render, distance })
        })
        .collect()
}

/// Number of cards per tier (culled cards counted separately)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LodCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub culled: usize,
}

// ===== LOD SYSTEM =====

/// Throttled, incremental LOD state for the whole gallery
pub struct LodSystem {
    config: LodConfig,
    assignments: FxHashMap<CardId, LodAssignment>,
    last_update: Option<Duration>,
    dirty: bool,
}

impl LodSystem {
    pub fn new(config: LodConfig) -> Self {
        Self {
            config,
            assignments: FxHashMap::default(),
            last_update: None,
            dirty: true,
        }
    }

    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    /// Replace thresholds; the next update recomputes unconditionally
    pub fn set_config(&mut self, config: LodConfig) {
        self.config = config;
        self.dirty = true;
    }

    /// Force the next `update` to run (layout or card set changed)
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether an update at `now` would recompute
    pub fn is_due(&self, now: Duration) -> bool {
        if self.dirty {
            return true;
        }
        match self.last_update {
            None => true,
            Some(last) => match now.checked_sub(last) {
                Some(elapsed) => elapsed >= self.config.update_interval(),
                None => true,
            },
        }
    }

    /// Recompute assignments if due.
    ///
    /// Returns the ids whose tier or visibility changed, including newly
    /// seen and removed cards. Returns an empty list when throttled.
    pub fn update(&mut self, positions: &[CardPosition], viewer: Vec3, now: Duration) -> Vec<CardId> {
        if !self.is_due(now) {
            return Vec::new();
        }
        self.last_update = Some(now);
        self.dirty = false;

        let fresh = compute_lods(positions, viewer, &self.config);
        let mut changed = Vec::new();

        self.assignments.retain(|id, _| {
            let keep = fresh.contains_key(id);
            if !keep {
                changed.push(id.clone());
            }
            keep
        });

        for (id, assignment) in fresh {
            match self.assignments.get_mut(&id) {
                Some(current) => {
                    if current.differs_from(&assignment) {
                        changed.push(id);
                    }
                    *current = assignment;
                }
                None => {
                    changed.push(id.clone());
                    self.assignments.insert(id, assignment);
                }
            }
        }

        changed.sort();
        if !changed.is_empty() {
            gallery_trace!("gallery3d::LodSystem", "{} LOD assignments changed", changed.len());
        }
        changed
    }

    pub fn assignment(&self, id: &CardId) -> Option<&LodAssignment> {
        self.assignments.get(id)
    }

    pub fn assignments(&self) -> &FxHashMap<CardId, LodAssignment> {
        &self.assignments
    }

    /// Rendered cards, nearest first (ties broken by id)
    pub fn visible_by_priority(&self) -> Vec<CardId> {
        let mut visible: Vec<&LodAssignment> = self.assignments
            .values()
            .filter(|a| a.should_render)
            .collect();
        visible.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.card_id.cmp(&b.card_id))
        });
        visible.into_iter().map(|a| a.card_id.clone()).collect()
    }

    pub fn counts(&self) -> LodCounts {
        let mut counts = LodCounts::default();
        for assignment in self.assignments.values() {
            if !assignment.should_render {
                counts.culled += 1;
                continue;
            }
            match assignment.lod_level {
                LodLevel::High => counts.high += 1,
                LodLevel::Medium => counts.medium += 1,
                LodLevel::Low => counts.low += 1,
            }
        }
        counts
    }

    /// Drop all assignments (card set replaced)
    pub fn clear(&mut self) {
        self.assignments.clear();
        self.last_update = None;
        self.dirty = true;
    }
}

#[cfg(test)]
#[path = "lod_system_tests.rs"]
mod tests;
