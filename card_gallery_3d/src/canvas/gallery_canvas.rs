/// Gallery canvas - the 3D gallery frame loop.
///
/// Owns the per-session subsystems (resource manager, texture manager, LOD,
/// progressive loader, camera, cards) and composes one `SceneFrame` per call
/// to `frame`. Falls back to a 2D grid when 3D is unavailable, too heavy, or
/// the user asked for the accessible presentation.
///
/// Frame order: layout (if dirty) -> camera -> LOD -> loader -> textures ->
/// cards -> environment -> present.

use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use glam::{Vec2, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};
use winit::keyboard::KeyCode;
use crate::camera::{ControlsConfig, OrbitCamera};
use crate::card::{CardEntity, CardId, CardSource};
use crate::config::GalleryConfig;
use crate::error::{Error, Result};
use crate::gallery_card::{CardRenderContext, GalleryCard};
use crate::graphics_device::{CardDrawItem, DeviceCapabilities, FrameOverlay, GraphicsDevice, SceneFrame};
use crate::layout::{compute_layout, layout_bounds, CardPosition, CARD_HEIGHT};
use crate::loading::ProgressiveLoader;
use crate::lod::LodSystem;
use crate::metrics::GalleryMetric;
use crate::preferences::{GalleryNavigation, GalleryPreferences, NavigationAction, NavigationOutcome};
use crate::resource::{ResourceManager, ResourceStats};
use crate::runtime::GalleryRuntime;
use crate::texture::{TextureFetcher, TextureManager};
use crate::{gallery_debug, gallery_err, gallery_error, gallery_info, gallery_warn};
use super::capability::{decide_render_mode, RenderMode};
use super::environment::{environment_for, EnvironmentSettings};
use super::fallback_grid::{build_fallback_grid, fallback_columns, FallbackGridItem};
use super::frame_stats::FrameStats;

/// Message shown for an empty collection or search result
pub const EMPTY_COLLECTION_MESSAGE: &str = "No Cards Found";

/// Longest frame step accepted, in seconds
const MAX_FRAME_STEP: f32 = 10.0;

/// What the canvas is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasState {
    /// Not mounted yet
    DetectingCapability,
    /// Host draws the 2D grid (`fallback_grid`)
    Fallback2D,
    /// Nothing to show; host displays `EMPTY_COLLECTION_MESSAGE`
    Empty,
    /// Scene renders with a progress overlay
    Loading { progress: f32 },
    Ready,
    /// Scene torn down after a render failure; `retry` starts over
    Failed { message: String },
}

type SelectCallback = Box<dyn FnMut(&CardEntity)>;

pub struct GalleryCanvas {
    config: GalleryConfig,
    capabilities: DeviceCapabilities,
    device: Arc<Mutex<dyn GraphicsDevice>>,
    resources: Arc<Mutex<ResourceManager>>,
    textures: TextureManager,
    preferences: GalleryPreferences,
    render_mode: Option<RenderMode>,
    state: CanvasState,
    mounted: bool,

    /// Every card of the collection
    collection: Vec<CardEntity>,
    search_query: String,
    /// Cards matching the search query, in collection order
    shown: Vec<CardEntity>,
    positions: Vec<CardPosition>,
    layout_dirty: bool,
    card_set_dirty: bool,

    camera: OrbitCamera,
    camera_placed: bool,
    lod: LodSystem,
    loader: ProgressiveLoader,
    cards: FxHashMap<CardId, GalleryCard>,
    /// Cards that failed at the card boundary; skipped until the scene is rebuilt
    failed_cards: FxHashSet<CardId>,

    selected: Option<CardId>,
    navigation: GalleryNavigation,
    on_card_select: Option<SelectCallback>,
    environment: EnvironmentSettings,

    clock: Duration,
    frame_index: u64,
    frame_stats: FrameStats,
}

impl GalleryCanvas {
    /// Create an unmounted canvas
    pub fn new(
        device: Arc<Mutex<dyn GraphicsDevice>>,
        fetcher: Rc<dyn TextureFetcher>,
        config: GalleryConfig,
    ) -> Result<Self> {
        config.validate()?;
        let capabilities = device
            .lock()
            .map_err(|_| gallery_err!("gallery3d::Canvas", "Graphics device lock poisoned"))?
            .capabilities();

        let resources = Arc::new(Mutex::new(ResourceManager::new()));
        let textures = TextureManager::new(config.textures, device.clone(), resources.clone(), fetcher);
        let preferences = GalleryPreferences::default();
        let camera = OrbitCamera::new(config.controls, capabilities.aspect_ratio());

        Ok(Self {
            capabilities,
            device,
            resources,
            textures,
            render_mode: None,
            state: CanvasState::DetectingCapability,
            mounted: false,
            collection: Vec::new(),
            search_query: String::new(),
            shown: Vec::new(),
            positions: Vec::new(),
            layout_dirty: true,
            card_set_dirty: true,
            camera,
            camera_placed: false,
            lod: LodSystem::new(config.lod),
            loader: ProgressiveLoader::new(config.loader),
            cards: FxHashMap::default(),
            failed_cards: FxHashSet::default(),
            selected: None,
            navigation: GalleryNavigation::default(),
            on_card_select: None,
            environment: environment_for(&preferences, &capabilities),
            preferences,
            clock: Duration::ZERO,
            frame_index: 0,
            frame_stats: FrameStats::default(),
            config,
        })
    }

    /// Create an unmounted canvas with the preset matching the device
    pub fn for_device(device: Arc<Mutex<dyn GraphicsDevice>>, fetcher: Rc<dyn TextureFetcher>) -> Result<Self> {
        let capabilities = device
            .lock()
            .map_err(|_| gallery_err!("gallery3d::Canvas", "Graphics device lock poisoned"))?
            .capabilities();
        Self::new(device, fetcher, GalleryConfig::for_device(&capabilities))
    }

    /// Register the selection callback
    pub fn on_card_select(&mut self, callback: impl FnMut(&CardEntity) + 'static) {
        self.on_card_select = Some(Box::new(callback));
    }

    // ===== LIFECYCLE =====

    /// Show a card collection. The render mode is decided here, once.
    ///
    /// Mounting again replaces the collection and releases the previous scene.
    pub fn mount(&mut self, cards: Vec<CardEntity>, preferences: GalleryPreferences) {
        if self.mounted {
            self.dispose_scene();
        }
        self.collection = cards;
        self.preferences = preferences;
        self.search_query.clear();
        self.selected = None;
        self.mounted = true;

        let mode = self.decide_mode();
        self.render_mode = Some(mode);
        self.environment = environment_for(&self.preferences, &self.capabilities);
        self.camera.set_config(self.controls_config());
        self.camera_placed = false;

        gallery_info!(
            "gallery3d::Canvas",
            "Mounted {} cards ({:?})", self.collection.len(), mode
        );
        self.state = CanvasState::DetectingCapability;
        self.refresh_shown();
    }

    /// Fetch a collection from a data source and mount it.
    ///
    /// A data source failure leaves the canvas in `Failed`.
    pub fn mount_collection(
        &mut self,
        source: &dyn CardSource,
        collection_id: &str,
        preferences: GalleryPreferences,
    ) -> Result<()> {
        match source.fetch_collection_cards(collection_id) {
            Ok(cards) => {
                self.mount(cards, preferences);
                Ok(())
            }
            Err(err) => {
                gallery_warn!("gallery3d::Canvas", "Collection '{}' unavailable: {}", collection_id, err);
                self.mount(Vec::new(), preferences);
                self.state = CanvasState::Failed { message: err.to_string() };
                Err(err)
            }
        }
    }

    /// Release every GPU resource and return to the unmounted state
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.dispose_scene();
        self.mounted = false;
        self.render_mode = None;
        self.state = CanvasState::DetectingCapability;
        gallery_info!("gallery3d::Canvas", "Unmounted");
    }

    /// Leave `Failed`: dispose again, then rebuild the scene from scratch
    pub fn retry(&mut self) {
        if !matches!(self.state, CanvasState::Failed { .. }) {
            return;
        }
        self.dispose_scene();
        self.state = self.derived_state();
        gallery_info!("gallery3d::Canvas", "Retrying ({:?})", self.state);
    }

    // ===== FRAME =====

    /// Advance by `dt` seconds and present one frame.
    ///
    /// Does nothing unless the canvas shows the 3D scene. Per-card errors
    /// are absorbed; a presentation failure disposes the scene, moves to
    /// `Failed`, and is returned.
    pub fn frame(&mut self, dt: f32) -> Result<()> {
        if !self.is_rendering_3d() {
            return Ok(());
        }
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_STEP) } else { 0.0 };
        self.clock += Duration::from_secs_f32(dt);
        self.frame_index += 1;

        let set_reset = if self.layout_dirty { self.rebuild_layout() } else { false };

        self.camera.update(dt);

        let changed = self.lod.update(&self.positions, self.camera.position(), self.clock);
        if set_reset || !changed.is_empty() {
            self.loader.set_visible(&self.lod.visible_by_priority());
        }
        self.loader.tick(self.clock);

        self.textures.pump();

        let cards = self.sync_cards(dt);

        let overlay = if self.loader.is_complete() {
            None
        } else {
            Some(FrameOverlay::LoadingProgress(self.loader.progress()))
        };
        let frame = SceneFrame {
            frame_index: self.frame_index,
            view: self.camera.view(),
            projection: self.camera.projection(),
            camera_position: self.camera.position(),
            environment: self.environment,
            cards,
            overlay,
        };

        let presented = match self.device.lock() {
            Ok(mut device) => device.present(&frame),
            Err(_) => Err(Error::BackendError("Graphics device lock poisoned".to_string())),
        };
        if let Err(err) = presented {
            self.fail(&err);
            return Err(err);
        }

        self.state = if self.loader.is_complete() {
            CanvasState::Ready
        } else {
            CanvasState::Loading { progress: self.loader.progress() }
        };
        self.report_stats(dt);
        Ok(())
    }

    // ===== INPUT =====

    /// Filter the collection (title, description, rarity; case-insensitive)
    pub fn set_search_query(&mut self, query: &str) {
        if self.search_query == query {
            return;
        }
        self.search_query = query.to_string();
        self.refresh_shown();
    }

    /// Apply new preferences.
    ///
    /// The render mode is re-derived only when the accessibility setting changes.
    pub fn set_preferences(&mut self, preferences: GalleryPreferences) {
        let previous = std::mem::replace(&mut self.preferences, preferences);
        self.environment = environment_for(&self.preferences, &self.capabilities);
        self.camera.set_config(self.controls_config());
        if !self.mounted {
            return;
        }

        if previous.accessibility_mode != self.preferences.accessibility_mode {
            let mode = self.decide_mode();
            let was_3d = self.render_mode.is_some_and(|m| m.is_3d());
            if was_3d && !mode.is_3d() {
                self.dispose_scene();
            }
            if !was_3d && mode.is_3d() {
                self.layout_dirty = true;
                self.card_set_dirty = true;
                self.camera_placed = false;
            }
            gallery_info!("gallery3d::Canvas", "Render mode now {:?}", mode);
            self.render_mode = Some(mode);
        }
        if previous.layout_type != self.preferences.layout_type {
            self.layout_dirty = true;
        }
        if !matches!(self.state, CanvasState::Failed { .. }) {
            self.state = self.derived_state();
        }
    }

    /// Select a shown card (invokes the callback) or clear the selection.
    ///
    /// Returns false for an id that is not shown.
    pub fn select_card(&mut self, id: Option<&CardId>) -> bool {
        let Some(id) = id else {
            self.selected = None;
            return true;
        };
        let Some(index) = self.shown.iter().position(|card| &card.id == id) else {
            return false;
        };
        self.selected = Some(id.clone());
        self.navigation.focus(Some(index));
        if let Some(callback) = self.on_card_select.as_mut() {
            callback(&self.shown[index]);
        }
        true
    }

    /// Card under a point in normalized device coordinates, nearest first
    pub fn pick(&self, ndc: Vec2) -> Option<CardId> {
        if !self.is_rendering_3d() {
            return None;
        }
        let ray = self.camera.ray_from_ndc(ndc);
        self.positions
            .iter()
            .filter(|p| self.is_drawable(&p.card.id))
            .filter_map(|p| {
                let card = self.cards.get(&p.card.id)?;
                ray.intersect_sphere(card.bounding_center(), card.bounding_radius())
                    .map(|t| (t, p.card.id.clone()))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }

    /// Pick and select in one step
    pub fn select_at(&mut self, ndc: Vec2) -> Option<CardId> {
        let id = self.pick(ndc)?;
        self.select_card(Some(&id));
        Some(id)
    }

    /// Keyboard navigation. Returns true if the key was handled.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match NavigationAction::from_key(key) {
            Some(action) => self.navigate(action),
            None => false,
        }
    }

    /// Voice navigation. Returns true if the phrase was understood and applied.
    pub fn handle_voice_command(&mut self, command: &str) -> bool {
        match NavigationAction::from_voice(command) {
            Some(action) => self.navigate(action),
            None => {
                gallery_debug!("gallery3d::Canvas", "Unrecognised voice command '{}'", command);
                false
            }
        }
    }

    pub fn navigate(&mut self, action: NavigationAction) -> bool {
        match self.navigation.apply(action) {
            NavigationOutcome::Focus(index) => {
                if !self.layout_dirty {
                    if let Some(placement) = self.positions.get(index) {
                        self.camera.set_target(placement.position);
                    }
                }
                true
            }
            NavigationOutcome::Select(index) => {
                let id = self.shown[index].id.clone();
                self.select_card(Some(&id))
            }
            NavigationOutcome::Clear => self.select_card(None),
            NavigationOutcome::Ignored => false,
        }
    }

    /// Viewport resized (physical pixels)
    pub fn resize(&mut self, width: u32, height: u32) {
        self.capabilities.viewport_width = width;
        self.capabilities.viewport_height = height;
        self.camera.set_aspect(self.capabilities.aspect_ratio());
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    // ===== QUERIES =====

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// `None` until mounted
    pub fn render_mode(&self) -> Option<RenderMode> {
        self.render_mode
    }

    /// Friendly message when there is nothing to show
    pub fn empty_message(&self) -> Option<&'static str> {
        match self.state {
            CanvasState::Empty => Some(EMPTY_COLLECTION_MESSAGE),
            _ => None,
        }
    }

    /// 2D grid of the shown cards (for the fallback and accessible modes)
    pub fn fallback_grid(&self) -> Vec<FallbackGridItem> {
        build_fallback_grid(&self.shown, fallback_columns(self.capabilities.viewport_width), self.selected.as_ref())
    }

    pub fn shown_cards(&self) -> &[CardEntity] {
        &self.shown
    }

    pub fn positions(&self) -> &[CardPosition] {
        &self.positions
    }

    pub fn selected(&self) -> Option<&CardId> {
        self.selected.as_ref()
    }

    pub fn focused_card(&self) -> Option<&CardEntity> {
        self.navigation.focused().and_then(|i| self.shown.get(i))
    }

    pub fn card(&self, id: &CardId) -> Option<&GalleryCard> {
        self.cards.get(id)
    }

    pub fn is_card_failed(&self, id: &CardId) -> bool {
        self.failed_cards.contains(id)
    }

    pub fn progress(&self) -> f32 {
        self.loader.progress()
    }

    pub fn preferences(&self) -> &GalleryPreferences {
        &self.preferences
    }

    pub fn environment(&self) -> &EnvironmentSettings {
        &self.environment
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    pub fn resource_stats(&self) -> ResourceStats {
        self.resources.lock().map(|rm| rm.stats()).unwrap_or_default()
    }

    pub fn texture_manager(&self) -> &TextureManager {
        &self.textures
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    // ===== INTERNAL =====

    fn decide_mode(&self) -> RenderMode {
        decide_render_mode(
            &self.capabilities,
            &self.preferences,
            self.collection.len(),
            self.config.mobile_card_limit,
        )
    }

    fn controls_config(&self) -> ControlsConfig {
        self.config.controls.with_accessibility(self.preferences.accessibility_mode)
    }

    fn reduced_motion(&self) -> bool {
        self.capabilities.prefers_reduced_motion() || self.preferences.accessibility_mode
    }

    fn is_rendering_3d(&self) -> bool {
        self.mounted
            && self.render_mode.is_some_and(|m| m.is_3d())
            && !self.shown.is_empty()
            && !matches!(self.state, CanvasState::Failed { .. })
    }

    fn is_drawable(&self, id: &CardId) -> bool {
        self.loader.is_loaded(id)
            && !self.failed_cards.contains(id)
            && self.lod.assignment(id).is_some_and(|a| a.should_render)
    }

    /// State implied by mode, shown cards, and loader (ignores `Failed`)
    fn derived_state(&self) -> CanvasState {
        match self.render_mode {
            None => CanvasState::DetectingCapability,
            Some(_) if self.shown.is_empty() => CanvasState::Empty,
            Some(mode) if !mode.is_3d() => CanvasState::Fallback2D,
            Some(_) if self.card_set_dirty => CanvasState::Loading { progress: 0.0 },
            Some(_) if self.loader.is_complete() => CanvasState::Ready,
            Some(_) => CanvasState::Loading { progress: self.loader.progress() },
        }
    }

    /// Re-apply the search filter to the collection
    fn refresh_shown(&mut self) {
        self.shown = self.collection
            .iter()
            .filter(|card| card.matches_query(&self.search_query))
            .cloned()
            .collect();
        self.navigation.set_card_count(self.shown.len());
        if let Some(selected) = &self.selected {
            if !self.shown.iter().any(|card| &card.id == selected) {
                self.selected = None;
            }
        }
        if self.shown.is_empty() && !self.cards.is_empty() {
            self.dispose_scene();
        }
        self.layout_dirty = true;
        self.card_set_dirty = true;
        if !matches!(self.state, CanvasState::Failed { .. }) {
            self.state = self.derived_state();
        }
    }

    /// Recompute positions, reconcile cards, and restart loading if the card
    /// set changed. Returns true when the loader was reset.
    fn rebuild_layout(&mut self) -> bool {
        self.positions = compute_layout(&self.shown, self.preferences.layout_type);
        let shown_ids: FxHashSet<&CardId> = self.positions.iter().map(|p| &p.card.id).collect();

        let removed_ids: Vec<CardId> = self.cards
            .keys()
            .filter(|id| !shown_ids.contains(id))
            .cloned()
            .collect();
        let mut removed: Vec<GalleryCard> = removed_ids
            .iter()
            .filter_map(|id| self.cards.remove(id))
            .collect();
        if !removed.is_empty() {
            for card in &mut removed {
                card.release_textures(&mut self.textures);
            }
            match self.resources.lock() {
                Ok(mut resources) => {
                    for card in &mut removed {
                        card.release(&mut resources);
                    }
                }
                Err(_) => gallery_error!("gallery3d::Canvas", "Resource manager lock poisoned"),
            }
        }

        for placement in &self.positions {
            match self.cards.get_mut(&placement.card.id) {
                Some(card) => card.set_placement(placement),
                None => {
                    self.cards.insert(placement.card.id.clone(), GalleryCard::new(placement));
                }
            }
        }

        if let Some(bounds) = layout_bounds(&self.positions) {
            if self.camera.can_frame(bounds.radius()) {
                self.camera.frame(bounds.center(), bounds.radius());
            } else if let Some(anchor) = self.framing_anchor() {
                // Zoom limits cannot show the whole layout: aim at one card so
                // its neighbours stay within cull distance
                self.camera.frame(anchor, CARD_HEIGHT);
            }
            if !self.camera_placed {
                self.camera.snap();
                self.camera_placed = true;
            }
        }

        self.lod.invalidate();
        self.layout_dirty = false;

        let reset = self.card_set_dirty;
        if reset {
            let ids: Vec<CardId> = self.positions.iter().map(|p| p.card.id.clone()).collect();
            self.loader.reset(&ids);
            self.card_set_dirty = false;
        }
        gallery_debug!(
            "gallery3d::Canvas",
            "Layout {} with {} cards", self.preferences.layout_type, self.positions.len()
        );
        reset
    }

    /// Selected card, or the first one laid out
    fn framing_anchor(&self) -> Option<Vec3> {
        self.selected
            .as_ref()
            .and_then(|id| self.positions.iter().find(|p| &p.card.id == id))
            .or_else(|| self.positions.first())
            .map(|p| p.position)
    }

    /// Sync every loaded card; card-level failures are isolated
    fn sync_cards(&mut self, dt: f32) -> Vec<CardDrawItem> {
        let reduced_motion = self.reduced_motion();
        let mut items = Vec::with_capacity(self.positions.len());
        let mut failures = Vec::new();
        {
            let mut ctx = CardRenderContext {
                device: &self.device,
                resources: &self.resources,
                textures: &mut self.textures,
                reduced_motion,
            };
            for placement in &self.positions {
                let id = &placement.card.id;
                if !self.loader.is_loaded(id) || self.failed_cards.contains(id) {
                    continue;
                }
                let (Some(assignment), Some(card)) = (self.lod.assignment(id), self.cards.get_mut(id)) else {
                    continue;
                };
                let selected = self.selected.as_ref() == Some(id);
                match card.sync(&mut ctx, assignment, selected, dt) {
                    Ok(Some(item)) => items.push(item),
                    Ok(None) => {}
                    Err(err) => failures.push((id.clone(), err)),
                }
            }
        }

        for (id, err) in failures {
            gallery_warn!("gallery3d::Canvas", "Card '{}' skipped: {}", id, err);
            GalleryRuntime::emit(GalleryMetric::RenderError {
                card_id: Some(id.clone()),
                message: err.to_string(),
            });
            if let Some(mut card) = self.cards.remove(&id) {
                card.release_textures(&mut self.textures);
                if let Ok(mut resources) = self.resources.lock() {
                    card.release(&mut resources);
                }
            }
            self.failed_cards.insert(id);
        }
        items
    }

    /// Canvas-level failure: tear everything down, then show the retry state
    fn fail(&mut self, err: &Error) {
        gallery_error!("gallery3d::Canvas", "Render failed: {}", err);
        GalleryRuntime::emit(GalleryMetric::RenderError { card_id: None, message: err.to_string() });
        self.dispose_scene();
        self.state = CanvasState::Failed { message: err.to_string() };
    }

    /// Release all GPU resources and forget per-card state
    fn dispose_scene(&mut self) {
        match self.resources.lock() {
            Ok(mut resources) => {
                resources.dispose_all();
            }
            Err(_) => gallery_error!("gallery3d::Canvas", "Resource manager lock poisoned during dispose"),
        }
        self.textures.clear();
        self.cards.clear();
        self.failed_cards.clear();
        self.lod.clear();
        self.positions.clear();
        self.layout_dirty = true;
        self.card_set_dirty = true;
    }

    fn report_stats(&mut self, dt: f32) {
        let Some(fps) = self.frame_stats.record(dt) else {
            return;
        };
        GalleryRuntime::emit(GalleryMetric::FrameRate(fps));
        let stats = self.resource_stats();
        GalleryRuntime::emit(GalleryMetric::GpuMemory {
            tracked_bytes: stats.tracked_bytes(),
            tracked_resources: stats.tracked_count(),
        });
    }
}

impl Drop for GalleryCanvas {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
#[path = "gallery_canvas_tests.rs"]
mod tests;
