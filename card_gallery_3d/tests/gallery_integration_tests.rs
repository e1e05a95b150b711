//! Integration tests for the gallery canvas and its subsystems
//!
//! Everything runs against the headless device from gallery_test_utils.
//! No GPU required.
//!
//! Run with: cargo test --test gallery_integration_tests


use std::rc::Rc;
use std::sync::{Arc, Mutex};
use card_gallery_3d::gallery3d::card::{cards_from_json, CardId, StaticCardSource};
use card_gallery_3d::gallery3d::device::DeviceCapabilities;
use card_gallery_3d::gallery3d::preferences::{EnvironmentTheme, GalleryPreferences};
use card_gallery_3d::gallery3d::resource::ResourceManager;
use card_gallery_3d::gallery3d::scene::{LayoutMode, LodLevel};
use card_gallery_3d::gallery3d::texture::{
    LoadOptions, MemoryTextureFetcher, TextureManager, TextureManagerConfig, TextureQuality,
};
use card_gallery_3d::gallery3d::{CanvasState, Error, GalleryCanvas};
use card_gallery_3d::canvas::RenderMode;
use gallery_test_utils::{collection_json, image_urls, png_bytes, GatedFetcher, HeadlessDevice};

const DT: f32 = 1.0 / 60.0;

fn serving_fetcher(urls: &[String]) -> Rc<MemoryTextureFetcher> {
    let mut fetcher = MemoryTextureFetcher::new();
    for url in urls {
        fetcher.insert(url.clone(), png_bytes(32));
    }
    Rc::new(fetcher)
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_integration_full_lifecycle_releases_everything_once() {
    let cards = cards_from_json(&collection_json(10)).unwrap();
    let (device, shared) = HeadlessDevice::shared(DeviceCapabilities::desktop());
    let mut canvas = GalleryCanvas::for_device(shared, serving_fetcher(&image_urls(&cards))).unwrap();

    canvas.mount(cards, GalleryPreferences::default());
    for _ in 0..5 {
        canvas.frame(DT).unwrap();
    }
    assert_eq!(canvas.state(), &CanvasState::Ready);
    {
        let device = device.lock().unwrap();
        let frame = device.frames.last().unwrap();
        assert_eq!(frame.cards.len(), 10);
        assert_eq!(frame.textured_count(), 10);
    }

    canvas.select_card(Some(&CardId::from("card-3")));
    canvas.frame(DT).unwrap();
    canvas.set_search_query("legendary");
    canvas.frame(DT).unwrap();
    canvas.unmount();

    let device = device.lock().unwrap();
    assert!(!device.created.is_empty());
    assert_eq!(device.live_count(), 0);
    assert!(device.all_released_once());
}

#[test]
fn test_integration_mount_from_card_source() {
    let cards = cards_from_json(&collection_json(4)).unwrap();
    let source = StaticCardSource::new().with_collection("starter", cards.clone());
    let (_device, shared) = HeadlessDevice::shared(DeviceCapabilities::desktop());
    let mut canvas = GalleryCanvas::for_device(shared, serving_fetcher(&image_urls(&cards))).unwrap();

    canvas.mount_collection(&source, "starter", GalleryPreferences::default()).unwrap();
    canvas.frame(DT).unwrap();
    assert_eq!(canvas.shown_cards().len(), 4);

    let missing = canvas.mount_collection(&source, "unknown", GalleryPreferences::default());
    assert!(matches!(missing, Err(Error::DataSource(_))));
    assert!(matches!(canvas.state(), CanvasState::Failed { .. }));
}

#[test]
fn test_integration_present_failure_then_retry() {
    let cards = cards_from_json(&collection_json(6)).unwrap();
    let (device, shared) = HeadlessDevice::shared(DeviceCapabilities::desktop());
    let mut canvas = GalleryCanvas::for_device(shared, serving_fetcher(&image_urls(&cards))).unwrap();
    canvas.mount(cards, GalleryPreferences::default());
    canvas.frame(DT).unwrap();
    canvas.frame(DT).unwrap();

    device.lock().unwrap().fail_next_present = true;
    assert!(canvas.frame(DT).is_err());
    assert!(matches!(canvas.state(), CanvasState::Failed { .. }));
    {
        let device = device.lock().unwrap();
        assert_eq!(device.live_count(), 0);
        assert!(device.all_released_once());
    }

    canvas.retry();
    canvas.frame(DT).unwrap();
    canvas.frame(DT).unwrap();
    assert_eq!(canvas.state(), &CanvasState::Ready);
    assert_eq!(device.lock().unwrap().frames.last().unwrap().cards.len(), 6);
}

// ============================================================================
// RENDER MODE
// ============================================================================

#[test]
fn test_integration_mobile_limit_and_accessibility() {
    let many = cards_from_json(&collection_json(60)).unwrap();
    let (device, shared) = HeadlessDevice::shared(DeviceCapabilities::mobile());
    let mut canvas = GalleryCanvas::for_device(shared, serving_fetcher(&[])).unwrap();

    canvas.mount(many, GalleryPreferences::default());
    canvas.frame(DT).unwrap();
    assert!(matches!(canvas.render_mode(), Some(RenderMode::Fallback2D(_))));
    assert_eq!(canvas.fallback_grid().len(), 60);

    let few = cards_from_json(&collection_json(10)).unwrap();
    let prefs = GalleryPreferences { accessibility_mode: true, ..GalleryPreferences::default() };
    canvas.mount(few, prefs);
    canvas.frame(DT).unwrap();
    assert_eq!(canvas.render_mode(), Some(RenderMode::Accessible));
    assert!(canvas.fallback_grid().iter().all(|item| !item.accessible_label.is_empty()));

    assert!(device.lock().unwrap().created.is_empty());
}

#[test]
fn test_integration_preferences_from_json_drive_canvas() {
    let prefs = GalleryPreferences::from_json(
        r#"{"layout_type":"gallery_wall","environment_theme":"museum","particle_effects":false}"#,
    )
    .unwrap();
    assert_eq!(prefs.layout_type, LayoutMode::GalleryWall);
    assert!(!prefs.accessibility_mode);

    let cards = cards_from_json(&collection_json(3)).unwrap();
    let (_device, shared) = HeadlessDevice::shared(DeviceCapabilities::desktop());
    let mut canvas = GalleryCanvas::for_device(shared, serving_fetcher(&image_urls(&cards))).unwrap();
    canvas.mount(cards, prefs);
    canvas.frame(DT).unwrap();

    assert_eq!(canvas.environment().theme, EnvironmentTheme::Museum);
    assert_eq!(canvas.environment().particle_count, 0);
    assert_eq!(canvas.positions().len(), 3);
}

// ============================================================================
// TEXTURES
// ============================================================================

#[test]
fn test_integration_texture_arriving_after_dispose_is_inert() {
    let (device, shared) = HeadlessDevice::shared(DeviceCapabilities::desktop());
    let resources = Arc::new(Mutex::new(ResourceManager::new()));
    let fetcher = Rc::new(GatedFetcher::default());
    let mut textures = TextureManager::new(
        TextureManagerConfig::desktop(),
        shared,
        resources.clone(),
        fetcher.clone(),
    );

    let load = textures.load_texture("img/late.png", TextureQuality::High, LoadOptions::for_lod(LodLevel::High));
    textures.pump();
    assert_eq!(fetcher.pending_count(), 1);

    resources.lock().unwrap().dispose_all();
    fetcher.release("img/late.png", Ok(png_bytes(16)));
    textures.pump();

    assert!(matches!(load.try_result(), Some(Err(Error::LoadCancelled(_)))));
    assert_eq!(device.lock().unwrap().textures_created(), 0);
    assert_eq!(resources.lock().unwrap().tracked_count(), 0);
}

#[test]
fn test_integration_concurrent_requests_share_one_fetch() {
    let (device, shared) = HeadlessDevice::shared(DeviceCapabilities::desktop());
    let resources = Arc::new(Mutex::new(ResourceManager::new()));
    let fetcher = Rc::new(GatedFetcher::default());
    let mut textures = TextureManager::new(TextureManagerConfig::desktop(), shared, resources, fetcher.clone());

    let first = textures.load_texture("img/a.png", TextureQuality::Medium, LoadOptions::default());
    let second = textures.load_texture("img/a.png", TextureQuality::Medium, LoadOptions::default());
    textures.pump();
    assert_eq!(fetcher.pending_count(), 1);

    fetcher.release("img/a.png", Ok(png_bytes(64)));
    textures.pump();

    let a = first.try_result().unwrap().unwrap();
    let b = second.try_result().unwrap().unwrap();
    assert_eq!(a.id(), b.id());
    assert_eq!(device.lock().unwrap().textures_created(), 1);
}
