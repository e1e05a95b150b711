/// Tests for LOD selection and the throttled LodSystem

use super::*;
use crate::card::CardEntity;
use crate::layout::{compute_layout, LayoutMode};

// ============================================================================
// Helpers
// ============================================================================

fn card_at(id: &str, z: f32) -> CardPosition {
    CardPosition {
        card: CardEntity::new(id, id),
        position: Vec3::new(0.0, 0.0, z),
        rotation: Vec3::ZERO,
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

// ============================================================================
// Thresholds
// ============================================================================

#[test]
fn test_lod_for_distance_thresholds() {
    let config = LodConfig::desktop();
    assert_eq!(lod_for_distance(0.0, &config), (LodLevel::High, true));
    assert_eq!(lod_for_distance(15.0, &config), (LodLevel::High, true));
    assert_eq!(lod_for_distance(15.1, &config), (LodLevel::Medium, true));
    assert_eq!(lod_for_distance(30.0, &config), (LodLevel::Medium, true));
    assert_eq!(lod_for_distance(45.0, &config), (LodLevel::Low, true));
    assert_eq!(lod_for_distance(60.5, &config), (LodLevel::Low, false));
}

#[test]
fn test_lod_is_monotonic_in_distance() {
    for config in [LodConfig::desktop(), LodConfig::mobile()] {
        let mut previous = (LodLevel::High, true);
        for step in 0..=1000 {
            let current = lod_for_distance(step as f32 * 0.1, &config);
            assert!(current.0 >= previous.0, "tier got more detailed at step {}", step);
            assert!(!(current.1 && !previous.1), "card reappeared at step {}", step);
            previous = current;
        }
    }
}

#[test]
fn test_compute_lods_one_entry_per_card() {
    let cards: Vec<CardEntity> = (0..50).map(|i| CardEntity::new(format!("c{}", i), "t")).collect();
    let positions = compute_layout(&cards, LayoutMode::Grid);
    let lods = compute_lods(&positions, Vec3::new(0.0, 0.0, 20.0), &LodConfig::desktop());
    assert_eq!(lods.len(), 50);
    for card in &cards {
        assert_eq!(lods[&card.id].card_id, card.id);
    }
}

// ============================================================================
// Config validation
// ============================================================================

#[test]
fn test_presets_validate() {
    assert!(LodConfig::desktop().validate().is_ok());
    assert!(LodConfig::mobile().validate().is_ok());
}

#[test]
fn test_validate_rejects_unordered_thresholds() {
    let config = LodConfig { medium_detail_distance: 10.0, ..LodConfig::desktop() };
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_validate_rejects_zero_frequency() {
    let config = LodConfig { update_frequency: 0.0, ..LodConfig::mobile() };
    assert!(config.validate().is_err());
}

#[test]
fn test_update_interval() {
    assert_eq!(LodConfig::desktop().update_interval(), ms(100));
    assert_eq!(LodConfig::mobile().update_interval(), ms(200));
}

// ============================================================================
// LodSystem
// ============================================================================

#[test]
fn test_first_update_reports_all_cards() {
    let mut lod = LodSystem::new(LodConfig::desktop());
    let positions = vec![card_at("a", 5.0), card_at("b", 25.0)];
    let changed = lod.update(&positions, Vec3::ZERO, ms(0));
    assert_eq!(changed, vec![CardId::from("a"), CardId::from("b")]);
    assert_eq!(lod.assignment(&"b".into()).unwrap().lod_level, LodLevel::Medium);
}

#[test]
fn test_update_is_throttled() {
    let mut lod = LodSystem::new(LodConfig::desktop());
    let near = vec![card_at("a", 5.0)];
    let far = vec![card_at("a", 50.0)];

    lod.update(&near, Vec3::ZERO, ms(0));
    assert!(lod.update(&far, Vec3::ZERO, ms(50)).is_empty());
    assert_eq!(lod.assignment(&"a".into()).unwrap().lod_level, LodLevel::High);

    assert_eq!(lod.update(&far, Vec3::ZERO, ms(100)), vec![CardId::from("a")]);
    assert_eq!(lod.assignment(&"a".into()).unwrap().lod_level, LodLevel::Low);
}

#[test]
fn test_invalidate_bypasses_throttle() {
    let mut lod = LodSystem::new(LodConfig::desktop());
    lod.update(&[card_at("a", 5.0)], Vec3::ZERO, ms(0));
    lod.invalidate();
    let changed = lod.update(&[card_at("a", 70.0)], Vec3::ZERO, ms(1));
    assert_eq!(changed, vec![CardId::from("a")]);
    assert!(!lod.assignment(&"a".into()).unwrap().should_render);
}

#[test]
fn test_only_changed_entries_reported() {
    let mut lod = LodSystem::new(LodConfig::desktop());
    lod.update(&[card_at("a", 5.0), card_at("b", 5.0)], Vec3::ZERO, ms(0));

    let changed = lod.update(&[card_at("a", 6.0), card_at("b", 20.0)], Vec3::ZERO, ms(200));

    assert_eq!(changed, vec![CardId::from("b")]);
    // Distance is refreshed even without a tier change
    assert_eq!(lod.assignment(&"a".into()).unwrap().distance, 6.0);
}

#[test]
fn test_removed_cards_are_dropped() {
    let mut lod = LodSystem::new(LodConfig::desktop());
    lod.update(&[card_at("a", 5.0), card_at("b", 5.0)], Vec3::ZERO, ms(0));
    lod.invalidate();
    let changed = lod.update(&[card_at("a", 5.0)], Vec3::ZERO, ms(1));
    assert_eq!(changed, vec![CardId::from("b")]);
    assert!(lod.assignment(&"b".into()).is_none());
    assert_eq!(lod.assignments().len(), 1);
}

#[test]
fn test_visible_by_priority_orders_by_distance() {
    let mut lod = LodSystem::new(LodConfig::desktop());
    let positions = vec![
        card_at("far", 40.0),
        card_at("culled", 90.0),
        card_at("y", 10.0),
        card_at("x", 10.0),
        card_at("near", 1.0),
    ];
    lod.update(&positions, Vec3::ZERO, ms(0));
    let order: Vec<String> = lod.visible_by_priority().into_iter().map(|id| id.0).collect();
    assert_eq!(order, ["near", "x", "y", "far"]);
}

#[test]
fn test_counts() {
    let mut lod = LodSystem::new(LodConfig::mobile());
    let positions = vec![card_at("a", 1.0), card_at("b", 15.0), card_at("c", 30.0), card_at("d", 41.0)];
    lod.update(&positions, Vec3::ZERO, ms(0));
    assert_eq!(lod.counts(), LodCounts { high: 1, medium: 1, low: 1, culled: 1 });
}

#[test]
fn test_clear_resets_state() {
    let mut lod = LodSystem::new(LodConfig::desktop());
    lod.update(&[card_at("a", 1.0)], Vec3::ZERO, ms(0));
    lod.clear();
    assert!(lod.assignments().is_empty());
    assert!(lod.is_due(ms(1)));
}
