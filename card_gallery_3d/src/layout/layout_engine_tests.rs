use glam::Vec3;
use crate::card::CardEntity;
use crate::error::Error;
use super::*;

fn make_cards(count: usize) -> Vec<CardEntity> {
    (0..count)
        .map(|i| CardEntity::new(format!("card-{}", i), format!("Card {}", i)))
        .collect()
}

// ============================================================================
// Determinism & completeness
// ============================================================================

#[test]
fn test_layout_is_deterministic() {
    let cards = make_cards(37);
    for mode in LayoutMode::ALL {
        let first = compute_layout(&cards, mode);
        let second = compute_layout(&cards, mode);
        assert_eq!(first, second, "{} layout changed between calls", mode);
    }
}

#[test]
fn test_layout_one_position_per_card_in_order() {
    for count in [0usize, 1, 50, 500] {
        let cards = make_cards(count);
        for mode in LayoutMode::ALL {
            let positions = compute_layout(&cards, mode);
            assert_eq!(positions.len(), count, "{} with {} cards", mode, count);
            for (card, placed) in cards.iter().zip(&positions) {
                assert_eq!(card.id, placed.card.id);
            }
        }
    }
}

#[test]
fn test_empty_grid_layout_is_empty() {
    assert!(compute_layout(&[], LayoutMode::Grid).is_empty());
}

#[test]
fn test_no_two_cards_share_coordinates() {
    for count in [1usize, 2, 3, 50, 500] {
        let cards = make_cards(count);
        for mode in LayoutMode::ALL {
            let positions = compute_layout(&cards, mode);
            for i in 0..positions.len() {
                for j in (i + 1)..positions.len() {
                    assert_ne!(
                        positions[i].position, positions[j].position,
                        "{} layout: cards {} and {} overlap ({} cards)", mode, i, j, count
                    );
                }
            }
        }
    }
}

#[test]
fn test_positions_are_finite() {
    let cards = make_cards(500);
    for mode in LayoutMode::ALL {
        for p in compute_layout(&cards, mode) {
            assert!(p.position.is_finite() && p.rotation.is_finite());
        }
    }
}

// ============================================================================
// Mode-specific shape
// ============================================================================

#[test]
fn test_circular_radius_scales_with_count() {
    let small = compute_layout(&make_cards(4), LayoutMode::Circular);
    let large = compute_layout(&make_cards(200), LayoutMode::Circular);

    let radius = |p: &CardPosition| Vec3::new(p.position.x, 0.0, p.position.z).length();
    assert!((radius(&small[0]) - 8.0).abs() < 1e-4, "small rings use the minimum radius");
    assert!(radius(&large[0]) > radius(&small[0]));

    // Every card on one ring sits at the same radius and height
    let r0 = radius(&large[0]);
    for p in &large {
        assert!((radius(p) - r0).abs() < 1e-3);
        assert_eq!(p.position.y, 0.0);
    }
}

#[test]
fn test_circular_cards_face_the_center() {
    for p in compute_layout(&make_cards(12), LayoutMode::Circular) {
        let yaw = p.rotation.y;
        let facing = Vec3::new(yaw.sin(), 0.0, yaw.cos());
        let to_center = (-p.position).normalize();
        assert!(facing.dot(to_center) > 0.999);
    }
}

#[test]
fn test_gallery_wall_is_a_vertical_plane() {
    let positions = compute_layout(&make_cards(30), LayoutMode::GalleryWall);
    for p in &positions {
        assert_eq!(p.position.z, 0.0);
        assert_eq!(p.rotation, Vec3::ZERO);
    }
    // First row is above the last row
    assert!(positions[0].position.y > positions[29].position.y);
}

#[test]
fn test_spiral_height_and_radius_increase() {
    let positions = compute_layout(&make_cards(40), LayoutMode::Spiral);
    for pair in positions.windows(2) {
        assert!(pair[1].position.y > pair[0].position.y);
        let r0 = Vec3::new(pair[0].position.x, 0.0, pair[0].position.z).length();
        let r1 = Vec3::new(pair[1].position.x, 0.0, pair[1].position.z).length();
        assert!(r1 > r0);
    }
}

#[test]
fn test_grid_is_centered() {
    // 27 cards fill a 3x3x3 lattice exactly
    let positions = compute_layout(&make_cards(27), LayoutMode::Grid);
    let bounds = layout_bounds(&positions).unwrap();
    assert!(bounds.center().length() < 1e-4);
}

#[test]
fn test_mode_change_is_full_recomputation() {
    let cards = make_cards(10);
    let circular = compute_layout(&cards, LayoutMode::Circular);
    let grid = compute_layout(&cards, LayoutMode::Grid);
    assert_eq!(grid.len(), circular.len());
    assert_eq!(grid, compute_layout(&cards, LayoutMode::Grid));
    assert!(grid.iter().zip(&circular).all(|(g, c)| g.position != c.position));
}

// ============================================================================
// Bounds & parsing
// ============================================================================

#[test]
fn test_layout_bounds_empty_is_none() {
    assert!(layout_bounds(&[]).is_none());
}

#[test]
fn test_layout_bounds_radius() {
    let positions = compute_layout(&make_cards(2), LayoutMode::GalleryWall);
    let bounds = layout_bounds(&positions).unwrap();
    assert!((bounds.radius() - 1.6).abs() < 1e-4);
}

#[test]
fn test_layout_mode_round_trips_preference_strings() {
    for mode in LayoutMode::ALL {
        assert_eq!(mode.as_str().parse::<LayoutMode>().unwrap(), mode);
    }
    assert!(matches!("carousel".parse::<LayoutMode>(), Err(Error::InvalidConfig(_))));
}
