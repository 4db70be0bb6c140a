//! Integration tests for the transform hierarchy.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test hierarchy_integration
//! ```

use glam::Vec2;

use ec2d::components::transform::{Transform, TransformArena};
use ec2d::core::entity::Entity;
use ec2d::error::EngineError;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_eq_vec(a: Vec2, b: Vec2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn world_values(t: &Transform) -> (Vec2, f32, f32) {
    (t.world_position(), t.world_rotation(), t.world_scale())
}

fn assert_same_world(before: (Vec2, f32, f32), after: (Vec2, f32, f32)) {
    assert!(approx_eq_vec(before.0, after.0), "position {:?} != {:?}", before.0, after.0);
    assert!(approx_eq(before.1, after.1), "rotation {} != {}", before.1, after.1);
    assert!(approx_eq(before.2, after.2), "scale {} != {}", before.2, after.2);
}

fn posed(arena: &TransformArena, position: Vec2, rotation: f32, scale: f32) -> Transform {
    let t = Transform::new(arena);
    t.set_local_position(position);
    t.set_local_rotation(rotation);
    t.set_local_scale(scale);
    t
}

// =============================================================================
// World composition
// =============================================================================

#[test]
fn world_values_compose_along_the_chain() {
    let arena = TransformArena::new();
    let grandparent = posed(&arena, Vec2::new(10.0, 0.0), 0.5, 2.0);
    let parent = posed(&arena, Vec2::new(0.0, 5.0), 0.25, 0.5);
    let child = posed(&arena, Vec2::new(1.0, 1.0), 0.1, 3.0);
    parent.set_parent(Some(&grandparent)).unwrap();
    child.set_parent(Some(&parent)).unwrap();

    // set_parent preserves world values, so restore the intended locals.
    parent.set_local_position(Vec2::new(0.0, 5.0));
    parent.set_local_rotation(0.25);
    parent.set_local_scale(0.5);
    child.set_local_position(Vec2::new(1.0, 1.0));
    child.set_local_rotation(0.1);
    child.set_local_scale(3.0);

    assert!(approx_eq_vec(child.world_position(), Vec2::new(11.0, 6.0)));
    assert!(approx_eq(child.world_rotation(), 0.85));
    assert!(approx_eq(child.world_scale(), 3.0));
}

#[test]
fn set_world_position_under_parent_adjusts_local() {
    let arena = TransformArena::new();
    let parent = posed(&arena, Vec2::new(100.0, 100.0), 0.0, 1.0);
    let child = Transform::new(&arena);
    child.set_parent(Some(&parent)).unwrap();
    child.set_world_position(Vec2::new(150.0, 80.0));
    assert!(approx_eq_vec(child.local_position(), Vec2::new(50.0, -20.0)));
}

// =============================================================================
// Reparenting preserves world values
// =============================================================================

#[test]
fn attaching_preserves_world_values() {
    let arena = TransformArena::new();
    let parent = posed(&arena, Vec2::new(30.0, -12.0), 1.2, 2.5);
    let child = posed(&arena, Vec2::new(7.0, 9.0), -0.4, 0.8);

    let before = world_values(&child);
    child.set_parent(Some(&parent)).unwrap();
    assert_same_world(before, world_values(&child));
    assert_eq!(child.parent(), Some(parent.id()));
}

#[test]
fn moving_between_parents_preserves_world_values() {
    let arena = TransformArena::new();
    let a = posed(&arena, Vec2::new(5.0, 5.0), 0.3, 4.0);
    let b = posed(&arena, Vec2::new(-50.0, 20.0), -1.0, 0.25);
    let child = posed(&arena, Vec2::new(1.0, 2.0), 0.0, 1.0);
    child.set_parent(Some(&a)).unwrap();
    child.set_local_position(Vec2::new(3.0, 3.0));

    let before = world_values(&child);
    child.set_parent(Some(&b)).unwrap();
    assert_same_world(before, world_values(&child));
    assert_eq!(a.children(), vec![]);
    assert_eq!(b.children(), vec![child.id()]);
}

#[test]
fn detaching_preserves_world_values() {
    let arena = TransformArena::new();
    let parent = posed(&arena, Vec2::new(8.0, 8.0), 0.7, 3.0);
    let child = Transform::new(&arena);
    child.set_parent(Some(&parent)).unwrap();
    child.set_local_position(Vec2::new(2.0, 0.0));

    let before = world_values(&child);
    child.set_parent(None).unwrap();
    assert_same_world(before, world_values(&child));
    assert_eq!(child.parent(), None);
}

#[test]
fn detaching_falls_back_to_default_parent() {
    let arena = TransformArena::new();
    let home = posed(&arena, Vec2::new(1.0, 1.0), 0.0, 1.0);
    let carrier = posed(&arena, Vec2::new(40.0, 0.0), 0.0, 1.0);
    let child = Transform::new(&arena);
    child.set_default_parent(Some(&home));
    child.set_parent(Some(&carrier)).unwrap();

    let before = world_values(&child);
    child.set_parent(None).unwrap();
    assert_eq!(child.parent(), Some(home.id()));
    assert_same_world(before, world_values(&child));
}

// =============================================================================
// Cycles
// =============================================================================

#[test]
fn parenting_to_self_is_rejected() {
    let arena = TransformArena::new();
    let t = Transform::new(&arena);
    assert_eq!(t.set_parent(Some(&t)), Err(EngineError::ParentCycle));
    assert_eq!(t.parent(), None);
}

#[test]
fn parenting_to_descendant_is_rejected_and_hierarchy_untouched() {
    let arena = TransformArena::new();
    let a = Transform::new(&arena);
    let b = Transform::new(&arena);
    let c = Transform::new(&arena);
    b.set_parent(Some(&a)).unwrap();
    c.set_parent(Some(&b)).unwrap();

    assert_eq!(a.set_parent(Some(&c)), Err(EngineError::ParentCycle));
    assert_eq!(a.parent(), None);
    assert_eq!(b.parent(), Some(a.id()));
    assert_eq!(c.parent(), Some(b.id()));
}

// =============================================================================
// Release
// =============================================================================

#[test]
fn releasing_parent_keeps_children_world_values() {
    let arena = TransformArena::new();
    let parent = posed(&arena, Vec2::new(20.0, 10.0), 0.5, 2.0);
    let child = Transform::new(&arena);
    child.set_parent(Some(&parent)).unwrap();
    child.set_local_position(Vec2::new(5.0, 5.0));

    let before = world_values(&child);
    parent.release();
    assert!(!parent.is_alive());
    assert_eq!(child.parent(), None);
    assert_same_world(before, world_values(&child));
}

#[test]
fn releasing_parent_moves_children_to_their_default_parent() {
    let arena = TransformArena::new();
    let home = posed(&arena, Vec2::new(-10.0, 0.0), 0.0, 1.0);
    let parent = posed(&arena, Vec2::new(20.0, 10.0), 0.0, 1.0);
    let child = Transform::new(&arena);
    child.set_default_parent(Some(&home));
    child.set_parent(Some(&parent)).unwrap();

    let before = world_values(&child);
    parent.release();
    assert_eq!(child.parent(), Some(home.id()));
    assert_same_world(before, world_values(&child));
}

#[test]
fn released_handle_reads_identity_and_ignores_writes() {
    let arena = TransformArena::new();
    let t = posed(&arena, Vec2::new(3.0, 4.0), 1.0, 2.0);
    t.release();
    t.set_local_position(Vec2::new(9.0, 9.0));
    assert_eq!(t.world_position(), Vec2::ZERO);
    assert_eq!(t.world_rotation(), 0.0);
    assert_eq!(t.world_scale(), 1.0);
    assert!(matches!(
        arena.local_position(t.id()),
        Err(EngineError::StaleTransform(_))
    ));
}

#[test]
fn dropping_parent_entity_keeps_child_entity_in_place() {
    let arena = TransformArena::new();
    let mut parent = Entity::new(&arena);
    let mut child = Entity::new(&arena);
    parent.transform().set_local_position(Vec2::new(50.0, 50.0));
    child.set_parent(Some(&mut parent)).unwrap();
    child.transform().set_local_position(Vec2::new(10.0, 0.0));

    let child_transform = child.transform();
    assert!(approx_eq_vec(child_transform.world_position(), Vec2::new(60.0, 50.0)));
    drop(parent);
    assert!(approx_eq_vec(child_transform.world_position(), Vec2::new(60.0, 50.0)));
    assert_eq!(child_transform.parent(), None);
}

#[test]
fn entities_from_different_arenas_cannot_be_parented() {
    let first = TransformArena::new();
    let second = TransformArena::new();
    let mut a = Entity::new(&first);
    let mut b = Entity::new(&second);
    assert!(matches!(
        a.set_parent(Some(&mut b)),
        Err(EngineError::UnknownEntity(_))
    ));
}
