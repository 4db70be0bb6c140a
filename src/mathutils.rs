//! Angle-to-vector conversions and random helpers.
//!
//! Angles given in degrees are "human" angles by default: counter-clockwise
//! with y pointing down on screen, so 90° points up. Pass
//! `unflip_quadrant = false` to use raw screen-space angles.

use glam::Vec2;

fn screen_radians(degrees: f32, unflip_quadrant: bool) -> f32 {
    let degrees = if unflip_quadrant { 360.0 - degrees } else { degrees };
    degrees.to_radians()
}

pub fn velocity_from_degrees(degrees: f32, speed: f32, unflip_quadrant: bool) -> Vec2 {
    velocity_from_radians(screen_radians(degrees, unflip_quadrant), speed)
}

pub fn velocity_from_radians(radians: f32, speed: f32) -> Vec2 {
    trajectory_from_radians(radians) * speed
}

/// Unit vector for `degrees`.
pub fn trajectory_from_degrees(degrees: f32, unflip_quadrant: bool) -> Vec2 {
    trajectory_from_radians(screen_radians(degrees, unflip_quadrant))
}

pub fn trajectory_from_radians(radians: f32) -> Vec2 {
    Vec2::from_angle(radians)
}

/// Reseeds the thread-local generator used by the random helpers.
pub fn seed(seed: u64) {
    fastrand::seed(seed);
}

/// Random integer in `min..max`; `min` when the range is empty.
pub fn random_int(min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    fastrand::i32(min..max)
}

/// Shuffles `items` in place.
pub fn shuffle<T>(items: &mut [T]) {
    fastrand::shuffle(items);
}

/// Random float in `min..max`.
pub fn random_float(min: f32, max: f32) -> f32 {
    min + fastrand::f32() * (max - min)
}
