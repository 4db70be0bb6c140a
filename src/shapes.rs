//! Plain 2D shapes used by colliders, renderers and the collision service.
//!
//! Coordinates follow screen conventions: `x` grows to the right and `y`
//! grows downward, so a rectangle's `top` is its smallest `y`.

use glam::Vec2;
use serde::Serialize;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` with its top-left corner at the origin.
    pub fn from_size(size: Vec2) -> Self {
        Self::new(0.0, 0.0, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Point containment. Left and top edges are inside, right and bottom
    /// edges are outside.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }

    /// Overlapping area of two rectangles, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Closest point inside the rectangle to `point`.
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.left(), self.right()),
            point.y.clamp(self.top(), self.bottom()),
        )
    }
}

/// Circle defined by a center point and a radius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// A point is inside when its squared distance to the center is at most r².
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }

    pub fn intersects(&self, other: &Circle) -> bool {
        let radius_sum = self.radius + other.radius;
        self.center.distance_squared(other.center) <= radius_sum * radius_sum
    }

    pub fn translated(&self, offset: Vec2) -> Circle {
        Circle::new(self.center + offset, self.radius)
    }

    /// Smallest axis-aligned rectangle containing the circle.
    pub fn bounding_rect(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// Closed set of collider shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ColliderShape {
    Box(Rect),
    Circle(Circle),
}

impl ColliderShape {
    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            ColliderShape::Box(rect) => rect.contains(point),
            ColliderShape::Circle(circle) => circle.contains(point),
        }
    }

    pub fn translated(&self, offset: Vec2) -> ColliderShape {
        match self {
            ColliderShape::Box(rect) => ColliderShape::Box(rect.translated(offset)),
            ColliderShape::Circle(circle) => ColliderShape::Circle(circle.translated(offset)),
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        match self {
            ColliderShape::Box(rect) => *rect,
            ColliderShape::Circle(circle) => circle.bounding_rect(),
        }
    }
}
