//! Axis-aligned rectangles used for every collision query.

use glam::Vec2;

/// Axis-aligned box anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    origin: Vec2,
    size: Vec2,
}

impl Aabb {
    /// Creates a box from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Smallest x covered by the box.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Largest x covered by the box.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    /// Smallest y covered by the box.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Largest y covered by the box.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Reports whether the interiors of both boxes intersect.
    ///
    /// Boxes that merely share an edge do not overlap, so a body resting on a
    /// floor is not considered to collide with it.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Returns the box moved by the provided offset.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.origin + offset, self.size)
    }
}
