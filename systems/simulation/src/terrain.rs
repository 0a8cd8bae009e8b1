//! Static terrain rectangles cached when play starts.

use glam::Vec2;
use propeller_core::EntityKind;

use crate::geometry::Aabb;

/// Immovable blockers shared by every collision query during a play session.
#[derive(Clone, Debug)]
pub(crate) struct Terrain {
    walls: Vec<Aabb>,
    sticky_blocks: Vec<Aabb>,
    reverse_walls: Vec<Aabb>,
    bounds: Vec2,
}

impl Terrain {
    pub(crate) fn new(bounds: Vec2) -> Self {
        Self {
            walls: Vec::new(),
            sticky_blocks: Vec::new(),
            reverse_walls: Vec::new(),
            bounds,
        }
    }

    /// Records the rectangle when the kind is part of the static terrain.
    pub(crate) fn insert(&mut self, kind: EntityKind, hitbox: Aabb) {
        if kind.traits().solid {
            match kind {
                EntityKind::StickyBlock => self.sticky_blocks.push(hitbox),
                _ => self.walls.push(hitbox),
            }
        } else if kind == EntityKind::ReverseWall {
            self.reverse_walls.push(hitbox);
        }
    }

    pub(crate) fn width(&self) -> f32 {
        self.bounds.x
    }

    pub(crate) fn height(&self) -> f32 {
        self.bounds.y
    }

    /// Walls and sticky blocks, the terrain that bodies stand on.
    pub(crate) fn solids(&self) -> impl Iterator<Item = &Aabb> {
        self.walls.iter().chain(self.sticky_blocks.iter())
    }

    pub(crate) fn touches_solid(&self, hitbox: &Aabb) -> bool {
        self.solids().any(|solid| solid.overlaps(hitbox))
    }

    pub(crate) fn touches_sticky(&self, hitbox: &Aabb) -> bool {
        self.sticky_blocks.iter().any(|block| block.overlaps(hitbox))
    }

    pub(crate) fn outside_sides(&self, hitbox: &Aabb) -> bool {
        hitbox.left() < 0.0 || hitbox.right() > self.width()
    }

    /// Flyers turn at walls, reverse walls and the screen sides.
    pub(crate) fn blocks_flyer(&self, hitbox: &Aabb) -> bool {
        self.outside_sides(hitbox)
            || self.walls.iter().any(|wall| wall.overlaps(hitbox))
            || self.reverse_walls.iter().any(|wall| wall.overlaps(hitbox))
    }

    /// Robots additionally turn at sticky blocks.
    pub(crate) fn blocks_robot(&self, hitbox: &Aabb) -> bool {
        self.blocks_flyer(hitbox) || self.touches_sticky(hitbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: f32, y: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::splat(24.0))
    }

    #[test]
    fn reverse_walls_block_patrols_but_are_not_solid() {
        let mut terrain = Terrain::new(Vec2::new(240.0, 240.0));
        terrain.insert(EntityKind::ReverseWall, cell(48.0, 0.0));

        assert!(terrain.blocks_flyer(&cell(40.0, 0.0)));
        assert!(terrain.blocks_robot(&cell(40.0, 0.0)));
        assert!(!terrain.touches_solid(&cell(40.0, 0.0)));
    }

    #[test]
    fn sticky_blocks_only_stop_robots() {
        let mut terrain = Terrain::new(Vec2::new(240.0, 240.0));
        terrain.insert(EntityKind::StickyBlock, cell(48.0, 0.0));

        assert!(!terrain.blocks_flyer(&cell(40.0, 0.0)));
        assert!(terrain.blocks_robot(&cell(40.0, 0.0)));
        assert!(terrain.touches_solid(&cell(40.0, 0.0)));
    }

    #[test]
    fn screen_sides_block_patrols() {
        let terrain = Terrain::new(Vec2::new(240.0, 240.0));
        assert!(terrain.blocks_flyer(&cell(-1.0, 0.0)));
        assert!(terrain.blocks_flyer(&cell(217.0, 0.0)));
        assert!(!terrain.blocks_flyer(&cell(216.0, 0.0)));
    }
}
