//! Pixel-accurate collision masks.
//!
//! Masks are optional: the asset collaborator may supply one per entity kind,
//! and kinds without a mask treat their whole hitbox as opaque.

use propeller_core::{catalog::ENTITY_KIND_COUNT, EntityKind};
use thiserror::Error;

use crate::geometry::Aabb;

/// Reasons a mask cannot be built from raw pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("mask of {width}x{height} pixels needs {expected} samples, found {found}")]
pub struct MaskSizeError {
    /// Mask width in pixels.
    pub width: usize,
    /// Mask height in pixels.
    pub height: usize,
    /// Number of samples required.
    pub expected: usize,
    /// Number of samples provided.
    pub found: usize,
}

/// Opaque/transparent bitmap aligned with an entity's top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionMask {
    width: usize,
    height: usize,
    opaque: Vec<bool>,
}

impl CollisionMask {
    /// Builds a mask from row-major opacity samples.
    pub fn new(width: usize, height: usize, opaque: Vec<bool>) -> Result<Self, MaskSizeError> {
        let expected = width * height;
        if opaque.len() != expected {
            return Err(MaskSizeError {
                width,
                height,
                expected,
                found: opaque.len(),
            });
        }
        Ok(Self {
            width,
            height,
            opaque,
        })
    }

    /// Builds a mask from RGBA pixels, treating any non-zero alpha as opaque.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self, MaskSizeError> {
        let opaque = rgba.chunks_exact(4).map(|pixel| pixel[3] != 0).collect();
        Self::new(width, height, opaque)
    }

    /// Resamples the mask to the provided size using the nearest source pixel.
    ///
    /// Sprite images are stretched over their hitbox when drawn, so masks are
    /// fitted the same way before they take part in collisions.
    #[must_use]
    pub fn resized(&self, width: usize, height: usize) -> Self {
        if (width, height) == (self.width, self.height) {
            return self.clone();
        }
        let mut opaque = Vec::with_capacity(width * height);
        for y in 0..height {
            let source_y = y * self.height / height.max(1);
            for x in 0..width {
                let source_x = x * self.width / width.max(1);
                opaque.push(
                    self.width > 0
                        && self.height > 0
                        && self.opaque[source_y * self.width + source_x],
                );
            }
        }
        Self {
            width,
            height,
            opaque,
        }
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reports whether the pixel at the local offset is opaque; outside pixels are transparent.
    #[must_use]
    pub fn is_opaque(&self, x: i64, y: i64) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return false;
        };
        x < self.width && y < self.height && self.opaque[y * self.width + x]
    }
}

/// Optional mask for every entity kind.
#[derive(Clone, Debug, Default)]
pub struct MaskSet {
    masks: [Option<CollisionMask>; ENTITY_KIND_COUNT],
}

impl MaskSet {
    /// Registers the mask used for the provided kind.
    pub fn insert(&mut self, kind: EntityKind, mask: CollisionMask) {
        self.masks[kind.index()] = Some(mask);
    }

    /// Mask registered for the kind, if any.
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> Option<&CollisionMask> {
        self.masks[kind.index()].as_ref()
    }

    /// Reports whether two bodies touch, honouring the masks of both kinds.
    ///
    /// Kinds without a registered mask are opaque over their whole box.
    #[must_use]
    pub fn overlap(&self, a: (EntityKind, &Aabb), b: (EntityKind, &Aabb)) -> bool {
        let (a_kind, a_box) = a;
        let (b_kind, b_box) = b;
        if !a_box.overlaps(b_box) {
            return false;
        }
        let (a_mask, b_mask) = (self.get(a_kind), self.get(b_kind));
        if a_mask.is_none() && b_mask.is_none() {
            return true;
        }

        let a_origin = (a_box.left().floor() as i64, a_box.top().floor() as i64);
        let b_origin = (b_box.left().floor() as i64, b_box.top().floor() as i64);
        let left = a_box.left().max(b_box.left()).floor() as i64;
        let right = a_box.right().min(b_box.right()).ceil() as i64;
        let top = a_box.top().max(b_box.top()).floor() as i64;
        let bottom = a_box.bottom().min(b_box.bottom()).ceil() as i64;

        (top..bottom).any(|y| {
            (left..right).any(|x| {
                let a_hit = a_mask.map_or(true, |mask| mask.is_opaque(x - a_origin.0, y - a_origin.1));
                let b_hit = b_mask.map_or(true, |mask| mask.is_opaque(x - b_origin.0, y - b_origin.1));
                a_hit && b_hit
            })
        })
    }
}
