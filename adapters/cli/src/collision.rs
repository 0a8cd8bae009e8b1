//! Collision masks derived from the sprite images.

use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use log::{info, warn};
use propeller_core::EntityKind;
use propeller_rendering::SpriteKey;
use propeller_rendering_macroquad::{load_sprite_pixels, SpritePixels, DEFAULT_SPRITE_MANIFEST};
use propeller_simulation::{CollisionMask, MaskSet, MaskSizeError};

/// Loads masks from the requested sprite manifest, or from the default one.
///
/// A requested manifest must decode; a missing default manifest leaves every
/// kind colliding with its full hitbox.
pub(crate) fn load_masks(manifest: Option<&Path>) -> Result<MaskSet> {
    let masks = match manifest {
        Some(path) => {
            let sprites = load_sprite_pixels(path).with_context(|| {
                format!("failed to load collision masks from {}", path.display())
            })?;
            masks_from_sprites(&sprites)?
        }
        None => match load_sprite_pixels(DEFAULT_SPRITE_MANIFEST) {
            Ok(sprites) => masks_from_sprites(&sprites)?,
            Err(error) => {
                warn!("collision masks unavailable, using hitboxes: {error:#}");
                return Ok(MaskSet::default());
            }
        },
    };
    info!("loaded collision masks from sprite images");
    Ok(masks)
}

/// Builds one mask per entity kind from the alpha channel of its sprite.
///
/// Masks are fitted to the kind's hitbox; kinds whose sprite is missing keep
/// their whole hitbox opaque.
pub(crate) fn masks_from_sprites(
    sprites: &HashMap<SpriteKey, SpritePixels>,
) -> Result<MaskSet, MaskSizeError> {
    let mut masks = MaskSet::default();
    for kind in EntityKind::ALL {
        let Some(pixels) = sprites.get(&SpriteKey::for_kind(kind)) else {
            continue;
        };
        let hitbox = kind.hitbox();
        let mask = CollisionMask::from_rgba(
            usize::from(pixels.width),
            usize::from(pixels.height),
            &pixels.rgba,
        )?
        .resized(hitbox.width() as usize, hitbox.height() as usize);
        masks.insert(kind, mask);
    }
    Ok(masks)
}
