use image::RgbaImage;
use rand::Rng;

use crate::{
    config::RainConfig,
    droplet::transform::{DropletOutcome, place_random_droplet},
    effects::blur::blur_field,
    foundation::{
        deadline::Deadline,
        error::{RainError, RainResult},
    },
};

/// Finished overlay field plus placement counters.
#[derive(Clone, Debug)]
pub struct OverlayField {
    /// Transparent canvas holding every placed droplet.
    pub canvas: RgbaImage,
    /// Droplets pasted onto the canvas.
    pub placed: u32,
    /// Droplets skipped because their sprite collapsed to zero area.
    pub skipped: u32,
}

/// Populate a transparent `width` x `height` canvas with `cfg.droplet_count` droplets.
///
/// Each droplet samples its own parameters from `rng`; the canvas is the only shared state.
#[tracing::instrument(skip(sprite, cfg, rng, deadline), fields(droplets = cfg.droplet_count))]
pub fn generate_field<R: Rng + ?Sized>(
    sprite: &RgbaImage,
    size: (u32, u32),
    center: (f32, f32),
    cfg: &RainConfig,
    rng: &mut R,
    deadline: &Deadline,
) -> RainResult<OverlayField> {
    let (width, height) = size;
    if width == 0 || height == 0 {
        return Err(RainError::validation("field width/height must be > 0"));
    }

    let mut canvas = RgbaImage::new(width, height);
    let mut placed = 0u32;
    let mut skipped = 0u32;
    for _ in 0..cfg.droplet_count {
        deadline.check("field")?;
        match place_random_droplet(&mut canvas, sprite, center, cfg, rng) {
            DropletOutcome::Placed { .. } => placed += 1,
            DropletOutcome::Skipped(_) => skipped += 1,
        }
    }

    if let Some(radius) = cfg.blur_radius {
        deadline.check("field_blur")?;
        canvas = blur_field(&canvas, radius)?;
    }

    tracing::debug!(placed, skipped, "overlay field generated");
    Ok(OverlayField {
        canvas,
        placed,
        skipped,
    })
}

/// Geometric centre of a `width` x `height` canvas.
pub fn canvas_center(width: u32, height: u32) -> (f32, f32) {
    (width as f32 / 2.0, height as f32 / 2.0)
}

#[cfg(test)]
#[path = "../../tests/unit/field/compositor.rs"]
mod tests;
