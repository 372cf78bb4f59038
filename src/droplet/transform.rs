use image::{RgbaImage, imageops::FilterType};
use rand::Rng;

use crate::{
    assets::decode::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    config::RainConfig,
    droplet::rotate::{rotate_expand, rotated_bounds},
    effects::composite::paste_over,
    foundation::math::lerp,
};

/// Largest droplet, in pixels, any transform step may produce.
pub const MAX_DROPLET_PIXELS: u64 = 1 << 24;

/// Randomly drawn parameters of one droplet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropletParams {
    /// Uniform scale applied to the base sprite.
    pub scale: f32,
    /// Extra vertical stretch applied after scaling.
    pub stretch: f32,
    /// Canvas column of the droplet's top-left corner.
    pub x: i64,
    /// Canvas row of the droplet's top-left corner.
    pub y: i64,
    /// Counter-clockwise rotation in degrees.
    pub angle_deg: f32,
}

impl DropletParams {
    /// Draw parameters for a droplet on a `canvas` sized `(width, height)`.
    ///
    /// Draw order is scale, stretch, x, y.
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        cfg: &RainConfig,
        canvas: (u32, u32),
        center: (f32, f32),
    ) -> Self {
        let scale = cfg.scale_range.sample(rng);
        let stretch = cfg.stretch_range.sample(rng);
        let x = i64::from(rng.gen_range(0..canvas.0.max(1)));
        let y = i64::from(rng.gen_range(0..cfg.placement.y_limit(canvas.1)));
        let angle_deg = orientation_deg(x as f32, y as f32, center.0, center.1);
        Self {
            scale,
            stretch,
            x,
            y,
            angle_deg,
        }
    }
}

/// Rotation that turns a downward-pointing droplet at `(x, y)` toward `(cx, cy)`.
pub fn orientation_deg(x: f32, y: f32, cx: f32, cy: f32) -> f32 {
    (cy - y).atan2(cx - x).to_degrees() - 90.0
}

/// Transform step that produced an empty sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformStage {
    /// Uniform scaling.
    Scale,
    /// Vertical stretching.
    Stretch,
    /// Rotation with canvas expansion.
    Rotate,
}

/// A droplet whose sprite collapsed to zero area, or outgrew [`MAX_DROPLET_PIXELS`], and was
/// skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DegenerateSprite {
    /// Step at which the sprite collapsed.
    pub stage: TransformStage,
    /// Width after that step.
    pub width: u32,
    /// Height after that step.
    pub height: u32,
}

impl DegenerateSprite {
    /// `true` when the sprite was skipped for size rather than for being empty.
    pub fn is_oversized(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

fn check_size(stage: TransformStage, width: u32, height: u32) -> Result<(), DegenerateSprite> {
    let area = u64::from(width) * u64::from(height);
    if area == 0 || area > MAX_DROPLET_PIXELS {
        return Err(DegenerateSprite {
            stage,
            width,
            height,
        });
    }
    Ok(())
}

/// Result of placing one droplet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DropletOutcome {
    /// The droplet was pasted onto the canvas.
    Placed {
        /// Parameters used.
        params: DropletParams,
        /// Size of the rotated droplet sprite.
        footprint: (u32, u32),
        /// Canvas pixels the sprite overlapped after clipping.
        overlap: u64,
    },
    /// Non-fatal: the droplet was skipped.
    Skipped(DegenerateSprite),
}

impl DropletOutcome {
    /// `true` when the droplet reached the canvas.
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}

/// Multiply width and height by `scale` (bicubic resampling), truncating toward zero.
pub fn scale_sprite(sprite: &RgbaImage, scale: f32) -> Result<RgbaImage, DegenerateSprite> {
    let w = scaled_len(sprite.width(), scale);
    let h = scaled_len(sprite.height(), scale);
    check_size(TransformStage::Scale, w, h)?;
    Ok(resize_premultiplied(sprite, w, h))
}

/// Multiply height only by `stretch`.
pub fn stretch_vertically(sprite: &RgbaImage, stretch: f32) -> Result<RgbaImage, DegenerateSprite> {
    let w = sprite.width();
    let h = scaled_len(sprite.height(), stretch);
    check_size(TransformStage::Stretch, w, h)?;
    Ok(resize_premultiplied(sprite, w, h))
}

/// Fade alpha linearly from 1.0 on the top row to `min_alpha` on the bottom row.
pub fn shade_alpha_gradient(sprite: &mut RgbaImage, min_alpha: f32) {
    let h = sprite.height();
    if h <= 1 {
        return;
    }
    let denom = (h - 1) as f32;
    for (row, pixels) in sprite.rows_mut().enumerate() {
        let factor = lerp(1.0, min_alpha, row as f32 / denom);
        for px in pixels {
            px[3] = (f32::from(px[3]) * factor).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Run scale, stretch, alpha shading and rotation on `sprite`.
pub fn render_droplet(
    sprite: &RgbaImage,
    params: &DropletParams,
    min_alpha: f32,
) -> Result<RgbaImage, DegenerateSprite> {
    let scaled = scale_sprite(sprite, params.scale)?;
    let mut stretched = stretch_vertically(&scaled, params.stretch)?;
    shade_alpha_gradient(&mut stretched, min_alpha);
    let (rw, rh) = rotated_bounds(stretched.width(), stretched.height(), params.angle_deg);
    check_size(TransformStage::Rotate, rw, rh)?;
    Ok(rotate_expand(&stretched, params.angle_deg))
}

/// Render a droplet with fixed `params` and paste it onto `canvas`.
pub fn place_droplet(
    canvas: &mut RgbaImage,
    sprite: &RgbaImage,
    params: DropletParams,
    min_alpha: f32,
) -> DropletOutcome {
    match render_droplet(sprite, &params, min_alpha) {
        Ok(droplet) => {
            let overlap = paste_over(canvas, &droplet, params.x, params.y);
            DropletOutcome::Placed {
                params,
                footprint: droplet.dimensions(),
                overlap,
            }
        }
        Err(degenerate) => {
            tracing::debug!(
                stage = ?degenerate.stage,
                width = degenerate.width,
                height = degenerate.height,
                oversized = degenerate.is_oversized(),
                "skipping degenerate droplet"
            );
            DropletOutcome::Skipped(degenerate)
        }
    }
}

/// Sample fresh parameters and place one droplet.
pub fn place_random_droplet<R: Rng + ?Sized>(
    canvas: &mut RgbaImage,
    sprite: &RgbaImage,
    center: (f32, f32),
    cfg: &RainConfig,
    rng: &mut R,
) -> DropletOutcome {
    let params = DropletParams::sample(rng, cfg, canvas.dimensions(), center);
    place_droplet(canvas, sprite, params, cfg.min_alpha)
}

fn scaled_len(len: u32, factor: f32) -> u32 {
    let v = len as f32 * factor;
    if v.is_nan() || v <= 0.0 {
        return 0;
    }
    v.min(u32::MAX as f32) as u32
}

fn resize_premultiplied(sprite: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    if sprite.dimensions() == (w, h) {
        return sprite.clone();
    }
    let mut premul = sprite.clone();
    premultiply_rgba8_in_place(&mut premul);
    let mut out = image::imageops::resize(&premul, w, h, FilterType::CatmullRom);
    for px in out.pixels_mut() {
        let a = px[3];
        for c in &mut px.0[..3] {
            *c = (*c).min(a);
        }
    }
    unpremultiply_rgba8_in_place(&mut out);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/droplet/transform.rs"]
mod tests;
