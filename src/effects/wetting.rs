use image::{GrayImage, RgbaImage};
use rayon::prelude::*;

use crate::foundation::{
    error::{RainError, RainResult},
    math::to_u8_sat,
};

/// Darken `base` where `mask` marks droplet contact.
///
/// Per colour channel: `c * (1 - (mask / 255) * intensity)`. Alpha is left untouched.
pub fn apply_wetting(base: &mut RgbaImage, mask: &GrayImage, intensity: f32) -> RainResult<()> {
    if base.dimensions() != mask.dimensions() {
        return Err(RainError::validation(format!(
            "wetting mask {:?} does not match base image {:?}",
            mask.dimensions(),
            base.dimensions()
        )));
    }
    if !intensity.is_finite() || !(0.0..=1.0).contains(&intensity) {
        return Err(RainError::validation(
            "wet intensity must be finite and within [0, 1]",
        ));
    }

    let w = base.width() as usize;
    if w == 0 || intensity == 0.0 {
        return Ok(());
    }

    base.par_chunks_mut(w * 4)
        .zip(mask.par_chunks(w))
        .for_each(|(b_row, m_row)| {
            for (px, &m) in b_row.chunks_exact_mut(4).zip(m_row) {
                if m == 0 {
                    continue;
                }
                let factor = 1.0 - (f32::from(m) / 255.0) * intensity;
                for c in &mut px[..3] {
                    *c = to_u8_sat(f32::from(*c) * factor);
                }
            }
        });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/wetting.rs"]
mod tests;
