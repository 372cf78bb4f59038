use image::{GrayImage, RgbaImage};
use rayon::prelude::*;

/// Alpha level above which a field pixel counts as visible droplet coverage.
pub const DEFAULT_CONTACT_THRESHOLD: u8 = 30;

/// Binary contact mask: 255 where the field's alpha is strictly above `threshold`, else 0.
pub fn extract_contact_mask(field: &RgbaImage, threshold: u8) -> GrayImage {
    let (w, h) = field.dimensions();
    let mut mask = GrayImage::new(w, h);
    if w == 0 || h == 0 {
        return mask;
    }

    let w = w as usize;
    mask.par_chunks_mut(w)
        .zip(field.par_chunks(w * 4))
        .for_each(|(m_row, f_row)| {
            for (m, px) in m_row.iter_mut().zip(f_row.chunks_exact(4)) {
                *m = if px[3] > threshold { 255 } else { 0 };
            }
        });
    mask
}

/// Number of mask pixels marked as contact.
pub fn covered_pixels(mask: &GrayImage) -> u64 {
    mask.as_raw().iter().filter(|&&v| v != 0).count() as u64
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mask.rs"]
mod tests;
