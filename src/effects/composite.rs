use image::RgbaImage;
use rayon::prelude::*;

use crate::foundation::error::{RainError, RainResult};

/// Straight (non-premultiplied) RGBA8 pixel.
pub type StraightRgba8 = [u8; 4];

/// Porter-Duff "over" on straight-alpha pixels.
///
/// For an opaque `dst` this is `src * sa + dst * (1 - sa)` per channel.
pub fn over(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    // Output alpha scaled by 255: sa*255 + da*(255-sa).
    let den = sa * 255 + da * inv;
    if den == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv;
        out[i] = ((num + den / 2) / den).min(255) as u8;
    }
    out[3] = ((den + 127) / 255).min(255) as u8;
    out
}

/// Composite `src` over `dst` in place; both images must have the same dimensions.
pub fn over_in_place(dst: &mut RgbaImage, src: &RgbaImage) -> RainResult<()> {
    if dst.dimensions() != src.dimensions() {
        return Err(RainError::validation(format!(
            "over_in_place expects equal dimensions, got {:?} and {:?}",
            dst.dimensions(),
            src.dimensions()
        )));
    }
    let row_len = dst.width() as usize * 4;
    dst.par_chunks_mut(row_len)
        .zip(src.par_chunks(row_len))
        .for_each(|(d_row, s_row)| {
            for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
        });
    Ok(())
}

/// Paste `sprite` with its top-left corner at `(x, y)` using "over", clipped to the canvas.
///
/// Returns the number of canvas pixels the sprite overlapped.
pub fn paste_over(canvas: &mut RgbaImage, sprite: &RgbaImage, x: i64, y: i64) -> u64 {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let (sw, sh) = (i64::from(sprite.width()), i64::from(sprite.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(cw);
    let y1 = (y + sh).min(ch);
    if x0 >= x1 || y0 >= y1 {
        return 0;
    }

    for cy in y0..y1 {
        for cx in x0..x1 {
            let s = sprite.get_pixel((cx - x) as u32, (cy - y) as u32).0;
            if s[3] == 0 {
                continue;
            }
            let d = canvas.get_pixel_mut(cx as u32, cy as u32);
            d.0 = over(d.0, s);
        }
    }
    ((x1 - x0) * (y1 - y0)) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
