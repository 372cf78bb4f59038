use image::{RgbaImage, imageops};
use kurbo::{Affine, Point, Rect};
use rayon::prelude::*;

use crate::assets::decode::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

const QUARTER_TURN_EPS: f32 = 1e-4;

/// Rotate `sprite` counter-clockwise by `angle_deg`, growing the canvas to fit the rotated sprite.
///
/// Quarter turns are exact pixel permutations; other angles are resampled with a bicubic
/// (Catmull-Rom) filter in premultiplied space. Uncovered corners are transparent.
pub fn rotate_expand(sprite: &RgbaImage, angle_deg: f32) -> RgbaImage {
    let a = angle_deg.rem_euclid(360.0);
    let near = |target: f32| (a - target).abs() < QUARTER_TURN_EPS;
    if near(0.0) || near(360.0) {
        return sprite.clone();
    }
    if near(90.0) {
        return imageops::rotate270(sprite);
    }
    if near(180.0) {
        return imageops::rotate180(sprite);
    }
    if near(270.0) {
        return imageops::rotate90(sprite);
    }
    rotate_bicubic(sprite, a)
}

/// Size of the bounding box that contains `(width, height)` rotated by `angle_deg`.
pub fn rotated_bounds(width: u32, height: u32, angle_deg: f32) -> (u32, u32) {
    let (w, h) = (f64::from(width), f64::from(height));
    let bbox = forward_rotation(angle_deg)
        .transform_rect_bbox(Rect::new(-w / 2.0, -h / 2.0, w / 2.0, h / 2.0));
    // Shave float noise so an exact 10.0 does not round up to 11.
    let nw = (bbox.width() - 1e-6).ceil().max(1.0) as u32;
    let nh = (bbox.height() - 1e-6).ceil().max(1.0) as u32;
    (nw, nh)
}

// Counter-clockwise on screen means clockwise in kurbo's y-down convention.
fn forward_rotation(angle_deg: f32) -> Affine {
    Affine::rotate(-f64::from(angle_deg).to_radians())
}

fn rotate_bicubic(sprite: &RgbaImage, angle_deg: f32) -> RgbaImage {
    let (sw, sh) = sprite.dimensions();
    let (nw, nh) = rotated_bounds(sw, sh, angle_deg);
    let inverse = forward_rotation(angle_deg).inverse();

    let mut premul = sprite.as_raw().clone();
    premultiply_rgba8_in_place(&mut premul);

    let src = Src {
        data: &premul,
        width: sw as i64,
        height: sh as i64,
    };
    let (half_sw, half_sh) = (f64::from(sw) / 2.0, f64::from(sh) / 2.0);
    let (half_nw, half_nh) = (f64::from(nw) / 2.0, f64::from(nh) / 2.0);

    let mut out = vec![0u8; nw as usize * nh as usize * 4];
    out.par_chunks_mut(nw as usize * 4)
        .enumerate()
        .for_each(|(oy, row)| {
            for ox in 0..nw as usize {
                let p = Point::new(ox as f64 + 0.5 - half_nw, oy as f64 + 0.5 - half_nh);
                let s = inverse * p;
                let px = src.sample_bicubic(s.x + half_sw - 0.5, s.y + half_sh - 0.5);
                row[ox * 4..ox * 4 + 4].copy_from_slice(&px);
            }
        });

    unpremultiply_rgba8_in_place(&mut out);
    RgbaImage::from_raw(nw, nh, out).unwrap_or_else(|| RgbaImage::new(nw, nh))
}

struct Src<'a> {
    data: &'a [u8],
    width: i64,
    height: i64,
}

impl Src<'_> {
    fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return [0.0; 4];
        }
        let i = ((y * self.width + x) * 4) as usize;
        [
            f32::from(self.data[i]),
            f32::from(self.data[i + 1]),
            f32::from(self.data[i + 2]),
            f32::from(self.data[i + 3]),
        ]
    }

    fn sample_bicubic(&self, x: f64, y: f64) -> [u8; 4] {
        if x < -2.0 || y < -2.0 || x > self.width as f64 + 1.0 || y > self.height as f64 + 1.0 {
            return [0; 4];
        }
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = ((x - x0) as f32, (y - y0) as f32);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let wx = [
            catmull_rom(fx + 1.0),
            catmull_rom(fx),
            catmull_rom(1.0 - fx),
            catmull_rom(2.0 - fx),
        ];
        let wy = [
            catmull_rom(fy + 1.0),
            catmull_rom(fy),
            catmull_rom(1.0 - fy),
            catmull_rom(2.0 - fy),
        ];

        let mut acc = [0f32; 4];
        for (j, &wyj) in wy.iter().enumerate() {
            for (i, &wxi) in wx.iter().enumerate() {
                let w = wxi * wyj;
                if w == 0.0 {
                    continue;
                }
                let t = self.texel(x0 + i as i64 - 1, y0 + j as i64 - 1);
                for c in 0..4 {
                    acc[c] += t[c] * w;
                }
            }
        }

        let a = acc[3].round().clamp(0.0, 255.0);
        let mut out = [0u8; 4];
        for c in 0..3 {
            // Premultiplied colour can never exceed alpha; bicubic overshoot can.
            out[c] = acc[c].round().clamp(0.0, a) as u8;
        }
        out[3] = a as u8;
        out
    }
}

fn catmull_rom(t: f32) -> f32 {
    let t = t.abs();
    if t < 1.0 {
        1.5 * t * t * t - 2.5 * t * t + 1.0
    } else if t < 2.0 {
        -0.5 * t * t * t + 2.5 * t * t - 4.0 * t + 2.0
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/droplet/rotate.rs"]
mod tests;
