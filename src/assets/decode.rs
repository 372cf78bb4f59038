use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::{
    config::OutputFormat,
    foundation::{
        error::{RainError, RainResult},
        math::mul_div255,
    },
};

/// Decode encoded image bytes into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> RainResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| RainError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(RainError::decode("image has zero width or height"));
    }
    Ok(rgba)
}

/// Encode straight RGBA8 pixels as PNG or JPEG bytes.
pub fn encode_image(img: &RgbaImage, format: OutputFormat) -> RainResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                .map_err(|e| RainError::encode(format!("write png: {e}")))?;
        }
        OutputFormat::Jpeg { quality } => {
            let rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
            enc.encode_image(&rgb)
                .map_err(|e| RainError::encode(format!("write jpeg: {e}")))?;
        }
    }
    Ok(buf)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = mul_div255(*c, a);
        }
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            let v = (u32::from(*c).min(a) * 255 + a / 2) / a;
            *c = v.min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
