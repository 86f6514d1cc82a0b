//! PNG and JSON output for rendered plants

use crate::error::{GardenError, Result};
use crate::palette::parse_hex;
use crate::plant::{PlantCanvas, Pixel, GRID_SIZE};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Largest PNG scale accepted; 64 gives a 2048x2048 image
pub const MAX_PNG_SCALE: u32 = 64;

/// Rasterize pixels into an image, `scale` image pixels per grid pixel.
/// Empty cells stay transparent.
pub fn to_image(pixels: &[Pixel], scale: u32) -> Result<RgbaImage> {
    if scale == 0 || scale > MAX_PNG_SCALE {
        return Err(GardenError::InvalidArgument(format!(
            "scale must be between 1 and {}, got {}",
            MAX_PNG_SCALE, scale
        )));
    }
    let side = (GRID_SIZE as u32)
        .checked_mul(scale)
        .ok_or_else(|| GardenError::InvalidArgument(format!("scale {} is too large", scale)))?;
    let canvas = PlantCanvas::from_pixels(pixels);
    let mut img = RgbaImage::new(side, side);

    for gy in 0..GRID_SIZE {
        for gx in 0..GRID_SIZE {
            let Some(hex) = canvas.get(gx, gy) else {
                continue;
            };
            let (r, g, b) = parse_hex(hex)?;
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(gx as u32 * scale + dx, gy as u32 * scale + dy, Rgba([r, g, b, 255]));
                }
            }
        }
    }
    Ok(img)
}

pub fn write_png(pixels: &[Pixel], scale: u32, path: &Path) -> Result<()> {
    let img = to_image(pixels, scale)?;
    img.save_with_format(path, image::ImageFormat::Png)?;
    tracing::info!(path = %path.display(), size = img.width(), "png written");
    Ok(())
}

/// Pixels as a JSON array of `{x, y, color}`, in draw order
pub fn to_json(pixels: &[Pixel]) -> Result<String> {
    Ok(serde_json::to_string_pretty(pixels)?)
}
