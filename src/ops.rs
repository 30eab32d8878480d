//! The draw-operation list.
//!
//! Every compositing step in the booth (filter passes, texture overlays,
//! template layers, stickers) is expressed as an ordered [`DrawOp`] list,
//! each op carrying its own blend mode and opacity, and replayed against a
//! [`Surface`] by [`execute`]. Nothing mutates shared drawing state between
//! ops, so a pipeline can be inspected and replayed in tests.

use std::sync::Arc;

use image::RgbaImage;

use crate::{
    effect::{self, ColorTransform},
    error::BoothResult,
    surface::{BlendMode, Surface},
};

/// Destination rect in surface pixels. May extend past the surface edges;
/// out-of-bounds pixels are clipped at execution time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectPx {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Fill `dest` with a solid color.
    Fill {
        color: [u8; 4],
        dest: RectPx,
        blend: BlendMode,
        opacity: f32,
        corner_radius_px: f32,
    },
    /// Draw an image into `dest`, cover-fitted and center-cropped.
    Blit {
        image: Arc<RgbaImage>,
        dest: RectPx,
        blend: BlendMode,
        opacity: f32,
        /// Horizontal mirror, applied at draw time.
        mirror: bool,
        corner_radius_px: f32,
    },
    /// Apply a color transform to every pixel currently on the surface.
    /// Alpha is untouched.
    ColorPass { transform: ColorTransform },
}

impl DrawOp {
    pub fn blit(image: Arc<RgbaImage>, dest: RectPx) -> Self {
        DrawOp::Blit {
            image,
            dest,
            blend: BlendMode::SourceOver,
            opacity: 1.0,
            mirror: false,
            corner_radius_px: 0.0,
        }
    }

    pub fn fill(color: [u8; 4], dest: RectPx) -> Self {
        DrawOp::Fill {
            color,
            dest,
            blend: BlendMode::SourceOver,
            opacity: 1.0,
            corner_radius_px: 0.0,
        }
    }
}

/// Replays the op list, in order, against the surface.
pub fn execute(surface: &mut Surface, ops: &[DrawOp]) -> BoothResult<()> {
    for op in ops {
        match op {
            DrawOp::Fill {
                color,
                dest,
                blend,
                opacity,
                corner_radius_px,
            } => fill_rect(surface, *color, *dest, *blend, *opacity, *corner_radius_px),
            DrawOp::Blit {
                image,
                dest,
                blend,
                opacity,
                mirror,
                corner_radius_px,
            } => blit_image(
                surface,
                image,
                *dest,
                *blend,
                *opacity,
                *mirror,
                *corner_radius_px,
            ),
            DrawOp::ColorPass { transform } => {
                effect::apply_transform(surface.data_mut(), transform);
            }
        }
    }
    Ok(())
}

fn fill_rect(
    surface: &mut Surface,
    color: [u8; 4],
    dest: RectPx,
    blend: BlendMode,
    opacity: f32,
    radius: f32,
) {
    for dy in 0..dest.height {
        for dx in 0..dest.width {
            if !inside_rounded_rect(dx, dy, dest.width, dest.height, radius) {
                continue;
            }
            let (Some(x), Some(y)) = (to_surface(dest.x, dx), to_surface(dest.y, dy)) else {
                continue;
            };
            surface.blend_pixel(x, y, color, blend, opacity);
        }
    }
}

fn blit_image(
    surface: &mut Surface,
    image: &RgbaImage,
    dest: RectPx,
    blend: BlendMode,
    opacity: f32,
    mirror: bool,
    radius: f32,
) {
    if dest.width == 0 || dest.height == 0 || image.width() == 0 || image.height() == 0 {
        return;
    }
    let scaled = cover_resize(image, dest.width, dest.height, mirror);
    for dy in 0..dest.height {
        for dx in 0..dest.width {
            if !inside_rounded_rect(dx, dy, dest.width, dest.height, radius) {
                continue;
            }
            let (Some(x), Some(y)) = (to_surface(dest.x, dx), to_surface(dest.y, dy)) else {
                continue;
            };
            let px = scaled.get_pixel(dx, dy).0;
            surface.blend_pixel(x, y, px, blend, opacity);
        }
    }
}

/// Scales the image so it covers `w x h`, center-crops the excess, and
/// optionally mirrors it horizontally (the booth mirrors camera photos to
/// match the self-view the user posed against).
fn cover_resize(image: &RgbaImage, w: u32, h: u32, mirror: bool) -> RgbaImage {
    let (iw, ih) = image.dimensions();
    let scale = f64::max(f64::from(w) / f64::from(iw), f64::from(h) / f64::from(ih));
    let sw = ((f64::from(iw) * scale).ceil() as u32).max(w);
    let sh = ((f64::from(ih) * scale).ceil() as u32).max(h);

    let resized = image::imageops::resize(image, sw, sh, image::imageops::FilterType::Triangle);
    let cx = (sw - w) / 2;
    let cy = (sh - h) / 2;
    let mut cropped = image::imageops::crop_imm(&resized, cx, cy, w, h).to_image();
    if mirror {
        image::imageops::flip_horizontal_in_place(&mut cropped);
    }
    cropped
}

fn inside_rounded_rect(x: u32, y: u32, w: u32, h: u32, radius: f32) -> bool {
    if radius <= 0.0 {
        return true;
    }
    let r = radius.min(w as f32 / 2.0).min(h as f32 / 2.0);
    let fx = x as f32 + 0.5;
    let fy = y as f32 + 0.5;
    // Distance check only matters inside the four corner squares.
    let cx = if fx < r {
        r
    } else if fx > w as f32 - r {
        w as f32 - r
    } else {
        return true;
    };
    let cy = if fy < r {
        r
    } else if fy > h as f32 - r {
        h as f32 - r
    } else {
        return true;
    };
    let dx = fx - cx;
    let dy = fy - cy;
    dx * dx + dy * dy <= r * r
}

fn to_surface(origin: i64, offset: u32) -> Option<u32> {
    let v = origin + i64::from(offset);
    u32::try_from(v).ok()
}
