//! The layered strip compositor.
//!
//! Z-order is fixed: backdrop color, background artwork, photo slots,
//! template overlay artwork, extra overlay artwork, stickers. The whole
//! render is assembled as one [`DrawOp`] list and replayed, so identical
//! inputs produce identical pixels; export depends on that.
//!
//! Photos are mirrored horizontally at draw time to match the self-view the
//! user posed against; the stored buffers stay unmirrored.

use std::sync::Arc;

use tracing::warn;

use crate::{
    assets::AssetStore,
    error::BoothResult,
    ops::{self, DrawOp, RectPx},
    photo::Photo,
    stickers::{StickerCatalog, StickerId, StickerPlacement},
    surface::{BlendMode, Surface},
    templates::TemplateDescriptor,
};

/// Default strip render width in pixels (the preview box at 2x).
pub const DEFAULT_STRIP_WIDTH: u32 = 560;

/// Sticker artwork width as a fraction of the strip width, before the
/// per-placement scale.
pub const STICKER_BASE_FRACTION: f32 = 0.12;

/// Classic-strip geometry, as fractions of the strip width.
const STRIP_PADDING_FRACTION: f32 = 0.03;
const STRIP_GAP_FRACTION: f32 = 0.015;

pub fn render_strip(
    template: &TemplateDescriptor,
    photos: &[Photo],
    stickers: &[StickerPlacement],
    catalog: &StickerCatalog,
    assets: &mut dyn AssetStore,
    width: u32,
) -> BoothResult<Surface> {
    let height = strip_height(template, width);
    let mut op_list: Vec<DrawOp> = Vec::new();
    let full = RectPx::new(0, 0, width, height);

    let backdrop = template.background_color.unwrap_or([0xFF, 0xFF, 0xFF]);
    op_list.push(DrawOp::fill(
        [backdrop[0], backdrop[1], backdrop[2], 0xFF],
        full,
    ));

    if let Some(path) = &template.background_image {
        push_artwork(&mut op_list, assets, path, full, template);
    }

    push_photo_ops(&mut op_list, template, photos, width, height)?;

    if let Some(path) = &template.template_overlay_image {
        push_artwork(&mut op_list, assets, path, full, template);
    }
    if let Some(path) = &template.overlay_image {
        push_artwork(&mut op_list, assets, path, full, template);
    }

    push_sticker_ops(&mut op_list, stickers, catalog, assets, width, height);

    if let Some(border) = &template.outer_border {
        push_edge_frame(&mut op_list, full, border.width_px, border.color);
    }

    let mut surface = Surface::transparent(width, height)?;
    ops::execute(&mut surface, &op_list)?;
    Ok(surface)
}

/// Total strip height. The classic strip stacks four square slots with
/// uniform padding and gaps; positional templates come from their aspect
/// ratio.
pub fn strip_height(template: &TemplateDescriptor, width: u32) -> u32 {
    if template.is_default() {
        let pad = (width as f32 * STRIP_PADDING_FRACTION).round();
        let gap = (width as f32 * STRIP_GAP_FRACTION).round();
        let slot = width as f32 - 2.0 * pad;
        let slots = crate::capture::PHOTO_COUNT as f32;
        (2.0 * pad + slots * slot + (slots - 1.0) * gap).round() as u32
    } else {
        let ar = template.aspect_ratio.unwrap_or(1.0);
        ((width as f32) * ar).round().max(1.0) as u32
    }
}

fn push_photo_ops(
    op_list: &mut Vec<DrawOp>,
    template: &TemplateDescriptor,
    photos: &[Photo],
    width: u32,
    height: u32,
) -> BoothResult<()> {
    let slots = slot_rects(template, width, height);
    // More slots than photos: only the filled slots render.
    for (slot, photo) in slots.iter().zip(photos.iter()) {
        let image = Arc::new(photo.decode()?);
        let border = template.photo_border;
        let (inset, radius) = match border {
            Some(b) => {
                push_border_ring(op_list, *slot, b.width_px, b.color, b.radius_px);
                (b.width_px, b.radius_px.saturating_sub(b.width_px) as f32)
            }
            None => (0, 0.0),
        };
        let dest = inset_rect(*slot, inset);
        op_list.push(DrawOp::Blit {
            image,
            dest,
            blend: BlendMode::SourceOver,
            opacity: 1.0,
            mirror: true,
            corner_radius_px: radius,
        });
    }
    Ok(())
}

/// Pixel rects for every photo slot, in slot order.
pub fn slot_rects(template: &TemplateDescriptor, width: u32, height: u32) -> Vec<RectPx> {
    if template.is_default() {
        let pad = (width as f32 * STRIP_PADDING_FRACTION).round() as i64;
        let gap = (width as f32 * STRIP_GAP_FRACTION).round() as i64;
        let slot = i64::from(width) - 2 * pad;
        (0..crate::capture::PHOTO_COUNT as i64)
            .map(|i| RectPx::new(pad, pad + i * (slot + gap), slot as u32, slot as u32))
            .collect()
    } else {
        template
            .photo_slots
            .iter()
            .map(|s| {
                RectPx::new(
                    percent_px(s.x_percent, width),
                    percent_px(s.y_percent, height),
                    percent_px(s.width_percent, width).max(0) as u32,
                    percent_px(s.height_percent, height).max(0) as u32,
                )
            })
            .collect()
    }
}

fn push_sticker_ops(
    op_list: &mut Vec<DrawOp>,
    stickers: &[StickerPlacement],
    catalog: &StickerCatalog,
    assets: &mut dyn AssetStore,
    width: u32,
    height: u32,
) {
    for placement in stickers {
        let Ok(kind) = catalog.get(&placement.sticker) else {
            warn!(sticker = %placement.sticker, "sticker kind not in catalog, skipping");
            continue;
        };
        let image = match assets.load_image(&kind.asset_path) {
            Ok(img) => img,
            // Missing artwork never blocks the render.
            Err(e) => {
                warn!(sticker = %kind.id, error = %e, "sticker artwork failed to load, skipping");
                continue;
            }
        };
        op_list.push(DrawOp::Blit {
            image,
            dest: sticker_rect(placement, width, height),
            blend: BlendMode::SourceOver,
            opacity: 1.0,
            mirror: false,
            corner_radius_px: 0.0,
        });
    }
}

/// Pixel box of a sticker: center-anchored at its percent position, sized
/// from the strip width and its scale.
pub fn sticker_rect(placement: &StickerPlacement, width: u32, height: u32) -> RectPx {
    let size = (width as f32 * STICKER_BASE_FRACTION * placement.scale).round().max(1.0) as u32;
    let cx = percent_px(placement.x_percent, width);
    let cy = percent_px(placement.y_percent, height);
    RectPx::new(
        cx - i64::from(size) / 2,
        cy - i64::from(size) / 2,
        size,
        size,
    )
}

/// Topmost sticker whose box contains the point, for drag-start picking.
/// The point is in percent of the strip box.
pub fn hit_test(
    stickers: &[StickerPlacement],
    x_percent: f32,
    y_percent: f32,
    width: u32,
    height: u32,
) -> Option<StickerId> {
    let px = percent_px(x_percent, width);
    let py = percent_px(y_percent, height);
    // Later placements draw on top, so scan back to front.
    for placement in stickers.iter().rev() {
        let r = sticker_rect(placement, width, height);
        if px >= r.x
            && px < r.x + i64::from(r.width)
            && py >= r.y
            && py < r.y + i64::from(r.height)
        {
            return Some(placement.id);
        }
    }
    None
}

fn push_artwork(
    op_list: &mut Vec<DrawOp>,
    assets: &mut dyn AssetStore,
    path: &str,
    dest: RectPx,
    template: &TemplateDescriptor,
) {
    match assets.load_image(path) {
        Ok(image) => op_list.push(DrawOp::blit(image, dest)),
        // Recoverable: the backdrop color beneath stays visible.
        Err(e) => warn!(
            template = %template.id,
            artwork = %path,
            error = %e,
            "template artwork failed to load, using backdrop color"
        ),
    }
}

/// A border as four edge fills plus rounded-corner coverage via the outer
/// fill's radius; drawn before the content it frames.
fn push_border_ring(
    op_list: &mut Vec<DrawOp>,
    rect: RectPx,
    width_px: u32,
    color: [u8; 3],
    radius_px: u32,
) {
    if width_px == 0 {
        return;
    }
    op_list.push(DrawOp::Fill {
        color: [color[0], color[1], color[2], 0xFF],
        dest: rect,
        blend: BlendMode::SourceOver,
        opacity: 1.0,
        corner_radius_px: radius_px as f32,
    });
}

/// An outer frame as four edge strips, drawn over the finished stack.
fn push_edge_frame(op_list: &mut Vec<DrawOp>, rect: RectPx, width_px: u32, color: [u8; 3]) {
    if width_px == 0 || rect.width == 0 || rect.height == 0 {
        return;
    }
    let w = width_px.min(rect.width / 2).min(rect.height / 2).max(1);
    let c = [color[0], color[1], color[2], 0xFF];
    let edges = [
        RectPx::new(rect.x, rect.y, rect.width, w),
        RectPx::new(rect.x, rect.y + i64::from(rect.height - w), rect.width, w),
        RectPx::new(rect.x, rect.y, w, rect.height),
        RectPx::new(rect.x + i64::from(rect.width - w), rect.y, w, rect.height),
    ];
    for dest in edges {
        op_list.push(DrawOp::fill(c, dest));
    }
}

fn inset_rect(rect: RectPx, inset: u32) -> RectPx {
    let inset2 = inset.saturating_mul(2);
    RectPx::new(
        rect.x + i64::from(inset),
        rect.y + i64::from(inset),
        rect.width.saturating_sub(inset2),
        rect.height.saturating_sub(inset2),
    )
}

fn percent_px(percent: f32, span: u32) -> i64 {
    ((percent / 100.0) * span as f32).round() as i64
}
