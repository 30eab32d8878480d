//! Photo post-processing.
//!
//! `apply_filter` turns a captured photo into its finalized, filtered form:
//! draw the source, re-draw it with the filter's color transform in force
//! using source-atop (so filtered pixels land only where the source has
//! alpha), then blend the optional paper/film texture with overlay at the
//! texture's opacity, and re-encode as JPEG. The whole pass is an ordered
//! [`DrawOp`] list replayed against one surface.
//!
//! A photo that already went through the pipeline is returned unchanged, so
//! redrawing across review / retake / compose can never darken or saturate
//! it progressively.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    assets::AssetStore,
    effect,
    error::{BoothError, BoothResult},
    filters::FilterDescriptor,
    ops::{self, DrawOp, RectPx},
    photo::Photo,
    surface::{BlendMode, Surface},
};

pub const EXPORT_JPEG_QUALITY: u8 = 95;

pub fn apply_filter(
    photo: &Photo,
    filter: &FilterDescriptor,
    assets: &mut dyn AssetStore,
) -> BoothResult<Photo> {
    if photo.is_processed() {
        debug!(filter = %filter.id, "photo already processed, skipping");
        return Ok(photo.clone());
    }

    // Decode failure is fatal for this photo; the caller offers a retake.
    let source = photo.decode()?;
    let (w, h) = source.dimensions();
    let source = Arc::new(source);
    let full = RectPx::new(0, 0, w, h);

    let mut op_list = vec![DrawOp::blit(Arc::clone(&source), full)];

    let effect_ops = filter.ops()?;
    if !effect_ops.is_empty() {
        let transform = effect::fold_ops(&effect_ops);
        let mut filtered = (*source).clone();
        effect::apply_transform(&mut filtered, &transform);
        op_list.push(DrawOp::Blit {
            image: Arc::new(filtered),
            dest: full,
            blend: BlendMode::SourceAtop,
            opacity: 1.0,
            mirror: false,
            corner_radius_px: 0.0,
        });
    }

    if let Some(tex) = &filter.texture {
        match assets.load_image(&tex.path) {
            Ok(texture) => op_list.push(DrawOp::Blit {
                image: texture,
                dest: full,
                blend: BlendMode::Overlay,
                opacity: tex.opacity,
                mirror: false,
                corner_radius_px: 0.0,
            }),
            // Recoverable: the filtered photo ships without its texture.
            Err(e) => warn!(
                filter = %filter.id,
                texture = %tex.path,
                error = %e,
                "texture load failed, continuing without it"
            ),
        }
    }

    let mut surface = Surface::transparent(w, h)?;
    ops::execute(&mut surface, &op_list)?;
    encode_jpeg(&surface)
}

fn encode_jpeg(surface: &Surface) -> BoothResult<Photo> {
    let img = image::RgbaImage::from_raw(
        surface.width(),
        surface.height(),
        surface.data().to_vec(),
    )
    .ok_or_else(|| BoothError::decode("surface buffer has inconsistent dimensions"))?;
    let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();

    let mut buf = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, EXPORT_JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| BoothError::decode(format!("jpeg encode failed: {e}")))?;
    Ok(Photo::processed_jpeg(buf))
}
