//! Straight-alpha RGBA8 pixel surface and per-pixel blending.
//!
//! Pixel convention: straight (non-premultiplied) RGBA8, matching what the
//! `image` crate decodes and encodes. Blending happens in normalized f32.

use crate::error::{BoothError, BoothResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Standard alpha compositing.
    SourceOver,
    /// Source replaces color only where the destination already has alpha;
    /// destination alpha is preserved.
    SourceAtop,
    /// Per-channel overlay blend, composited source-over.
    Overlay,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32, fill: [u8; 4]) -> BoothResult<Self> {
        if width == 0 || height == 0 {
            return Err(BoothError::validation("surface dimensions must be > 0"));
        }
        let px = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(px * 4);
        for _ in 0..px {
            data.extend_from_slice(&fill);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn transparent(width: u32, height: u32) -> BoothResult<Self> {
        Self::new(width, height, [0, 0, 0, 0])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Blends `src` into the pixel at (x, y). Out-of-bounds coordinates are
    /// ignored so callers can draw partially off-surface content.
    pub fn blend_pixel(&mut self, x: u32, y: u32, src: [u8; 4], mode: BlendMode, opacity: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        let dst = [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]];
        let out = blend(dst, src, mode, opacity);
        self.data[i..i + 4].copy_from_slice(&out);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

/// Blends one source pixel over one destination pixel.
pub fn blend(dst: [u8; 4], src: [u8; 4], mode: BlendMode, opacity: f32) -> [u8; 4] {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let sa = norm(src[3]) * opacity;
    let da = norm(dst[3]);
    let sc = [norm(src[0]), norm(src[1]), norm(src[2])];
    let dc = [norm(dst[0]), norm(dst[1]), norm(dst[2])];

    match mode {
        BlendMode::SourceOver => {
            let oa = sa + da * (1.0 - sa);
            if oa <= 0.0 {
                return [0, 0, 0, 0];
            }
            let mut out = [0u8; 4];
            for i in 0..3 {
                out[i] = denorm((sc[i] * sa + dc[i] * da * (1.0 - sa)) / oa);
            }
            out[3] = denorm(oa);
            out
        }
        BlendMode::SourceAtop => {
            if da <= 0.0 {
                return dst;
            }
            let mut out = [0u8; 4];
            for i in 0..3 {
                out[i] = denorm(sc[i] * sa + dc[i] * (1.0 - sa));
            }
            out[3] = dst[3];
            out
        }
        BlendMode::Overlay => {
            // Blend the channels first, then composite source-over. Where the
            // destination is transparent the source shows through unblended.
            let mut mixed = [0u8; 4];
            for i in 0..3 {
                let b = if dc[i] <= 0.5 {
                    2.0 * dc[i] * sc[i]
                } else {
                    1.0 - 2.0 * (1.0 - dc[i]) * (1.0 - sc[i])
                };
                mixed[i] = denorm((1.0 - da) * sc[i] + da * b);
            }
            mixed[3] = src[3];
            blend(dst, mixed, BlendMode::SourceOver, opacity)
        }
    }
}

fn norm(v: u8) -> f32 {
    f32::from(v) / 255.0
}

fn denorm(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_opacity_0_is_noop() {
        let dst = [1, 2, 3, 4];
        let src = [200, 200, 200, 200];
        assert_eq!(blend(dst, src, BlendMode::SourceOver, 0.0), dst);
    }

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        let src = [255, 255, 255, 0];
        assert_eq!(blend(dst, src, BlendMode::SourceOver, 1.0), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(blend(dst, src, BlendMode::SourceOver, 1.0), src);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let dst = [0, 0, 0, 0];
        let src = [100, 110, 120, 255];
        assert_eq!(blend(dst, src, BlendMode::SourceOver, 1.0), src);
    }

    #[test]
    fn atop_preserves_dst_alpha_and_skips_transparent_dst() {
        let dst = [10, 20, 30, 0];
        let src = [255, 255, 255, 255];
        assert_eq!(blend(dst, src, BlendMode::SourceAtop, 1.0), dst);

        let dst = [10, 20, 30, 128];
        let out = blend(dst, src, BlendMode::SourceAtop, 1.0);
        assert_eq!(out[3], 128);
        assert_eq!(&out[..3], &[255, 255, 255]);
    }

    #[test]
    fn overlay_darkens_dark_and_lightens_light() {
        // Mid-gray source over dark destination stays dark-ish; over light
        // destination stays light-ish.
        let src = [128, 128, 128, 255];
        let dark = blend([40, 40, 40, 255], src, BlendMode::Overlay, 1.0);
        let light = blend([220, 220, 220, 255], src, BlendMode::Overlay, 1.0);
        assert!(dark[0] < 128);
        assert!(light[0] > 128);
    }

    #[test]
    fn blend_pixel_ignores_out_of_bounds() {
        let mut s = Surface::new(2, 2, [0, 0, 0, 255]).unwrap();
        s.blend_pixel(5, 5, [255, 0, 0, 255], BlendMode::SourceOver, 1.0);
        assert_eq!(s.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(Surface::new(0, 4, [0; 4]).is_err());
    }
}
