//! Asset loading.
//!
//! All file IO for artwork (textures, template backgrounds, sticker images)
//! goes through the [`AssetStore`] trait so the pipeline and compositor stay
//! deterministic and testable. [`FsAssetStore`] loads from a root directory
//! and memoizes decoded images; [`MemoryAssetStore`] serves pre-registered
//! images and is what the tests use.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use image::RgbaImage;

use crate::error::{BoothError, BoothResult};

/// A decoded, ready-to-draw image.
pub type PreparedImage = Arc<RgbaImage>;

pub trait AssetStore {
    /// Loads and decodes the image at the store-relative `path`.
    fn load_image(&mut self, path: &str) -> BoothResult<PreparedImage>;
}

pub fn decode_rgba(bytes: &[u8]) -> BoothResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| BoothError::decode(format!("{e:#}")))?;
    Ok(dyn_img.to_rgba8())
}

pub struct FsAssetStore {
    root: PathBuf,
    cache: HashMap<String, PreparedImage>,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }
}

impl AssetStore for FsAssetStore {
    fn load_image(&mut self, path: &str) -> BoothResult<PreparedImage> {
        if let Some(img) = self.cache.get(path) {
            return Ok(Arc::clone(img));
        }
        let full = self.root.join(path);
        let bytes = std::fs::read(&full)
            .map_err(|e| BoothError::asset(format!("read '{}': {e}", full.display())))?;
        let img = Arc::new(
            decode_rgba(&bytes).map_err(|e| BoothError::asset(format!("decode '{path}': {e}")))?,
        );
        self.cache.insert(path.to_string(), Arc::clone(&img));
        Ok(img)
    }
}

#[derive(Default)]
pub struct MemoryAssetStore {
    images: HashMap<String, PreparedImage>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, image: RgbaImage) {
        self.images.insert(path.into(), Arc::new(image));
    }
}

impl AssetStore for MemoryAssetStore {
    fn load_image(&mut self, path: &str) -> BoothResult<PreparedImage> {
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| BoothError::asset(format!("no registered asset '{path}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rgba_roundtrips_png_dimensions() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([9, 8, 7, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        let decoded = decode_rgba(&buf).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
    }

    #[test]
    fn decode_rgba_rejects_garbage() {
        let err = decode_rgba(b"not an image").unwrap_err();
        assert!(matches!(err, BoothError::Decode(_)));
    }

    #[test]
    fn memory_store_serves_registered_and_rejects_unknown() {
        let mut store = MemoryAssetStore::new();
        store.insert(
            "a.png",
            RgbaImage::from_pixel(1, 1, image::Rgba([1, 1, 1, 255])),
        );
        assert!(store.load_image("a.png").is_ok());
        assert!(matches!(
            store.load_image("b.png").unwrap_err(),
            BoothError::Asset(_)
        ));
    }
}
