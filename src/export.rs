//! PNG export of a composed strip.

use chrono::NaiveDate;

use crate::{
    error::{BoothError, BoothResult},
    surface::Surface,
};

pub const EXPORT_FILE_PREFIX: &str = "photostrip";

/// Encodes the surface as PNG. Failure produces no partial output.
pub fn encode_png(surface: &Surface) -> BoothResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(
        surface.width(),
        surface.height(),
        surface.data().to_vec(),
    )
    .ok_or_else(|| BoothError::export("surface buffer has inconsistent dimensions"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| BoothError::export(format!("png encode failed: {e}")))?;
    Ok(buf)
}

/// The date-stamped download name, e.g. `photostrip-2026-08-25.png`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}-{}.png", date.format("%Y-%m-%d"))
}

/// Filename for today, in local time.
pub fn export_filename_today() -> String {
    export_filename(chrono::Local::now().date_naive())
}
