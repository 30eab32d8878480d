use photostrip::{apply_filter, FilterRegistry, MemoryAssetStore, Photo};

fn photo(rgba: [u8; 4], w: u32, h: u32) -> Photo {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    Photo::from_bytes(buf).unwrap()
}

#[test]
fn processing_is_idempotent_for_every_builtin_filter() {
    let reg = FilterRegistry::builtin();
    let mut assets = MemoryAssetStore::new();
    assets.insert(
        "textures/paper_texture.jpg",
        image::RgbaImage::from_pixel(16, 16, image::Rgba([180, 170, 150, 255])),
    );

    let src = photo([170, 80, 60, 255], 16, 16);
    for filter in reg.iter() {
        let once = apply_filter(&src, filter, &mut assets).unwrap();
        let twice = apply_filter(&once, filter, &mut assets).unwrap();
        assert_eq!(
            once.bytes(),
            twice.bytes(),
            "filter '{}' re-applied",
            filter.id
        );
    }
}

#[test]
fn bw_filter_on_solid_red_yields_solid_gray() {
    let reg = FilterRegistry::builtin();
    let mut assets = MemoryAssetStore::new();
    let out = apply_filter(&photo([255, 0, 0, 255], 12, 12), reg.get("bw").unwrap(), &mut assets)
        .unwrap();

    let decoded = out.decode().unwrap();
    for (_, _, px) in decoded.enumerate_pixels() {
        let [r, g, b, _] = px.0;
        // All channels equal within luminance-conversion + JPEG tolerance.
        assert!((i16::from(r) - i16::from(g)).abs() <= 4);
        assert!((i16::from(g) - i16::from(b)).abs() <= 4);
        assert!((i16::from(r) - 54).abs() <= 8);
    }
}

#[test]
fn normal_filter_output_keeps_dimensions_and_marks_processed() {
    let reg = FilterRegistry::builtin();
    let mut assets = MemoryAssetStore::new();
    let out = apply_filter(
        &photo([10, 200, 30, 255], 20, 10),
        reg.get("normal").unwrap(),
        &mut assets,
    )
    .unwrap();
    assert!(out.is_processed());
    assert_eq!(out.decode().unwrap().dimensions(), (20, 10));
    assert!(out.to_data_uri().starts_with("data:image/jpeg;base64,"));
}

#[test]
fn textured_filter_survives_a_missing_texture() {
    let reg = FilterRegistry::builtin();
    // No texture registered in the store.
    let mut assets = MemoryAssetStore::new();
    let out = apply_filter(
        &photo([120, 120, 120, 255], 8, 8),
        reg.get("paperTexture").unwrap(),
        &mut assets,
    )
    .unwrap();
    assert!(out.is_processed());
}
