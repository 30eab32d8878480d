use photostrip::{
    apply_filter, compose, export, render_strip, FilterRegistry, MemoryAssetStore, Photo,
    SessionState, StickerCatalog, TemplateRegistry,
};

fn photo(rgba: [u8; 4]) -> Photo {
    let img = image::RgbaImage::from_pixel(24, 24, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    Photo::from_bytes(buf).unwrap()
}

fn processed_photos(assets: &mut MemoryAssetStore) -> Vec<Photo> {
    let reg = FilterRegistry::builtin();
    let filter = reg.get("vintage").unwrap();
    [
        [220, 40, 40, 255],
        [40, 220, 40, 255],
        [40, 40, 220, 255],
        [220, 220, 40, 255],
    ]
    .into_iter()
    .map(|c| apply_filter(&photo(c), filter, assets).unwrap())
    .collect()
}

#[test]
fn full_session_composes_and_exports_a_png() {
    let templates = TemplateRegistry::builtin();
    let filters = FilterRegistry::builtin();
    let catalog = StickerCatalog::builtin();
    let mut assets = MemoryAssetStore::new();
    assets.insert(
        "stickers/heart.png",
        image::RgbaImage::from_pixel(10, 10, image::Rgba([250, 60, 120, 255])),
    );

    let mut session = SessionState::new(
        templates.get("default").unwrap().clone(),
        filters.get("vintage").unwrap().clone(),
        42,
    );
    session.set_photos(processed_photos(&mut assets)).unwrap();
    session.add_sticker_group(&catalog, "heart").unwrap();

    let surface = render_strip(
        session.template(),
        session.photos(),
        session.stickers(),
        &catalog,
        &mut assets,
        200,
    )
    .unwrap();

    let png = export::encode_png(&surface).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (surface.width(), surface.height()));
}

#[test]
fn four_slot_template_renders_partial_photo_sets_in_order() {
    let templates = TemplateRegistry::builtin();
    let catalog = StickerCatalog::builtin();
    let mut assets = MemoryAssetStore::new();
    let all = processed_photos(&mut assets);

    for n in 0..=4 {
        let subset = &all[..n];
        let template = templates.get("grid4").unwrap();
        let surface =
            render_strip(template, subset, &[], &catalog, &mut assets, 120).unwrap();
        let slots = compose::slot_rects(template, 120, surface.height());

        for (i, slot) in slots.iter().enumerate() {
            let cx = (slot.x + i64::from(slot.width) / 2) as u32;
            let cy = (slot.y + i64::from(slot.height) / 2) as u32;
            let px = surface.pixel(cx, cy);
            if i < n {
                // Something other than the pink backdrop was drawn.
                assert_ne!(px, [0xFF, 0xF5, 0xF7, 0xFF], "slot {i} with {n} photos");
            } else {
                assert_eq!(px, [0xFF, 0xF5, 0xF7, 0xFF], "slot {i} with {n} photos");
            }
        }
    }
}

#[test]
fn identical_sessions_export_identical_bytes() {
    let templates = TemplateRegistry::builtin();
    let catalog = StickerCatalog::builtin();
    let mut assets = MemoryAssetStore::new();
    assets.insert(
        "stickers/star.png",
        image::RgbaImage::from_pixel(6, 6, image::Rgba([255, 230, 0, 255])),
    );
    let photos = processed_photos(&mut assets);

    let render = |assets: &mut MemoryAssetStore| {
        let filters = FilterRegistry::builtin();
        let mut s = SessionState::new(
            templates.get("grid4_star").unwrap().clone(),
            filters.get("normal").unwrap().clone(),
            9,
        );
        s.set_photos(photos.clone()).unwrap();
        s.add_sticker_group(&catalog, "star").unwrap();
        let surface = render_strip(
            s.template(),
            s.photos(),
            s.stickers(),
            &catalog,
            assets,
            150,
        )
        .unwrap();
        export::encode_png(&surface).unwrap()
    };

    assert_eq!(render(&mut assets), render(&mut assets));
}

#[test]
fn export_filename_matches_download_pattern() {
    let name = export::export_filename(chrono::NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    assert_eq!(name, "photostrip-2025-01-02.png");
}
