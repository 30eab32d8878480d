use photostrip::{
    stickers::StickerKind, FilterRegistry, SessionState, StickerCatalog, TemplateRegistry,
};

fn session(seed: u64) -> SessionState {
    let template = TemplateRegistry::builtin().get("default").unwrap().clone();
    let filter = FilterRegistry::builtin().get("normal").unwrap().clone();
    SessionState::new(template, filter, seed)
}

fn catalog() -> StickerCatalog {
    StickerCatalog::builtin()
}

#[test]
fn undo_redo_roundtrip_holds_across_interleavings() {
    let catalog = catalog();
    let kinds = ["heart", "star", "crown", "balloon"];

    for seed in 0..20u64 {
        let mut s = session(seed);
        // Build up an arbitrary action sequence from the seed.
        for step in 0..6 {
            let kind = kinds[((seed + step) % kinds.len() as u64) as usize];
            s.add_sticker_group(&catalog, kind).unwrap();
            if step % 2 == 1 && !s.stickers().is_empty() {
                let idx = ((seed + step) % s.stickers().len() as u64) as usize;
                let id = s.stickers()[idx].id;
                s.delete_sticker(id).unwrap();
            }
        }

        while s.can_undo() {
            let before: Vec<_> = s.stickers().to_vec();
            s.undo();
            s.redo();
            assert_eq!(s.stickers(), &before[..], "seed {seed}");
            s.undo();
        }
    }
}

#[test]
fn full_undo_reaches_the_empty_list_and_full_redo_restores() {
    let catalog = catalog();
    let mut s = session(3);
    s.add_sticker_group(&catalog, "heart").unwrap();
    s.add_sticker_group(&catalog, "star").unwrap();
    let final_state: Vec<_> = s.stickers().to_vec();

    while s.can_undo() {
        s.undo();
    }
    assert!(s.stickers().is_empty());

    while s.can_redo() {
        s.redo();
    }
    assert_eq!(s.stickers(), &final_state[..]);
}

#[test]
fn mutation_after_undo_discards_the_redo_branch() {
    let catalog = catalog();
    let mut s = session(11);
    s.add_sticker_group(&catalog, "heart").unwrap();
    s.add_sticker_group(&catalog, "star").unwrap();
    s.undo();
    let len_before = s.history().len();
    assert!(s.can_redo());

    s.add_sticker_group(&catalog, "crown").unwrap();
    assert!(!s.can_redo());
    assert_eq!(s.history().len(), len_before);

    // redo after truncation is a no-op
    let state: Vec<_> = s.stickers().to_vec();
    s.redo();
    assert_eq!(s.stickers(), &state[..]);
}

#[test]
fn booth_scenario_add_three_delete_undo_undo() {
    // Fixed-size catalog so "heart adds 3" is deterministic.
    let catalog = StickerCatalog::from_kinds(vec![StickerKind {
        id: "heart".to_string(),
        name: "Heart".to_string(),
        asset_path: "stickers/heart.png".to_string(),
        group_min: 3,
        group_max: 3,
    }])
    .unwrap();

    let mut s = session(0);
    s.add_sticker_group(&catalog, "heart").unwrap();
    let second = s.stickers()[1].clone();
    s.delete_sticker(second.id).unwrap();

    assert_eq!(s.stickers().len(), 2);
    assert_eq!(s.history().len(), 2);
    assert_eq!(s.history().cursor(), Some(1));

    s.undo();
    assert_eq!(s.stickers().len(), 3);
    assert_eq!(s.stickers()[1], second);
    assert_eq!(s.history().cursor(), Some(0));

    s.undo();
    assert_eq!(s.stickers().len(), 0);
    assert_eq!(s.history().cursor(), None);
    assert!(!s.can_undo());
}
