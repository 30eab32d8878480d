//! The editing session.
//!
//! [`SessionState`] is the single owner of everything the result screen can
//! mutate: the four processed photos, the chosen filter and template, the
//! sticker list, and the undo/redo history. There are no ambient globals;
//! the compositor and exporter borrow from here. Randomness (group sizes,
//! scatter positions, scales) flows from one session seed so a session
//! replays identically.

use tracing::debug;

use crate::{
    capture::PHOTO_COUNT,
    error::{BoothError, BoothResult},
    filters::FilterDescriptor,
    history::{History, HistoryAction},
    photo::Photo,
    stickers::{
        StickerCatalog, StickerId, StickerPlacement, MAX_STICKER_SCALE, MIN_STICKER_SCALE,
    },
    templates::TemplateDescriptor,
};

/// splitmix64; small, seedable, and good enough for scatter placement.
#[derive(Clone, Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn next_f32(&mut self) -> f32 {
        ((self.next_u64() >> 40) as f32) / ((1u64 << 24) as f32)
    }

    /// Uniform integer in [lo, hi], inclusive.
    fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        debug_assert!(lo <= hi);
        let span = u64::from(hi - lo) + 1;
        lo + (self.next_u64() % span) as u32
    }

    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }
}

/// Placement bounds in percent. The classic strip keeps stickers a little
/// away from the edge; positional templates allow the full box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PercentBounds {
    pub min: f32,
    pub max: f32,
}

impl PercentBounds {
    pub const FULL: Self = Self {
        min: 0.0,
        max: 100.0,
    };
    pub const INSET: Self = Self {
        min: 5.0,
        max: 95.0,
    };

    fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }
}

pub struct SessionState {
    template: TemplateDescriptor,
    filter: FilterDescriptor,
    photos: Vec<Photo>,
    stickers: Vec<StickerPlacement>,
    history: History,
    seed: u64,
    rng: SplitMix64,
    next_id: u64,
}

impl SessionState {
    pub fn new(template: TemplateDescriptor, filter: FilterDescriptor, seed: u64) -> Self {
        Self {
            template,
            filter,
            photos: Vec::new(),
            stickers: Vec::new(),
            history: History::new(),
            seed,
            rng: SplitMix64::new(seed),
            next_id: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn template(&self) -> &TemplateDescriptor {
        &self.template
    }

    pub fn filter(&self) -> &FilterDescriptor {
        &self.filter
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn stickers(&self) -> &[StickerPlacement] {
        &self.stickers
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn bounds(&self) -> PercentBounds {
        if self.template.is_default() {
            PercentBounds::INSET
        } else {
            PercentBounds::FULL
        }
    }

    /// Installs the processed photos; composition requires exactly four.
    pub fn set_photos(&mut self, photos: Vec<Photo>) -> BoothResult<()> {
        if photos.len() != PHOTO_COUNT {
            return Err(BoothError::validation(format!(
                "a session needs exactly {PHOTO_COUNT} photos, got {}",
                photos.len()
            )));
        }
        self.photos = photos;
        Ok(())
    }

    /// Drops a pseudo-random group of `kind` stickers onto the strip and
    /// records it as one atomic history action.
    ///
    /// Group size comes from the kind's registered range. Three or more
    /// copies are spread over distinct cells of a 3x3 zone grid so they do
    /// not pile up; one or two copies land fully at random.
    pub fn add_sticker_group(
        &mut self,
        catalog: &StickerCatalog,
        kind_id: &str,
    ) -> BoothResult<&[StickerPlacement]> {
        let kind = catalog.get(kind_id)?;
        let n = self.rng.range_u32(kind.group_min, kind.group_max) as usize;
        let bounds = self.bounds();

        let mut placements = Vec::with_capacity(n);
        if n <= 2 {
            for _ in 0..n {
                let x = self.rng.range_f32(bounds.min, bounds.max);
                let y = self.rng.range_f32(bounds.min, bounds.max);
                placements.push(self.place(kind_id, x, y));
            }
        } else {
            let zones = self.pick_zones(n.min(9));
            for zone in zones {
                let (x, y) = self.point_in_zone(zone, bounds);
                placements.push(self.place(kind_id, x, y));
            }
            // The grid has nine cells; any surplus lands fully at random so
            // the group count always matches the registered range.
            for _ in 9..n {
                let x = self.rng.range_f32(bounds.min, bounds.max);
                let y = self.rng.range_f32(bounds.min, bounds.max);
                placements.push(self.place(kind_id, x, y));
            }
        }

        debug!(sticker = kind_id, count = placements.len(), "sticker group added");
        let start = self.stickers.len();
        self.stickers.extend(placements.iter().cloned());
        self.history.push(HistoryAction::Add { placements });
        Ok(&self.stickers[start..])
    }

    fn place(&mut self, kind_id: &str, x: f32, y: f32) -> StickerPlacement {
        let id = StickerId(self.next_id);
        self.next_id += 1;
        StickerPlacement {
            id,
            sticker: kind_id.to_string(),
            x_percent: x,
            y_percent: y,
            scale: self.rng.range_f32(MIN_STICKER_SCALE, MAX_STICKER_SCALE),
        }
    }

    /// Distinct zone indices from the 3x3 grid, partial Fisher-Yates.
    fn pick_zones(&mut self, n: usize) -> Vec<u32> {
        let mut zones: Vec<u32> = (0..9).collect();
        for i in 0..n {
            let j = i + self.rng.range_u32(0, (zones.len() - 1 - i) as u32) as usize;
            zones.swap(i, j);
        }
        zones.truncate(n);
        zones
    }

    fn point_in_zone(&mut self, zone: u32, bounds: PercentBounds) -> (f32, f32) {
        let cell = (bounds.max - bounds.min) / 3.0;
        let col = f32::from((zone % 3) as u8);
        let row = f32::from((zone / 3) as u8);
        let x = bounds.min + col * cell + self.rng.range_f32(0.0, cell);
        let y = bounds.min + row * cell + self.rng.range_f32(0.0, cell);
        (bounds.clamp(x), bounds.clamp(y))
    }

    /// Deletes one sticker by its stable id.
    pub fn delete_sticker(&mut self, id: StickerId) -> BoothResult<()> {
        let index = self
            .stickers
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| BoothError::validation(format!("no sticker with id {}", id.0)))?;
        let placement = self.stickers.remove(index);
        self.history.push(HistoryAction::Remove { placement, index });
        Ok(())
    }

    /// Moves a sticker by a percent delta, clamped to the template's
    /// bounds. Drag frames are not history entries.
    pub fn drag_sticker(&mut self, id: StickerId, dx_percent: f32, dy_percent: f32) -> BoothResult<()> {
        let bounds = self.bounds();
        let placement = self
            .stickers
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| BoothError::validation(format!("no sticker with id {}", id.0)))?;
        placement.x_percent = bounds.clamp(placement.x_percent + dx_percent);
        placement.y_percent = bounds.clamp(placement.y_percent + dy_percent);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) {
        let Some(action) = self.history.undo().cloned() else {
            return;
        };
        match action {
            HistoryAction::Add { placements } => {
                let ids: Vec<StickerId> = placements.iter().map(|p| p.id).collect();
                self.stickers.retain(|p| !ids.contains(&p.id));
            }
            HistoryAction::Remove { placement, index } => {
                let at = index.min(self.stickers.len());
                self.stickers.insert(at, placement);
            }
        }
    }

    pub fn redo(&mut self) {
        let Some(action) = self.history.redo().cloned() else {
            return;
        };
        match action {
            HistoryAction::Add { placements } => {
                self.stickers.extend(placements);
            }
            HistoryAction::Remove { placement, .. } => {
                self.stickers.retain(|p| p.id != placement.id);
            }
        }
    }
}

/// Serializable snapshot of the editable parts of a session, the document
/// the CLI reads and writes.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SessionDocument {
    pub template: String,
    pub filter: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub stickers: Vec<StickerPlacement>,
}

impl SessionState {
    pub fn document(&self) -> SessionDocument {
        SessionDocument {
            template: self.template.id.clone(),
            filter: self.filter.id.clone(),
            seed: self.seed,
            stickers: self.stickers.clone(),
        }
    }

    /// Rebuilds a session from a document. Sticker ids are re-based so new
    /// placements never collide with restored ones.
    pub fn from_document(
        doc: &SessionDocument,
        template: TemplateDescriptor,
        filter: FilterDescriptor,
    ) -> BoothResult<Self> {
        let mut state = Self::new(template, filter, doc.seed);
        let bounds = state.bounds();
        for p in &doc.stickers {
            if !(0.0..=100.0).contains(&p.x_percent) || !(0.0..=100.0).contains(&p.y_percent) {
                return Err(BoothError::validation(format!(
                    "sticker {} position out of range",
                    p.id.0
                )));
            }
            let mut restored = p.clone();
            restored.x_percent = bounds.clamp(restored.x_percent);
            restored.y_percent = bounds.clamp(restored.y_percent);
            state.next_id = state.next_id.max(p.id.0 + 1);
            state.stickers.push(restored);
        }
        Ok(state)
    }
}
