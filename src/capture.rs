//! The acquisition contract.
//!
//! Device and file IO live outside the core; what the core owns is the slot
//! bookkeeping: exactly four ordered photos, filled strictly in sequence,
//! with retakes targeting a single slot and a full reset when the user
//! switches acquisition mode. Countdown pacing constants mirror the booth's
//! capture flow (3s before the first shot, 2s between shots).

use crate::{
    error::{BoothError, BoothResult},
    photo::Photo,
};

pub const PHOTO_COUNT: usize = 4;

pub const FIRST_SHOT_COUNTDOWN_SECS: u32 = 3;
pub const BETWEEN_SHOTS_COUNTDOWN_SECS: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcquisitionMode {
    Camera,
    Upload,
}

#[derive(Debug)]
pub struct CaptureSession {
    mode: AcquisitionMode,
    slots: [Option<Photo>; PHOTO_COUNT],
}

impl CaptureSession {
    pub fn new(mode: AcquisitionMode) -> Self {
        Self {
            mode,
            slots: Default::default(),
        }
    }

    pub fn mode(&self) -> AcquisitionMode {
        self.mode
    }

    /// Switching mode abandons any capture in progress; no partial state
    /// survives.
    pub fn switch_mode(&mut self, mode: AcquisitionMode) {
        if mode != self.mode {
            self.mode = mode;
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.slots = Default::default();
    }

    /// The next slot a sequential capture should fill, if any. Slot N+1 is
    /// never offered before slot N is stored.
    pub fn next_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Stores a captured photo. `index` must be the next empty slot or an
    /// already-filled slot being retaken.
    pub fn store(&mut self, index: usize, photo: Photo) -> BoothResult<()> {
        if index >= PHOTO_COUNT {
            return Err(BoothError::validation(format!(
                "photo slot index {index} out of range"
            )));
        }
        let retake = self.slots[index].is_some();
        if !retake && self.next_empty() != Some(index) {
            return Err(BoothError::validation(format!(
                "capture is sequential; slot {index} is not the next empty slot"
            )));
        }
        self.slots[index] = Some(photo);
        Ok(())
    }

    /// Appends an uploaded photo to the next free slot; at most four.
    pub fn push_upload(&mut self, photo: Photo) -> BoothResult<usize> {
        let index = self
            .next_empty()
            .ok_or_else(|| BoothError::validation("all four photo slots are already filled"))?;
        self.slots[index] = Some(photo);
        Ok(index)
    }

    /// Removes an uploaded photo and shifts later ones down, keeping the
    /// slot list densely filled from the front.
    pub fn remove(&mut self, index: usize) -> BoothResult<()> {
        if index >= PHOTO_COUNT || self.slots[index].is_none() {
            return Err(BoothError::validation(format!(
                "no photo in slot {index} to remove"
            )));
        }
        for i in index..PHOTO_COUNT - 1 {
            self.slots[i] = self.slots[i + 1].take();
        }
        self.slots[PHOTO_COUNT - 1] = None;
        Ok(())
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.filled_count() == PHOTO_COUNT
    }

    pub fn slots(&self) -> &[Option<Photo>; PHOTO_COUNT] {
        &self.slots
    }

    /// Hard precondition for composition: all four photos present.
    pub fn into_photos(self) -> BoothResult<Vec<Photo>> {
        let filled = self.filled_count();
        if filled != PHOTO_COUNT {
            return Err(BoothError::validation(format!(
                "composition needs {PHOTO_COUNT} photos, have {filled}"
            )));
        }
        Ok(self.slots.into_iter().flatten().collect())
    }
}
