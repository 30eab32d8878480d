//! Linear undo/redo history over sticker mutations.
//!
//! The log is append-only with a cursor; recording a new action after one or
//! more undos discards the redo tail. Actions reference stickers by their
//! stable [`StickerId`](crate::stickers::StickerId), so undoing a remove
//! while unrelated adds changed the list length is well defined. Drags are deliberately not recorded.

use crate::stickers::StickerPlacement;

#[derive(Clone, Debug, PartialEq)]
pub enum HistoryAction {
    /// One atomic sticker group: all placements appear and disappear
    /// together under undo/redo.
    Add { placements: Vec<StickerPlacement> },
    /// A single deletion; `index` remembers where the sticker sat so undo
    /// can re-insert it in place.
    Remove {
        placement: StickerPlacement,
        index: usize,
    },
}

#[derive(Debug, Default)]
pub struct History {
    actions: Vec<HistoryAction>,
    /// Number of actions currently applied; the cursor sits between
    /// `applied - 1` (last undoable) and `applied` (next redoable).
    applied: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new action, discarding anything previously undone.
    pub fn push(&mut self, action: HistoryAction) {
        self.actions.truncate(self.applied);
        self.actions.push(action);
        self.applied = self.actions.len();
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.actions.len()
    }

    /// Steps the cursor back, returning the action to reverse.
    pub fn undo(&mut self) -> Option<&HistoryAction> {
        if self.applied == 0 {
            return None;
        }
        self.applied -= 1;
        self.actions.get(self.applied)
    }

    /// Steps the cursor forward, returning the action to re-apply.
    pub fn redo(&mut self) -> Option<&HistoryAction> {
        if self.applied >= self.actions.len() {
            return None;
        }
        let action = self.actions.get(self.applied);
        self.applied += 1;
        action
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Index of the last applied action, or `None` when nothing is
    /// undoable (the booth UI's `historyIndex == -1` state).
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stickers::StickerId;

    fn placement(id: u64) -> StickerPlacement {
        StickerPlacement {
            id: StickerId(id),
            sticker: "heart".to_string(),
            x_percent: 50.0,
            y_percent: 50.0,
            scale: 1.0,
        }
    }

    fn add(ids: &[u64]) -> HistoryAction {
        HistoryAction::Add {
            placements: ids.iter().map(|&i| placement(i)).collect(),
        }
    }

    #[test]
    fn starts_with_nothing_to_undo_or_redo() {
        let h = History::new();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.cursor(), None);
    }

    #[test]
    fn undo_then_redo_walks_the_cursor() {
        let mut h = History::new();
        h.push(add(&[1, 2]));
        h.push(add(&[3]));
        assert_eq!(h.cursor(), Some(1));

        assert!(h.undo().is_some());
        assert_eq!(h.cursor(), Some(0));
        assert!(h.can_redo());

        assert!(h.redo().is_some());
        assert_eq!(h.cursor(), Some(1));
        assert!(!h.can_redo());
    }

    #[test]
    fn push_after_undo_truncates_redo_tail() {
        let mut h = History::new();
        h.push(add(&[1]));
        h.push(add(&[2]));
        h.undo();
        h.push(add(&[3]));
        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
        assert_eq!(h.cursor(), Some(1));
    }

    #[test]
    fn undo_past_the_start_is_a_noop() {
        let mut h = History::new();
        h.push(add(&[1]));
        assert!(h.undo().is_some());
        assert!(h.undo().is_none());
        assert_eq!(h.cursor(), None);
    }
}
