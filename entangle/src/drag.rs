//! Drag-to-reorder bookkeeping.

/// Tracks the single item currently lifted by a drag gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragTracker {
    lifted: Option<usize>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dragging the item at `index`.
    pub fn lift(&mut self, index: usize) {
        self.lifted = Some(index);
    }

    pub fn lifted(&self) -> Option<usize> {
        self.lifted
    }

    pub fn is_dragging(&self) -> bool {
        self.lifted.is_some()
    }

    /// Drop onto `target`. Returns the `(from, to)` move to perform, if any.
    ///
    /// The lifted marker is cleared whatever the outcome.
    pub fn drop_on(&mut self, target: usize) -> Option<(usize, usize)> {
        let from = self.lifted.take()?;
        (from != target).then_some((from, target))
    }

    /// Drag ended without a drop.
    pub fn end(&mut self) {
        self.lifted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_without_lift_is_noop() {
        let mut drag = DragTracker::new();
        assert_eq!(drag.drop_on(2), None);
    }

    #[test]
    fn test_drop_on_self_clears_marker() {
        let mut drag = DragTracker::new();
        drag.lift(1);
        assert_eq!(drag.drop_on(1), None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drop_yields_move_and_clears() {
        let mut drag = DragTracker::new();
        drag.lift(0);
        assert_eq!(drag.drop_on(2), Some((0, 2)));
        assert_eq!(drag.lifted(), None);
    }

    #[test]
    fn test_end_clears() {
        let mut drag = DragTracker::new();
        drag.lift(3);
        drag.end();
        assert_eq!(drag.drop_on(0), None);
    }
}
