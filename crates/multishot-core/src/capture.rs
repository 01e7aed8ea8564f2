//! Composition snapshot deck.
//!
//! Accumulates up to [`MAX_COMPOSITIONS`] viewport snapshots until the
//! user confirms them. Confirming consumes the deck and hands the
//! ordered sequence to the caller.

use crate::types::{CompositionImage, MAX_COMPOSITIONS};

/// Errors from capture and confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// The deck already holds the maximum number of snapshots.
    #[error("at most {MAX_COMPOSITIONS} compositions can be captured")]
    DeckFull,

    /// Confirm was requested with no snapshots.
    #[error("capture at least one composition before confirming")]
    Empty,
}

/// Ordered, capped list of captured snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionDeck {
    images: Vec<CompositionImage>,
}

impl CompositionDeck {
    /// An empty deck.
    #[must_use]
    pub const fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns `true` if nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Whether another snapshot fits.
    #[must_use]
    pub fn can_capture(&self) -> bool {
        self.images.len() < MAX_COMPOSITIONS
    }

    /// Whether the deck can be confirmed.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        !self.images.is_empty()
    }

    /// Captured snapshots in capture order.
    #[must_use]
    pub fn images(&self) -> &[CompositionImage] {
        &self.images
    }

    /// Append a snapshot, returning the new count.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::DeckFull`] when the deck is at capacity;
    /// the deck is left unchanged.
    pub fn capture(&mut self, image: CompositionImage) -> Result<usize, CaptureError> {
        if !self.can_capture() {
            return Err(CaptureError::DeckFull);
        }
        self.images.push(image);
        Ok(self.images.len())
    }

    /// Hand the snapshots over in capture order.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Empty`] when nothing was captured.
    pub fn confirm(self) -> Result<Vec<CompositionImage>, CaptureError> {
        if self.images.is_empty() {
            return Err(CaptureError::Empty);
        }
        Ok(self.images)
    }

    /// Fixed-length display slots: captured images first, then empty
    /// placeholders.
    pub fn slots(&self) -> impl Iterator<Item = Option<&CompositionImage>> {
        (0..MAX_COMPOSITIONS).map(|i| self.images.get(i))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot(tag: u8) -> CompositionImage {
        CompositionImage::from_png(vec![tag])
    }

    #[test]
    fn capture_never_exceeds_cap() {
        let mut deck = CompositionDeck::new();
        for i in 0..10u8 {
            let _ = deck.capture(snapshot(i));
        }
        assert_eq!(deck.len(), MAX_COMPOSITIONS);
        assert!(!deck.can_capture());
    }

    #[test]
    fn capture_at_cap_is_rejected_and_leaves_deck_unchanged() {
        let mut deck = CompositionDeck::new();
        for i in 0..3u8 {
            assert_eq!(deck.capture(snapshot(i)).unwrap(), usize::from(i) + 1);
        }
        let before = deck.clone();
        assert_eq!(deck.capture(snapshot(9)), Err(CaptureError::DeckFull));
        assert_eq!(deck, before);
    }

    #[test]
    fn confirm_empty_is_rejected() {
        let deck = CompositionDeck::new();
        assert!(!deck.can_confirm());
        assert_eq!(deck.confirm(), Err(CaptureError::Empty));
    }

    #[test]
    fn confirm_preserves_capture_order() {
        for n in 1..=3u8 {
            let mut deck = CompositionDeck::new();
            for i in 0..n {
                deck.capture(snapshot(i)).unwrap();
            }
            let images = deck.confirm().unwrap();
            let tags: Vec<u8> = images.iter().map(|c| c.image().bytes()[0]).collect();
            assert_eq!(tags, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn slots_pad_with_placeholders() {
        let mut deck = CompositionDeck::new();
        deck.capture(snapshot(1)).unwrap();
        let slots: Vec<bool> = deck.slots().map(|s| s.is_some()).collect();
        assert_eq!(slots, [true, false, false]);
    }
}
