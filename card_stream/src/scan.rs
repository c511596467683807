//! Scanner-band intersection.
//!
//! The scanner is a thin stationary vertical band; the cards slide under
//! it.  Each update re-reads every card's current screen bounds and writes
//! two *independent* clip boundaries back: the front face clips away from
//! the left edge up to `clip_front`, the code face reveals from the left
//! edge up to `clip_alt`.  Two separate boundaries (rather than one shared
//! split) let the band physically "convert" one face into the other instead
//! of cross-fading.

use crate::cards::Card;

/// Geometric band width in pixels.  Deliberately narrower than the visual
/// glow the renderer draws; the two are configured independently.
pub const BAND_WIDTH: f32 = 4.0;

// ════════════════════════════════════════════════════════════════════════════
// ScannerBand
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug)]
pub struct ScannerBand {
    pub center_x: f32,
    pub band_width: f32,
}

impl ScannerBand {
    /// Band fixed at the horizontal centre of the container.
    pub fn centered_in(container_width: f32) -> Self {
        ScannerBand { center_x: container_width / 2.0, band_width: BAND_WIDTH }
    }

    pub fn left(&self) -> f32 {
        self.center_x - self.band_width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.center_x + self.band_width / 2.0
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CardBounds
// ════════════════════════════════════════════════════════════════════════════

/// Screen-space bounds of one card along the track axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardBounds {
    pub left: f32,
    pub right: f32,
}

impl CardBounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }
}

// ════════════════════════════════════════════════════════════════════════════
// update — the per-frame pass
// ════════════════════════════════════════════════════════════════════════════

/// Recompute clip boundaries for every card from current geometry.
///
/// `bounds(i)` returns the live screen box of card `i`, or `None` when the
/// card has no usable geometry this frame; such cards (and zero-width boxes)
/// are skipped untouched rather than failing the pass.  Pure in its inputs:
/// calling twice with unchanged geometry writes identical values.
pub fn update<F>(band: &ScannerBand, cards: &mut [Card], bounds: F)
where
    F: Fn(usize) -> Option<CardBounds>,
{
    let scanner_left = band.left();
    let scanner_right = band.right();

    for (i, card) in cards.iter_mut().enumerate() {
        let Some(b) = bounds(i) else { continue };
        let width = b.width();
        if width <= 0.0 {
            continue;
        }

        if b.left < scanner_right && b.right > scanner_left {
            // Crossing the band: both boundaries land inside the card.
            let intersect_left = (scanner_left - b.left).max(0.0);
            let intersect_right = (scanner_right - b.left).min(width);
            card.clip_front = intersect_left / width * 100.0;
            card.clip_alt = intersect_right / width * 100.0;
            // Edge-triggered: flips on the first frame the band bites into
            // the card interior.
            if !card.scanned && intersect_left > 0.0 {
                card.scanned = true;
            }
        } else if b.right < scanner_left {
            // Already scanned past: code face fully revealed.
            card.clip_front = 100.0;
            card.clip_alt = 100.0;
            card.scanned = false;
        } else {
            // Not reached yet: front face fully visible.
            card.clip_front = 0.0;
            card.clip_alt = 0.0;
            card.scanned = false;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
