//! Card registry and per-card state.
//!
//! The stream is a fixed, ordered sequence of cards built once at startup
//! and never resized.  Each card carries two faces: the front art (an image
//! from the cyclic pool) and a block of generated pseudo-code sized to the
//! card's character grid.  The scanner rewrites two clip percentages per
//! frame to decide how much of each face is visible; "new" content is only
//! ever simulated by rewriting the code face in place.

use std::path::{Path, PathBuf};

use pseudocode::CodeSource;
use tracing::warn;

// ════════════════════════════════════════════════════════════════════════════
// Geometry constants
// ════════════════════════════════════════════════════════════════════════════

pub const CARD_COUNT: usize = 12;
pub const CARD_W: f32 = 400.0;
pub const CARD_H: f32 = 250.0;
pub const CARD_GAP: f32 = 60.0;

/// Fixed character cell the code face is sized against.
pub const CHAR_CELL_W: usize = 6;
pub const LINE_CELL_H: usize = 10;

/// Columns and rows of the pseudo-code grid filling one card face.
pub fn code_grid() -> (usize, usize) {
    (CARD_W as usize / CHAR_CELL_W, CARD_H as usize / LINE_CELL_H)
}

// ════════════════════════════════════════════════════════════════════════════
// FrontArt — the image face
// ════════════════════════════════════════════════════════════════════════════

/// The front face of a card.
pub enum FrontArt {
    /// Prescaled ARGB pixels, `CARD_W × CARD_H`, row-major.
    Image(Vec<u32>),
    /// Flat tint used when the source image is missing or unreadable.
    Placeholder(u32),
}

/// Hue-wheel tint for cards with no usable image, distinct per slot.
pub fn placeholder_tint(index: usize) -> u32 {
    let hue = (index as f32 / CARD_COUNT as f32) * 360.0;
    hsv_to_argb(hue, 0.45, 0.38)
}

/// Convert HSV → packed ARGB (0xAARRGGBB, A=0xFF).
pub fn hsv_to_argb(h: f32, s: f32, v: f32) -> u32 {
    let h = h % 360.0;
    let hi = (h / 60.0) as u32;
    let f = h / 60.0 - hi as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match hi {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let ri = (r * 255.0) as u32;
    let gi = (g * 255.0) as u32;
    let bi = (b * 255.0) as u32;
    0xFF00_0000 | (ri << 16) | (gi << 8) | bi
}

fn load_front(path: &Path, index: usize) -> FrontArt {
    match image::open(path) {
        Ok(img) => {
            let scaled = img
                .resize_exact(
                    CARD_W as u32,
                    CARD_H as u32,
                    image::imageops::FilterType::Triangle,
                )
                .to_rgba8();
            let pixels = scaled
                .pixels()
                .map(|px| {
                    let [r, g, b, _] = px.0;
                    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
                })
                .collect();
            FrontArt::Image(pixels)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e,
                  "card image unreadable, degrading to placeholder");
            FrontArt::Placeholder(placeholder_tint(index))
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Card
// ════════════════════════════════════════════════════════════════════════════

/// One card in the stream.
pub struct Card {
    /// Index into the cyclic image pool this card's front came from.
    pub image_idx: usize,
    pub front: FrontArt,
    /// The generated code face, `code_grid()` columns × rows.
    pub alt_text: String,
    /// Percent of the card width, from its left edge, already scanned away
    /// from the front face.  0 = front fully visible.
    pub clip_front: f32,
    /// Percent of the card width up to which the code face is revealed.
    /// 100 = code fully visible.
    pub clip_alt: f32,
    /// Set while the card is crossing the scanner band; gates one-shot
    /// accents only, nothing durable.
    pub scanned: bool,
}

impl Card {
    pub fn new(image_idx: usize, front: FrontArt, alt_text: String) -> Self {
        Card {
            image_idx,
            front,
            alt_text,
            clip_front: 0.0,
            clip_alt: 0.0,
            scanned: false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CardLine — the ordered registry
// ════════════════════════════════════════════════════════════════════════════

/// The fixed card sequence in stream order.
pub struct CardLine {
    pub cards: Vec<Card>,
}

impl CardLine {
    /// Build the card sequence.  Front images cycle through `pool`; an empty
    /// pool or an unreadable file degrades that card to a placeholder tint,
    /// never an error.
    pub fn build(count: usize, pool: &[PathBuf], source: &mut CodeSource) -> Self {
        let (cols, rows) = code_grid();
        let cards = (0..count)
            .map(|i| {
                let (image_idx, front) = if pool.is_empty() {
                    (i, FrontArt::Placeholder(placeholder_tint(i)))
                } else {
                    let idx = i % pool.len();
                    (idx, load_front(&pool[idx], i))
                };
                Card::new(image_idx, front, source.fill(cols, rows))
            })
            .collect();
        CardLine { cards }
    }

    /// Total track width, cards plus trailing gaps.
    pub fn track_width(&self) -> f32 {
        self.cards.len() as f32 * (CARD_W + CARD_GAP)
    }

    /// Screen-space left edge of card `i` at the given track position.
    pub fn card_left(&self, i: usize, position: f32) -> f32 {
        position + i as f32 * (CARD_W + CARD_GAP)
    }

    /// One pass of the low-frequency content refresh: every card
    /// independently regrows its code face with probability `p`.
    pub fn refresh(&mut self, p: f64, source: &mut CodeSource, rng: &mut fastrand::Rng) {
        let (cols, rows) = code_grid();
        for card in &mut self.cards {
            if rng.f64() < p {
                card.alt_text = source.fill(cols, rows);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn make_line() -> CardLine {
        CardLine::build(CARD_COUNT, &[], &mut CodeSource::with_seed(1))
    }

    #[test]
    fn code_grid_matches_cell_metrics() {
        assert_eq!(code_grid(), (66, 25));
    }

    #[test]
    fn build_produces_fixed_count() {
        assert_eq!(make_line().cards.len(), CARD_COUNT);
    }

    #[test]
    fn alt_text_fills_the_grid() {
        let line = make_line();
        let (cols, rows) = code_grid();
        for card in &line.cards {
            let lines: Vec<&str> = card.alt_text.lines().collect();
            assert_eq!(lines.len(), rows);
            for l in lines {
                assert_eq!(l.chars().count(), cols);
            }
        }
    }

    #[test]
    fn image_pool_cycles() {
        // Nonexistent paths degrade to placeholders but the cycling index
        // must still wrap through the pool.
        let pool: Vec<PathBuf> = (0..5)
            .map(|i| PathBuf::from(format!("/nonexistent/img{i}.png")))
            .collect();
        let line = CardLine::build(12, &pool, &mut CodeSource::with_seed(2));
        for (i, card) in line.cards.iter().enumerate() {
            assert_eq!(card.image_idx, i % 5);
            assert!(matches!(card.front, FrontArt::Placeholder(_)));
        }
    }

    #[test]
    fn track_width_counts_gaps() {
        assert_eq!(make_line().track_width(), 12.0 * 460.0);
    }

    #[test]
    fn card_left_follows_position() {
        let line = make_line();
        assert_eq!(line.card_left(0, 400.0), 400.0);
        assert_eq!(line.card_left(3, -100.0), -100.0 + 3.0 * 460.0);
    }

    #[test]
    fn cards_start_unclipped() {
        for card in &make_line().cards {
            assert_eq!(card.clip_front, 0.0);
            assert_eq!(card.clip_alt, 0.0);
            assert!(!card.scanned);
        }
    }

    #[test]
    fn refresh_probability_zero_changes_nothing() {
        let mut line = make_line();
        let before: Vec<String> = line.cards.iter().map(|c| c.alt_text.clone()).collect();
        let mut source = CodeSource::with_seed(9);
        let mut rng = fastrand::Rng::with_seed(9);
        line.refresh(0.0, &mut source, &mut rng);
        let after: Vec<String> = line.cards.iter().map(|c| c.alt_text.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn refresh_probability_one_changes_everything() {
        let mut line = make_line();
        let before: Vec<String> = line.cards.iter().map(|c| c.alt_text.clone()).collect();
        let mut source = CodeSource::with_seed(9);
        let mut rng = fastrand::Rng::with_seed(9);
        line.refresh(1.0, &mut source, &mut rng);
        for (card, old) in line.cards.iter().zip(&before) {
            assert_ne!(&card.alt_text, old);
        }
    }

    #[test]
    fn placeholder_tints_are_opaque_and_distinct() {
        let a = placeholder_tint(0);
        let b = placeholder_tint(5);
        assert_eq!(a >> 24, 0xFF);
        assert_eq!(b >> 24, 0xFF);
        assert_ne!(a, b);
    }
}
