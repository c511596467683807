//! # pseudocode
//!
//! Generates blocks of code-*looking* filler text, cut to an exact character
//! grid.  The output is meant to be glanced at, not read: a fixed vocabulary
//! of plausible snippet fragments is shuffled into one long token stream and
//! sliced into `height` lines of exactly `width` characters each.
//!
//! ## Quick start
//!
//! ```rust
//! use pseudocode::CodeSource;
//!
//! let mut source = CodeSource::with_seed(42);
//! let block = source.fill(66, 25);
//!
//! assert_eq!(block.lines().count(), 25);
//! assert!(block.lines().all(|l| l.chars().count() == 66));
//! ```
//!
//! Randomness is injected through the seedable [`CodeSource`]: production
//! callers seed from entropy and get fresh text every call, tests pin a seed
//! and get byte-identical output.

// ════════════════════════════════════════════════════════════════════════════
// Vocabulary
// ════════════════════════════════════════════════════════════════════════════

/// Fixed library of snippet fragments the stream is assembled from.
/// All entries are ASCII; the slicer relies on that.
const VOCABULARY: &[&str] = &[
    "const SCAN_WIDTH = 8;",
    "const FADE_ZONE = 35;",
    "const MAX_PARTICLES = 2500;",
    "fn clamp(n, a, b) { max(a, min(b, n)) }",
    "fn lerp(a, b, t) { a + (b - a) * t }",
    "let now = || clock.elapsed();",
    "struct Particle { x: f32, y: f32 }",
    "let scanner = Scanner { x: width / 2, width: 8 };",
    "ctx.set_blend_mode(Blend::Lighter);",
    "if state.intensity > 1 { scanner.glow += 0.01; }",
];

/// Extra synthetic assignments appended to the vocabulary per fill,
/// one per index 0..30.
const SYNTH_LINES: usize = 30;

// ════════════════════════════════════════════════════════════════════════════
// CodeSource
// ════════════════════════════════════════════════════════════════════════════

/// A reusable generator of grid-shaped filler code.
///
/// Holds its own [`fastrand::Rng`] so the same source can be milked
/// repeatedly; two sources built with the same seed produce the same
/// sequence of blocks.
#[derive(Debug)]
pub struct CodeSource {
    rng: fastrand::Rng,
}

impl CodeSource {
    /// Entropy-seeded source (production default).
    pub fn new() -> Self {
        CodeSource { rng: fastrand::Rng::new() }
    }

    /// Deterministic source for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        CodeSource { rng: fastrand::Rng::with_seed(seed) }
    }

    /// Produce one block of `height` lines, each exactly `width` characters.
    ///
    /// The token stream is the vocabulary joined with spaces, padded out with
    /// randomly re-drawn vocabulary entries until it is longer than
    /// `width * height + width`, then sliced row by row.  Short tail rows are
    /// space-padded (belt and braces; the overshoot above makes them rare).
    pub fn fill(&mut self, width: usize, height: usize) -> String {
        if width == 0 || height == 0 {
            return String::new();
        }

        let mut phrases: Vec<String> =
            VOCABULARY.iter().map(|s| (*s).to_string()).collect();
        for i in 0..SYNTH_LINES {
            phrases.push(format!("let v{} = random() * {};", i, self.rng.u32(10..100)));
        }

        let mut flow = phrases.join(" ");
        let target = width * height + width;
        while flow.len() <= target {
            flow.push(' ');
            flow.push_str(&phrases[self.rng.usize(0..phrases.len())]);
        }

        let mut out = String::with_capacity(height * (width + 1));
        for row in 0..height {
            let start = row * width;
            let end = (start + width).min(flow.len());
            let mut line = flow[start..end].to_string();
            if line.len() < width {
                line.push_str(&" ".repeat(width - line.len()));
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl Default for CodeSource {
    fn default() -> Self {
        CodeSource::new()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_is_ascii() {
        for entry in VOCABULARY {
            assert!(entry.is_ascii(), "non-ASCII entry would break slicing: {entry}");
        }
    }

    #[test]
    fn fill_shape_40x20() {
        let block = CodeSource::with_seed(1).fill(40, 20);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 20);
        for line in lines {
            assert_eq!(line.chars().count(), 40);
        }
    }

    #[test]
    fn fill_shape_odd_sizes() {
        let block = CodeSource::with_seed(2).fill(7, 3);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            assert_eq!(line.chars().count(), 7);
        }
    }

    #[test]
    fn fill_empty_grid() {
        assert_eq!(CodeSource::with_seed(3).fill(0, 10), "");
        assert_eq!(CodeSource::with_seed(3).fill(10, 0), "");
    }

    #[test]
    fn same_seed_same_block() {
        let a = CodeSource::with_seed(99).fill(66, 25);
        let b = CodeSource::with_seed(99).fill(66, 25);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = CodeSource::with_seed(1).fill(66, 25);
        let b = CodeSource::with_seed(2).fill(66, 25);
        assert_ne!(a, b);
    }

    #[test]
    fn successive_blocks_differ() {
        let mut source = CodeSource::with_seed(7);
        let a = source.fill(66, 25);
        let b = source.fill(66, 25);
        assert_ne!(a, b);
    }
}
