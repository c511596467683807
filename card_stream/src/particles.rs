//! Drifting particle backdrop.
//!
//! A fixed field of soft sprites drifting left-to-right behind the card
//! stream.  The field is fully independent of the motion and scanner
//! engines: it shares nothing but the viewport it is drawn into.  Drift is
//! a constant per-frame increment on purpose; the layer is cosmetic and
//! frame-rate-coupled, not wall-clock-normalised.

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

pub const PARTICLE_COUNT: usize = 400;
pub const DRIFT_PER_FRAME: f32 = 0.5;
/// Off-screen slack on both sides before a sprite wraps.
pub const WRAP_MARGIN: f32 = 100.0;
/// Vertical extent of the field, centred on the card row.
pub const BAND_HEIGHT: f32 = 250.0;

// ════════════════════════════════════════════════════════════════════════════
// Particle / ParticleField
// ════════════════════════════════════════════════════════════════════════════

/// One sprite.  Coordinates are viewport-centred: x = 0 is the middle of
/// the window.  All sprites share one uniform tint, applied at draw time.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

pub struct ParticleField {
    pub particles: Vec<Particle>,
    half_width: f32,
}

impl ParticleField {
    /// Populate the field.  Sprites spawn across twice the viewport width so
    /// the first wraps are staggered instead of arriving in a wave.
    pub fn new(viewport_width: f32, rng: &mut fastrand::Rng) -> Self {
        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                x: (rng.f32() - 0.5) * viewport_width * 2.0,
                y: (rng.f32() - 0.5) * BAND_HEIGHT,
                size: rng.f32() * 8.0 + 2.0,
            })
            .collect();
        ParticleField { particles, half_width: viewport_width / 2.0 }
    }

    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    /// Advance one frame: constant drift, wrap past the right margin back
    /// to the left one.
    pub fn tick(&mut self) {
        let bound = self.half_width + WRAP_MARGIN;
        for p in &mut self.particles {
            p.x += DRIFT_PER_FRAME;
            if p.x > bound {
                p.x = -bound;
            }
        }
    }

    /// Window resized: only the wrap bound moves, positions stand.
    pub fn resize(&mut self, viewport_width: f32) {
        self.half_width = viewport_width / 2.0;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn make_field() -> ParticleField {
        ParticleField::new(1280.0, &mut fastrand::Rng::with_seed(5))
    }

    #[test]
    fn field_has_fixed_count() {
        assert_eq!(make_field().particles.len(), PARTICLE_COUNT);
    }

    #[test]
    fn sprites_drift_right_by_half_pixel() {
        let mut field = make_field();
        let before: Vec<f32> = field.particles.iter().map(|p| p.x).collect();
        field.tick();
        for (p, old) in field.particles.iter().zip(&before) {
            if p.x > *old {
                assert!((p.x - old - DRIFT_PER_FRAME).abs() < 1e-6);
            }
            // wrapped sprites are covered below
        }
    }

    #[test]
    fn vertical_position_and_size_never_change() {
        let mut field = make_field();
        let before: Vec<(f32, f32)> =
            field.particles.iter().map(|p| (p.y, p.size)).collect();
        for _ in 0..100 {
            field.tick();
        }
        for (p, (y, size)) in field.particles.iter().zip(&before) {
            assert!(p.x.is_finite());
            assert_eq!(p.y, *y);
            assert_eq!(p.size, *size);
        }
    }

    #[test]
    fn sprite_past_margin_wraps_to_far_left() {
        let mut field = make_field();
        let bound = field.half_width() + WRAP_MARGIN;
        field.particles[0].x = bound + 0.1;
        field.tick();
        assert_eq!(field.particles[0].x, -bound);
    }

    #[test]
    fn sprite_inside_margin_does_not_wrap() {
        let mut field = make_field();
        let bound = field.half_width() + WRAP_MARGIN;
        field.particles[0].x = bound - 1.0;
        field.tick();
        assert_eq!(field.particles[0].x, bound - 0.5);
    }

    #[test]
    fn sizes_span_the_sprite_range() {
        let field = make_field();
        for p in &field.particles {
            assert!(p.size >= 2.0 && p.size < 10.0);
        }
    }

    #[test]
    fn resize_moves_the_wrap_bound() {
        let mut field = make_field();
        field.resize(2000.0);
        assert_eq!(field.half_width(), 1000.0);
        field.particles[0].x = 1000.0 + WRAP_MARGIN + 0.2;
        field.tick();
        assert_eq!(field.particles[0].x, -(1000.0 + WRAP_MARGIN));
    }
}
