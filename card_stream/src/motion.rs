//! Stream motion physics.
//!
//! A single scalar `position` moves the whole card track.  It evolves under
//! one of two regimes: free-running, where velocity decays by friction each
//! tick down to a floor it never crosses, or dragging, where the position
//! follows the pointer directly and free-running integration is suspended.
//! Releasing a drag either adopts the pointer's throw velocity (when fast
//! enough) or falls back to the cruising speed.

// ════════════════════════════════════════════════════════════════════════════
// Tuning constants
// ════════════════════════════════════════════════════════════════════════════

/// Per-tick velocity decay while free-running.
pub const FRICTION: f32 = 0.95;
/// Floor the free-running velocity is held at; the stream never stalls.
pub const MIN_VELOCITY: f32 = 20.0;
/// Speed adopted after a release too slow to count as a throw.
pub const CRUISE_VELOCITY: f32 = 60.0;
/// Frame delta cap; a stalled tab must not produce a huge jump.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Blend factor for the exponentially-weighted pointer velocity.
const VELOCITY_BLEND: f32 = 0.5;

// ════════════════════════════════════════════════════════════════════════════
// DragPhase — the explicit state machine
// ════════════════════════════════════════════════════════════════════════════

/// Drag state.  `Releasing` only exists inside the pointer-up transition;
/// it is folded into `FreeRunning` before the call returns, so friction can
/// never be applied while a drag owns the position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragPhase {
    FreeRunning,
    Dragging {
        last_x: f32,
        /// Exponentially-weighted pointer velocity, px/s.  `None` until the
        /// first move lands.
        sample: Option<f32>,
    },
    Releasing { pointer_velocity: f32 },
}

// ════════════════════════════════════════════════════════════════════════════
// MotionEngine
// ════════════════════════════════════════════════════════════════════════════

/// Owner of the stream position, velocity, and direction.
#[derive(Debug)]
pub struct MotionEngine {
    /// Signed pixels along the track axis, wrapped into
    /// `[-track_width, container_width]` after every update.
    pub position: f32,
    /// Non-negative speed magnitude, px/s.
    pub velocity: f32,
    /// Direction of travel, `+1.0` or `-1.0`.
    pub direction: f32,
    phase: DragPhase,
    container_width: f32,
    track_width: f32,
}

impl MotionEngine {
    pub fn new(container_width: f32, track_width: f32) -> Self {
        MotionEngine {
            position: 0.0,
            velocity: CRUISE_VELOCITY,
            direction: -1.0,
            phase: DragPhase::FreeRunning,
            container_width,
            track_width,
        }
    }

    /// Window or track geometry changed; wrap bounds move with it.
    pub fn set_bounds(&mut self, container_width: f32, track_width: f32) {
        self.container_width = container_width;
        self.track_width = track_width;
        self.wrap();
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    // ── transitions ───────────────────────────────────────────────────────

    /// Primary button went down on the track.
    pub fn pointer_down(&mut self, x: f32) {
        self.phase = DragPhase::Dragging { last_x: x, sample: None };
    }

    /// Pointer moved to `x`, `dt` seconds after the previous sample.
    /// Ignored unless a drag is in progress.
    pub fn pointer_move(&mut self, x: f32, dt: f32) {
        let DragPhase::Dragging { last_x, sample } = &mut self.phase else {
            return;
        };
        let dx = x - *last_x;
        *last_x = x;

        let instant = dx / dt.max(1e-4);
        *sample = Some(match *sample {
            None => instant,
            Some(prev) => prev + (instant - prev) * VELOCITY_BLEND,
        });

        self.position += dx;
        self.wrap();
    }

    /// Primary button released.  Enters `Releasing` and immediately folds it
    /// back into `FreeRunning` with the resolved velocity.
    pub fn pointer_up(&mut self) {
        if let DragPhase::Dragging { sample, .. } = self.phase {
            self.phase = DragPhase::Releasing {
                pointer_velocity: sample.unwrap_or(0.0),
            };
            self.fold_release();
        }
    }

    fn fold_release(&mut self) {
        if let DragPhase::Releasing { pointer_velocity } = self.phase {
            if pointer_velocity.abs() > MIN_VELOCITY {
                self.velocity = pointer_velocity.abs();
                self.direction = if pointer_velocity > 0.0 { 1.0 } else { -1.0 };
            } else {
                // Too slow to count as a throw: cruise on, direction kept.
                self.velocity = CRUISE_VELOCITY;
            }
            self.phase = DragPhase::FreeRunning;
        }
    }

    // ── per-frame step ────────────────────────────────────────────────────

    /// Advance one free-running frame.  No-op mid-drag.
    pub fn step(&mut self, dt: f32) {
        if self.is_dragging() {
            return;
        }
        let dt = dt.min(MAX_FRAME_DT);
        self.velocity = (self.velocity * FRICTION).max(MIN_VELOCITY);
        self.position += self.velocity * self.direction * dt;
        self.wrap();
    }

    /// Seamless loop: past either edge the track reappears at the other.
    /// The seam is an accepted visual discontinuity.
    fn wrap(&mut self) {
        if self.position < -self.track_width {
            self.position = self.container_width;
        }
        if self.position > self.container_width {
            self.position = -self.track_width;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
