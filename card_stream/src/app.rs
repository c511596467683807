//! Top-level controller.
//!
//! `AppState` owns the card line, the motion engine, the scanner band and
//! the particle field.  It is constructed explicitly and torn down
//! explicitly: the run loop is the only scheduler, and a cleared liveness
//! flag turns every further frame into a no-op.  Three cooperative tick
//! paths share the loop (motion with scanner resync at wall-clock dt,
//! particle drift at a fixed per-frame step, and the interval-gated
//! content refresh), communicating only through the scene they draw into.

use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use pseudocode::CodeSource;

use crate::cards::{CardLine, CARD_COUNT, CARD_W};
use crate::motion::MotionEngine;
use crate::particles::ParticleField;
use crate::pointer::{spawn_pointer_source, PointerEvent, RawInput, WindowPointerSource};
use crate::scan::{self, CardBounds, ScannerBand};
use crate::visualizer::{Visualizer, WIN_W};

// ════════════════════════════════════════════════════════════════════════════
// StreamError
// ════════════════════════════════════════════════════════════════════════════

/// Errors that can abort controller construction.  Per-frame failures never
/// surface here; they degrade visually and silently.
#[derive(thiserror::Error, Debug)]
pub enum StreamError {
    #[error("window init failed: {0}")]
    Window(#[from] minifb::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
pub struct AppConfig {
    pub card_count: usize,
    /// Ordered image pool for the card fronts, cycled when shorter than the
    /// card count.  Empty pool → placeholder tints.
    pub images: Vec<PathBuf>,
    /// Fixed seed for reproducible filler text; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Cadence of the low-frequency content refresh.
    pub refresh_interval: Duration,
    /// Per-card Bernoulli probability at each refresh tick.
    pub refresh_probability: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            card_count: CARD_COUNT,
            images: Vec::new(),
            seed: None,
            refresh_interval: Duration::from_millis(200),
            refresh_probability: 0.1,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    line: CardLine,
    motion: MotionEngine,
    band: ScannerBand,
    particles: ParticleField,
    source: CodeSource,
    rng: fastrand::Rng,
    refresh_interval: Duration,
    refresh_probability: f64,
    last_frame: Option<Instant>,
    last_move: Option<Instant>,
    last_refresh: Instant,
    running: bool,
    pub status: String,
}

impl AppState {
    pub fn new(cfg: AppConfig, container_width: f32) -> Self {
        let (mut source, mut rng) = match cfg.seed {
            Some(s) => (
                CodeSource::with_seed(s),
                fastrand::Rng::with_seed(s ^ 0x9E37_79B9_7F4A_7C15),
            ),
            None => (CodeSource::new(), fastrand::Rng::new()),
        };

        let line = CardLine::build(cfg.card_count, &cfg.images, &mut source);
        let motion = MotionEngine::new(container_width, line.track_width());
        let band = ScannerBand::centered_in(container_width);
        let particles = ParticleField::new(container_width, &mut rng);

        AppState {
            line,
            motion,
            band,
            particles,
            source,
            rng,
            refresh_interval: cfg.refresh_interval,
            refresh_probability: cfg.refresh_probability,
            last_frame: None,
            last_move: None,
            last_refresh: Instant::now(),
            running: true,
            status: "Ready — drag the stream to throw it".to_string(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop scheduling work; the next loop iteration exits and every owned
    /// resource drops with this struct.
    pub fn shutdown(&mut self) {
        self.running = false;
    }

    // ── pointer events ────────────────────────────────────────────────────

    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Down { x } => {
                self.last_move = Some(now);
                self.motion.pointer_down(x);
                debug!(x = x as f64, "drag start");
            }
            PointerEvent::Move { x } => {
                let dt = self
                    .last_move
                    .map(|t| (now - t).as_secs_f32())
                    .unwrap_or(1.0 / 60.0);
                self.last_move = Some(now);
                self.motion.pointer_move(x, dt);
                // clipping tracks the pointer inside a frame too
                self.sync_scanner();
            }
            PointerEvent::Up => {
                self.motion.pointer_up();
                debug!(velocity = self.motion.velocity as f64, "drag released");
            }
            PointerEvent::Resize { width, .. } => {
                info!(width, "container resized");
                self.motion.set_bounds(width as f32, self.line.track_width());
                self.band.center_x = width as f32 / 2.0;
                self.particles.resize(width as f32);
            }
            PointerEvent::Quit => self.shutdown(),
        }
    }

    // ── per-frame tick ────────────────────────────────────────────────────

    /// One cooperative frame.  No-op once the controller is shut down.
    pub fn frame(&mut self, now: Instant) {
        if !self.running {
            return;
        }

        let dt = match self.last_frame {
            Some(t) => (now - t).as_secs_f32(),
            None => 0.0,
        };
        self.last_frame = Some(now);

        // stream position, then clipping against the fresh geometry
        self.motion.step(dt);
        self.sync_scanner();

        // independent cosmetic layer
        self.particles.tick();

        // low-frequency content refresh
        if now.duration_since(self.last_refresh) >= self.refresh_interval {
            self.last_refresh = now;
            self.line
                .refresh(self.refresh_probability, &mut self.source, &mut self.rng);
        }

        self.status = format!(
            "stream {:+.0} px   speed {:.0} px/s{}",
            self.motion.position,
            self.motion.velocity,
            if self.motion.is_dragging() { "   [dragging]" } else { "" },
        );
    }

    /// Re-read card geometry at the current position and let the scanner
    /// rewrite every clip boundary.
    fn sync_scanner(&mut self) {
        let position = self.motion.position;
        let count = self.line.cards.len();
        let lefts: Vec<f32> = (0..count)
            .map(|i| self.line.card_left(i, position))
            .collect();
        scan::update(&self.band, &mut self.line.cards, |i| {
            lefts.get(i).map(|&left| CardBounds { left, right: left + CARD_W })
        });
    }

    // ── accessors for the render loop ─────────────────────────────────────

    pub fn line(&self) -> &CardLine {
        &self.line
    }

    pub fn band(&self) -> &ScannerBand {
        &self.band
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn position(&self) -> f32 {
        self.motion.position
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the pointer translator, the visualizer window, and the app state,
/// then drives the event/tick/render loop at ~60 fps until the window closes
/// or the controller shuts down.
pub fn run(cfg: AppConfig) -> Result<(), StreamError> {
    let (raw_tx, raw_rx) = mpsc::channel::<RawInput>();
    let pointer_rx = spawn_pointer_source(WindowPointerSource { rx: raw_rx });

    let mut vis = Visualizer::new(raw_tx)?;
    let mut app = AppState::new(cfg, WIN_W as f32);
    info!(
        cards = app.line().cards.len(),
        track_px = app.line().track_width() as f64,
        "controller up"
    );

    while vis.is_open() && app.is_running() {
        // 1. Poll window input → raw samples to the translator
        if !vis.poll_input() {
            break;
        }

        // 2. Drain translated pointer events
        loop {
            match pointer_rx.try_recv() {
                Ok(PointerEvent::Quit) => {
                    app.shutdown();
                    break;
                }
                Ok(event) => app.handle_pointer(event, Instant::now()),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    app.shutdown();
                    break;
                }
            }
        }

        // 3. Per-frame logic
        app.frame(Instant::now());

        // 4. Render
        vis.render(
            app.line(),
            app.position(),
            app.band(),
            app.particles(),
            &app.status,
        );
    }

    info!("controller down");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn make_app() -> AppState {
        let cfg = AppConfig { seed: Some(7), ..AppConfig::default() };
        AppState::new(cfg, 1000.0)
    }

    fn at(t0: Instant, millis: u64) -> Instant {
        t0 + Duration::from_millis(millis)
    }

    #[test]
    fn frame_moves_the_stream_left() {
        let mut app = make_app();
        let t0 = Instant::now();
        app.frame(at(t0, 0));
        app.frame(at(t0, 16));
        assert!(app.position() < 0.0);
    }

    #[test]
    fn drag_then_fast_release_throws_rightward() {
        let mut app = make_app();
        let t0 = Instant::now();
        app.handle_pointer(PointerEvent::Down { x: 100.0 }, at(t0, 0));
        let mut x = 100.0;
        for i in 1..=10u64 {
            x += 500.0 / 60.0;
            app.handle_pointer(PointerEvent::Move { x }, at(t0, i * 16));
        }
        app.handle_pointer(PointerEvent::Up, at(t0, 176));
        // ~500 px/s sampled over ~16 ms frames
        assert!((app.motion.velocity - 500.0).abs() < 50.0);
        assert_eq!(app.motion.direction, 1.0);
    }

    #[test]
    fn slow_release_falls_back_to_cruise() {
        let mut app = make_app();
        let t0 = Instant::now();
        app.handle_pointer(PointerEvent::Down { x: 100.0 }, at(t0, 0));
        app.handle_pointer(PointerEvent::Move { x: 100.1 }, at(t0, 16));
        app.handle_pointer(PointerEvent::Up, at(t0, 32));
        assert_eq!(app.motion.velocity, crate::motion::CRUISE_VELOCITY);
        assert_eq!(app.motion.direction, -1.0);
    }

    #[test]
    fn scanner_clips_follow_the_position() {
        let mut app = make_app();
        // container 1000 → band centred at 500; card 0 at [400, 800]
        app.motion.position = 400.0;
        app.sync_scanner();
        let card = &app.line.cards[0];
        // band [498, 502] over a 400-wide card
        assert!((card.clip_front - 98.0 / 400.0 * 100.0).abs() < 1e-4);
        assert!((card.clip_alt - 102.0 / 400.0 * 100.0).abs() < 1e-4);
        assert!(card.scanned);
        // every other card is right of the band and stays on its front face
        for card in &app.line.cards[1..] {
            assert_eq!(card.clip_front, 0.0);
            assert_eq!(card.clip_alt, 0.0);
        }
    }

    #[test]
    fn refresh_interval_gates_the_rewrite() {
        let cfg = AppConfig {
            seed: Some(3),
            refresh_interval: Duration::ZERO,
            refresh_probability: 1.0,
            ..AppConfig::default()
        };
        let mut app = AppState::new(cfg, 1000.0);
        let before: Vec<String> =
            app.line.cards.iter().map(|c| c.alt_text.clone()).collect();
        app.frame(Instant::now());
        for (card, old) in app.line.cards.iter().zip(&before) {
            assert_ne!(&card.alt_text, old);
        }
    }

    #[test]
    fn refresh_probability_zero_never_rewrites() {
        let cfg = AppConfig {
            seed: Some(3),
            refresh_interval: Duration::ZERO,
            refresh_probability: 0.0,
            ..AppConfig::default()
        };
        let mut app = AppState::new(cfg, 1000.0);
        let before: Vec<String> =
            app.line.cards.iter().map(|c| c.alt_text.clone()).collect();
        for _ in 0..5 {
            app.frame(Instant::now());
        }
        let after: Vec<String> =
            app.line.cards.iter().map(|c| c.alt_text.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn resize_recenters_scanner_and_bounds() {
        let mut app = make_app();
        app.handle_pointer(
            PointerEvent::Resize { width: 2000, height: 600 },
            Instant::now(),
        );
        assert_eq!(app.band.center_x, 1000.0);
        assert_eq!(app.particles.half_width(), 1000.0);
    }

    #[test]
    fn shutdown_makes_frames_noops() {
        let mut app = make_app();
        let t0 = Instant::now();
        app.frame(at(t0, 0));
        app.frame(at(t0, 16));
        app.shutdown();
        let pos = app.position();
        app.frame(at(t0, 500));
        assert_eq!(app.position(), pos);
        assert!(!app.is_running());
    }

    #[test]
    fn quit_event_clears_the_liveness_flag() {
        let mut app = make_app();
        app.handle_pointer(PointerEvent::Quit, Instant::now());
        assert!(!app.is_running());
    }
}
