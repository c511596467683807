//! Pointer input: raw window samples translated to drag events.
//!
//! The public interface is [`PointerEvent`] delivered over an `mpsc`
//! channel.  The visualizer forwards raw per-frame samples; the translator
//! thread turns press edges into `Down`/`Up` and gates `Move` on the button
//! being held, so consumers never track button state themselves.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

// ════════════════════════════════════════════════════════════════════════════
// PointerEvent
// ════════════════════════════════════════════════════════════════════════════

/// A high-level pointer event consumed by the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
    /// Primary button pressed at screen `x`.
    Down { x: f32 },
    /// Pointer moved to `x` while the primary button is held.
    Move { x: f32 },
    /// Primary button released.
    Up,
    /// Window size changed.
    Resize { width: usize, height: usize },
    /// Close the application.
    Quit,
}

/// Raw input sample from the window, one edge or change per message.
#[derive(Clone, Debug)]
pub enum RawInput {
    Button { down: bool, x: f32 },
    Cursor { x: f32 },
    Size { width: usize, height: usize },
    CloseRequested,
}

// ════════════════════════════════════════════════════════════════════════════
// PointerSource trait — unified interface for window input and tests
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`PointerEvent`]s over a channel.
pub trait PointerSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<PointerEvent>);
}

/// Spawn a pointer source on its own thread and return the receiving end.
pub fn spawn_pointer_source<S: PointerSource>(source: S) -> Receiver<PointerEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// WindowPointerSource — translator from raw window samples
// ════════════════════════════════════════════════════════════════════════════

/// Translates [`RawInput`] from the window event loop into drag events.
/// Decouples the render loop from drag-state bookkeeping.
pub struct WindowPointerSource {
    pub rx: Receiver<RawInput>,
}

impl PointerSource for WindowPointerSource {
    fn run(self: Box<Self>, tx: Sender<PointerEvent>) {
        let mut held = false;
        let mut last_x = 0.0f32;

        for raw in self.rx {
            let event = match raw {
                RawInput::Button { down: true, x } if !held => {
                    held = true;
                    last_x = x;
                    PointerEvent::Down { x }
                }
                RawInput::Button { down: false, .. } if held => {
                    held = false;
                    PointerEvent::Up
                }
                // repeated edges carry no information
                RawInput::Button { .. } => continue,
                RawInput::Cursor { x } => {
                    if !held || x == last_x {
                        continue;
                    }
                    last_x = x;
                    PointerEvent::Move { x }
                }
                RawInput::Size { width, height } => PointerEvent::Resize { width, height },
                RawInput::CloseRequested => {
                    let _ = tx.send(PointerEvent::Quit);
                    return;
                }
            };
            if tx.send(event).is_err() {
                return;
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

    /// Feed a raw sequence through the translator and collect everything it
    /// emits (the source thread ends when the raw sender drops).
    fn translate(raw: Vec<RawInput>) -> Vec<PointerEvent> {
        let (raw_tx, raw_rx) = mpsc::channel();
        let rx = spawn_pointer_source(WindowPointerSource { rx: raw_rx });
        for r in raw {
            // the source may already have exited on CloseRequested
            let _ = raw_tx.send(r);
        }
        drop(raw_tx);
        rx.iter().collect()
    }

    #[test]
    fn press_move_release_round_trip() {
        let events = translate(vec![
            RawInput::Button { down: true, x: 100.0 },
            RawInput::Cursor { x: 120.0 },
            RawInput::Cursor { x: 150.0 },
            RawInput::Button { down: false, x: 150.0 },
        ]);
        assert_eq!(events, vec![
            PointerEvent::Down { x: 100.0 },
            PointerEvent::Move { x: 120.0 },
            PointerEvent::Move { x: 150.0 },
            PointerEvent::Up,
        ]);
    }

    #[test]
    fn cursor_without_press_is_silent() {
        let events = translate(vec![
            RawInput::Cursor { x: 10.0 },
            RawInput::Cursor { x: 20.0 },
        ]);
        assert!(events.is_empty());
    }

    #[test]
    fn duplicate_edges_are_dropped() {
        let events = translate(vec![
            RawInput::Button { down: true, x: 50.0 },
            RawInput::Button { down: true, x: 55.0 },
            RawInput::Button { down: false, x: 55.0 },
            RawInput::Button { down: false, x: 55.0 },
        ]);
        assert_eq!(events, vec![
            PointerEvent::Down { x: 50.0 },
            PointerEvent::Up,
        ]);
    }

    #[test]
    fn stationary_cursor_emits_no_moves() {
        let events = translate(vec![
            RawInput::Button { down: true, x: 50.0 },
            RawInput::Cursor { x: 50.0 },
            RawInput::Cursor { x: 50.0 },
        ]);
        assert_eq!(events, vec![PointerEvent::Down { x: 50.0 }]);
    }

    #[test]
    fn resize_passes_through() {
        let events = translate(vec![RawInput::Size { width: 1920, height: 600 }]);
        assert_eq!(events, vec![PointerEvent::Resize { width: 1920, height: 600 }]);
    }

    #[test]
    fn close_request_becomes_quit_and_ends_the_source() {
        let events = translate(vec![
            RawInput::CloseRequested,
            RawInput::Cursor { x: 1.0 },
        ]);
        assert_eq!(events, vec![PointerEvent::Quit]);
    }
}
