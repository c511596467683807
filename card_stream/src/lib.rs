//! # card_stream
//!
//! Physics-driven horizontal card marquee with a stationary "scanner" line
//! that appears to convert each card's image face into live pseudo-code as
//! the card crosses the beam, drawn over an independently drifting particle
//! backdrop.
//!
//! ## Interaction
//!
//! | Input | Action |
//! |---|---|
//! | Drag (left button) | Grab the stream; position follows the pointer |
//! | Release after a fast drag | Stream adopts the throw velocity and direction |
//! | Release after a slow drag | Stream resumes cruising speed |
//! | Resize the window | Track, scanner centre, and particle bounds recompute |
//! | `Q` / `Escape` | Quit |
//!
//! ## Moving parts
//!
//! Three cooperative per-frame tasks share the single UI thread and touch
//! nothing but the scene they draw into:
//!
//! * the **motion engine**: wall-clock friction physics with a velocity
//!   floor and seamless track wrap, synced with the **scanner** clip pass
//!   every frame;
//! * the **particle field**: fixed per-frame drift, cosmetic only;
//! * the **content refresh**: an interval gate that rewrites a random few
//!   code faces so the stream looks alive.
//!
//! Pointer input arrives through a channel-decoupled translator thread and
//! mutates the motion engine synchronously on the main loop.

pub mod app;
pub mod cards;
pub mod motion;
pub mod particles;
pub mod pointer;
pub mod scan;
pub mod visualizer;
