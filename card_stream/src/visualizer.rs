//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │        · particle drift ·        ║          · · ·            │
//! │  ┌───────────────┐   ┌───────────║───┐   ┌───────────────┐   │
//! │  │  card (front) │   │ code ░░░  ║   │   │  card (front) │   │
//! │  └───────────────┘   └───────────║───┘   └───────────────┘   │
//! │        ·      ·                  ║ scanner     ·             │
//! │  status bar                                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cards scroll under the stationary scanner line; left of the beam each
//! card shows its generated code face, right of it the image face.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::sync::mpsc::Sender;

use crate::cards::{Card, CardLine, FrontArt, CARD_H, CARD_W, CHAR_CELL_W, LINE_CELL_H};
use crate::particles::ParticleField;
use crate::pointer::RawInput;
use crate::scan::ScannerBand;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 1280;
pub const WIN_H: usize = 520;
const STATUS_H: usize = 36;

const BG_COLOR: u32 = 0xFF0B0B16;
const CODE_BG: u32 = 0xFF041009;
const CODE_FG: u32 = 0xFF39FF8A;
const CARD_BORDER: u32 = 0xFF000000;
const SCANNER_CORE: u32 = 0xFF7DF9FF;
const SCAN_FLASH: u32 = 0xFF00E5A0;
const TEXT_BG: u32 = 0xFF101C33;

/// Visual half-extent of the scanner glow, in pixels.  Independent of the
/// geometric band width by design; do not unify the two.
pub const SCANNER_GLOW_W: f32 = 8.0;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf: Vec<u32>,
    raw_tx: Sender<RawInput>,
    width: usize,
    height: usize,
    mouse_down: bool,
    cursor_x: f32,
}

impl Visualizer {
    pub fn new(raw_tx: Sender<RawInput>) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "Card Stream — image / pseudo-code scanner",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            raw_tx,
            width: WIN_W,
            height: WIN_H,
            mouse_down: false,
            cursor_x: 0.0,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll window input and forward raw samples.  Returns false when the
    /// window should close.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            let _ = self.raw_tx.send(RawInput::CloseRequested);
            return false;
        }
        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            let _ = self.raw_tx.send(RawInput::CloseRequested);
            return false;
        }

        // Resize: reallocate the framebuffer and tell the controller.
        let (w, h) = self.window.get_size();
        if (w, h) != (self.width, self.height) && w > 0 && h > 0 {
            self.width = w;
            self.height = h;
            self.buf = vec![BG_COLOR; w * h];
            let _ = self.raw_tx.send(RawInput::Size { width: w, height: h });
        }

        // Cursor before button so a fresh press carries the right x.
        if let Some((x, _)) = self.window.get_mouse_pos(MouseMode::Pass) {
            if (x - self.cursor_x).abs() > f32::EPSILON {
                self.cursor_x = x;
                let _ = self.raw_tx.send(RawInput::Cursor { x });
            }
        }
        let down = self.window.get_mouse_down(MouseButton::Left);
        if down != self.mouse_down {
            self.mouse_down = down;
            let _ = self.raw_tx.send(RawInput::Button { down, x: self.cursor_x });
        }

        true
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        line: &CardLine,
        position: f32,
        band: &ScannerBand,
        field: &ParticleField,
        status: &str,
    ) {
        self.buf.fill(BG_COLOR);

        // ── Particle backdrop ─────────────────────────────────────────────
        self.draw_particles(field);

        // ── Card track ────────────────────────────────────────────────────
        for (i, card) in line.cards.iter().enumerate() {
            let left = line.card_left(i, position);
            if left + CARD_W < 0.0 || left > self.width as f32 {
                continue;
            }
            self.draw_card(card, left);
        }

        // ── Scanner line + glow ───────────────────────────────────────────
        self.draw_scanner(band);

        // ── Status bar ────────────────────────────────────────────────────
        let sy = self.height.saturating_sub(STATUS_H);
        self.fill_rect(0, sy, self.width, STATUS_H, TEXT_BG);
        self.draw_label(status, 10, sy + 8, 0xFFEEEEEE);
        self.draw_label(
            "drag=throw the stream   q/esc=quit",
            10,
            self.height.saturating_sub(14),
            0xFF888888,
        );

        self.window
            .update_with_buffer(&self.buf, self.width, self.height)
            .ok();
    }

    fn card_top(&self) -> isize {
        (self.height.saturating_sub(STATUS_H) as isize - CARD_H as isize) / 2
    }

    // ── Cards ─────────────────────────────────────────────────────────────

    fn draw_card(&mut self, card: &Card, left: f32) {
        let x0 = left as isize;
        let top = self.card_top();
        let w = CARD_W as usize;
        let h = CARD_H as usize;

        let front_from = ((card.clip_front / 100.0) * CARD_W).round() as usize;
        let alt_to = ((card.clip_alt / 100.0) * CARD_W).round() as usize;

        // Front face occupies [front_from, w) of the card width.
        for col in front_from..w {
            let sx = x0 + col as isize;
            if sx < 0 || sx as usize >= self.width {
                continue;
            }
            for row in 0..h {
                let sy = top + row as isize;
                if sy < 0 || sy as usize >= self.height {
                    continue;
                }
                let c = match &card.front {
                    FrontArt::Image(px) => px[row * w + col],
                    FrontArt::Placeholder(tint) => *tint,
                };
                self.buf[sy as usize * self.width + sx as usize] = c;
            }
        }

        // Code face overlays [0, alt_to).
        if alt_to > 0 {
            let limit = alt_to.min(w);
            for col in 0..limit {
                let sx = x0 + col as isize;
                if sx < 0 || sx as usize >= self.width {
                    continue;
                }
                for row in 0..h {
                    let sy = top + row as isize;
                    if sy < 0 || sy as usize >= self.height {
                        continue;
                    }
                    self.buf[sy as usize * self.width + sx as usize] = CODE_BG;
                }
            }
            self.draw_code_text(&card.alt_text, x0, top, limit);
        }

        // Accent while the card is crossing the beam, plain border otherwise.
        let border = if card.scanned { SCAN_FLASH } else { CARD_BORDER };
        self.draw_border(x0, top, w, h, border);
    }

    fn draw_code_text(&mut self, text: &str, x0: isize, top: isize, limit_px: usize) {
        for (row, line) in text.lines().enumerate() {
            let cy = top + (row * LINE_CELL_H) as isize + 2;
            for (col, ch) in line.chars().enumerate() {
                let cell_x = col * CHAR_CELL_W;
                if cell_x + CHAR_CELL_W > limit_px {
                    break;
                }
                self.draw_glyph(ch, x0 + cell_x as isize + 1, cy, CODE_FG);
            }
        }
    }

    // ── Scanner ───────────────────────────────────────────────────────────

    fn draw_scanner(&mut self, band: &ScannerBand) {
        let h = self.height.saturating_sub(STATUS_H);
        let half_band = band.band_width / 2.0;
        let x_min = (band.center_x - SCANNER_GLOW_W).floor() as isize;
        let x_max = (band.center_x + SCANNER_GLOW_W).ceil() as isize;

        for x in x_min..=x_max {
            if x < 0 || x as usize >= self.width {
                continue;
            }
            let col = x as usize;
            let dist = (x as f32 - band.center_x).abs();
            if dist <= half_band {
                for y in 0..h {
                    self.buf[y * self.width + col] = SCANNER_CORE;
                }
            } else {
                let t = 1.0 - (dist - half_band) / SCANNER_GLOW_W;
                let add = (t.max(0.0) * 90.0) as u32;
                for y in 0..h {
                    let i = y * self.width + col;
                    self.buf[i] = additive(self.buf[i], add);
                }
            }
        }
    }

    // ── Particles ─────────────────────────────────────────────────────────

    fn draw_particles(&mut self, field: &ParticleField) {
        let cx_off = self.width as f32 / 2.0;
        let cy_off = self.height.saturating_sub(STATUS_H) as f32 / 2.0;
        for p in &field.particles {
            self.draw_sprite(p.x + cx_off, p.y + cy_off, p.size / 2.0);
        }
    }

    /// Soft circular sprite: radial falloff, additive per channel.
    fn draw_sprite(&mut self, cx: f32, cy: f32, r: f32) {
        let r = r.max(1.0);
        let x_min = (cx - r).floor() as isize;
        let x_max = (cx + r).ceil() as isize;
        let y_min = (cy - r).floor() as isize;
        let y_max = (cy + r).ceil() as isize;

        for y in y_min..=y_max {
            if y < 0 || y as usize >= self.height {
                continue;
            }
            for x in x_min..=x_max {
                if x < 0 || x as usize >= self.width {
                    continue;
                }
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let d2 = dx * dx + dy * dy;
                if d2 > r * r {
                    continue;
                }
                let t = 1.0 - d2.sqrt() / r;
                let add = (t * 0.6 * 255.0) as u32;
                let i = y as usize * self.width + x as usize;
                self.buf[i] = additive(self.buf[i], add);
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_px(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32) {
        for col in 0..w as isize {
            self.set_px(x + col, y, color);
            self.set_px(x + col, y + h as isize - 1, color);
        }
        for row in 0..h as isize {
            self.set_px(x, y + row, color);
            self.set_px(x + w as isize - 1, y + row, color);
        }
    }

    fn draw_glyph(&mut self, ch: char, x: isize, y: isize, color: u32) {
        let glyph = char_glyph(ch);
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..3isize {
                if bits & (1 << (2 - col)) != 0 {
                    self.set_px(x + col, y + row as isize, color);
                }
            }
        }
    }

    /// Minimal bitmap label: 3×5 characters, 4 px advance.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x as isize;
        for ch in text.chars() {
            self.draw_glyph(ch, cx, y as isize, color);
            cx += 4;
            if cx + 4 > self.width as isize {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '\\' => [0b100, 0b100, 0b010, 0b001, 0b001],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ';' => [0b000, 0b010, 0b000, 0b010, 0b100],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '*' => [0b101, 0b010, 0b111, 0b010, 0b101],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '{' => [0b011, 0b010, 0b110, 0b010, 0b011],
        '}' => [0b110, 0b010, 0b011, 0b010, 0b110],
        '[' => [0b011, 0b010, 0b010, 0b010, 0b011],
        ']' => [0b110, 0b010, 0b010, 0b010, 0b110],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        '&' => [0b010, 0b101, 0b010, 0b101, 0b011],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Additive brighten: add a white component to each channel, saturating.
fn additive(base: u32, add: u32) -> u32 {
    let r = (((base >> 16) & 0xFF) + add).min(255);
    let g = (((base >> 8) & 0xFF) + add).min(255);
    let b = ((base & 0xFF) + add).min(255);
    0xFF00_0000 | (r << 16) | (g << 8) | b
}
