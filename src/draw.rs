// Window + software drawing utilities.
// What ends up on screen:
// 1) A window that shows the mirrored camera image.
// 2) The hand skeleton, its bounding box and the active region.
// 3) Pinch feedback and a big frame-rate counter in the corner.

use crate::error::Error;
use crate::hand::HandGeometry;
use crate::types::{BoundingBox, FrameBuffer, Point};
use minifb::{Key, Window, WindowOptions};

pub const GREEN: u32 = 0x00_00_FF_00;
pub const MAGENTA: u32 = 0x00_FF_00_FF;
pub const RED: u32 = 0x00_FF_00_00;
pub const WHITE: u32 = 0x00_FF_FF_FF;

/// Landmark pairs joined by skeleton lines (21-point hand model).
const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (17, 18), (18, 19), (19, 20),
    (0, 17),
];

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen. Also pumps window events.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }
}

/* ---------- Software drawing: pixels, lines, boxes, discs ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Line with a square pen `thickness` pixels wide.
pub fn draw_thick_line(fb: &mut FrameBuffer, a: Point, b: Point, thickness: i32, color: u32) {
    let lo = -(thickness - 1) / 2;
    let hi = thickness / 2;
    for oy in lo..=hi {
        for ox in lo..=hi {
            draw_line(fb, a.x + ox, a.y + oy, b.x + ox, b.y + oy, color);
        }
    }
}

/// Rectangle outline; edges grow inward by `thickness`. Parts off the frame are clipped.
pub fn draw_rect(fb: &mut FrameBuffer, r: BoundingBox, thickness: i32, color: u32) {
    for t in 0..thickness.max(1) {
        let (x0, y0, x1, y1) = (r.x_min + t, r.y_min + t, r.x_max - t, r.y_max - t);
        if x0 > x1 || y0 > y1 { break; }
        draw_line(fb, x0, y0, x1, y0, color);
        draw_line(fb, x0, y1, x1, y1, color);
        draw_line(fb, x0, y0, x0, y1, color);
        draw_line(fb, x1, y0, x1, y1, color);
    }
}

/// Solid disc centred on `c`.
pub fn fill_circle(fb: &mut FrameBuffer, c: Point, radius: i32, color: u32) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                put_pixel(fb, c.x + dx, c.y + dy, color);
            }
        }
    }
}

/// Skeleton, a dot per landmark and the padded bounding box.
pub fn draw_hand(fb: &mut FrameBuffer, hand: &HandGeometry) {
    for &(a, b) in HAND_CONNECTIONS.iter() {
        draw_thick_line(fb, hand.point(a), hand.point(b), 2, WHITE);
    }
    for &p in hand.points.iter() {
        fill_circle(fb, p, 4, RED);
    }
    draw_rect(fb, hand.bbox, 2, GREEN);
}

/* ---------- 5x7 bitmap font (digits only, the HUD shows a bare number) ---------- */

/// Return a 5x7 glyph bitmap for a digit.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),
        _ => None,
    }
}

/// Draw `text` with 5x7 glyphs blown up `scale` times; unknown characters leave a gap.
/// Each glyph gets a 1-cell black shadow for contrast against the video.
pub fn draw_text(fb: &mut FrameBuffer, x: i32, y: i32, text: &str, scale: i32, color: u32) {
    let s = scale.max(1);
    let mut cx = x;
    for ch in text.chars() {
        if let Some(rows) = glyph5x7(ch) {
            for (shadow, col) in [(s, 0x00000000), (0, color)] {
                for (ry, rowbits) in rows.iter().enumerate() {
                    for rx in 0..5 {
                        if (rowbits & (1 << (4 - rx))) == 0 { continue; }
                        let px = cx + rx * s + shadow;
                        let py = y + ry as i32 * s + shadow;
                        for oy in 0..s {
                            for ox in 0..s {
                                put_pixel(fb, px + ox, py + oy, col);
                            }
                        }
                    }
                }
            }
        }
        cx += 6 * s; // 5 cells glyph width + 1 cell spacing
    }
}
