// OS pointer control. The gesture step only sees the trait, so tests can
// record calls instead of moving the real mouse.

use crate::types::ScreenSize;
use enigo::{Enigo, MouseButton, MouseControllable};

pub trait CursorControl {
    /// Move the pointer to absolute screen coordinates.
    fn move_to(&mut self, x: f32, y: f32);

    /// Left click wherever the pointer is now.
    fn click(&mut self);
}

/// Real pointer backed by enigo.
pub struct EnigoCursor {
    enigo: Enigo,
    screen: ScreenSize,
}

impl EnigoCursor {
    /// Connect to the OS and read the primary display size once.
    pub fn new() -> Self {
        let enigo = Enigo::new();
        let (w, h) = enigo.main_display_size();
        Self {
            enigo,
            screen: ScreenSize { width: w as f32, height: h as f32 },
        }
    }

    pub fn screen_size(&self) -> ScreenSize {
        self.screen
    }
}

impl Default for EnigoCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorControl for EnigoCursor {
    fn move_to(&mut self, x: f32, y: f32) {
        // The mapped range already ends at the screen size; keep the last pixel inside.
        let x = x.clamp(0.0, (self.screen.width - 1.0).max(0.0)).round() as i32;
        let y = y.clamp(0.0, (self.screen.height - 1.0).max(0.0)).round() as i32;
        self.enigo.mouse_move_to(x, y);
    }

    fn click(&mut self) {
        self.enigo.mouse_click(MouseButton::Left);
    }
}
