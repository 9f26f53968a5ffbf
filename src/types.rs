// Core types shared by the camera, detector, gesture and drawing steps.

/// Pixels we push to the window, packed 0x00RRGGBB for minifb.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Pack an RGB image into the window format.
    pub fn from_rgb(img: &image::RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for pixel in img.pixels() {
            let r = pixel[0] as u32;
            let g = pixel[1] as u32;
            let b = pixel[2] as u32;
            pixels.push((r << 16) | (g << 8) | b);
        }
        Self { width: w as usize, height: h as usize, pixels }
    }
}

/// One landmark as the model reports it: x/y normalized to the image, z relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Landmark indices on the 21-point hand model.
pub mod landmark {
    pub const COUNT: usize = 21;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;

    /// Fingertips ordered thumb..pinky.
    pub const TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
}

/// A detected hand with all 21 normalized landmarks.
#[derive(Clone, Debug)]
pub struct HandLandmarks {
    pub landmarks: [Landmark; landmark::COUNT],
    pub handedness: String,
    pub score: f32,
}

/// Integer pixel position in camera-frame coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Straight-line pixel distance.
    pub fn distance(self, other: Point) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned box; may extend past the frame edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

/// Extended/not per finger, thumb..pinky.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerStates(pub [bool; 5]);

impl FingerStates {
    pub const THUMB: usize = 0;
    pub const INDEX: usize = 1;
    pub const MIDDLE: usize = 2;

    /// Build from the 0/1 notation used in logs, e.g. `[0, 1, 1, 0, 0]`.
    #[cfg(test)]
    pub fn from_bits(bits: [u8; 5]) -> Self {
        Self(bits.map(|b| b != 0))
    }

    pub fn index(&self) -> bool {
        self.0[Self::INDEX]
    }

    pub fn middle(&self) -> bool {
        self.0[Self::MIDDLE]
    }

    pub fn bits(&self) -> [u8; 5] {
        self.0.map(u8::from)
    }
}

/// Primary display resolution, read once at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_uses_pythagoras() {
        assert_eq!(Point::new(0, 0).distance(Point::new(3, 4)), 5.0);
        assert_eq!(Point::new(10, 10).distance(Point::new(10, 10)), 0.0);
    }

    #[test]
    fn finger_bits_round_trip_through_bools() {
        let f = FingerStates::from_bits([0, 1, 1, 0, 0]);
        assert!(f.index());
        assert!(f.middle());
        assert_eq!(f.bits(), [0, 1, 1, 0, 0]);
    }

    #[test]
    fn frame_buffer_packs_rgb() {
        let img = image::RgbImage::from_raw(2, 1, vec![0xFF, 0x00, 0x00, 0x01, 0x02, 0x03]).unwrap();
        let fb = FrameBuffer::from_rgb(&img);
        assert_eq!((fb.width, fb.height), (2, 1));
        assert_eq!(fb.pixels, vec![0x00FF_0000, 0x0001_0203]);
    }
}
