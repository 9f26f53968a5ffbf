//! Pure hand geometry: normalized landmarks in, pixel points, box and
//! finger states out. Nothing here draws; see `draw::draw_hand` for that.

use crate::types::{BoundingBox, FingerStates, HandLandmarks, Point, landmark};

/// Margin added around the landmark extents on every side.
pub const BOX_MARGIN: i32 = 20;

/// Pixel-space view of one detected hand for the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandGeometry {
    /// Indexed by landmark id (0 = wrist ... 20 = pinky tip).
    pub points: [Point; landmark::COUNT],
    pub bbox: BoundingBox,
}

impl HandGeometry {
    /// Scale normalized landmarks to a `width` x `height` frame.
    /// Coordinates are truncated toward zero, and the box is not clamped to the frame.
    pub fn from_landmarks(hand: &HandLandmarks, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let mut points = [Point::default(); landmark::COUNT];

        let mut x_min = i32::MAX;
        let mut y_min = i32::MAX;
        let mut x_max = i32::MIN;
        let mut y_max = i32::MIN;

        for (p, lm) in points.iter_mut().zip(hand.landmarks.iter()) {
            *p = Point::new((lm.x * w) as i32, (lm.y * h) as i32);
            x_min = x_min.min(p.x);
            y_min = y_min.min(p.y);
            x_max = x_max.max(p.x);
            y_max = y_max.max(p.y);
        }

        Self {
            points,
            bbox: BoundingBox {
                x_min: x_min - BOX_MARGIN,
                y_min: y_min - BOX_MARGIN,
                x_max: x_max + BOX_MARGIN,
                y_max: y_max + BOX_MARGIN,
            },
        }
    }

    pub fn point(&self, id: usize) -> Point {
        self.points[id]
    }

    pub fn index_tip(&self) -> Point {
        self.points[landmark::INDEX_TIP]
    }

    pub fn middle_tip(&self) -> Point {
        self.points[landmark::MIDDLE_TIP]
    }

    /// Which fingers are extended.
    ///
    /// The thumb compares x against the joint just below its tip, which only
    /// works for a mirrored right hand facing the camera. The other four
    /// compare y against the joint two ids below the tip; a tip strictly
    /// higher on screen (smaller y) counts as extended.
    pub fn fingers_up(&self) -> FingerStates {
        let mut up = [false; 5];

        let thumb = landmark::TIPS[0];
        up[FingerStates::THUMB] = self.points[thumb].x > self.points[thumb - 1].x;

        for (finger, &tip) in landmark::TIPS.iter().enumerate().skip(1) {
            up[finger] = self.points[tip].y < self.points[tip - 2].y;
        }

        FingerStates(up)
    }

    /// Pixel distance between two landmarks.
    pub fn distance(&self, a: usize, b: usize) -> f32 {
        self.points[a].distance(self.points[b])
    }
}
