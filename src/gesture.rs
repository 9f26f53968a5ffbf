//! Per-frame gesture rule and the pointer maths behind it.
//!
//! The rule itself is stateless: index alone moves, index plus middle is a
//! click candidate. The only carried state is the smoothed cursor position
//! (and the last click time when a cooldown is configured).

use std::time::{Duration, Instant};

use crate::cursor::CursorControl;
use crate::error::Error;
use crate::hand::HandGeometry;
use crate::types::{FingerStates, Point, ScreenSize, landmark};

/// Tuning constants for the gesture step.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureConfig {
    /// Pixels trimmed off every camera edge to form the active region.
    pub frame_margin: i32,
    /// Divisor of the smoothing filter; 1 means no smoothing.
    pub smoothing: f32,
    /// Tips closer than this (strictly) click.
    pub click_distance: f32,
    /// Minimum gap between clicks. Zero keeps the click-every-frame behaviour.
    pub click_cooldown: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            frame_margin: 100,
            smoothing: 5.0,
            click_distance: 35.0,
            click_cooldown: Duration::ZERO,
        }
    }
}

/// What the finger vector asks for this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// Index extended, middle folded.
    Move,
    /// Index and middle extended.
    ClickCandidate,
    /// Anything else.
    None,
}

impl Gesture {
    pub fn from_fingers(fingers: FingerStates) -> Self {
        match (fingers.index(), fingers.middle()) {
            (true, false) => Gesture::Move,
            (true, true) => Gesture::ClickCandidate,
            _ => Gesture::None,
        }
    }
}

/// Linear remap of `value` from `from` to `to`.
/// Values outside `from` stick to the nearest end of `to`.
pub fn interp(value: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    let (a, b) = from;
    let (c, d) = to;
    if value <= a {
        return c;
    }
    if value >= b {
        return d;
    }
    c + (value - a) * (d - c) / (b - a)
}

/// One step of the first-order filter: move `1/factor` of the way to `target`.
pub fn smooth(prev: f32, target: f32, factor: f32) -> f32 {
    prev + (target - prev) / factor
}

/// Smoothed pointer position carried from one frame to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorState {
    pub x: f32,
    pub y: f32,
}

impl CursorState {
    /// Blend toward `(x, y)` and return the new position.
    pub fn advance(&mut self, x: f32, y: f32, factor: f32) -> (f32, f32) {
        self.x = smooth(self.x, x, factor);
        self.y = smooth(self.y, y, factor);
        (self.x, self.y)
    }
}

/// What the step did, so the caller can draw it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameAction {
    /// No actionable gesture.
    Idle,
    /// Pointer moved to this screen position.
    Moved { x: f32, y: f32 },
    /// Two-finger pose; `clicked` says whether the pinch fired.
    Pinch { from: Point, to: Point, distance: f32, clicked: bool },
}

/// Loop-carried gesture state plus its configuration.
pub struct GestureEngine {
    config: GestureConfig,
    screen: ScreenSize,
    cursor: CursorState,
    last_click: Option<Instant>,
}

impl GestureEngine {
    pub fn new(config: GestureConfig, screen: ScreenSize) -> Self {
        Self {
            config,
            screen,
            cursor: CursorState::default(),
            last_click: None,
        }
    }

    #[cfg(test)]
    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    /// Active region inside a `width` x `height` camera frame, as (left, top, right, bottom).
    pub fn active_region(&self, width: u32, height: u32) -> (i32, i32, i32, i32) {
        let m = self.config.frame_margin;
        (m, m, width as i32 - m, height as i32 - m)
    }

    /// Fail when the margin leaves nothing to map in a `width` x `height` frame.
    pub fn check_frame(&self, width: u32, height: u32) -> Result<(), Error> {
        let (left, top, right, bottom) = self.active_region(width, height);
        if right <= left || bottom <= top {
            return Err(Error::Config(format!(
                "frame margin {} leaves no active region in the {}x{} camera frame",
                self.config.frame_margin, width, height
            )));
        }
        Ok(())
    }

    /// Run the gesture rule for one frame and drive the pointer.
    pub fn step(
        &mut self,
        hand: &HandGeometry,
        frame_size: (u32, u32),
        pointer: &mut dyn CursorControl,
        now: Instant,
    ) -> FrameAction {
        let fingers = hand.fingers_up();
        let gesture = Gesture::from_fingers(fingers);
        log::debug!("fingers {:?} -> {:?}", fingers.bits(), gesture);

        match gesture {
            Gesture::Move => {
                let tip = hand.index_tip();
                let (left, top, right, bottom) = self.active_region(frame_size.0, frame_size.1);
                if right <= left || bottom <= top {
                    // The camera switched to a frame too small for the margin.
                    log::warn!(
                        "No active region in {}x{} frame, pointer left alone",
                        frame_size.0,
                        frame_size.1
                    );
                    return FrameAction::Idle;
                }
                let x = interp(tip.x as f32, (left as f32, right as f32), (0.0, self.screen.width));
                let y = interp(tip.y as f32, (top as f32, bottom as f32), (0.0, self.screen.height));
                let (x, y) = self.cursor.advance(x, y, self.config.smoothing);
                pointer.move_to(x, y);
                FrameAction::Moved { x, y }
            }
            Gesture::ClickCandidate => {
                let from = hand.index_tip();
                let to = hand.middle_tip();
                let distance = hand.distance(landmark::INDEX_TIP, landmark::MIDDLE_TIP);
                let clicked = distance < self.config.click_distance && self.click_allowed(now);
                if clicked {
                    log::debug!("click (tip distance {distance:.1})");
                    pointer.click();
                    self.last_click = Some(now);
                }
                FrameAction::Pinch { from, to, distance, clicked }
            }
            Gesture::None => FrameAction::Idle,
        }
    }

    fn click_allowed(&self, now: Instant) -> bool {
        match self.last_click {
            Some(prev) if !self.config.click_cooldown.is_zero() => {
                now.saturating_duration_since(prev) >= self.config.click_cooldown
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::tests::{at, pose};

    #[derive(Default)]
    struct RecordingCursor {
        moves: Vec<(f32, f32)>,
        clicks: usize,
    }

    impl CursorControl for RecordingCursor {
        fn move_to(&mut self, x: f32, y: f32) {
            self.moves.push((x, y));
        }

        fn click(&mut self) {
            self.clicks += 1;
        }
    }

    const SCREEN: ScreenSize = ScreenSize { width: 1920.0, height: 1080.0 };

    fn engine() -> GestureEngine {
        GestureEngine::new(GestureConfig::default(), SCREEN)
    }

    /// Two-finger pose with the index and middle tips placed explicitly.
    fn pinch(index: (i32, i32), middle: (i32, i32)) -> HandGeometry {
        let mut hand = pose([0, 1, 1, 0, 0]);
        hand.landmarks[6] = at(index.0, index.1 + 50);
        hand.landmarks[8] = at(index.0, index.1);
        hand.landmarks[10] = at(middle.0, middle.1 + 50);
        hand.landmarks[12] = at(middle.0, middle.1);
        HandGeometry::from_landmarks(&hand, 640, 480)
    }

    #[test]
    fn interp_midpoint_is_exact() {
        assert_eq!(interp(320.0, (100.0, 540.0), (0.0, 1920.0)), 960.0);
    }

    #[test]
    fn interp_sticks_to_the_ends() {
        assert_eq!(interp(50.0, (100.0, 540.0), (0.0, 1920.0)), 0.0);
        assert_eq!(interp(600.0, (100.0, 540.0), (0.0, 1920.0)), 1920.0);
    }

    #[test]
    fn smoothing_moves_a_fifth_of_the_way() {
        assert_eq!(smooth(0.0, 100.0, 5.0), 20.0);
        assert_eq!(smooth(20.0, 100.0, 5.0), 36.0);
    }

    #[test]
    fn smoothed_position_stays_between_old_and_new() {
        let mut c = CursorState::default();
        for target in [500.0, -30.0, 1900.0, 1900.0] {
            let before = c.x;
            let (x, _) = c.advance(target, 0.0, 5.0);
            assert!(x >= before.min(target) && x <= before.max(target));
        }
    }

    #[test]
    fn gesture_table() {
        let g = |bits| Gesture::from_fingers(FingerStates::from_bits(bits));
        assert_eq!(g([0, 1, 0, 0, 0]), Gesture::Move);
        assert_eq!(g([1, 1, 0, 1, 1]), Gesture::Move);
        assert_eq!(g([0, 1, 1, 0, 0]), Gesture::ClickCandidate);
        assert_eq!(g([0, 0, 1, 0, 0]), Gesture::None);
        assert_eq!(g([0, 0, 0, 0, 0]), Gesture::None);
    }

    #[test]
    fn index_only_moves_and_never_clicks() {
        let mut hand = pose([0, 1, 0, 0, 0]);
        // index tip at the centre of the 640x480 frame, middle tip right next to it
        hand.landmarks[6] = at(320, 290);
        hand.landmarks[8] = at(320, 240);
        hand.landmarks[12] = at(322, 262);
        let hand = HandGeometry::from_landmarks(&hand, 640, 480);
        assert!(hand.distance(8, 12) < 35.0);

        let mut cursor = RecordingCursor::default();
        let mut e = engine();
        let action = e.step(&hand, (640, 480), &mut cursor, Instant::now());

        // mapped (960, 540), one fifth of the way from the origin
        assert_eq!(action, FrameAction::Moved { x: 192.0, y: 108.0 });
        assert_eq!(cursor.moves, vec![(192.0, 108.0)]);
        assert_eq!(cursor.clicks, 0);
        assert_eq!(e.cursor(), CursorState { x: 192.0, y: 108.0 });
    }

    #[test]
    fn close_pinch_clicks() {
        let hand = pinch((300, 200), (320, 200));
        let mut cursor = RecordingCursor::default();
        let action = engine().step(&hand, (640, 480), &mut cursor, Instant::now());
        assert!(matches!(action, FrameAction::Pinch { clicked: true, .. }));
        assert_eq!(cursor.clicks, 1);
        assert!(cursor.moves.is_empty());
    }

    #[test]
    fn distance_forty_does_not_click() {
        let hand = pinch((300, 200), (324, 232));
        let mut cursor = RecordingCursor::default();
        let action = engine().step(&hand, (640, 480), &mut cursor, Instant::now());
        assert_eq!(
            action,
            FrameAction::Pinch {
                from: Point::new(300, 200),
                to: Point::new(324, 232),
                distance: 40.0,
                clicked: false,
            }
        );
        assert_eq!(cursor.clicks, 0);
    }

    #[test]
    fn distance_exactly_at_threshold_does_not_click() {
        // 21-28-35 triangle
        let hand = pinch((300, 200), (321, 228));
        let mut cursor = RecordingCursor::default();
        engine().step(&hand, (640, 480), &mut cursor, Instant::now());
        assert_eq!(cursor.clicks, 0);
    }

    #[test]
    fn held_pinch_repeats_without_cooldown() {
        let hand = pinch((300, 200), (310, 200));
        let mut cursor = RecordingCursor::default();
        let mut e = engine();
        let t0 = Instant::now();
        for i in 0..3 {
            e.step(&hand, (640, 480), &mut cursor, t0 + Duration::from_millis(i * 33));
        }
        assert_eq!(cursor.clicks, 3);
    }

    #[test]
    fn cooldown_suppresses_repeat_clicks() {
        let hand = pinch((300, 200), (310, 200));
        let mut cursor = RecordingCursor::default();
        let config = GestureConfig { click_cooldown: Duration::from_millis(500), ..Default::default() };
        let mut e = GestureEngine::new(config, SCREEN);
        let t0 = Instant::now();
        e.step(&hand, (640, 480), &mut cursor, t0);
        e.step(&hand, (640, 480), &mut cursor, t0 + Duration::from_millis(100));
        assert_eq!(cursor.clicks, 1);
        e.step(&hand, (640, 480), &mut cursor, t0 + Duration::from_millis(600));
        assert_eq!(cursor.clicks, 2);
    }

    #[test]
    fn fist_does_nothing() {
        let hand = HandGeometry::from_landmarks(&pose([0, 0, 0, 0, 0]), 640, 480);
        let mut cursor = RecordingCursor::default();
        let action = engine().step(&hand, (640, 480), &mut cursor, Instant::now());
        assert_eq!(action, FrameAction::Idle);
        assert!(cursor.moves.is_empty());
        assert_eq!(cursor.clicks, 0);
    }

    #[test]
    fn small_camera_frame_is_rejected_up_front() {
        let e = engine();
        assert!(e.check_frame(640, 480).is_ok());
        assert!(matches!(e.check_frame(176, 144), Err(Error::Config(_))));
        assert!(matches!(e.check_frame(640, 200), Err(Error::Config(_))));
    }

    #[test]
    fn small_camera_frame_leaves_pointer_alone() {
        let mut cursor = RecordingCursor::default();
        let mut e = engine();
        for x in [30, 150] {
            let mut hand = pose([0, 1, 0, 0, 0]);
            hand.landmarks[6] = at(x, 110);
            hand.landmarks[8] = at(x, 60);
            let hand = HandGeometry::from_landmarks(&hand, 640, 480);
            assert_eq!(hand.index_tip(), Point::new(x, 60));
            let action = e.step(&hand, (176, 144), &mut cursor, Instant::now());
            assert_eq!(action, FrameAction::Idle);
        }
        assert!(cursor.moves.is_empty());
        assert_eq!(e.cursor(), CursorState::default());
    }

    #[test]
    fn active_region_uses_margin() {
        assert_eq!(engine().active_region(640, 480), (100, 100, 540, 380));
    }
}
