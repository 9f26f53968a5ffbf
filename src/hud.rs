// Frame-rate readout: instantaneous rate from the gap since the previous frame.

use std::time::Instant;

/// Timestamp of the previous frame, carried through the loop.
#[derive(Default)]
pub struct FrameClock {
    prev: Option<Instant>,
    window_start: Option<Instant>,
    frames_in_window: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now` and return the instantaneous rate in whole frames per second.
    /// The first frame has nothing to compare against and reports 0.
    pub fn tick(&mut self, now: Instant) -> u32 {
        let fps = match self.prev {
            Some(prev) => {
                let dt = now.saturating_duration_since(prev).as_secs_f32();
                if dt > 0.0 { (1.0 / dt) as u32 } else { 0 }
            }
            None => 0,
        };
        self.prev = Some(now);

        // Averaged figure once per second for the log.
        self.frames_in_window += 1;
        let start = *self.window_start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start).as_secs_f32();
        if elapsed >= 1.0 {
            log::debug!("FPS: {:.1}", self.frames_in_window as f32 / elapsed);
            self.frames_in_window = 0;
            self.window_start = Some(now);
        }

        fps
    }
}
