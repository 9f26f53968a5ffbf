// Command line overrides. Every default is the value the loop was tuned with,
// so running with no flags gives the stock behaviour.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::detector::DetectorConfig;
use crate::error::Error;
use crate::gesture::GestureConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "finger-mouse", version, about = "Drive the mouse pointer with your index finger")]
pub struct Args {
    /// Print the available cameras and exit
    #[arg(long)]
    pub list_cameras: bool,

    /// Camera device index
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested capture width (the camera may pick another)
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Requested capture height (the camera may pick another)
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Pixels trimmed off each camera edge before mapping to the screen
    #[arg(long, default_value_t = 100)]
    pub frame_margin: i32,

    /// Smoothing divisor; higher is steadier but laggier
    #[arg(long, default_value_t = 5.0)]
    pub smoothing: f32,

    /// Index/middle tip distance (pixels) below which a click fires
    #[arg(long, default_value_t = 35.0)]
    pub click_distance: f32,

    /// Minimum time between clicks in ms; 0 clicks on every pinched frame
    #[arg(long, default_value_t = 0)]
    pub click_cooldown_ms: u64,

    /// Minimum confidence for a new hand detection
    #[arg(long, default_value_t = 0.5)]
    pub min_detection_confidence: f32,

    /// Minimum confidence to keep tracking a hand between frames
    #[arg(long, default_value_t = 0.5)]
    pub min_tracking_confidence: f32,

    /// Hand model complexity (0 = lite, 1 = full)
    #[arg(long, default_value_t = 1)]
    pub model_complexity: u32,

    /// Python interpreter with mediapipe installed
    #[arg(long, default_value = "python3")]
    pub python: String,

    /// Path to the landmark helper script
    #[arg(long, default_value = "scripts/hand_landmarks.py")]
    pub detector_script: PathBuf,
}

impl Args {
    /// Reject combinations that would break the maths.
    pub fn validate(&self) -> Result<(), Error> {
        if self.smoothing.is_nan() || self.smoothing < 1.0 {
            return Err(Error::Config(format!(
                "--smoothing must be at least 1, got {}",
                self.smoothing
            )));
        }
        if self.click_distance.is_nan() || self.click_distance <= 0.0 {
            return Err(Error::Config(format!(
                "--click-distance must be positive, got {}",
                self.click_distance
            )));
        }
        if self.frame_margin < 0
            || 2 * self.frame_margin >= self.width as i32
            || 2 * self.frame_margin >= self.height as i32
        {
            return Err(Error::Config(format!(
                "--frame-margin {} leaves no active region in {}x{}",
                self.frame_margin, self.width, self.height
            )));
        }
        if self.model_complexity > 1 {
            return Err(Error::Config(format!(
                "--model-complexity must be 0 or 1, got {}",
                self.model_complexity
            )));
        }
        Ok(())
    }

    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            frame_margin: self.frame_margin,
            smoothing: self.smoothing,
            click_distance: self.click_distance,
            click_cooldown: Duration::from_millis(self.click_cooldown_ms),
        }
    }

    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            min_detection_confidence: self.min_detection_confidence,
            min_tracking_confidence: self.min_tracking_confidence,
            model_complexity: self.model_complexity,
            ..DetectorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["finger-mouse"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_match_the_tuned_constants() {
        let args = parse(&[]);
        assert!(args.validate().is_ok());
        assert_eq!(args.gesture_config(), GestureConfig::default());
        assert_eq!(args.detector_config(), DetectorConfig::default());
        assert_eq!((args.camera, args.width, args.height), (0, 640, 480));
    }

    #[test]
    fn overrides_flow_into_configs() {
        let args = parse(&["--smoothing", "8", "--click-cooldown-ms", "250"]);
        let g = args.gesture_config();
        assert_eq!(g.smoothing, 8.0);
        assert_eq!(g.click_cooldown, Duration::from_millis(250));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse(&["--smoothing", "0.5"]).validate().is_err());
        assert!(parse(&["--click-distance", "0"]).validate().is_err());
        assert!(parse(&["--frame-margin", "240"]).validate().is_err());
        assert!(parse(&["--model-complexity", "2"]).validate().is_err());
    }

    #[test]
    fn rejects_nan() {
        assert!(parse(&["--smoothing", "NaN"]).validate().is_err());
        assert!(parse(&["--click-distance", "NaN"]).validate().is_err());
    }
}
