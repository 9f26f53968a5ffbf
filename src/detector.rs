//! Hand-landmark detection.
//!
//! The model itself is MediaPipe Hands, run by a small Python helper
//! (`scripts/hand_landmarks.py`) that we talk to over stdin/stdout:
//!
//! * helper prints `READY` once the model is loaded
//! * per frame we send width, height and channel count (u32 little endian)
//!   followed by the raw RGB bytes
//! * helper answers with one JSON line: `{"hands": [...], "error": null}`

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use image::RgbImage;
use serde::Deserialize;

use crate::error::Error;
use crate::types::{HandLandmarks, Landmark, landmark};

/// Knobs handed to the model when it is built.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Treat every frame as unrelated (no tracking between frames).
    pub static_image_mode: bool,
    pub max_hands: u32,
    /// 0 = lite, 1 = full.
    pub model_complexity: u32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            static_image_mode: false,
            max_hands: 1,
            model_complexity: 1,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

pub trait LandmarkDetector {
    /// All hands found in `frame`, most confident first. Empty when there are none.
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<HandLandmarks>, Error>;

    fn name(&self) -> String;
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    #[serde(default)]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionReply {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Turn one JSON reply line into hands. Malformed hands are dropped with a warning;
/// an `error` from the helper means "no hands this frame".
fn parse_reply(line: &str) -> Result<Vec<HandLandmarks>, Error> {
    let reply: DetectionReply = serde_json::from_str(line)
        .map_err(|e| Error::Detector(format!("Bad reply {:?}: {e}", line.trim())))?;

    if let Some(err) = reply.error {
        log::warn!("Hand detector reported: {err}");
        return Ok(Vec::new());
    }

    let mut hands = Vec::with_capacity(reply.hands.len());
    for hand in reply.hands {
        if hand.landmarks.len() != landmark::COUNT {
            log::warn!(
                "Expected {} landmarks, got {}",
                landmark::COUNT,
                hand.landmarks.len()
            );
            continue;
        }
        let mut landmarks = [Landmark::default(); landmark::COUNT];
        for (dst, src) in landmarks.iter_mut().zip(&hand.landmarks) {
            *dst = Landmark { x: src.x, y: src.y, z: src.z };
        }
        hands.push(HandLandmarks {
            landmarks,
            handedness: hand.handedness,
            score: hand.score,
        });
    }
    Ok(hands)
}

/// MediaPipe Hands running in a helper process.
pub struct MediaPipeHands {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    script: PathBuf,
}

impl MediaPipeHands {
    /// Spawn `python script` with the model settings and wait for `READY`.
    pub fn spawn(python: &str, script: PathBuf, config: &DetectorConfig) -> Result<Self, Error> {
        if !script.exists() {
            return Err(Error::Detector(format!(
                "Helper script not found at {}",
                script.display()
            )));
        }

        log::info!("Starting hand detector: {python} {}", script.display());

        let mut cmd = Command::new(python);
        cmd.arg(&script)
            .arg("--max-hands")
            .arg(config.max_hands.to_string())
            .arg("--model-complexity")
            .arg(config.model_complexity.to_string())
            .arg("--min-detection-confidence")
            .arg(config.min_detection_confidence.to_string())
            .arg("--min-tracking-confidence")
            .arg(config.min_tracking_confidence.to_string());
        if config.static_image_mode {
            cmd.arg("--static-image-mode");
        }

        let mut process = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Detector(format!("Spawn {python}: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| Error::Detector("Helper stdin unavailable".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::Detector("Helper stdout unavailable".into()))?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        if let Err(e) = stdout.read_line(&mut ready) {
            let _ = process.kill();
            let _ = process.wait();
            return Err(Error::Detector(format!("Wait for READY: {e}")));
        }
        if ready.trim() != "READY" {
            let _ = process.kill();
            let _ = process.wait();
            return Err(Error::Detector(format!(
                "Helper did not signal READY, got {:?}",
                ready.trim()
            )));
        }

        log::info!("Hand detector ready");
        Ok(Self { process, stdin, stdout, script })
    }
}

impl LandmarkDetector for MediaPipeHands {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<HandLandmarks>, Error> {
        let (w, h) = frame.dimensions();
        let io = |e: std::io::Error| Error::Detector(format!("Send frame: {e}"));

        self.stdin.write_all(&w.to_le_bytes()).map_err(io)?;
        self.stdin.write_all(&h.to_le_bytes()).map_err(io)?;
        self.stdin.write_all(&3u32.to_le_bytes()).map_err(io)?;
        self.stdin.write_all(frame.as_raw()).map_err(io)?;
        self.stdin.flush().map_err(io)?;

        let mut line = String::new();
        let n = self
            .stdout
            .read_line(&mut line)
            .map_err(|e| Error::Detector(format!("Read reply: {e}")))?;
        if n == 0 {
            return Err(Error::Detector("Helper exited".into()));
        }

        parse_reply(&line)
    }

    fn name(&self) -> String {
        format!("MediaPipe Hands ({})", self.script.display())
    }
}

impl Drop for MediaPipeHands {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
