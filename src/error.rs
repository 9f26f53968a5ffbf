// One error type for the whole loop.
// Every variant states *where* things went wrong; main just prints it and exits.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the frame to the window failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Detector error: {0}")]
    Detector(String), // Helper process could not start or broke the protocol
    #[error("Config error: {0}")]
    Config(String), // Command line values that make no sense together
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_part() {
        let e = Error::CameraFrame("Fetch frame: timeout".into());
        assert_eq!(e.to_string(), "Camera frame error: Fetch frame: timeout");

        let e = Error::Detector("helper exited".into());
        assert_eq!(e.to_string(), "Detector error: helper exited");
    }
}
