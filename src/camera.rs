// Opens the webcam and hands back one mirrored RGB frame per call.
// The mirror makes the preview behave like a mirror: moving your hand right
// moves the cursor right.

use crate::error::Error;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
        Resolution,
    },
};

use image::{RgbImage, imageops};

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` at a target resolution (falls back if not exact).
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );

        // Ask for RGB frames as close as possible to the requested size.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        if actual.width() != width || actual.height() != height {
            log::warn!(
                "Camera delivers {}x{} instead of the requested {}x{}",
                actual.width(),
                actual.height(),
                width,
                height
            );
        }

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
        })
    }

    /// Grab one frame (blocks until ready), decode to RGB and flip it left/right.
    pub fn next_frame(&mut self) -> Result<RgbImage, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let mut rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        imageops::flip_horizontal_in_place(&mut rgb_img);

        // Track what the device really sends; the geometry step scales by it.
        let (w, h) = rgb_img.dimensions();
        self.width = w;
        self.height = h;

        Ok(rgb_img)
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Print the cameras nokhwa can see, one per line.
pub fn list_cameras() -> Result<(), Error> {
    let cameras = nokhwa::query(ApiBackend::Auto)
        .map_err(|e| Error::CameraInit(format!("Query cameras: {e}")))?;
    if cameras.is_empty() {
        println!("No cameras found");
    }
    for cam in cameras {
        println!("{:<5} | {}", cam.index(), cam.human_name());
    }
    Ok(())
}
