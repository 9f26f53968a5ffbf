// What you SEE:
// • The mirrored webcam feed with your hand skeleton drawn on top.
// • Point with the index finger only: the mouse pointer follows the fingertip.
// • Raise index + middle and pinch them together: left click.
// • Frame rate in the top-left corner. ESC or closing the window quits.

mod camera;
mod config;
mod cursor;
mod detector;
mod draw;
mod error;
mod gesture;
mod hand;
mod hud;
mod types;

use camera::CameraCapture;
use clap::Parser;
use config::Args;
use cursor::EnigoCursor;
use detector::{LandmarkDetector, MediaPipeHands};
use draw::{Drawer, GREEN, MAGENTA, RED};
use error::Error;
use gesture::{FrameAction, GestureEngine};
use hand::HandGeometry;
use hud::FrameClock;
use std::time::Instant;
use types::{BoundingBox, FrameBuffer};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.list_cameras {
        return camera::list_cameras();
    }
    args.validate()?;

    /* --- Camera + window setup --- */
    let mut cam = CameraCapture::new(args.camera, args.width, args.height)?;
    let (w, h) = cam.resolution();
    log::info!("Camera {} streaming at {}x{}", args.camera, w, h);
    let mut drawer = Drawer::new("Finger Mouse", w as usize, h as usize)?;

    /* --- Collaborators: hand model + OS pointer --- */
    let mut detector = MediaPipeHands::spawn(
        &args.python,
        args.detector_script.clone(),
        &args.detector_config(),
    )?;
    log::info!("Detector: {}", detector.name());

    let mut pointer = EnigoCursor::new();
    let screen = pointer.screen_size();
    log::info!("Screen {}x{}", screen.width, screen.height);

    /* --- Loop-carried state --- */
    let mut gestures = GestureEngine::new(args.gesture_config(), screen);
    // The margin was checked against the requested size; the camera may deliver less.
    gestures.check_frame(w, h)?;
    let mut clock = FrameClock::new();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        // 1) Mirrored frame from the camera; a lost camera ends the run here.
        let frame = cam.next_frame()?;
        let (fw, fh) = frame.dimensions();

        // 2) Landmarks for the first hand only.
        let hands = detector.detect(&frame)?;
        let hand = hands.first().map(|h| {
            log::trace!(
                "{} hand, score {:.2}, index tip depth {:.3}",
                h.handedness,
                h.score,
                h.landmarks[types::landmark::INDEX_TIP].z
            );
            HandGeometry::from_landmarks(h, fw, fh)
        });

        let mut screen_fb = FrameBuffer::from_rgb(&frame);

        // 3) Gestures, only when a hand is in view.
        if let Some(hand) = &hand {
            draw::draw_hand(&mut screen_fb, hand);

            let (left, top, right, bottom) = gestures.active_region(fw, fh);
            let region = BoundingBox { x_min: left, y_min: top, x_max: right, y_max: bottom };
            draw::draw_rect(&mut screen_fb, region, 2, MAGENTA);

            match gestures.step(hand, (fw, fh), &mut pointer, Instant::now()) {
                FrameAction::Pinch { from, to, distance, clicked } => {
                    log::trace!("pinch distance {distance:.1}");
                    draw::draw_thick_line(&mut screen_fb, from, to, 2, RED);
                    if clicked {
                        draw::fill_circle(&mut screen_fb, from, 4, GREEN);
                        draw::fill_circle(&mut screen_fb, to, 4, GREEN);
                    }
                }
                FrameAction::Moved { x, y } => log::trace!("pointer -> ({x:.0}, {y:.0})"),
                FrameAction::Idle => {}
            }
        }

        // 4) Frame rate overlay, then show it (this also pumps window events).
        let fps = clock.tick(Instant::now());
        draw::draw_text(&mut screen_fb, 20, 20, &fps.to_string(), 4, GREEN);
        drawer.present(&screen_fb)?;
    }

    log::info!("Window closed, exiting");
    Ok(())
}
