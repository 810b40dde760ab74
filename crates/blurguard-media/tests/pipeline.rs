//! End-to-end pipeline tests on synthetic media.
//!
//! Detection classes are disabled in most tests so no cascade/DNN artifacts
//! are needed; the manual-region image path exercises redaction directly.

use std::path::Path;

use opencv::core::{Mat, Scalar, Size, Vec3b, Vector, CV_8UC3};
use opencv::prelude::*;
use opencv::videoio::{VideoCapture, VideoWriter, CAP_ANY};
use opencv::{imgcodecs, imgproc};

use blurguard_media::{
    process_image, process_video, redact_image_regions, run_job, Detector, MediaError,
};
use blurguard_models::{DetectionPolicy, MediaJob, Rect, RedactionPolicy};

fn no_detection_policy() -> DetectionPolicy {
    DetectionPolicy {
        prefer_neural_faces: false,
        detect_faces: false,
        detect_plates: false,
    }
}

fn noop_detector(dir: &Path) -> Detector {
    Detector::open(dir, &no_detection_policy()).expect("detector without classes")
}

fn gradient_frame(width: i32, height: i32) -> Mat {
    let mut frame =
        Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::all(0.0)).unwrap();
    for y in 0..height {
        for x in 0..width {
            let v = ((x * 3 + y * 5) % 256) as u8;
            *frame.at_2d_mut::<Vec3b>(y, x).unwrap() =
                Vec3b::from([v, v.wrapping_add(60), v.wrapping_add(120)]);
        }
    }
    frame
}

#[test]
fn unreadable_image_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut detector = noop_detector(dir.path());
    let err = process_image(
        &dir.path().join("missing.png"),
        &dir.path().join("out.png"),
        &mut detector,
        &RedactionPolicy::default(),
    )
    .unwrap_err();
    assert!(matches!(err, MediaError::UnreadableInput(_)));
}

#[test]
fn unreadable_video_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut detector = noop_detector(dir.path());
    let err = process_video(
        &dir.path().join("missing.mp4"),
        &dir.path().join("out.mp4"),
        &mut detector,
        &RedactionPolicy::default(),
    )
    .unwrap_err();
    assert!(matches!(err, MediaError::UnreadableInput(_)));
}

#[test]
fn manual_regions_only_touch_their_rectangle() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    let output = dir.path().join("nested/out/input_blurred.png");

    let frame = gradient_frame(200, 160);
    imgcodecs::imwrite(input.to_str().unwrap(), &frame, &Vector::<i32>::new()).unwrap();

    let region = Rect::new(40, 40, 50, 50);
    let policy = RedactionPolicy {
        blur_kernel: 35,
        ..Default::default()
    };
    redact_image_regions(&input, &output, &[region], &policy).unwrap();

    let written = imgcodecs::imread(output.to_str().unwrap(), imgcodecs::IMREAD_COLOR).unwrap();
    assert_eq!(written.cols(), 200);
    assert_eq!(written.rows(), 160);

    let mut inside_changed = false;
    for y in 0..160 {
        for x in 0..200 {
            let before = frame.at_2d::<Vec3b>(y, x).unwrap();
            let after = written.at_2d::<Vec3b>(y, x).unwrap();
            let inside = x >= region.x
                && x < region.x + region.width
                && y >= region.y
                && y < region.y + region.height;
            if inside {
                if before != after {
                    inside_changed = true;
                }
            } else {
                assert_eq!(before, after, "pixel outside region changed at ({x},{y})");
            }
        }
    }
    assert!(inside_changed, "blur did not alter the region");
}

#[test]
fn image_job_without_detections_is_pixel_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("plain.png");
    let frame = gradient_frame(64, 48);
    imgcodecs::imwrite(input.to_str().unwrap(), &frame, &Vector::<i32>::new()).unwrap();

    let job = MediaJob::new(
        input.clone(),
        None,
        no_detection_policy(),
        RedactionPolicy::default(),
    );
    let mut detector = noop_detector(dir.path());
    let outcome = run_job(&job, &mut detector).unwrap();
    assert_eq!(outcome.output, dir.path().join("plain_blurred.png"));

    let written =
        imgcodecs::imread(outcome.output.to_str().unwrap(), imgcodecs::IMREAD_COLOR).unwrap();
    for y in 0..48 {
        for x in 0..64 {
            assert_eq!(
                frame.at_2d::<Vec3b>(y, x).unwrap(),
                written.at_2d::<Vec3b>(y, x).unwrap()
            );
        }
    }
}

#[test]
fn trial_watermark_is_stamped_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("plain.png");
    let output = dir.path().join("marked.png");
    let frame = gradient_frame(320, 240);
    imgcodecs::imwrite(input.to_str().unwrap(), &frame, &Vector::<i32>::new()).unwrap();

    let policy = RedactionPolicy {
        watermark: true,
        ..Default::default()
    };
    redact_image_regions(&input, &output, &[], &policy).unwrap();

    let written = imgcodecs::imread(output.to_str().unwrap(), imgcodecs::IMREAD_COLOR).unwrap();
    let mut diff = Mat::default();
    opencv::core::absdiff(&frame, &written, &mut diff).unwrap();
    let mut gray = Mat::default();
    imgproc::cvt_color(&diff, &mut gray, imgproc::COLOR_BGR2GRAY, 0).unwrap();
    let changed = opencv::core::count_non_zero(&gray).unwrap();
    assert!(changed > 0, "watermark left no trace");
}

/// Write a short synthetic clip; MJPG/AVI is the most widely available
/// writer combination.
fn write_test_clip(path: &Path, frames: i32, size: Size) -> bool {
    let fourcc = VideoWriter::fourcc('M', 'J', 'P', 'G').unwrap();
    let mut writer = match VideoWriter::new(path.to_str().unwrap(), fourcc, 10.0, size, true) {
        Ok(w) => w,
        Err(_) => return false,
    };
    if !writer.is_opened().unwrap_or(false) {
        return false;
    }
    for i in 0..frames {
        let frame = Mat::new_rows_cols_with_default(
            size.height,
            size.width,
            CV_8UC3,
            Scalar::new(f64::from(i * 20 % 255), 80.0, 160.0, 0.0),
        )
        .unwrap();
        writer.write(&frame).unwrap();
    }
    writer.release().unwrap();
    true
}

#[test]
fn video_with_zero_detections_round_trips_frame_count_and_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("clip.avi");
    let size = Size::new(96, 64);
    assert!(
        write_test_clip(&input, 12, size),
        "environment cannot write MJPG/AVI test clips"
    );

    let mut detector = noop_detector(dir.path());
    let outcome = process_video(
        &input,
        &dir.path().join("clip_blurred.mp4"),
        &mut detector,
        &RedactionPolicy::default(),
    )
    .unwrap();

    assert_eq!(outcome.frames, 12);
    assert!(outcome.output.exists());
    if outcome.fallback_used {
        assert_eq!(
            outcome.output,
            dir.path().join("clip_blurred_reencoded.avi")
        );
    }

    let mut reread = VideoCapture::from_file(outcome.output.to_str().unwrap(), CAP_ANY).unwrap();
    assert!(reread.is_opened().unwrap());
    let mut frame = Mat::default();
    let mut count = 0;
    while reread.read(&mut frame).unwrap() && !frame.empty() {
        assert_eq!(frame.cols(), size.width);
        assert_eq!(frame.rows(), size.height);
        count += 1;
    }
    assert_eq!(count, 12);
}
