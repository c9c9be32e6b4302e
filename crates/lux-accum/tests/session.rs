//! End-to-end behaviour of render sessions.

use approx::assert_abs_diff_eq;
use lux_accum::{
    AccumError, AccumulationBuffer, CameraChanges, ChangeDetector, FrameInput, PipelineSettings,
    RenderSession, SceneChanges, SessionHandle, SessionState, SessionStatus,
};
use lux_core::RgbaImage;
use lux_lut::Lut3D;

fn frame(w: u32, h: u32, px: [f32; 4]) -> FrameInput {
    FrameInput::new(RgbaImage::filled(w, h, px))
}

fn wait_terminal(handle: &SessionHandle) -> SessionStatus {
    loop {
        let status = handle.status();
        if status.is_terminal() {
            return status;
        }
        std::thread::yield_now();
    }
}

#[test]
fn constant_frames_converge_to_input() {
    let mut acc = AccumulationBuffer::new(64, 32).unwrap();
    let sample = RgbaImage::filled(64, 32, [0.5, 0.5, 0.5, 1.0]);
    for i in 1..=10 {
        acc.accumulate(&sample).unwrap();
        assert_eq!(acc.sample_count(), i);
        let est = acc.current_estimate();
        assert_eq!(est.max_abs_diff(&sample), Some(0.0));
    }
}

#[test]
fn noisy_frames_average() {
    let mut acc = AccumulationBuffer::new(2, 2).unwrap();
    for i in 0..100 {
        let v = if i % 2 == 0 { 0.0 } else { 2.0 };
        acc.accumulate(&RgbaImage::filled(2, 2, [v, v, v, 1.0])).unwrap();
    }
    assert_abs_diff_eq!(acc.current_estimate().pixel(1, 1)[0], 1.0, epsilon = 1e-6);
}

#[test]
fn reset_gives_zero_estimate() {
    let mut acc = AccumulationBuffer::new(8, 8).unwrap();
    acc.accumulate(&RgbaImage::filled(8, 8, [3.0; 4])).unwrap();
    acc.reset();
    assert_eq!(acc.sample_count(), 0);
    assert!(acc.current_estimate().data().iter().all(|&v| v == 0.0));
}

#[test]
fn resize_gives_zero_estimate_at_new_size() {
    let mut acc = AccumulationBuffer::new(1920, 1080).unwrap();
    acc.accumulate(&RgbaImage::filled(1920, 1080, [1.0, 0.5, 0.25, 1.0])).unwrap();
    acc.resize(1280, 720).unwrap();

    assert_eq!(acc.sample_count(), 0);
    let est = acc.current_estimate();
    assert_eq!(est.dimensions(), (1280, 720));
    assert!(est.data().iter().all(|&v| v == 0.0));
}

#[test]
fn invalid_resize_keeps_buffers() {
    let mut acc = AccumulationBuffer::new(16, 16).unwrap();
    let sample = RgbaImage::filled(16, 16, [0.25, 0.5, 0.75, 1.0]);
    acc.accumulate(&sample).unwrap();

    assert!(acc.resize(0, 720).is_err());
    assert!(acc.resize(1280, 0).is_err());
    assert_eq!(acc.dimensions(), (16, 16));
    assert_eq!(acc.sample_count(), 1);
    assert_eq!(acc.current_estimate().max_abs_diff(&sample), Some(0.0));
}

#[test]
fn jitter_only_keeps_accumulating() {
    let mut s = RenderSession::new(16, 16, PipelineSettings::default()).unwrap();
    let mut target = RgbaImage::new(16, 16);
    for _ in 0..5 {
        let f = frame(16, 16, [0.5, 0.5, 0.5, 1.0]).with_changes(
            SceneChanges::CAMERA_PROPERTIES_CHANGED,
            CameraChanges::JITTER | CameraChanges::HISTORY,
        );
        let stats = s.render_frame(&f, &mut target).unwrap();
        assert!(!stats.reset);
    }
    assert_eq!(s.sample_count(), 5);
}

#[test]
fn scene_change_resets() {
    let mut s = RenderSession::new(16, 16, PipelineSettings::default()).unwrap();
    let mut target = RgbaImage::new(16, 16);
    for _ in 0..3 {
        s.render_frame(&frame(16, 16, [1.0; 4]), &mut target).unwrap();
    }

    let moved = frame(16, 16, [0.25, 0.25, 0.25, 1.0])
        .with_changes(SceneChanges::MESHES_MOVED, CameraChanges::empty());
    let stats = s.render_frame(&moved, &mut target).unwrap();
    assert!(stats.reset);
    assert_eq!(stats.sample_count, 1);
    assert_eq!(stats.frame_index, 4);
    assert_eq!(s.estimate().pixel(3, 3), [0.25, 0.25, 0.25, 1.0]);
}

#[test]
fn camera_focus_change_resets() {
    let mut s = RenderSession::new(8, 8, PipelineSettings::default()).unwrap();
    let mut target = RgbaImage::new(8, 8);
    s.render_frame(&frame(8, 8, [1.0; 4]), &mut target).unwrap();
    let f = frame(8, 8, [1.0; 4]).with_changes(
        SceneChanges::CAMERA_PROPERTIES_CHANGED,
        CameraChanges::FOCAL_DISTANCE | CameraChanges::JITTER,
    );
    assert!(s.render_frame(&f, &mut target).unwrap().reset);
}

#[test]
fn depth_of_field_toggle_resets() {
    let mut s = RenderSession::new(8, 8, PipelineSettings::default()).unwrap();
    let mut target = RgbaImage::new(8, 8);
    s.render_frame(&frame(8, 8, [1.0; 4]), &mut target).unwrap();
    s.render_frame(&frame(8, 8, [1.0; 4]), &mut target).unwrap();

    let mut next = *s.settings();
    next.camera.depth_of_field = true;
    s.update_settings(next);
    assert_eq!(s.state(), SessionState::Resetting);

    let stats = s.render_frame(&frame(8, 8, [1.0; 4]), &mut target).unwrap();
    assert!(stats.reset);
    assert_eq!(stats.sample_count, 1);
    assert_eq!(s.state(), SessionState::Accumulating);
}

#[test]
fn session_resize_invalidates() {
    let mut s = RenderSession::new(32, 18, PipelineSettings::default()).unwrap();
    let mut target = RgbaImage::new(32, 18);
    s.render_frame(&frame(32, 18, [1.0; 4]), &mut target).unwrap();

    s.resize(16, 9).unwrap();
    assert_eq!(s.dimensions(), (16, 9));
    assert_eq!(s.sample_count(), 0);
    assert!(s.estimate().data().iter().all(|&v| v == 0.0));

    let mut small = RgbaImage::new(16, 9);
    let stats = s.render_frame(&frame(16, 9, [1.0; 4]), &mut small).unwrap();
    assert!(stats.reset);
    assert_eq!(stats.sample_count, 1);
    assert_eq!(s.estimate().pixel(5, 5), [1.0; 4]);
}

#[test]
fn failed_frame_leaves_target_untouched() {
    let mut s = RenderSession::new(8, 8, PipelineSettings::default()).unwrap();
    let marker = RgbaImage::filled(8, 8, [0.125; 4]);

    let mut target = marker.clone();
    let err = s.render_frame(&frame(4, 4, [1.0; 4]), &mut target).unwrap_err();
    assert!(matches!(err, AccumError::Core(_)));
    assert_eq!(target, marker);
    assert_eq!(s.sample_count(), 0);

    let mut wrong_target = RgbaImage::filled(4, 4, [0.125; 4]);
    assert!(s.render_frame(&frame(8, 8, [1.0; 4]), &mut wrong_target).is_err());
    assert_eq!(wrong_target, RgbaImage::filled(4, 4, [0.125; 4]));
    assert_eq!(s.sample_count(), 0);
}

#[test]
fn custom_detector_ignores_exposure() {
    let detector = ChangeDetector::with_ignored_camera(
        CameraChanges::JITTER | CameraChanges::HISTORY | CameraChanges::EXPOSURE,
    );
    let mut s = RenderSession::new(8, 8, PipelineSettings::default())
        .unwrap()
        .with_detector(detector);
    let mut target = RgbaImage::new(8, 8);
    s.render_frame(&frame(8, 8, [1.0; 4]), &mut target).unwrap();

    let exposure = frame(8, 8, [1.0; 4])
        .with_changes(SceneChanges::CAMERA_PROPERTIES_CHANGED, CameraChanges::EXPOSURE);
    assert!(!s.render_frame(&exposure, &mut target).unwrap().reset);
    assert_eq!(s.sample_count(), 2);
}

#[test]
fn local_luminance_shapes_display() {
    let mut settings = PipelineSettings::default();
    settings.antialias.enabled = false;
    let mut s = RenderSession::new(64, 64, settings).unwrap();

    // Same radiance in a dark and a bright surround
    let mut sample = RgbaImage::new(64, 64);
    for y in 0..64 {
        for x in 0..64 {
            let v = if x < 32 { 0.05 } else { 5.0 };
            sample.set_pixel(x, y, [v, v, v, 1.0]);
        }
    }
    sample.set_pixel(8, 32, [0.5, 0.5, 0.5, 1.0]);
    sample.set_pixel(56, 32, [0.5, 0.5, 0.5, 1.0]);

    let mut target = RgbaImage::new(64, 64);
    s.render_frame(&FrameInput::new(sample), &mut target).unwrap();
    let dark_side = target.pixel(8, 32);
    let bright_side = target.pixel(56, 32);
    assert!(dark_side[0] > bright_side[0], "{dark_side:?} vs {bright_side:?}");
}

#[test]
fn display_output_is_in_range() {
    let mut s = RenderSession::new(16, 16, PipelineSettings::default()).unwrap();
    s.set_lut(Some(Lut3D::identity(17)));
    assert_eq!(s.lut().map(Lut3D::size), Some(17));
    let mut settings = *s.settings();
    settings.grading.use_lut = true;
    settings.grading.use_white_balance = true;
    settings.grading.white_point_kelvin = 3200.0;
    s.update_settings(settings);

    let mut sample = RgbaImage::new(16, 16);
    for y in 0..16 {
        for x in 0..16 {
            let v = (x * y) as f32 / 16.0;
            sample.set_pixel(x, y, [v, v * 0.5, 8.0 - v, 1.0]);
        }
    }
    let mut target = RgbaImage::new(16, 16);
    s.render_frame(&FrameInput::new(sample), &mut target).unwrap();
    assert!(target.data().iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn handle_reports_finished() {
    let session = RenderSession::new(8, 8, PipelineSettings::default()).unwrap();
    let handle = SessionHandle::spawn(session, |s| {
        let mut target = RgbaImage::new(8, 8);
        for _ in 0..3 {
            s.render_frame(&frame(8, 8, [0.5, 0.5, 0.5, 1.0]), &mut target)?;
        }
        Ok(())
    })
    .unwrap();

    assert_eq!(wait_terminal(&handle), SessionStatus::Finished);
    assert!(!handle.is_running());
    let session = handle.join().unwrap();
    assert_eq!(session.sample_count(), 3);
}

#[test]
fn handle_reports_failed() {
    let session = RenderSession::new(8, 8, PipelineSettings::default()).unwrap();
    let handle = SessionHandle::spawn(session, |s| {
        let mut target = RgbaImage::new(8, 8);
        s.render_frame(&frame(2, 2, [1.0; 4]), &mut target)?;
        Ok(())
    })
    .unwrap();

    assert_eq!(wait_terminal(&handle), SessionStatus::Failed);
    assert!(handle.join().is_err());
}

#[test]
fn independent_sessions_run_in_parallel() {
    let handles: Vec<_> = (1..=3)
        .map(|i| {
            let session = RenderSession::new(8, 8, PipelineSettings::default()).unwrap();
            SessionHandle::spawn(session, move |s| {
                let mut target = RgbaImage::new(8, 8);
                for _ in 0..i {
                    s.render_frame(&frame(8, 8, [i as f32; 4]), &mut target)?;
                }
                Ok(())
            })
            .unwrap()
        })
        .collect();

    for (i, handle) in (1..=3).zip(handles) {
        let session = handle.join().unwrap();
        assert_eq!(session.sample_count(), i as u64);
        assert_eq!(session.estimate().pixel(0, 0), [i as f32; 4]);
    }
}
