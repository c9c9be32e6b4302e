//! Render session: per-frame pipeline and reset state machine.
//!
//! ```text
//!                  reset required | camera settings edit | resize | request
//!   Accumulating ----------------------------------------------------------> Resetting
//!        ^                                                                      |
//!        +------------------- next frame clears the buffers --------------------+
//! ```
//!
//! A frame runs, in order: change detection, pending reset, accumulation,
//! estimate, antialiasing, luminance pyramid, tone mapping into the caller's
//! target.

use lux_core::{Error, RgbaImage};
use lux_lut::Lut3D;
use lux_ops::{AntialiasFilter, LuminancePyramid, ToneMapper};
use tracing::{debug, trace};

use crate::{AccumResult, AccumulationBuffer, CameraChanges, ChangeDetector, PipelineSettings, SceneChanges};

/// Accumulation state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Samples are being added to a valid estimate.
    Accumulating,
    /// The estimate is stale; the next frame starts over.
    Resetting,
}

/// One frame handed to [`RenderSession::render_frame`].
#[derive(Debug, Clone)]
pub struct FrameInput {
    /// HDR radiance for this frame.
    pub sample: RgbaImage,
    /// Scene updates since the previous frame.
    pub scene_changes: SceneChanges,
    /// Camera property updates since the previous frame.
    pub camera_changes: CameraChanges,
}

impl FrameInput {
    /// Frame with no reported changes.
    pub fn new(sample: RgbaImage) -> Self {
        Self {
            sample,
            scene_changes: SceneChanges::empty(),
            camera_changes: CameraChanges::empty(),
        }
    }

    /// Sets the reported changes.
    pub fn with_changes(mut self, scene: SceneChanges, camera: CameraChanges) -> Self {
        self.scene_changes = scene;
        self.camera_changes = camera;
        self
    }
}

/// Counters after a rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames accumulated since the session started.
    pub frame_index: u64,
    /// Samples in the current estimate.
    pub sample_count: u64,
    /// Whether this frame discarded previous samples.
    pub reset: bool,
}

/// Owns the accumulation buffers and settings of one progressive render.
#[derive(Debug)]
pub struct RenderSession {
    settings: PipelineSettings,
    detector: ChangeDetector,
    buffer: AccumulationBuffer,
    lut: Option<Lut3D>,
    state: SessionState,
}

impl RenderSession {
    /// Creates a session rendering at `width` x `height`.
    pub fn new(width: u32, height: u32, settings: PipelineSettings) -> AccumResult<Self> {
        Ok(Self {
            settings: settings.sanitized(),
            detector: ChangeDetector::default(),
            buffer: AccumulationBuffer::new(width, height)?,
            lut: None,
            state: SessionState::Accumulating,
        })
    }

    /// Replaces the change detector.
    pub fn with_detector(mut self, detector: ChangeDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Current settings.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Output resolution.
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Samples in the current estimate.
    pub fn sample_count(&self) -> u64 {
        self.buffer.sample_count()
    }

    /// Swaps in new settings, sanitized.
    ///
    /// Camera setting edits schedule a reset; display-only edits apply to
    /// the next frame without discarding samples.
    pub fn update_settings(&mut self, settings: PipelineSettings) {
        let settings = settings.sanitized();
        if self.settings.invalidates_accumulation(&settings) {
            debug!("camera settings changed, accumulation will reset");
            self.state = SessionState::Resetting;
        }
        self.settings = settings;
    }

    /// Discards accumulated samples on the next frame.
    pub fn request_reset(&mut self) {
        self.state = SessionState::Resetting;
    }

    /// Binds or clears the grading LUT.
    pub fn set_lut(&mut self, lut: Option<Lut3D>) {
        self.lut = lut;
    }

    /// Bound grading LUT.
    pub fn lut(&self) -> Option<&Lut3D> {
        self.lut.as_ref()
    }

    /// Changes the output resolution.
    ///
    /// The new buffers start empty. The session still enters
    /// [`SessionState::Resetting`] so the next frame reports the discard in
    /// [`FrameStats::reset`].
    ///
    /// # Errors
    ///
    /// Zero width or height, or allocation failure. The session keeps its
    /// previous buffers and state then.
    pub fn resize(&mut self, width: u32, height: u32) -> AccumResult<()> {
        if (width, height) == self.dimensions() {
            return Ok(());
        }
        self.buffer.resize(width, height)?;
        self.state = SessionState::Resetting;
        Ok(())
    }

    /// Accumulates `frame` and writes the display image into `target`.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if the sample or `target` differ from
    /// the session resolution. Nothing is accumulated or written then.
    pub fn render_frame(&mut self, frame: &FrameInput, target: &mut RgbaImage) -> AccumResult<FrameStats> {
        let dims = self.dimensions();
        if frame.sample.dimensions() != dims {
            return Err(Error::dimension_mismatch(dims, frame.sample.dimensions()).into());
        }
        if target.dimensions() != dims {
            return Err(Error::dimension_mismatch(dims, target.dimensions()).into());
        }
        trace!(frame = self.buffer.frame_index(), "RenderSession::render_frame");

        if self.detector.reset_required(frame.scene_changes, frame.camera_changes) {
            self.state = SessionState::Resetting;
        }
        let reset = self.state == SessionState::Resetting;
        if reset {
            // After a resize the buffers are fresh and hold no samples
            if self.buffer.sample_count() > 0 {
                self.buffer.reset();
            }
            self.state = SessionState::Accumulating;
        }

        self.buffer.accumulate(&frame.sample)?;

        let estimate = self.buffer.current_estimate();
        let filtered = AntialiasFilter::new(self.settings.antialias).apply(&estimate);
        let pyramid = LuminancePyramid::build(&filtered);
        ToneMapper::new(&self.settings.grading, &self.settings.tone).apply(
            &filtered,
            &pyramid,
            self.lut.as_ref(),
            target,
        )?;

        Ok(FrameStats {
            frame_index: self.buffer.frame_index(),
            sample_count: self.buffer.sample_count(),
            reset,
        })
    }

    /// Current HDR estimate.
    pub fn estimate(&self) -> RgbaImage {
        self.buffer.current_estimate()
    }
}
