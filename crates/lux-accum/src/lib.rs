//! # lux-accum
//!
//! Progressive accumulation for a path tracer's display pipeline.
//!
//! A [`RenderSession`] receives one noisy HDR sample per frame together with
//! the scene and camera changes since the previous frame. It keeps a running
//! mean in an [`AccumulationBuffer`], discards it when a
//! [`ChangeDetector`] says the samples are stale, and turns the estimate
//! into a display image through the passes in `lux-ops`.
//!
//! # Modules
//!
//! - [`change`] - scene/camera change flags and reset classification
//! - [`accumulate`] - Kahan-compensated running mean
//! - [`config`] - [`PipelineSettings`] and YAML loading
//! - [`session`] - per-frame pipeline and reset state machine
//! - [`handle`] - running a session on a worker thread
//!
//! # Example
//!
//! ```rust
//! use lux_accum::{FrameInput, PipelineSettings, RenderSession};
//! use lux_core::RgbaImage;
//!
//! let mut session = RenderSession::new(64, 36, PipelineSettings::default())?;
//! let mut display = RgbaImage::new(64, 36);
//! let frame = FrameInput::new(RgbaImage::filled(64, 36, [0.5, 0.5, 0.5, 1.0]));
//! let stats = session.render_frame(&frame, &mut display)?;
//! assert_eq!(stats.sample_count, 1);
//! # Ok::<(), lux_accum::AccumError>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod accumulate;
pub mod change;
pub mod config;
pub mod handle;
pub mod session;

pub use accumulate::AccumulationBuffer;
pub use change::{CameraChanges, ChangeDetector, SceneChanges};
pub use config::{CameraSettings, PipelineSettings};
pub use error::{AccumError, AccumResult};
pub use handle::{SessionHandle, SessionStatus};
pub use session::{FrameInput, FrameStats, RenderSession, SessionState};
