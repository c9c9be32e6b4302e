//! Session running on a worker thread.
//!
//! Each [`SessionHandle`] owns exactly one [`RenderSession`], so several
//! sessions can run side by side without shared state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::{AccumError, AccumResult, RenderSession};

/// Lifecycle of a spawned session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionStatus {
    /// Spawned, driver not started yet.
    Idle = 0,
    /// Driver running.
    Running = 1,
    /// Driver returned successfully.
    Finished = 2,
    /// Driver returned an error or panicked.
    Failed = 3,
}

impl SessionStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Finished,
            _ => Self::Failed,
        }
    }

    /// Returns true for `Finished` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }
}

/// Handle to a session moved onto a worker thread.
///
/// # Example
///
/// ```rust
/// use lux_accum::{FrameInput, PipelineSettings, RenderSession, SessionHandle, SessionStatus};
/// use lux_core::RgbaImage;
///
/// let session = RenderSession::new(8, 8, PipelineSettings::default()).unwrap();
/// let handle = SessionHandle::spawn(session, |s| {
///     let mut target = RgbaImage::new(8, 8);
///     let frame = FrameInput::new(RgbaImage::filled(8, 8, [1.0, 1.0, 1.0, 1.0]));
///     for _ in 0..4 {
///         s.render_frame(&frame, &mut target)?;
///     }
///     Ok(())
/// })
/// .unwrap();
/// let session = handle.join().unwrap();
/// assert_eq!(session.sample_count(), 4);
/// ```
#[derive(Debug)]
pub struct SessionHandle {
    status: Arc<AtomicU8>,
    thread: JoinHandle<AccumResult<RenderSession>>,
}

impl SessionHandle {
    /// Moves `session` to a new thread and runs `driver` on it.
    ///
    /// # Errors
    ///
    /// [`AccumError::Io`] if the thread cannot be spawned.
    pub fn spawn<F>(session: RenderSession, driver: F) -> AccumResult<Self>
    where
        F: FnOnce(&mut RenderSession) -> AccumResult<()> + Send + 'static,
    {
        let status = Arc::new(AtomicU8::new(SessionStatus::Idle as u8));
        let worker_status = Arc::clone(&status);

        let thread = thread::Builder::new()
            .name("lux-session".into())
            .spawn(move || {
                worker_status.store(SessionStatus::Running as u8, Ordering::Release);
                let mut session = session;
                match driver(&mut session) {
                    Ok(()) => {
                        debug!(samples = session.sample_count(), "session finished");
                        worker_status.store(SessionStatus::Finished as u8, Ordering::Release);
                        Ok(session)
                    }
                    Err(e) => {
                        warn!(error = %e, "session failed");
                        worker_status.store(SessionStatus::Failed as u8, Ordering::Release);
                        Err(e)
                    }
                }
            })?;

        Ok(Self { status, thread })
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SessionStatus {
        SessionStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Returns true while the driver has not returned.
    pub fn is_running(&self) -> bool {
        !self.status().is_terminal()
    }

    /// Waits for the driver and returns the session.
    ///
    /// # Errors
    ///
    /// The driver's error, or [`AccumError::Worker`] if it panicked.
    pub fn join(self) -> AccumResult<RenderSession> {
        match self.thread.join() {
            Ok(result) => result,
            Err(_) => {
                self.status.store(SessionStatus::Failed as u8, Ordering::Release);
                Err(AccumError::Worker("session driver panicked".into()))
            }
        }
    }
}
