//! Classification of scene and camera changes.
//!
//! Accumulated samples are only valid while nothing that affects the image
//! has changed. Sub-pixel jitter and history bookkeeping change every frame
//! by design of progressive rendering and must not discard samples.

use bitflags::bitflags;

bitflags! {
    /// Scene updates reported for one frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SceneChanges: u32 {
        /// Mesh instance transforms changed.
        const MESHES_MOVED              = 1 << 0;
        /// Geometry was added, removed or edited.
        const GEOMETRY_CHANGED          = 1 << 1;
        /// Material parameters changed.
        const MATERIALS_CHANGED         = 1 << 2;
        /// Light transforms changed.
        const LIGHTS_MOVED              = 1 << 3;
        /// Light parameters changed.
        const LIGHTS_CHANGED            = 1 << 4;
        /// Environment map changed.
        const ENV_MAP_CHANGED           = 1 << 5;
        /// Scene graph structure changed.
        const SCENE_GRAPH_CHANGED       = 1 << 6;
        /// Active camera moved.
        const CAMERA_MOVED              = 1 << 7;
        /// Active camera replaced.
        const CAMERA_SWITCHED           = 1 << 8;
        /// Camera properties changed, see [`CameraChanges`].
        const CAMERA_PROPERTIES_CHANGED = 1 << 9;
        /// Renderer settings changed.
        const RENDER_SETTINGS_CHANGED   = 1 << 10;
    }
}

bitflags! {
    /// Camera property updates reported for one frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CameraChanges: u32 {
        /// Position, target or up vector.
        const MOVEMENT       = 1 << 0;
        /// Field of view, aspect ratio or clip planes.
        const FRUSTUM        = 1 << 1;
        /// Aperture.
        const EXPOSURE       = 1 << 2;
        /// Focus distance.
        const FOCAL_DISTANCE = 1 << 3;
        /// Sub-pixel jitter.
        const JITTER         = 1 << 4;
        /// Previous-frame data.
        const HISTORY        = 1 << 5;
    }
}

/// Decides whether a frame's changes invalidate accumulated samples.
///
/// ```rust
/// use lux_accum::{CameraChanges, ChangeDetector, SceneChanges};
///
/// let detector = ChangeDetector::default();
/// assert!(!detector.reset_required(
///     SceneChanges::CAMERA_PROPERTIES_CHANGED,
///     CameraChanges::JITTER,
/// ));
/// assert!(detector.reset_required(SceneChanges::LIGHTS_MOVED, CameraChanges::empty()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeDetector {
    ignored_camera: CameraChanges,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self {
            ignored_camera: CameraChanges::JITTER | CameraChanges::HISTORY,
        }
    }
}

impl ChangeDetector {
    /// Detector that ignores the given camera changes.
    pub fn with_ignored_camera(ignored_camera: CameraChanges) -> Self {
        Self { ignored_camera }
    }

    /// Returns true when accumulated samples must be discarded.
    ///
    /// Any scene change other than `CAMERA_PROPERTIES_CHANGED` resets. When
    /// that is the only scene change, the camera flags decide, minus the
    /// ignored set. Camera flags are not consulted without it.
    pub fn reset_required(&self, scene: SceneChanges, camera: CameraChanges) -> bool {
        if scene.is_empty() {
            return false;
        }
        if scene != SceneChanges::CAMERA_PROPERTIES_CHANGED {
            return true;
        }
        !(camera - self.ignored_camera).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_changes() {
        let d = ChangeDetector::default();
        assert!(!d.reset_required(SceneChanges::empty(), CameraChanges::empty()));
        // Camera flags without the scene bit are not consulted
        assert!(!d.reset_required(SceneChanges::empty(), CameraChanges::MOVEMENT));
    }

    #[test]
    fn test_every_other_scene_bit_resets() {
        let d = ChangeDetector::default();
        for flag in SceneChanges::all().iter() {
            if flag == SceneChanges::CAMERA_PROPERTIES_CHANGED {
                continue;
            }
            assert!(d.reset_required(flag, CameraChanges::empty()), "{flag:?}");
            assert!(d.reset_required(
                flag | SceneChanges::CAMERA_PROPERTIES_CHANGED,
                CameraChanges::JITTER
            ));
        }
    }

    #[test]
    fn test_camera_properties() {
        let d = ChangeDetector::default();
        let cam = SceneChanges::CAMERA_PROPERTIES_CHANGED;
        assert!(!d.reset_required(cam, CameraChanges::empty()));
        assert!(!d.reset_required(cam, CameraChanges::JITTER | CameraChanges::HISTORY));
        assert!(d.reset_required(cam, CameraChanges::FOCAL_DISTANCE));
        assert!(d.reset_required(cam, CameraChanges::JITTER | CameraChanges::FRUSTUM));
    }

    #[test]
    fn test_custom_ignore_mask() {
        let d = ChangeDetector::with_ignored_camera(CameraChanges::JITTER | CameraChanges::EXPOSURE);
        let cam = SceneChanges::CAMERA_PROPERTIES_CHANGED;
        assert!(!d.reset_required(cam, CameraChanges::EXPOSURE));
        assert!(d.reset_required(cam, CameraChanges::HISTORY));
    }
}
