use bodycap_core::{
    config::{BodyTrackingConfig, CameraConfig, PositionalTrackingConfig},
    joint::BODY_34_JOINTS,
    point::Point,
};

use crate::error::ErrorCode;

/// One tracked person as reported by the tracking service.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyData {
    pub id: i32,
    /// Root position of the body.
    pub position: Point,
    /// BODY_34 keypoints, indexed by joint index.
    pub keypoints: [Point; BODY_34_JOINTS],
}

impl BodyData {
    pub fn new(id: i32, position: Point) -> Self {
        Self {
            id,
            position,
            keypoints: [Point::default(); BODY_34_JOINTS],
        }
    }
}

/// Result of a single retrieve call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bodies {
    /// False when the service has nothing newer than the last retrieve.
    pub is_new: bool,
    pub body_list: Vec<BodyData>,
}

impl Bodies {
    pub fn fresh(body_list: Vec<BodyData>) -> Self {
        Self {
            is_new: true,
            body_list,
        }
    }

    pub fn stale() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTrackingRuntime {
    pub detection_confidence_threshold: f32,
}

impl From<&BodyTrackingConfig> for BodyTrackingRuntime {
    fn from(config: &BodyTrackingConfig) -> Self {
        Self {
            detection_confidence_threshold: f32::from(config.detection_confidence_threshold),
        }
    }
}

/// The device-and-inference service behind a capture session.
///
/// Calls are blocking. Implementations don't need to guard against misuse
/// ordering, [`crate::Session`] enforces open → enable → poll → disable → close.
pub trait BodyTracker {
    fn open(&mut self, params: &CameraConfig) -> Result<(), ErrorCode>;
    fn enable_positional_tracking(
        &mut self,
        params: &PositionalTrackingConfig,
    ) -> Result<(), ErrorCode>;
    fn enable_body_tracking(&mut self, params: &BodyTrackingConfig) -> Result<(), ErrorCode>;
    /// Acquires the next frame and runs the enabled modules on it.
    fn grab(&mut self) -> Result<(), ErrorCode>;
    /// Latest detection result for the last grabbed frame.
    fn retrieve_bodies(&mut self, runtime: &BodyTrackingRuntime) -> Result<Bodies, ErrorCode>;
    fn disable_body_tracking(&mut self);
    fn close(&mut self);
}

impl<T: BodyTracker + ?Sized> BodyTracker for Box<T> {
    fn open(&mut self, params: &CameraConfig) -> Result<(), ErrorCode> {
        (**self).open(params)
    }

    fn enable_positional_tracking(
        &mut self,
        params: &PositionalTrackingConfig,
    ) -> Result<(), ErrorCode> {
        (**self).enable_positional_tracking(params)
    }

    fn enable_body_tracking(&mut self, params: &BodyTrackingConfig) -> Result<(), ErrorCode> {
        (**self).enable_body_tracking(params)
    }

    fn grab(&mut self) -> Result<(), ErrorCode> {
        (**self).grab()
    }

    fn retrieve_bodies(&mut self, runtime: &BodyTrackingRuntime) -> Result<Bodies, ErrorCode> {
        (**self).retrieve_bodies(runtime)
    }

    fn disable_body_tracking(&mut self) {
        (**self).disable_body_tracking()
    }

    fn close(&mut self) {
        (**self).close()
    }
}
