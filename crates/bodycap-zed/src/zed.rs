extern crate libc;

use bodycap_core::{
    config::{
        BodyTrackingConfig, CameraConfig, DepthMode, DetectionModel, PositionalTrackingConfig,
        Resolution, Unit,
    },
    joint::BODY_34_JOINTS,
    point::Point,
};
use libc::{c_float, c_int, size_t};

use crate::{
    error::ErrorCode,
    tracker::{Bodies, BodyData, BodyTracker, BodyTrackingRuntime},
};

#[repr(C)]
#[derive(Clone, Copy)]
struct ShimPoint {
    x: c_float,
    y: c_float,
    z: c_float,
}

#[repr(C)]
struct ShimInitParameters {
    resolution: c_int,
    depth_mode: c_int,
    coordinate_units: c_int,
    sdk_verbose: c_int,
}

#[repr(C)]
struct ShimPositionalTrackingParameters {
    set_floor_as_origin: c_int,
}

#[repr(C)]
struct ShimBodyTrackingParameters {
    detection_model: c_int,
    enable_tracking: c_int,
    enable_segmentation: c_int,
    enable_body_fitting: c_int,
}

#[repr(C)]
struct ShimBody {
    id: c_int,
    position: ShimPoint,
    keypoints: [ShimPoint; BODY_34_JOINTS],
}

#[repr(C)]
struct ShimBodies {
    is_new: c_int,
    num_bodies: size_t,
    bodies: *mut ShimBody,
}

// Linked statically by build.rs.
extern "C" {
    fn zed_shim_open(params: *const ShimInitParameters) -> c_int;
    fn zed_shim_enable_positional_tracking(
        params: *const ShimPositionalTrackingParameters,
    ) -> c_int;
    fn zed_shim_enable_body_tracking(params: *const ShimBodyTrackingParameters) -> c_int;
    fn zed_shim_grab() -> c_int;
    fn zed_shim_retrieve_bodies(
        detection_confidence_threshold: c_float,
        bodies: *mut ShimBodies,
    ) -> c_int;
    fn zed_shim_free_bodies(bodies: *mut ShimBodies);
    fn zed_shim_disable_body_tracking();
    fn zed_shim_close();
}

impl From<ShimPoint> for Point {
    fn from(point: ShimPoint) -> Self {
        Point::new(point.x, point.y, point.z)
    }
}

/// ZED camera driven through the SDK shim. The shim keeps a single global
/// camera, so only one `Zed` should be opened at a time.
#[derive(Default)]
pub struct Zed {}

impl Zed {
    pub fn new() -> Zed {
        Zed {}
    }
}

fn flag(value: bool) -> c_int {
    c_int::from(value)
}

impl BodyTracker for Zed {
    fn open(&mut self, params: &CameraConfig) -> Result<(), ErrorCode> {
        let params = ShimInitParameters {
            resolution: match params.resolution {
                Resolution::Hd2k => 0,
                Resolution::Hd1080 => 1,
                Resolution::Hd720 => 2,
                Resolution::Vga => 3,
            },
            depth_mode: match params.depth_mode {
                DepthMode::Performance => 0,
                DepthMode::Quality => 1,
                DepthMode::Ultra => 2,
                DepthMode::Neural => 3,
            },
            coordinate_units: match params.coordinate_units {
                Unit::Millimeter => 0,
                Unit::Centimeter => 1,
                Unit::Meter => 2,
                Unit::Inch => 3,
                Unit::Foot => 4,
            },
            sdk_verbose: params.sdk_verbose,
        };
        ErrorCode::check(unsafe { zed_shim_open(&params) })
    }

    fn enable_positional_tracking(
        &mut self,
        params: &PositionalTrackingConfig,
    ) -> Result<(), ErrorCode> {
        let params = ShimPositionalTrackingParameters {
            set_floor_as_origin: flag(params.set_floor_as_origin),
        };
        ErrorCode::check(unsafe { zed_shim_enable_positional_tracking(&params) })
    }

    fn enable_body_tracking(&mut self, params: &BodyTrackingConfig) -> Result<(), ErrorCode> {
        let params = ShimBodyTrackingParameters {
            detection_model: match params.detection_model {
                DetectionModel::HumanBodyFast => 0,
                DetectionModel::HumanBodyMedium => 1,
                DetectionModel::HumanBodyAccurate => 2,
            },
            enable_tracking: flag(params.enable_tracking),
            enable_segmentation: flag(params.enable_segmentation),
            enable_body_fitting: flag(params.enable_body_fitting),
        };
        ErrorCode::check(unsafe { zed_shim_enable_body_tracking(&params) })
    }

    fn grab(&mut self) -> Result<(), ErrorCode> {
        ErrorCode::check(unsafe { zed_shim_grab() })
    }

    fn retrieve_bodies(&mut self, runtime: &BodyTrackingRuntime) -> Result<Bodies, ErrorCode> {
        let mut raw = ShimBodies {
            is_new: 0,
            num_bodies: 0,
            bodies: std::ptr::null_mut(),
        };
        ErrorCode::check(unsafe {
            zed_shim_retrieve_bodies(runtime.detection_confidence_threshold, &mut raw)
        })?;

        let body_list = if raw.bodies.is_null() || raw.num_bodies == 0 {
            Vec::new()
        } else {
            let bodies_slice = unsafe { std::slice::from_raw_parts(raw.bodies, raw.num_bodies) };
            bodies_slice
                .iter()
                .map(|body| BodyData {
                    id: body.id,
                    position: body.position.into(),
                    keypoints: body.keypoints.map(Point::from),
                })
                .collect()
        };
        let is_new = raw.is_new != 0;

        unsafe {
            zed_shim_free_bodies(&mut raw);
        }

        Ok(Bodies { is_new, body_list })
    }

    fn disable_body_tracking(&mut self) {
        unsafe {
            zed_shim_disable_body_tracking();
        }
    }

    fn close(&mut self) {
        unsafe {
            zed_shim_close();
        }
    }
}
