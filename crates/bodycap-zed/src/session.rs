use bodycap_core::config::CaptureConfig;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{ErrorCode, SessionError},
    tracker::{Bodies, BodyTracker, BodyTrackingRuntime},
};

/// Outcome of polling the tracker once.
#[derive(Debug, Clone, PartialEq)]
pub enum Poll {
    GrabFailed(ErrorCode),
    RetrieveFailed(ErrorCode),
    Bodies(Bodies),
}

/// An opened tracker with body tracking enabled.
///
/// Dropping the session disables body tracking and then closes the camera,
/// whichever way the owner exits.
pub struct Session<T: BodyTracker> {
    tracker: T,
    runtime: BodyTrackingRuntime,
    opened: bool,
    body_tracking: bool,
}

impl<T: BodyTracker> Session<T> {
    #[instrument(skip_all)]
    pub fn open(tracker: T, config: &CaptureConfig) -> Result<Self, SessionError> {
        let mut session = Session {
            tracker,
            runtime: BodyTrackingRuntime::from(&config.body_tracking),
            opened: false,
            body_tracking: false,
        };

        session
            .tracker
            .open(&config.camera)
            .map_err(SessionError::CameraOpen)?;
        session.opened = true;
        debug!(camera=?config.camera, "camera opened");

        if config.body_tracking.enable_tracking {
            if let Err(e) = session
                .tracker
                .enable_positional_tracking(&config.positional_tracking)
            {
                warn!(error=%e, "positional tracking unavailable");
            }
        }

        info!("body tracking: loading module");
        session
            .tracker
            .enable_body_tracking(&config.body_tracking)
            .map_err(SessionError::BodyTrackingEnable)?;
        session.body_tracking = true;

        Ok(session)
    }

    pub fn poll(&mut self) -> Poll {
        if let Err(e) = self.tracker.grab() {
            return Poll::GrabFailed(e);
        }
        match self.tracker.retrieve_bodies(&self.runtime) {
            Ok(bodies) => Poll::Bodies(bodies),
            Err(e) => Poll::RetrieveFailed(e),
        }
    }

    /// Releases the tracker now instead of at drop.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.body_tracking {
            self.tracker.disable_body_tracking();
            self.body_tracking = false;
        }
        if self.opened {
            self.tracker.close();
            self.opened = false;
            debug!("camera closed");
        }
    }
}

impl<T: BodyTracker> Drop for Session<T> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        scripted::{Call, Frame, ScriptedTracker},
        tracker::BodyData,
    };
    use bodycap_core::point::Point;

    #[test]
    pub fn test_lifecycle_order() {
        let tracker = ScriptedTracker::new(vec![Frame::Bodies(Bodies::stale())]);
        let calls = tracker.calls();

        let mut session = Session::open(tracker, &CaptureConfig::default()).unwrap();
        session.poll();
        session.close();

        assert_eq!(
            calls.snapshot(),
            vec![
                Call::Open,
                Call::EnablePositionalTracking,
                Call::EnableBodyTracking,
                Call::Grab,
                Call::RetrieveBodies,
                Call::DisableBodyTracking,
                Call::Close,
            ]
        );
    }

    #[test]
    pub fn test_positional_tracking_follows_tracking_flag() {
        let tracker = ScriptedTracker::new(Vec::new());
        let calls = tracker.calls();
        let mut config = CaptureConfig::default();
        config.body_tracking.enable_tracking = false;

        drop(Session::open(tracker, &config).unwrap());

        assert!(!calls.snapshot().contains(&Call::EnablePositionalTracking));
    }

    #[test]
    pub fn test_positional_tracking_failure_is_not_fatal() {
        let tracker = ScriptedTracker::new(Vec::new()).fail_positional_tracking(ErrorCode::Failure);
        assert!(Session::open(tracker, &CaptureConfig::default()).is_ok());
    }

    #[test]
    pub fn test_open_failure_releases_nothing() {
        let tracker = ScriptedTracker::new(Vec::new()).fail_open(ErrorCode::CameraNotDetected);
        let calls = tracker.calls();

        let result = Session::open(tracker, &CaptureConfig::default());
        assert!(matches!(
            result,
            Err(SessionError::CameraOpen(ErrorCode::CameraNotDetected))
        ));
        assert_eq!(calls.snapshot(), vec![Call::Open]);
    }

    #[test]
    pub fn test_body_tracking_failure_closes_camera() {
        let tracker = ScriptedTracker::new(Vec::new()).fail_body_tracking(ErrorCode::Failure);
        let calls = tracker.calls();

        let result = Session::open(tracker, &CaptureConfig::default());
        assert!(matches!(
            result,
            Err(SessionError::BodyTrackingEnable(ErrorCode::Failure))
        ));
        assert_eq!(
            calls.snapshot(),
            vec![
                Call::Open,
                Call::EnablePositionalTracking,
                Call::EnableBodyTracking,
                Call::Close,
            ]
        );
    }

    #[test]
    pub fn test_poll_outcomes() {
        let body = BodyData::new(7, Point::new(1., 2., 3.));
        let tracker = ScriptedTracker::new(vec![
            Frame::GrabFailed,
            Frame::Bodies(Bodies::fresh(vec![body.clone()])),
        ])
        .fail_retrieve_from(2);
        let mut session = Session::open(tracker, &CaptureConfig::default()).unwrap();

        assert_eq!(session.poll(), Poll::GrabFailed(ErrorCode::Failure));
        assert_eq!(session.poll(), Poll::Bodies(Bodies::fresh(vec![body])));
        assert_eq!(session.poll(), Poll::RetrieveFailed(ErrorCode::Failure));
    }
}
