use bodycap_core::config::{BodyTrackingConfig, CameraConfig, PositionalTrackingConfig};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    error::ErrorCode,
    tracker::{Bodies, BodyTracker, BodyTrackingRuntime},
};

/// What the scripted service answers for one grab.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    GrabFailed,
    Bodies(Bodies),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Open,
    EnablePositionalTracking,
    EnableBodyTracking,
    Grab,
    RetrieveBodies,
    DisableBodyTracking,
    Close,
}

/// Shared record of the calls made on a [`ScriptedTracker`]; outlives the tracker.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    pub fn snapshot(&self) -> Vec<Call> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.snapshot().iter().filter(|&&c| c == call).count()
    }
}

type FrameSource = Box<dyn FnMut(usize) -> Frame + Send>;

/// Tracking service that plays back frames instead of talking to a camera.
pub struct ScriptedTracker {
    source: FrameSource,
    grabs: usize,
    pending: Option<Bodies>,
    calls: CallLog,
    fail_open: Option<ErrorCode>,
    fail_positional_tracking: Option<ErrorCode>,
    fail_body_tracking: Option<ErrorCode>,
    fail_retrieve_from: Option<usize>,
}

impl ScriptedTracker {
    /// Plays `frames` in order, then keeps repeating the last one.
    /// An empty script reports stale results forever.
    pub fn new(frames: Vec<Frame>) -> Self {
        Self::from_fn(move |i| {
            frames
                .get(i)
                .or_else(|| frames.last())
                .cloned()
                .unwrap_or_else(|| Frame::Bodies(Bodies::stale()))
        })
    }

    /// Asks `source` for the frame of every grab, passing the 0-based grab index.
    pub fn from_fn(source: impl FnMut(usize) -> Frame + Send + 'static) -> Self {
        Self {
            source: Box::new(source),
            grabs: 0,
            pending: None,
            calls: CallLog::default(),
            fail_open: None,
            fail_positional_tracking: None,
            fail_body_tracking: None,
            fail_retrieve_from: None,
        }
    }

    pub fn fail_open(mut self, code: ErrorCode) -> Self {
        self.fail_open = Some(code);
        self
    }

    pub fn fail_positional_tracking(mut self, code: ErrorCode) -> Self {
        self.fail_positional_tracking = Some(code);
        self
    }

    pub fn fail_body_tracking(mut self, code: ErrorCode) -> Self {
        self.fail_body_tracking = Some(code);
        self
    }

    /// Retrieves for grab `index` and later fail.
    pub fn fail_retrieve_from(mut self, index: usize) -> Self {
        self.fail_retrieve_from = Some(index);
        self
    }

    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }
}

fn result(failure: Option<ErrorCode>) -> Result<(), ErrorCode> {
    match failure {
        Some(code) => Err(code),
        None => Ok(()),
    }
}

impl BodyTracker for ScriptedTracker {
    fn open(&mut self, _params: &CameraConfig) -> Result<(), ErrorCode> {
        self.calls.push(Call::Open);
        result(self.fail_open)
    }

    fn enable_positional_tracking(
        &mut self,
        _params: &PositionalTrackingConfig,
    ) -> Result<(), ErrorCode> {
        self.calls.push(Call::EnablePositionalTracking);
        result(self.fail_positional_tracking)
    }

    fn enable_body_tracking(&mut self, _params: &BodyTrackingConfig) -> Result<(), ErrorCode> {
        self.calls.push(Call::EnableBodyTracking);
        result(self.fail_body_tracking)
    }

    fn grab(&mut self) -> Result<(), ErrorCode> {
        self.calls.push(Call::Grab);
        let frame = (self.source)(self.grabs);
        self.grabs += 1;
        match frame {
            Frame::GrabFailed => {
                self.pending = None;
                Err(ErrorCode::Failure)
            }
            Frame::Bodies(bodies) => {
                self.pending = Some(bodies);
                Ok(())
            }
        }
    }

    fn retrieve_bodies(&mut self, _runtime: &BodyTrackingRuntime) -> Result<Bodies, ErrorCode> {
        self.calls.push(Call::RetrieveBodies);
        if self
            .fail_retrieve_from
            .is_some_and(|index| self.grabs > index)
        {
            return Err(ErrorCode::Failure);
        }
        // A second retrieve for the same grab has nothing new to report.
        Ok(self.pending.take().unwrap_or_else(Bodies::stale))
    }

    fn disable_body_tracking(&mut self) {
        self.calls.push(Call::DisableBodyTracking);
    }

    fn close(&mut self) {
        self.calls.push(Call::Close);
    }
}
