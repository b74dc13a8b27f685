pub mod error;
pub mod scripted;
pub mod session;
pub mod tracker;
#[cfg(feature = "zed_camera")]
pub mod zed;

pub use error::{ErrorCode, SessionError};
pub use scripted::{Call, CallLog, Frame, ScriptedTracker};
pub use session::{Poll, Session};
pub use tracker::{Bodies, BodyData, BodyTracker, BodyTrackingRuntime};
#[cfg(feature = "zed_camera")]
pub use zed::Zed;
