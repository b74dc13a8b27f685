pub mod capture;
pub mod error;
pub mod sink;

pub use capture::{record, run, CapturePlan, CaptureSummary};
pub use error::CaptureError;
pub use sink::{CsvSink, Sample};
