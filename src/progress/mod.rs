//! Progress reporting for workflow phases

mod handler;
mod logging;

pub use handler::{Phase, ProgressEvent, ProgressHandler};
pub use logging::LoggingHandler;
