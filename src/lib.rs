//! buswatch — live tail of control-plane bus traffic for one app

pub mod classify;
pub mod correlate;
pub mod error;
pub mod filter;
pub mod format;
pub mod payload;
pub mod render;
pub mod source;
pub mod watch;

pub use error::WatchError;
pub use watch::{Frame, Line, WatchSession};
