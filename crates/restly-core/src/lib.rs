//! Restly Core Library
//!
//! Append-only command queue shared between the Restly controller and the
//! backend that acts on its commands. Each user command becomes one
//! newline-delimited JSON record:
//!
//! ```text
//! {"ts":"2026-10-18T09:30:00+00:00","action":"set_session","params":{"duration_minutes":45,"type":"deep_work"}}
//! {"ts":"2026-10-18T09:41:12+00:00","action":"toggle_pause"}
//! ```
//!
//! # Example
//!
//! ```no_run
//! use restly_core::{Command, CommandQueue, CoreResult, SessionParams};
//!
//! fn main() -> CoreResult<()> {
//!     let queue = CommandQueue::at_default_path()?;
//!
//!     queue.submit(&Command::SetSession(SessionParams::new(45, "deep_work")))?;
//!     queue.submit(&Command::nl("Reschedule my break for after this Zoom call"))?;
//!     Ok(())
//! }
//! ```

mod clock;
mod error;
mod queue;

pub use {
    clock::{Clock, SystemClock},
    error::QueueError,
    error::Result as CoreResult,
    queue::{
        Action, Command, CommandQueue, CommandRecord, DEFAULT_SESSION_MINUTES,
        DEFAULT_SESSION_TYPE, NO_PARAMS, NlCommandParams, SessionParams, default_queue_path,
        queue_path_in,
    },
};
