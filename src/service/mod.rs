//! The refresh loop keeping the store in sync with the host.
//!
//! [`Scheduler::run`] connects to both sides, refreshes once per connection generation and then
//! on every periodic tick and event burst. Any error while connected ends the generation and
//! leads to a full reconnect.
mod connection;
mod control;
mod error;
mod scheduler;
mod shutdown;
mod trigger;

pub use control::{ServiceControl, toggle_verbosity};
pub use error::{Error, Result};
pub use scheduler::{Scheduler, State};
pub use shutdown::{Shutdown, ShutdownSignal};
