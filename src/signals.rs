use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinHandle;

use crate::service::{Shutdown, toggle_verbosity};

/// Handles the process signals for the lifetime of the service.
///
/// SIGINT and SIGTERM trigger `shutdown`, SIGUSR2 toggles the log verbosity.
///
/// # Errors
///
/// Returns an error if a signal handler cannot be registered.
pub fn spawn_handler(shutdown: Shutdown) -> std::io::Result<JoinHandle<()>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut user2 = signal(SignalKind::user_defined2())?;
    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(()) = interrupt.recv() => {
                    log::info!("received SIGINT");
                    shutdown.trigger();
                }
                Some(()) = terminate.recv() => {
                    log::info!("received SIGTERM");
                    shutdown.trigger();
                }
                Some(()) = user2.recv() => {
                    toggle_verbosity();
                }
                else => break,
            }
        }
    }))
}
