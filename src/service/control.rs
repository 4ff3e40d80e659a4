use std::sync::atomic::{AtomicBool, Ordering};

use log::LevelFilter;

/// State of the service shared with its control surface.
#[derive(Debug, Default)]
pub struct ServiceControl {
    initialized: AtomicBool,
}

impl ServiceControl {
    /// Whether connections to the host and the store are currently established.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub(super) fn set_initialized(&self, initialized: bool) {
        self.initialized.store(initialized, Ordering::Release);
    }
}

/// Cycles the log verbosity Info -> Debug -> Trace -> Info and returns the new level.
///
/// Any other level goes back to Info.
pub fn toggle_verbosity() -> LevelFilter {
    let level = next_level(log::max_level());
    log::set_max_level(level);
    log::info!("setting log level to {level}");
    level
}

fn next_level(level: LevelFilter) -> LevelFilter {
    match level {
        LevelFilter::Info => LevelFilter::Debug,
        LevelFilter::Debug => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_level() {
        assert_eq!(next_level(LevelFilter::Info), LevelFilter::Debug);
        assert_eq!(next_level(LevelFilter::Debug), LevelFilter::Trace);
        assert_eq!(next_level(LevelFilter::Trace), LevelFilter::Info);
        assert_eq!(next_level(LevelFilter::Warn), LevelFilter::Info);
        assert_eq!(next_level(LevelFilter::Off), LevelFilter::Info);
    }

    #[test]
    fn test_toggle_updates_max_level() {
        log::set_max_level(LevelFilter::Info);
        assert_eq!(toggle_verbosity(), LevelFilter::Debug);
        assert_eq!(log::max_level(), LevelFilter::Debug);
        assert_eq!(toggle_verbosity(), LevelFilter::Trace);
        assert_eq!(toggle_verbosity(), LevelFilter::Info);
        assert_eq!(log::max_level(), LevelFilter::Info);
    }

    #[test]
    fn test_initialized_flag() {
        let control = ServiceControl::default();
        assert!(!control.is_initialized());
        control.set_initialized(true);
        assert!(control.is_initialized());
    }
}
