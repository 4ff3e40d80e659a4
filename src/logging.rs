use env_logger::WriteStyle;
use log::LevelFilter;

/// Installs the global logger.
///
/// The crate logs down to trace and other crates down to warn, unless `RUST_LOG` says
/// otherwise. The effective verbosity is `level`, changeable at runtime through
/// [`log::set_max_level`].
pub fn init(level: LevelFilter, color: bool) {
    let style = if color {
        WriteStyle::Auto
    } else {
        WriteStyle::Never
    };
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Trace)
        .parse_default_env()
        .write_style(style)
        .init();
    log::set_max_level(level);
}
