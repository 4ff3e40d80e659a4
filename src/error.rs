/// Turns a `Result` into an `Option`, logging the error at error level.
///
/// Used for best-effort teardown where a failure must be reported but never propagated.
pub trait ResultOkLogExt<T, E> {
    fn ok_log(self, context: &str) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self, context: &str) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::error!("{context}: {err}");
                None
            }
        }
    }
}
