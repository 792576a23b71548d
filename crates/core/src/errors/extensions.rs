//! Extension traits for error handling

use super::types::{Error, Result};

/// Attach a description of the failed step to a `Result`
///
/// The original error is kept as the source of an [`Error::Operation`], so
/// `is_transient` and error chains still see it.
pub trait ResultExt<T> {
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Like [`context`](ResultExt::context), building the message only on failure
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(message.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(f(), e.into()))
    }
}

fn wrap(message: String, source: Error) -> Error {
    Error::operation_with_source(format!("{message}: {source}"), source)
}
