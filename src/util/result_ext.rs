use std::fmt;

/// Logs and drops errors the caller can carry on without.
pub trait ResultExt<T> {
	fn ok_or_log(self) -> Option<T>;
}

impl<T, E: fmt::Display> ResultExt<T> for Result<T, E> {
	fn ok_or_log(self) -> Option<T> {
		match self {
			Ok(value) => Some(value),
			Err(error) => {
				tracing::warn!(%error, "continuing after error");
				None
			}
		}
	}
}
