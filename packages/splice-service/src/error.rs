pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures inside the interception pipeline. Neither variant ever reaches the host; the
/// interceptor turns both into a declined query.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Search backend unavailable: {message}")]
	Unavailable { message: String },
	#[error("Internal fault: {message}")]
	InternalFault { message: String },
}
impl Error {
	pub fn unavailable(message: impl Into<String>) -> Self {
		Self::Unavailable { message: message.into() }
	}

	pub fn internal(message: impl Into<String>) -> Self {
		Self::InternalFault { message: message.into() }
	}
}

impl From<splice_providers::Error> for Error {
	fn from(err: splice_providers::Error) -> Self {
		Self::Unavailable { message: err.to_string() }
	}
}
