pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("No usable credential: connect an account or configure a server API key.")]
	Credential,
	#[error("Not connected.")]
	NotConnected,
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Token exchange failed: {message}")]
	UpstreamAuth { message: String },
	#[error("Upstream platform error: {message}")]
	Upstream { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<scout_storage::Error> for Error {
	fn from(err: scout_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
impl From<scout_providers::Error> for Error {
	fn from(err: scout_providers::Error) -> Self {
		Self::Upstream { message: err.to_string() }
	}
}
