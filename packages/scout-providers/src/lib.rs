pub mod oauth;
pub mod youtube;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Http(#[from] reqwest::Error),
	#[error("Upstream response is malformed: {0}")]
	Decode(String),
}

/// How a platform call authenticates: a user's bearer token or the shared
/// server key as a query parameter. Exactly one of the two is ever applied.
#[derive(Debug, Clone, Copy)]
pub enum ApiAuth<'a> {
	Bearer(&'a str),
	Key(&'a str),
}
impl ApiAuth<'_> {
	fn apply(self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
		match self {
			Self::Bearer(token) => request.bearer_auth(token),
			Self::Key(key) => request.query(&[("key", key)]),
		}
	}
}
