pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	Medium { message: String },
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
}
