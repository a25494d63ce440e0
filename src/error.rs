use thiserror::Error;

/// Failures surfaced while loading or validating chart inputs.
///
/// Missing values for a country-year are not errors; they are filtered out of the
/// projected slice instead.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ChartError {
	#[error("failed to fetch {path}: {message}")]
	Fetch { path: String, message: String },

	#[error("failed to decode {what}: {message}")]
	Decode { what: String, message: String },

	#[error("country code {code} appears more than once in {collection}")]
	DuplicateCode { code: String, collection: &'static str },

	#[error("invalid topology: {0}")]
	Topology(String),
}

impl ChartError {
	pub fn decode(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
		Self::Decode {
			what: what.into(),
			message: err.to_string(),
		}
	}
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;
