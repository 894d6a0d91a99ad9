use std::fmt;

use serde_json::Error as SerdeError;

/// Aggregate errors produced by the docpage API.
#[derive(Debug)]
pub enum DocpageError {
	/// Failed to read a page from disk.
	Io(std::io::Error),
	/// The HTML loader rejected the input.
	Html(String),
	/// The page lacks an element the controller cannot work without.
	MissingElement(&'static str),
	/// Failed to encode a listing as JSON.
	Serialization(SerdeError),
}

impl fmt::Display for DocpageError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Io(err) => write!(f, "{err}"),
			Self::Html(message) => write!(f, "failed to parse page: {message}"),
			Self::MissingElement(selector) => {
				write!(f, "page has no `{selector}` element; is it a generated documentation page?")
			}
			Self::Serialization(err) => write!(f, "{err}"),
		}
	}
}

impl std::error::Error for DocpageError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io(err) => Some(err),
			Self::Serialization(err) => Some(err),
			Self::Html(_) | Self::MissingElement(_) => None,
		}
	}
}

impl From<std::io::Error> for DocpageError {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<SerdeError> for DocpageError {
	fn from(err: SerdeError) -> Self {
		Self::Serialization(err)
	}
}

/// Result type returned by the docpage library.
pub type Result<T> = std::result::Result<T, DocpageError>;
