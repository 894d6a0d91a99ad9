//! The frame a documentation page may be embedded in.

use std::fmt;

/// Why the embedding frame refused a title update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
	/// The parent frame belongs to another origin, or the page was opened from the file system.
	CrossOrigin,
}

impl fmt::Display for FrameError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CrossOrigin => write!(f, "parent frame is not accessible from this origin"),
		}
	}
}

impl std::error::Error for FrameError {}

/// Host frame that receives the page title.
pub trait HostFrame {
	/// Propagate the document title to the frame.
	fn set_title(&mut self, title: &str) -> Result<(), FrameError>;

	/// The frame's current title, when it can be read.
	fn title(&self) -> Option<&str> {
		None
	}
}

/// A page shown on its own; its parent is itself, so the update is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct TopLevel;

impl HostFrame for TopLevel {
	fn set_title(&mut self, _title: &str) -> Result<(), FrameError> {
		Ok(())
	}
}

/// A same-origin frameset that adopts the page title.
#[derive(Debug, Default, Clone)]
pub struct EmbeddingFrame {
	title: Option<String>,
}

impl HostFrame for EmbeddingFrame {
	fn set_title(&mut self, title: &str) -> Result<(), FrameError> {
		self.title = Some(title.to_string());
		Ok(())
	}

	fn title(&self) -> Option<&str> {
		self.title.as_deref()
	}
}

/// A parent frame the page is not allowed to touch.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrossOriginFrame;

impl HostFrame for CrossOriginFrame {
	fn set_title(&mut self, _title: &str) -> Result<(), FrameError> {
		Err(FrameError::CrossOrigin)
	}
}
