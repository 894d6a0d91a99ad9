//! Core library API for docpage.
//!
//! The [`Docpage`] builder collects page options and layout settings, then loads documents and
//! hands them to a [`Page`] controller. It is UI-agnostic: the CLI drives it, and so can any
//! other embedder that supplies its own [`LayoutMetrics`] and [`HostFrame`].

/// Error helpers for the core API.
pub mod error;
/// Serializable snapshots of the visible member listing.
pub mod listing;
/// Pattern utilities for filter query handling.
pub mod pattern;

use std::path::Path;
use std::time::Duration;

pub use self::error::{DocpageError, Result};
pub use self::listing::{ListedMember, ListingSection, MemberListing, build_listing};
use crate::dom::Document;
use crate::page::{EstimatedLayout, HostFrame, LayoutMetrics, Page, PageOptions, QueryDomain};

/// Builds [`Page`] controllers for generated documentation pages.
///
/// Every setting has a default matching what the page generator assumes, so
/// `Docpage::new().load(path)` is enough for a standalone page.
#[derive(Debug, Clone)]
pub struct Docpage {
	/// Behavior tunables handed to every page.
	options: PageOptions,

	/// Viewport width for the estimated layout; `None` emulates a host without `innerWidth`.
	viewport_width: Option<f32>,

	/// Document client width used when the viewport width is unknown.
	client_width: f32,

	/// Line height and characters per line for estimated text heights.
	line_metrics: (f32, usize),
}

impl Default for Docpage {
	fn default() -> Self {
		Self::new()
	}
}

impl Docpage {
	/// Creates a builder with the default page options and a 1024px viewport.
	pub fn new() -> Self {
		Self {
			options: PageOptions::default(),
			viewport_width: Some(1024.0),
			client_width: 1024.0,
			line_metrics: (17.0, 100),
		}
	}

	/// Sets the height a collapsed member comment is shrunk to.
	pub fn with_closed_height(mut self, height: f32) -> Self {
		self.options.closed_height = height;
		self
	}

	/// Sets the comment height above which members become expandable.
	pub fn with_openable_threshold(mut self, threshold: f32) -> Self {
		self.options.openable_threshold = threshold;
		self
	}

	/// Sets the margins subtracted from the viewport and client widths when sizing the filter box.
	pub fn with_filter_margins(mut self, viewport_margin: f32, client_margin: f32) -> Self {
		self.options.filter_margin = viewport_margin;
		self.options.client_margin = client_margin;
		self
	}

	/// Sets the duration recorded for expand/collapse and slide transitions.
	pub fn with_transition_duration(mut self, duration: Duration) -> Self {
		self.options.transition_duration = duration;
		self
	}

	/// Replaces the ancestors whose toggles start inactive.
	pub fn with_default_hidden_ancestors<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.options.default_hidden_ancestors = names.into_iter().map(Into::into).collect();
		self
	}

	/// Restricts which entry fields the filter text is matched against.
	pub fn with_query_domains(mut self, domains: QueryDomain) -> Self {
		self.options.query_domains = domains;
		self
	}

	/// Sets the viewport width, or `None` to fall back to the client width.
	pub fn with_viewport_width(mut self, width: Option<f32>) -> Self {
		self.viewport_width = width;
		if let Some(width) = width {
			self.client_width = width;
		}
		self
	}

	/// Sets the line metrics used to estimate the rendered height of text.
	pub fn with_line_metrics(mut self, line_height: f32, chars_per_line: usize) -> Self {
		self.line_metrics = (line_height, chars_per_line);
		self
	}

	/// Returns the page options handed to every page.
	pub fn options(&self) -> &PageOptions {
		&self.options
	}

	/// Builds the estimated layout described by this configuration.
	pub fn layout(&self) -> EstimatedLayout {
		let (line_height, chars_per_line) = self.line_metrics;
		let layout = match self.viewport_width {
			Some(width) => EstimatedLayout::new(width),
			None => EstimatedLayout::without_viewport(self.client_width),
		};
		layout.with_line_metrics(line_height, chars_per_line)
	}

	/// Parses HTML and runs the page load sequence, as a standalone page.
	pub fn parse(&self, html: &str) -> Result<Page> {
		let doc = Document::parse_html(html)?;
		self.open(doc, Box::new(self.layout()), Box::new(crate::page::TopLevel))
	}

	/// Reads a page from disk and runs the load sequence, as a standalone page.
	pub fn load(&self, path: impl AsRef<Path>) -> Result<Page> {
		let path = path.as_ref();
		tracing::debug!(path = %path.display(), "loading page");
		let doc = Document::load(path)?;
		self.open(doc, Box::new(self.layout()), Box::new(crate::page::TopLevel))
	}

	/// Runs the load sequence on a document with custom geometry and frame.
	pub fn open(
		&self,
		doc: Document,
		layout: Box<dyn LayoutMetrics>,
		frame: Box<dyn HostFrame>,
	) -> Result<Page> {
		Page::new(doc, self.options.clone(), layout, frame)
	}
}
