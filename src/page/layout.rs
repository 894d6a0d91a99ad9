//! Geometry seam and the layout adjuster.
//!
//! The controller never measures anything itself. Rendered heights, offsets and the viewport
//! width come from a [`LayoutMetrics`] implementation: a browser binding would measure real
//! boxes, while [`EstimatedLayout`] derives heights from text length and otherwise uses the
//! boxes it was given.

use std::collections::HashMap;

use super::Page;
use crate::dom::{Document, NodeId};

/// Border box of a node, in CSS pixels relative to the document.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LayoutBox {
	/// Horizontal offset of the left edge.
	pub left: f32,
	/// Vertical offset of the top edge.
	pub top: f32,
	/// Outer width.
	pub width: f32,
	/// Outer height.
	pub height: f32,
}

/// Source of rendered geometry.
pub trait LayoutMetrics {
	/// Inner width of the viewport, when the host reports one.
	fn viewport_width(&self) -> Option<f32>;

	/// Client width of the document element, used when the viewport width is unavailable.
	fn client_width(&self) -> f32;

	/// Record a new viewport width after a resize.
	fn set_viewport_width(&mut self, width: f32);

	/// Natural height of a node's content, ignoring any inline height.
	fn content_height(&self, doc: &Document, node: NodeId) -> f32;

	/// Border box of a node.
	fn layout_box(&self, doc: &Document, node: NodeId) -> LayoutBox;
}

/// Text-driven geometry estimate with optional explicit boxes.
#[derive(Debug, Clone)]
pub struct EstimatedLayout {
	viewport_width: Option<f32>,
	client_width: f32,
	line_height: f32,
	chars_per_line: usize,
	boxes: HashMap<NodeId, LayoutBox>,
}

impl Default for EstimatedLayout {
	fn default() -> Self {
		Self::new(1024.0)
	}
}

impl EstimatedLayout {
	/// Estimate for a viewport of the given inner width.
	pub fn new(viewport_width: f32) -> Self {
		Self {
			viewport_width: Some(viewport_width),
			client_width: viewport_width,
			line_height: 17.0,
			chars_per_line: 100,
			boxes: HashMap::new(),
		}
	}

	/// Host that reports no inner width, only a document client width.
	pub fn without_viewport(client_width: f32) -> Self {
		Self {
			viewport_width: None,
			client_width,
			..Self::new(client_width)
		}
	}

	/// Line height and characters per line used to estimate text height.
	pub fn with_line_metrics(mut self, line_height: f32, chars_per_line: usize) -> Self {
		self.line_height = line_height;
		self.chars_per_line = chars_per_line.max(1);
		self
	}

	/// Pin a node's box instead of estimating it.
	pub fn with_box(mut self, node: NodeId, layout_box: LayoutBox) -> Self {
		self.boxes.insert(node, layout_box);
		self
	}

	/// Pin a node's box on an existing layout.
	pub fn set_box(&mut self, node: NodeId, layout_box: LayoutBox) {
		self.boxes.insert(node, layout_box);
	}

	fn estimate_text_height(&self, doc: &Document, node: NodeId) -> f32 {
		let text = doc.text_content(node);
		let words: Vec<&str> = text.split_whitespace().collect();
		if words.is_empty() {
			return 0.0;
		}
		let chars: usize = words.iter().map(|word| word.chars().count()).sum::<usize>() + words.len() - 1;
		let lines = chars.div_ceil(self.chars_per_line);
		lines as f32 * self.line_height
	}
}

impl LayoutMetrics for EstimatedLayout {
	fn viewport_width(&self) -> Option<f32> {
		self.viewport_width
	}

	fn client_width(&self) -> f32 {
		self.client_width
	}

	fn set_viewport_width(&mut self, width: f32) {
		self.viewport_width = Some(width);
		self.client_width = width;
	}

	fn content_height(&self, doc: &Document, node: NodeId) -> f32 {
		match self.boxes.get(&node) {
			Some(layout_box) => layout_box.height,
			None => self.estimate_text_height(doc, node),
		}
	}

	fn layout_box(&self, doc: &Document, node: NodeId) -> LayoutBox {
		match self.boxes.get(&node) {
			Some(layout_box) => *layout_box,
			None => LayoutBox {
				height: doc.px(node, "height").unwrap_or_else(|| self.estimate_text_height(doc, node)),
				..LayoutBox::default()
			},
		}
	}
}

impl Page {
	/// Fit the filter box to the viewport and push the content below the control bar.
	pub fn adjust_layout(&mut self) {
		let filter_box = self.refs.filter_box;
		let left = match self.doc.prev_element_sibling(filter_box) {
			Some(sibling) => {
				let sibling_box = self.layout.layout_box(&self.doc, sibling);
				sibling_box.left + sibling_box.width
			}
			None => 0.0,
		};
		let inner_width = match self.layout.viewport_width() {
			Some(width) => width - self.options.filter_margin,
			None => self.layout.client_width() - self.options.client_margin,
		};
		let width = (inner_width - left).max(0.0);
		self.doc.set_px(filter_box, "width", width);

		if let (Some(definition), Some(bar)) = (self.refs.definition, self.refs.member_bar) {
			let bar_height = self.layout.layout_box(&self.doc, bar).height;
			self.doc.set_px(definition, "margin-top", bar_height);
		}
		tracing::trace!(width, "adjusted filter box");
	}

	/// Keep the filter bar at a fixed position below the page comment.
	pub(crate) fn scroll_to_filter(&mut self) {
		let Some(comment) = self.refs.comment else {
			return;
		};
		let comment_box = self.layout.layout_box(&self.doc, comment);
		let bar_height = self
			.refs
			.member_bar
			.map(|bar| self.layout.layout_box(&self.doc, bar).height)
			.unwrap_or(0.0);
		self.scroll_y = comment_box.top + comment_box.height - bar_height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn text_height_grows_by_lines() {
		let mut doc = Document::new();
		let root = doc.root();
		let node = doc.create_element("div");
		doc.append_child(root, node);
		let text = doc.create_text("x".repeat(250));
		doc.append_child(node, text);

		let layout = EstimatedLayout::new(800.0).with_line_metrics(10.0, 100);
		assert_eq!(layout.content_height(&doc, node), 30.0);

		let empty = doc.create_element("div");
		assert_eq!(layout.content_height(&doc, empty), 0.0);
	}

	#[test]
	fn explicit_boxes_win() {
		let mut doc = Document::new();
		let node = doc.create_element("div");
		let pinned = LayoutBox {
			left: 5.0,
			top: 10.0,
			width: 100.0,
			height: 42.0,
		};
		let layout = EstimatedLayout::new(800.0).with_box(node, pinned);
		assert_eq!(layout.content_height(&doc, node), 42.0);
		assert_eq!(layout.layout_box(&doc, node), pinned);
	}

	#[test]
	fn resize_updates_both_widths() {
		let mut layout = EstimatedLayout::without_viewport(600.0);
		assert_eq!(layout.viewport_width(), None);
		assert_eq!(layout.client_width(), 600.0);
		layout.set_viewport_width(900.0);
		assert_eq!(layout.viewport_width(), Some(900.0));
	}
}
