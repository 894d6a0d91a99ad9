//! Cycling and toggle buttons of the filter bar.

use crate::dom::{Document, NodeId};

/// A `.button` control whose direct `div` children are mutually exclusive faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclingButton {
	node: NodeId,
	faces: Vec<NodeId>,
}

impl CyclingButton {
	/// Collect the faces of `node` and show only the first one.
	pub fn attach(doc: &mut Document, node: NodeId) -> Self {
		let faces = doc.children_with_tag(node, "div");
		for (index, face) in faces.iter().enumerate() {
			doc.set_visible(*face, index == 0);
		}
		Self { node, faces }
	}

	/// The button element.
	pub fn node(&self) -> NodeId {
		self.node
	}

	/// Faces in cycling order.
	pub fn faces(&self) -> &[NodeId] {
		&self.faces
	}

	/// Index of the face currently showing.
	pub fn current(&self, doc: &Document) -> Option<usize> {
		self.faces.iter().position(|face| doc.is_rendered(*face))
	}

	/// Advance to the next face, wrapping around; returns whether the face changed.
	pub fn advance(&self, doc: &mut Document) -> bool {
		let Some(current) = self.current(doc) else {
			return false;
		};
		let next = (current + 1) % self.faces.len();
		if next == current {
			return false;
		}
		doc.hide(self.faces[current]);
		doc.show(self.faces[next]);
		true
	}

	/// Whether the face carrying `class` is the one showing.
	pub fn is_showing(&self, doc: &Document, class: &str) -> bool {
		self.current(doc)
			.is_some_and(|index| doc.has_class(self.faces[index], class))
	}
}

/// A `.toggleButton` whose `in` class is its active flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleButton {
	node: NodeId,
	name: Option<String>,
}

impl ToggleButton {
	/// Wrap a toggle button element, remembering its `name` attribute.
	pub fn attach(doc: &Document, node: NodeId) -> Self {
		Self {
			node,
			name: doc.attr(node, "name").map(str::to_string),
		}
	}

	/// The button element.
	pub fn node(&self) -> NodeId {
		self.node
	}

	/// Name of the class or trait the toggle stands for.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Whether the toggle is active.
	pub fn is_active(&self, doc: &Document) -> bool {
		doc.has_class(self.node, "in")
	}

	/// Set the active flag.
	pub fn set_active(&self, doc: &mut Document, active: bool) {
		if active {
			doc.add_class(self.node, "in");
		} else {
			doc.remove_class(self.node, "in");
		}
	}

	/// Flip the active flag; returns the new state.
	pub fn toggle(&self, doc: &mut Document) -> bool {
		doc.toggle_class(self.node, "in")
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn button(faces: &[&str]) -> (Document, CyclingButton) {
		let mut doc = Document::new();
		let root = doc.root();
		let node = doc.create_element_with("div", vec![("class".into(), "button".into())]);
		doc.append_child(root, node);
		for class in faces {
			let face = doc.create_element_with("div", vec![("class".into(), (*class).into())]);
			doc.append_child(node, face);
		}
		let button = CyclingButton::attach(&mut doc, node);
		(doc, button)
	}

	fn visible_faces(doc: &Document, button: &CyclingButton) -> usize {
		button.faces().iter().filter(|face| doc.is_rendered(**face)).count()
	}

	#[test]
	fn attach_shows_only_the_first_face() {
		let (doc, button) = button(&["alpha", "inherit", "other"]);
		assert_eq!(button.current(&doc), Some(0));
		assert_eq!(visible_faces(&doc, &button), 1);
		assert!(button.is_showing(&doc, "alpha"));
	}

	#[test]
	fn full_cycle_returns_to_the_first_face() {
		let (mut doc, button) = button(&["a", "b", "c"]);
		let mut seen = Vec::new();
		for _ in 0..3 {
			assert!(button.advance(&mut doc));
			assert_eq!(visible_faces(&doc, &button), 1);
			seen.push(button.current(&doc).unwrap());
		}
		assert_eq!(seen, vec![1, 2, 0]);
	}

	#[test]
	fn single_face_is_a_no_op() {
		let (mut doc, button) = button(&["only"]);
		assert!(!button.advance(&mut doc));
		assert_eq!(button.current(&doc), Some(0));
	}

	#[test]
	fn no_visible_face_is_a_no_op() {
		let (mut doc, button) = button(&["a", "b"]);
		doc.hide(button.faces()[0]);
		assert!(!button.advance(&mut doc));
		assert_eq!(visible_faces(&doc, &button), 0);
	}

	#[test]
	fn toggle_flips_the_in_class() {
		let mut doc = Document::new();
		let node = doc.create_element_with(
			"li",
			vec![("class".into(), "toggleButton".into()), ("name".into(), "pkg.Base".into())],
		);
		let toggle = ToggleButton::attach(&doc, node);
		assert_eq!(toggle.name(), Some("pkg.Base"));
		assert!(!toggle.is_active(&doc));
		assert!(toggle.toggle(&mut doc));
		assert!(toggle.is_active(&doc));
		toggle.set_active(&mut doc, false);
		assert!(!toggle.is_active(&doc));
	}
}
