//! In-memory document tree for generated documentation pages.
//!
//! The tree is an arena of nodes addressed by [`NodeId`]. Node zero is always the document node.
//! Elements keep their inline `style` attribute parsed into declarations so the page controller
//! can show, hide and resize elements the way a browser's inline styles would, and the serializer
//! can write the result back out.

mod parse;
mod serialize;

pub use parse::decode_entities;

/// Handle to a node stored in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
	/// Raw arena index of the node.
	pub fn index(self) -> usize {
		self.0
	}
}

/// Payload carried by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
	/// The document root.
	Document,
	/// A `<!DOCTYPE ...>` declaration with its name.
	Doctype(String),
	/// An element with its tag, attributes and inline style.
	Element(Element),
	/// A run of decoded character data.
	Text(String),
	/// An HTML comment.
	Comment(String),
}

/// Element payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	/// Lower-case tag name.
	pub tag: String,
	/// Attributes in source order, excluding `style`.
	pub attrs: Vec<(String, String)>,
	/// Inline style declarations in source order, with lower-case property names.
	pub style: Vec<(String, String)>,
}

impl Element {
	fn new(tag: &str, attrs: Vec<(String, String)>) -> Self {
		let mut element = Self {
			tag: tag.to_ascii_lowercase(),
			attrs: Vec::with_capacity(attrs.len()),
			style: Vec::new(),
		};
		for (name, value) in attrs {
			let name = name.to_ascii_lowercase();
			if name == "style" {
				element.style = parse_style(&value);
			} else {
				element.attrs.push((name, value));
			}
		}
		element
	}

	/// Look up an attribute value.
	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// Iterate over the whitespace-separated entries of the `class` attribute.
	pub fn classes(&self) -> impl Iterator<Item = &str> {
		self.attr("class").unwrap_or("").split_ascii_whitespace()
	}
}

fn parse_style(value: &str) -> Vec<(String, String)> {
	value
		.split(';')
		.filter_map(|declaration| {
			let (property, value) = declaration.split_once(':')?;
			let property = property.trim().to_ascii_lowercase();
			if property.is_empty() {
				return None;
			}
			Some((property, value.trim().to_string()))
		})
		.collect()
}

#[derive(Debug, Clone)]
struct Node {
	data: NodeData,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// Arena-backed document tree.
#[derive(Debug, Clone)]
pub struct Document {
	nodes: Vec<Node>,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Create an empty document holding only the root node.
	pub fn new() -> Self {
		Self {
			nodes: vec![Node {
				data: NodeData::Document,
				parent: None,
				children: Vec::new(),
			}],
		}
	}

	/// The document node.
	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	/// Number of nodes ever allocated, attached or not.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether the document holds nothing but its root.
	pub fn is_empty(&self) -> bool {
		self.nodes[0].children.is_empty()
	}

	fn push(&mut self, data: NodeData) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(Node {
			data,
			parent: None,
			children: Vec::new(),
		});
		id
	}

	/// Create a detached element with no attributes.
	pub fn create_element(&mut self, tag: &str) -> NodeId {
		self.create_element_with(tag, Vec::new())
	}

	/// Create a detached element; a `style` attribute is parsed into declarations.
	pub fn create_element_with(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
		self.push(NodeData::Element(Element::new(tag, attrs)))
	}

	/// Create a detached text node.
	pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
		self.push(NodeData::Text(text.into()))
	}

	/// Create a detached comment node.
	pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
		self.push(NodeData::Comment(text.into()))
	}

	/// Create a detached doctype node.
	pub fn create_doctype(&mut self, name: impl Into<String>) -> NodeId {
		self.push(NodeData::Doctype(name.into()))
	}

	/// Payload of a node.
	pub fn data(&self, id: NodeId) -> &NodeData {
		&self.nodes[id.0].data
	}

	pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
		&mut self.nodes[id.0].data
	}

	/// Element payload, if the node is an element.
	pub fn element(&self, id: NodeId) -> Option<&Element> {
		match &self.nodes[id.0].data {
			NodeData::Element(element) => Some(element),
			_ => None,
		}
	}

	fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
		match &mut self.nodes[id.0].data {
			NodeData::Element(element) => Some(element),
			_ => None,
		}
	}

	/// Tag name of an element node.
	pub fn tag(&self, id: NodeId) -> Option<&str> {
		self.element(id).map(|element| element.tag.as_str())
	}

	/// Whether the node is an element with the given tag.
	pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
		self.tag(id) == Some(tag)
	}

	/// Parent of a node, `None` for the root and detached nodes.
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.nodes[id.0].parent
	}

	/// All children of a node in document order.
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		&self.nodes[id.0].children
	}

	/// Element children of a node in document order.
	pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		self.nodes[id.0]
			.children
			.iter()
			.copied()
			.filter(|child| self.element(*child).is_some())
	}

	/// First element child of a node.
	pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
		self.element_children(id).next()
	}

	/// Element children carrying the given class (the `> .class` relation).
	pub fn children_with_class(&self, id: NodeId, class: &str) -> Vec<NodeId> {
		self.element_children(id)
			.filter(|child| self.has_class(*child, class))
			.collect()
	}

	/// Element children with the given tag (the `> tag` relation).
	pub fn children_with_tag(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
		self.element_children(id)
			.filter(|child| self.is_tag(*child, tag))
			.collect()
	}

	/// Element sibling immediately preceding the node.
	pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
		let parent = self.parent(id)?;
		let siblings = self.children(parent);
		let position = siblings.iter().position(|sibling| *sibling == id)?;
		siblings[..position]
			.iter()
			.rev()
			.copied()
			.find(|sibling| self.element(*sibling).is_some())
	}

	/// Descendants of a node in pre-order, excluding the node itself.
	pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
		let mut out = Vec::new();
		let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
		while let Some(next) = stack.pop() {
			out.push(next);
			stack.extend(self.children(next).iter().rev().copied());
		}
		out
	}

	/// Element descendants carrying the given class (the ` .class` relation).
	pub fn descendants_with_class(&self, id: NodeId, class: &str) -> Vec<NodeId> {
		self.descendants(id)
			.into_iter()
			.filter(|node| self.has_class(*node, class))
			.collect()
	}

	/// Element descendants with the given tag.
	pub fn descendants_with_tag(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
		self.descendants(id)
			.into_iter()
			.filter(|node| self.is_tag(*node, tag))
			.collect()
	}

	/// Walk from the node's parent up to the root.
	pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		std::iter::successors(self.parent(id), |node| self.parent(*node))
	}

	/// Whether the node is reachable from the document root.
	pub fn is_attached(&self, id: NodeId) -> bool {
		id == self.root() || self.ancestors(id).any(|node| node == self.root())
	}

	/// First attached element whose `id` attribute matches.
	pub fn find_by_id(&self, element_id: &str) -> Option<NodeId> {
		self.descendants(self.root())
			.into_iter()
			.find(|node| self.attr(*node, "id") == Some(element_id))
	}

	/// Detach a node from its parent; the subtree stays in the arena.
	pub fn detach(&mut self, id: NodeId) {
		if let Some(parent) = self.nodes[id.0].parent.take() {
			self.nodes[parent.0].children.retain(|child| *child != id);
		}
	}

	/// Remove a node from the tree.
	pub fn remove(&mut self, id: NodeId) {
		self.detach(id);
	}

	/// Append a node as the last child of `parent`, moving it if it is attached elsewhere.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
		self.detach(child);
		self.nodes[child.0].parent = Some(parent);
		self.nodes[parent.0].children.push(child);
	}

	/// Insert a node as the first child of `parent`.
	pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
		self.detach(child);
		self.nodes[child.0].parent = Some(parent);
		self.nodes[parent.0].children.insert(0, child);
	}

	/// Copy a subtree; the copy is detached.
	pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
		let copy = self.push(self.nodes[id.0].data.clone());
		let children = self.nodes[id.0].children.clone();
		for child in children {
			let child_copy = self.deep_clone(child);
			self.append_child(copy, child_copy);
		}
		copy
	}

	/// Look up an attribute on an element node.
	pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
		self.element(id)?.attr(name)
	}

	/// Set an attribute, replacing any existing value.
	pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
		let Some(element) = self.element_mut(id) else {
			return;
		};
		let value = value.into();
		match element.attrs.iter_mut().find(|(key, _)| key == name) {
			Some((_, existing)) => *existing = value,
			None => element.attrs.push((name.to_string(), value)),
		}
	}

	/// Whether the element's class list contains `class`.
	pub fn has_class(&self, id: NodeId, class: &str) -> bool {
		self.element(id)
			.is_some_and(|element| element.classes().any(|entry| entry == class))
	}

	/// Add a class if it is not present.
	pub fn add_class(&mut self, id: NodeId, class: &str) {
		if self.element(id).is_none() || self.has_class(id, class) {
			return;
		}
		let classes = match self.attr(id, "class") {
			Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
			_ => class.to_string(),
		};
		self.set_attr(id, "class", classes);
	}

	/// Remove every occurrence of a class.
	pub fn remove_class(&mut self, id: NodeId, class: &str) {
		if !self.has_class(id, class) {
			return;
		}
		let classes: Vec<String> = self
			.element(id)
			.map(|element| {
				element
					.classes()
					.filter(|entry| *entry != class)
					.map(str::to_string)
					.collect()
			})
			.unwrap_or_default();
		self.set_attr(id, "class", classes.join(" "));
	}

	/// Flip a class; returns whether the class is present afterwards.
	pub fn toggle_class(&mut self, id: NodeId, class: &str) -> bool {
		if self.has_class(id, class) {
			self.remove_class(id, class);
			false
		} else {
			self.add_class(id, class);
			true
		}
	}

	/// Concatenated text of all descendant text nodes.
	pub fn text_content(&self, id: NodeId) -> String {
		let mut out = String::new();
		if let NodeData::Text(text) = self.data(id) {
			out.push_str(text);
		}
		for node in self.descendants(id) {
			if let NodeData::Text(text) = self.data(node) {
				out.push_str(text);
			}
		}
		out
	}

	/// Trimmed text of the first `<title>` element.
	pub fn title(&self) -> Option<String> {
		let title = self.descendants_with_tag(self.root(), "title").into_iter().next()?;
		Some(self.text_content(title).trim().to_string())
	}

	/// Value of an inline style property.
	pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
		self.element(id)?
			.style
			.iter()
			.find(|(key, _)| key == property)
			.map(|(_, value)| value.as_str())
	}

	/// Set an inline style property.
	pub fn set_style(&mut self, id: NodeId, property: &str, value: impl Into<String>) {
		let Some(element) = self.element_mut(id) else {
			return;
		};
		let value = value.into();
		match element.style.iter_mut().find(|(key, _)| key == property) {
			Some((_, existing)) => *existing = value,
			None => element.style.push((property.to_string(), value)),
		}
	}

	/// Drop an inline style property.
	pub fn remove_style(&mut self, id: NodeId, property: &str) {
		if let Some(element) = self.element_mut(id) {
			element.style.retain(|(key, _)| key != property);
		}
	}

	/// Inline style property parsed as a pixel length.
	pub fn px(&self, id: NodeId, property: &str) -> Option<f32> {
		let value = self.style(id, property)?;
		value.strip_suffix("px").unwrap_or(value).trim().parse().ok()
	}

	/// Set an inline style property to a pixel length.
	pub fn set_px(&mut self, id: NodeId, property: &str, value: f32) {
		self.set_style(id, property, format!("{value}px"));
	}

	/// Hide an element with `display: none`.
	pub fn hide(&mut self, id: NodeId) {
		self.set_style(id, "display", "none");
	}

	/// Undo [`Self::hide`], restoring the element's default display.
	pub fn show(&mut self, id: NodeId) {
		if self.is_hidden(id) {
			self.remove_style(id, "display");
		}
	}

	/// Show or hide depending on `visible`.
	pub fn set_visible(&mut self, id: NodeId, visible: bool) {
		if visible {
			self.show(id);
		} else {
			self.hide(id);
		}
	}

	/// Whether the element itself carries `display: none`.
	pub fn is_hidden(&self, id: NodeId) -> bool {
		self.style(id, "display") == Some("none")
	}

	/// Whether neither the node nor any of its ancestors is hidden.
	pub fn is_rendered(&self, id: NodeId) -> bool {
		!self.is_hidden(id) && self.ancestors(id).all(|node| !self.is_hidden(node))
	}
}
