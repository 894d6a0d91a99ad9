//! HTML loading built on `lol_html` streaming handlers.
//!
//! `lol_html` never materializes a tree, so the handlers feed a small tree builder: element
//! start tags open nodes, end-tag handlers close them, and document-level text, comment and
//! doctype handlers fill in the rest. Text is buffered until the next structural event so that
//! character references split across chunks decode correctly.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use lol_html::html_content::EndTag;
use lol_html::{
	EndTagHandler, RewriteStrSettings, doc_comments, doc_text, doctype, element, rewrite_str,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{Document, NodeData, NodeId};
use crate::core_api::error::{DocpageError, Result};

/// Elements whose bodies are kept verbatim.
pub(super) const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

static CHARACTER_REFERENCE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);")
		.expect("character reference pattern is valid")
});

/// Decode the character references generated pages use; unknown references are left as-is.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
	if !text.contains('&') {
		return Cow::Borrowed(text);
	}
	CHARACTER_REFERENCE.replace_all(text, |caps: &Captures<'_>| {
		let body = &caps[1];
		let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
			u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
		} else if let Some(decimal) = body.strip_prefix('#') {
			decimal.parse().ok().and_then(char::from_u32)
		} else {
			match body {
				"amp" => Some('&'),
				"lt" => Some('<'),
				"gt" => Some('>'),
				"quot" => Some('"'),
				"apos" => Some('\''),
				"nbsp" => Some('\u{a0}'),
				_ => None,
			}
		};
		match decoded {
			Some(ch) => ch.to_string(),
			None => caps[0].to_string(),
		}
	})
}

/// Whether opening `next` implicitly ends an open `current` element.
fn closes_implicitly(current: &str, next: &str) -> bool {
	match current {
		"li" => next == "li",
		"p" => matches!(
			next,
			"p" | "div" | "ol" | "ul" | "dl" | "pre" | "table" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
		),
		"dt" | "dd" => matches!(next, "dt" | "dd"),
		"option" => next == "option",
		_ => false,
	}
}

#[derive(Default)]
struct TreeBuilder {
	doc: Document,
	open: Vec<NodeId>,
	pending_text: String,
}

impl TreeBuilder {
	fn current(&self) -> NodeId {
		self.open.last().copied().unwrap_or_else(|| self.doc.root())
	}

	fn open_element(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
		self.flush_text();
		if let Some(&top) = self.open.last()
			&& let Some(open_tag) = self.doc.tag(top)
			&& closes_implicitly(open_tag, tag)
		{
			self.open.pop();
		}
		let attrs = attrs
			.into_iter()
			.map(|(name, value)| {
				let value = decode_entities(&value).into_owned();
				(name, value)
			})
			.collect();
		let node = self.doc.create_element_with(tag, attrs);
		let parent = self.current();
		self.doc.append_child(parent, node);
		self.open.push(node);
		node
	}

	fn close_element(&mut self, node: NodeId) {
		self.flush_text();
		if let Some(position) = self.open.iter().rposition(|open| *open == node) {
			self.open.truncate(position);
		}
	}

	fn push_text(&mut self, chunk: &str) {
		self.pending_text.push_str(chunk);
	}

	fn push_comment(&mut self, text: String) {
		self.flush_text();
		let node = self.doc.create_comment(text);
		let parent = self.current();
		self.doc.append_child(parent, node);
	}

	fn push_doctype(&mut self, name: String) {
		self.flush_text();
		let node = self.doc.create_doctype(name);
		let root = self.doc.root();
		self.doc.append_child(root, node);
	}

	fn flush_text(&mut self) {
		if self.pending_text.is_empty() {
			return;
		}
		let raw = std::mem::take(&mut self.pending_text);
		let parent = self.current();
		let raw_body = self
			.doc
			.tag(parent)
			.is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
		let text = if raw_body {
			raw
		} else {
			decode_entities(&raw).into_owned()
		};

		if let Some(&last) = self.doc.children(parent).last()
			&& let NodeData::Text(existing) = self.doc.data_mut(last)
		{
			existing.push_str(&text);
			return;
		}
		let node = self.doc.create_text(text);
		self.doc.append_child(parent, node);
	}

	fn finish(mut self) -> Document {
		self.flush_text();
		self.doc
	}
}

impl Document {
	/// Parse an HTML page into a document tree.
	pub fn parse_html(html: &str) -> Result<Self> {
		let builder = Rc::new(RefCell::new(TreeBuilder::default()));

		let elements = Rc::clone(&builder);
		let texts = Rc::clone(&builder);
		let comments = Rc::clone(&builder);
		let doctypes = Rc::clone(&builder);

		rewrite_str(
			html,
			RewriteStrSettings {
				element_content_handlers: vec![element!("*", move |el| {
					let attrs = el
						.attributes()
						.iter()
						.map(|attr| (attr.name(), attr.value()))
						.collect();
					let node = elements.borrow_mut().open_element(&el.tag_name(), attrs);
					match el.end_tag_handlers() {
						Some(handlers) => {
							let closer = Rc::clone(&elements);
							let handler: EndTagHandler<'static> =
								Box::new(move |_: &mut EndTag<'_>| {
									closer.borrow_mut().close_element(node);
									Ok(())
								});
							handlers.push(handler);
						}
						// Void elements never see an end tag.
						None => elements.borrow_mut().close_element(node),
					}
					Ok(())
				})],
				document_content_handlers: vec![
					doctype!(move |doctype| {
						let name = doctype.name().unwrap_or_else(|| "html".to_string());
						doctypes.borrow_mut().push_doctype(name);
						Ok(())
					}),
					doc_comments!(move |comment| {
						comments.borrow_mut().push_comment(comment.text());
						Ok(())
					}),
					doc_text!(move |chunk| {
						texts.borrow_mut().push_text(chunk.as_str());
						Ok(())
					}),
				],
				..RewriteStrSettings::new()
			},
		)
		.map_err(|err| DocpageError::Html(err.to_string()))?;

		Ok(builder.take().finish())
	}

	/// Read and parse an HTML page from disk.
	pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
		let html = std::fs::read_to_string(path)?;
		Self::parse_html(&html)
	}
}
