//! Writes a document tree back out as HTML.

use super::parse::RAW_TEXT_ELEMENTS;
use super::{Document, NodeData, NodeId};

const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

fn escape_text(text: &str, out: &mut String) {
	for ch in text.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'\u{a0}' => out.push_str("&nbsp;"),
			_ => out.push(ch),
		}
	}
}

fn escape_attr(value: &str, out: &mut String) {
	for ch in value.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'"' => out.push_str("&quot;"),
			_ => out.push(ch),
		}
	}
}

impl Document {
	/// Serialize the whole document.
	pub fn to_html(&self) -> String {
		let mut out = String::new();
		for child in self.children(self.root()) {
			self.write_node(*child, false, &mut out);
		}
		out
	}

	/// Serialize a node and its subtree.
	pub fn outer_html(&self, id: NodeId) -> String {
		let mut out = String::new();
		let raw = self
			.parent(id)
			.and_then(|parent| self.tag(parent))
			.is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
		self.write_node(id, raw, &mut out);
		out
	}

	fn write_node(&self, id: NodeId, raw_text: bool, out: &mut String) {
		match self.data(id) {
			NodeData::Document => {
				for child in self.children(id) {
					self.write_node(*child, false, out);
				}
			}
			NodeData::Doctype(name) => {
				out.push_str("<!DOCTYPE ");
				out.push_str(name);
				out.push('>');
			}
			NodeData::Comment(text) => {
				out.push_str("<!--");
				out.push_str(text);
				out.push_str("-->");
			}
			NodeData::Text(text) => {
				if raw_text {
					out.push_str(text);
				} else {
					escape_text(text, out);
				}
			}
			NodeData::Element(element) => {
				out.push('<');
				out.push_str(&element.tag);
				for (name, value) in &element.attrs {
					out.push(' ');
					out.push_str(name);
					out.push_str("=\"");
					escape_attr(value, out);
					out.push('"');
				}
				if !element.style.is_empty() {
					let style = element
						.style
						.iter()
						.map(|(property, value)| format!("{property}: {value}"))
						.collect::<Vec<_>>()
						.join("; ");
					out.push_str(" style=\"");
					escape_attr(&style, out);
					out.push('"');
				}
				out.push('>');
				if VOID_ELEMENTS.contains(&element.tag.as_str()) {
					return;
				}
				let raw_body = RAW_TEXT_ELEMENTS.contains(&element.tag.as_str());
				for child in self.children(id) {
					self.write_node(*child, raw_body, out);
				}
				out.push_str("</");
				out.push_str(&element.tag);
				out.push('>');
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn writes_styles_and_escapes() {
		let mut doc = Document::new();
		let root = doc.root();
		let div = doc.create_element_with("div", vec![("title".into(), "a \"b\"".into())]);
		doc.append_child(root, div);
		let text = doc.create_text("1 < 2 & 3");
		doc.append_child(div, text);
		let input = doc.create_element("input");
		doc.append_child(div, input);
		doc.hide(div);
		doc.set_px(div, "height", 17.0);

		assert_eq!(
			doc.to_html(),
			r#"<div title="a &quot;b&quot;" style="display: none; height: 17px">1 &lt; 2 &amp; 3<input></div>"#
		);
	}

	#[test]
	fn reparsing_preserves_structure_and_styles() {
		let source = r#"<!DOCTYPE html><div id="a" class="x" style="display: none"><p>one &amp; two</p><br></div>"#;
		let doc = Document::parse_html(source).unwrap();
		let html = doc.to_html();
		assert_eq!(html, source);
		let again = Document::parse_html(&html).unwrap();
		let node = again.find_by_id("a").unwrap();
		assert!(again.is_hidden(node));
	}
}
