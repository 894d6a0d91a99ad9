//! Member entry schema.
//!
//! Generated pages describe each member with a `li` carrying `name` (`owner#member`, or
//! `owner.member` when no `#` is present) and `visbl` (`pub` or `prt`). Entries are validated
//! once when the registry is built; anything malformed is reported and left out of filtering.

use std::fmt;

use serde::Serialize;

use crate::dom::{Document, NodeId};

/// Visibility class of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberVisibility {
	/// Visible to every client (`visbl="pub"`).
	Public,
	/// Visible to subclasses only (`visbl="prt"`).
	Protected,
}

impl MemberVisibility {
	/// Interpret a `visbl` attribute; anything but `prt` counts as public.
	pub fn from_attr(value: Option<&str>) -> Self {
		match value {
			Some("prt") => Self::Protected,
			Some("pub") | None => Self::Public,
			Some(other) => {
				tracing::debug!(visbl = other, "unknown member visibility, treating as public");
				Self::Public
			}
		}
	}

	/// Human-friendly label.
	pub fn label(self) -> &'static str {
		match self {
			Self::Public => "public",
			Self::Protected => "protected",
		}
	}
}

/// Diagnostics raised while validating page conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSchemaError {
	/// A member entry has no `name` attribute.
	MissingName,
	/// A member name contains neither `#` nor `.`, so no owner can be derived.
	Unqualified(String),
	/// An ancestor toggle button has no `name` attribute.
	UnnamedAncestor,
}

impl fmt::Display for MemberSchemaError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::MissingName => write!(f, "member entry has no `name` attribute"),
			Self::Unqualified(name) => {
				write!(f, "member name `{name}` has no `#` or `.` owner separator")
			}
			Self::UnnamedAncestor => write!(f, "ancestor toggle has no `name` attribute"),
		}
	}
}

impl std::error::Error for MemberSchemaError {}

/// A member's qualified name split into owner and member parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
	full: String,
	owner_end: usize,
	hash_separated: bool,
}

impl QualifiedName {
	/// Split on the first `#`, falling back to the last `.`.
	pub fn parse(name: &str) -> Result<Self, MemberSchemaError> {
		let (owner_end, hash_separated) = match name.find('#') {
			Some(index) => (index, true),
			None => match name.rfind('.') {
				Some(index) => (index, false),
				None => return Err(MemberSchemaError::Unqualified(name.to_string())),
			},
		};
		Ok(Self {
			full: name.to_string(),
			owner_end,
			hash_separated,
		})
	}

	/// The full qualified name.
	pub fn as_str(&self) -> &str {
		&self.full
	}

	/// Owner part used for ancestor exclusion.
	pub fn owner(&self) -> &str {
		&self.full[..self.owner_end]
	}

	/// Member part after the separator.
	pub fn member(&self) -> &str {
		&self.full[self.owner_end + 1..]
	}

	/// Owner when the name uses the `owner#member` form; the only form grouped under ancestors.
	pub fn declared_owner(&self) -> Option<&str> {
		self.hash_separated.then(|| self.owner())
	}
}

impl fmt::Display for QualifiedName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.full)
	}
}

/// A validated member entry and the data cached for it at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberEntry {
	/// The `li` node rendering the entry.
	pub node: NodeId,
	/// Qualified name from the `name` attribute.
	pub name: QualifiedName,
	/// Visibility class from the `visbl` attribute.
	pub visibility: MemberVisibility,
	/// Text of the entry's comment, matched by the filter query.
	pub comment_text: String,
	/// Height of the full comment when expanded, for openable entries.
	pub open_height: Option<f32>,
}

impl MemberEntry {
	/// Validate a member node.
	pub fn from_node(
		doc: &Document,
		node: NodeId,
		open_height: Option<f32>,
	) -> Result<Self, MemberSchemaError> {
		let name = doc.attr(node, "name").ok_or(MemberSchemaError::MissingName)?;
		Ok(Self {
			node,
			name: QualifiedName::parse(name)?,
			visibility: MemberVisibility::from_attr(doc.attr(node, "visbl")),
			comment_text: comment_text(doc, node),
			open_height,
		})
	}

	/// The same entry rendered by another node; cached data carries over.
	pub fn duplicate(&self, node: NodeId) -> Self {
		Self {
			node,
			..self.clone()
		}
	}

	/// Whether the entry is protected.
	pub fn is_protected(&self) -> bool {
		self.visibility == MemberVisibility::Protected
	}
}

/// Text of every `.cmt` inside the entry's own `.fullcomment` children.
pub fn comment_text(doc: &Document, node: NodeId) -> String {
	doc.children_with_class(node, "fullcomment")
		.into_iter()
		.flat_map(|comment| doc.descendants_with_class(comment, "cmt"))
		.map(|cmt| doc.text_content(cmt))
		.collect()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn hash_names_split_on_first_hash() {
		let name = QualifiedName::parse("pkg.Foo#bar").unwrap();
		assert_eq!(name.owner(), "pkg.Foo");
		assert_eq!(name.member(), "bar");
		assert_eq!(name.declared_owner(), Some("pkg.Foo"));
	}

	#[test]
	fn dotted_names_fall_back_to_last_dot() {
		let name = QualifiedName::parse("pkg.Foo.Inner").unwrap();
		assert_eq!(name.owner(), "pkg.Foo");
		assert_eq!(name.member(), "Inner");
		assert_eq!(name.declared_owner(), None);
	}

	#[test]
	fn unqualified_names_are_rejected() {
		assert_eq!(
			QualifiedName::parse("bar"),
			Err(MemberSchemaError::Unqualified("bar".to_string()))
		);
	}

	#[test]
	fn entries_cache_comment_text_and_visibility() {
		let doc = Document::parse_html(
			r#"<ol><li id="m" name="pkg.Foo#bar" visbl="prt"><h4 class="signature">def bar</h4>
			<div class="fullcomment"><div class="comment cmt"><p>Returns the bar.</p></div></div></li></ol>"#,
		)
		.unwrap();
		let node = doc.find_by_id("m").unwrap();
		let entry = MemberEntry::from_node(&doc, node, Some(40.0)).unwrap();
		assert!(entry.is_protected());
		assert_eq!(entry.comment_text, "Returns the bar.");
		assert_eq!(entry.open_height, Some(40.0));
	}

	#[test]
	fn entries_without_names_are_diagnosed() {
		let doc = Document::parse_html(r#"<ol><li id="m" visbl="pub">x</li></ol>"#).unwrap();
		let node = doc.find_by_id("m").unwrap();
		assert_eq!(
			MemberEntry::from_node(&doc, node, None),
			Err(MemberSchemaError::MissingName)
		);
	}
}
