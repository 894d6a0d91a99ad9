//! Snapshot of the member listing a reader currently sees.

use crate::dom::NodeId;
use crate::page::{MemberOrdering, MemberVisibility, Page};

/// Visible members of a page, grouped the way the page shows them.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MemberListing {
	/// Document title.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Ordering the page is in.
	pub ordering: MemberOrdering,
	/// Current filter text.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub query: String,
	/// Visible member groups in page order.
	pub sections: Vec<ListingSection>,
}

/// One visible member group.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ListingSection {
	/// Group heading, such as `Value Members`.
	pub heading: String,
	/// Ancestor the group belongs to, for inheritance-grouped lists.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub inherited_from: Option<String>,
	/// Visible members of the group.
	pub members: Vec<ListedMember>,
}

/// One visible member entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ListedMember {
	/// Qualified name.
	pub name: String,
	/// Owner part of the name.
	pub owner: String,
	/// Member part of the name.
	pub member: String,
	/// Visibility class.
	pub visibility: MemberVisibility,
	/// Whether the member's full comment is expanded.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub expanded: bool,
}

/// Collect the groups and entries that are currently rendered.
pub fn build_listing(page: &Page) -> MemberListing {
	let doc = page.document();
	let mut sections = Vec::new();

	for group in page.flat_groups() {
		if let Some(section) = listed_section(page, group, None) {
			sections.push(section);
		}
	}

	if let Some(inherited) = page.inherited_section()
		&& doc.is_rendered(inherited)
	{
		for parent in doc.children_with_class(inherited, "parent") {
			let owner = doc.attr(parent, "name").map(str::to_string);
			for group in doc.children_with_class(parent, "members") {
				if let Some(section) = listed_section(page, group, owner.clone()) {
					sections.push(section);
				}
			}
		}
	}

	MemberListing {
		title: doc.title(),
		ordering: page.ordering(),
		query: page.filter_text().trim().to_string(),
		sections,
	}
}

fn listed_section(page: &Page, group: NodeId, inherited_from: Option<String>) -> Option<ListingSection> {
	let doc = page.document();
	if !doc.is_rendered(group) {
		return None;
	}
	let members: Vec<ListedMember> = group_members(page, group)
		.into_iter()
		.filter(|node| doc.is_rendered(*node))
		.filter_map(|node| {
			let entry = page.member(node)?;
			Some(ListedMember {
				name: entry.name.as_str().to_string(),
				owner: entry.name.owner().to_string(),
				member: entry.name.member().to_string(),
				visibility: entry.visibility,
				expanded: doc
					.descendants_with_class(node, "signature")
					.into_iter()
					.any(|signature| doc.has_class(signature, "opened")),
			})
		})
		.collect();
	if members.is_empty() {
		return None;
	}
	let heading = doc
		.children_with_tag(group, "h3")
		.into_iter()
		.next()
		.map(|title| doc.text_content(title).trim().to_string())
		.unwrap_or_else(|| "Members".to_string());
	Some(ListingSection {
		heading,
		inherited_from,
		members,
	})
}

fn group_members(page: &Page, group: NodeId) -> Vec<NodeId> {
	let doc = page.document();
	doc.children_with_tag(group, "ol")
		.into_iter()
		.flat_map(|list| doc.children_with_tag(list, "li"))
		.collect()
}
