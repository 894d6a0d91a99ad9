//! The load sequence that runs once when a [`Page`] takes over its document.

use std::collections::{HashMap, HashSet};

use super::buttons::{CyclingButton, ToggleButton};
use super::events::{Action, EventKind};
use super::members::{MemberEntry, MemberSchemaError};
use super::Page;
use crate::dom::NodeId;

/// Flat member lists and the sub-list each is grouped into under an ancestor.
const MEMBER_KINDS: &[(&str, &str, &str)] = &[
	("types", "types members", "Type Members"),
	("values", "values members", "Value Members"),
];

const USE_CASE_LABEL: &str = "[Use Case]";

impl Page {
	pub(super) fn ready(&mut self) {
		self.mark_openable_comments();
		self.label_use_cases();
		self.bind_filter_box();
		self.register_members();
		self.group_inherited_members();
		self.register_grouped_members();
		self.add_tooltips();
		self.bind_member_toggles();
		self.bind_toggle_containers();
		self.propagate_title();
		self.init_buttons();
		self.init_ancestors();
		self.bind_filter_bar();

		self.filter(false);
		self.adjust_layout();
		let root = self.doc.root();
		self.bind(root, EventKind::Resize, Action::AdjustLayout);
		tracing::debug!(
			members = self.members.len(),
			buttons = self.buttons.len(),
			ancestors = self.ancestors.len(),
			bindings = self.bindings.len(),
			"page ready"
		);
	}

	/// Scope of the per-member behavior: `#template`, or the whole document without one.
	fn template_scope(&self) -> NodeId {
		self.refs.template.unwrap_or_else(|| self.doc.root())
	}

	fn mark_openable_comments(&mut self) {
		let scope = self.template_scope();
		let closed = self.options.closed_height;
		for comment in self.doc.descendants_with_class(scope, "fullcomment") {
			let open_height = self.layout.content_height(&self.doc, comment);
			if open_height <= self.options.openable_threshold {
				continue;
			}
			if let Some(member) = self.doc.parent(comment) {
				self.open_heights.insert(member, open_height);
			}
			self.doc.add_class(comment, "openable");
			self.doc.set_px(comment, "height", closed);
		}
	}

	fn label_use_cases(&mut self) {
		let scope = self.template_scope();
		let comments: Vec<NodeId> = self
			.doc
			.descendants_with_class(scope, "fullcomment")
			.into_iter()
			.filter(|node| self.doc.has_class(*node, "useCase"))
			.flat_map(|node| self.doc.descendants_with_class(node, "comment"))
			.collect();
		for comment in comments {
			match self.doc.first_element_child(comment) {
				Some(first) if self.doc.is_tag(first, "p") => {
					let label = self.doc.create_text(format!("{USE_CASE_LABEL} "));
					self.doc.prepend_child(first, label);
				}
				_ => {
					let paragraph = self.doc.create_element("p");
					let label = self.doc.create_text(USE_CASE_LABEL);
					self.doc.append_child(paragraph, label);
					self.doc.prepend_child(comment, paragraph);
				}
			}
		}
	}

	fn bind_filter_box(&mut self) {
		let input = self.refs.filter_input;
		self.bind(input, EventKind::KeyUp, Action::FilterKeyUp);
		self.bind(input, EventKind::Focus, Action::SelectFilterText);
		for clear in self.doc.children_with_class(self.refs.filter_box, "post") {
			self.bind(clear, EventKind::Click, Action::ClearFilter);
		}
		let root = self.doc.root();
		self.bind(root, EventKind::KeyDown, Action::FocusFilter);
		self.focus(input);
	}

	/// Validate every member entry of the flat listing.
	fn register_members(&mut self) {
		let mut nodes = Vec::new();
		for group in self.flat_groups() {
			nodes.extend(self.group_entries(group));
		}
		for (id, _, _) in MEMBER_KINDS {
			if let Some(list) = self.doc.find_by_id(id) {
				nodes.extend(self.group_entries(list));
			}
		}
		self.register_entries(nodes);
	}

	/// Entries the page already rendered under an ancestor, next to the grouped copies.
	fn register_grouped_members(&mut self) {
		let nodes: Vec<NodeId> = self
			.inherited_groups()
			.into_iter()
			.flat_map(|group| self.group_entries(group))
			.collect();
		self.register_entries(nodes);
	}

	fn register_entries(&mut self, nodes: Vec<NodeId>) {
		let before = self.members.len();
		let mut skipped = 0;
		for node in nodes {
			if self.members.contains_key(&node) {
				continue;
			}
			let open_height = self.open_heights.get(&node).copied();
			match MemberEntry::from_node(&self.doc, node, open_height) {
				Ok(entry) => {
					self.members.insert(node, entry);
				}
				Err(err) => {
					skipped += 1;
					tracing::warn!(node = node.index(), %err, "skipping member entry");
				}
			}
		}
		tracing::debug!(
			registered = self.members.len() - before,
			skipped,
			"registered members"
		);
	}

	/// Copy flat members under the ancestor that declares them and drop empty ancestors.
	fn group_inherited_members(&mut self) {
		let Some(inherited) = self.refs.inherited_members else {
			return;
		};
		let mut parents: HashMap<String, NodeId> = HashMap::new();
		for parent in self.doc.children_with_class(inherited, "parent") {
			if let Some(name) = self.doc.attr(parent, "name") {
				parents.entry(name.to_string()).or_insert(parent);
			}
		}

		for (id, class, heading) in MEMBER_KINDS {
			let Some(list) = self.doc.find_by_id(id) else {
				continue;
			};
			let mut sublists: HashMap<NodeId, NodeId> = HashMap::new();
			for node in self.group_entries(list) {
				let Some(entry) = self.members.get(&node) else {
					continue;
				};
				let Some(&parent) = entry.name.declared_owner().and_then(|owner| parents.get(owner))
				else {
					continue;
				};
				let entry = entry.clone();
				let sublist = match sublists.get(&parent) {
					Some(sublist) => *sublist,
					None => {
						let sublist = self
							.existing_member_group(parent, id)
							.unwrap_or_else(|| self.create_member_group(parent, class, heading));
						sublists.insert(parent, sublist);
						sublist
					}
				};
				let copy = self.doc.deep_clone(node);
				self.doc.append_child(sublist, copy);
				if let Some(open_height) = self.open_heights.get(&node).copied() {
					self.open_heights.insert(copy, open_height);
				}
				self.members.insert(copy, entry.duplicate(copy));
			}
		}

		for parent in self.doc.children_with_class(inherited, "parent") {
			if !self.doc.is_tag(parent, "div") {
				continue;
			}
			let grouped = self
				.doc
				.children_with_class(parent, "members")
				.into_iter()
				.any(|group| self.doc.is_tag(group, "div"));
			if !grouped {
				tracing::debug!(
					ancestor = self.doc.attr(parent, "name").unwrap_or_default(),
					"removing ancestor without members"
				);
				self.doc.remove(parent);
			}
		}
	}

	/// The `> .kind > ol` list of an ancestor container, when one was already rendered.
	fn existing_member_group(&self, parent: NodeId, kind: &str) -> Option<NodeId> {
		self.doc
			.children_with_class(parent, kind)
			.into_iter()
			.filter(|group| self.doc.has_class(*group, "members"))
			.find_map(|group| self.doc.children_with_tag(group, "ol").into_iter().next())
	}

	/// Append `<div class="..."><h3>heading</h3><ol></ol></div>` to `parent`; returns the `ol`.
	fn create_member_group(&mut self, parent: NodeId, class: &str, heading: &str) -> NodeId {
		let group = self
			.doc
			.create_element_with("div", vec![("class".to_string(), class.to_string())]);
		let title = self.doc.create_element("h3");
		let text = self.doc.create_text(heading);
		self.doc.append_child(title, text);
		self.doc.append_child(group, title);
		let list = self.doc.create_element("ol");
		self.doc.append_child(group, list);
		self.doc.append_child(parent, group);
		list
	}

	fn add_tooltips(&mut self) {
		let root = self.doc.root();
		let targets: Vec<(NodeId, String)> = self
			.doc
			.descendants(root)
			.into_iter()
			.filter(|node| self.doc.has_class(*node, "extype") || self.doc.has_class(*node, "defval"))
			.filter_map(|node| Some((node, self.doc.attr(node, "name")?.to_string())))
			.collect();
		for (node, name) in targets {
			self.doc.set_attr(node, "title", name);
		}
	}

	fn bind_member_toggles(&mut self) {
		let scope = self.template_scope();
		let mut seen = HashSet::new();
		let signatures: Vec<NodeId> = self
			.doc
			.descendants_with_tag(scope, "li")
			.into_iter()
			.filter(|member| !self.doc.descendants_with_class(*member, "openable").is_empty())
			.flat_map(|member| self.doc.descendants_with_class(member, "signature"))
			.filter(|signature| seen.insert(*signature))
			.collect();
		for signature in signatures {
			self.doc.add_class(signature, "closed");
			self.bind(signature, EventKind::Click, Action::ToggleMember);
		}
	}

	fn bind_toggle_containers(&mut self) {
		let root = self.doc.root();
		for container in self.doc.descendants_with_class(root, "toggleContainer") {
			self.bind(container, EventKind::Click, Action::ToggleContainer);
		}
	}

	fn propagate_title(&mut self) {
		let title = self.doc.title().unwrap_or_default();
		if let Err(err) = self.frame.set_title(&title) {
			tracing::debug!(%err, "could not set the parent frame title");
		}
	}

	fn init_buttons(&mut self) {
		let root = self.doc.root();
		for node in self.doc.descendants_with_class(root, "button") {
			let button = CyclingButton::attach(&mut self.doc, node);
			self.buttons.push(button);
			self.bind(node, EventKind::MouseDown, Action::PressButton);
			self.bind(node, EventKind::MouseUp, Action::ReleaseButton);
			self.bind(node, EventKind::MouseOut, Action::ReleaseButton);
			self.bind(node, EventKind::Click, Action::CycleFaces);
		}
		for node in self.doc.descendants_with_class(root, "toggleButton") {
			self.bind(node, EventKind::MouseDown, Action::SuppressSelection);
			self.bind(node, EventKind::Click, Action::ToggleActive);
		}
	}

	fn init_ancestors(&mut self) {
		let Some(bar) = self.refs.ancestors_bar else {
			return;
		};
		let title = self.doc.title();
		for node in self.doc.descendants_with_class(bar, "toggleButton") {
			let toggle = ToggleButton::attach(&self.doc, node);
			let visible_by_default = match toggle.name() {
				Some(name) => {
					!self.options.default_hidden_ancestors.iter().any(|hidden| hidden == name)
						|| title.as_deref() == Some(name)
				}
				None => {
					tracing::warn!(
						node = node.index(),
						err = %MemberSchemaError::UnnamedAncestor,
						"ancestor toggle cannot exclude members"
					);
					true
				}
			};
			if visible_by_default {
				self.default_ancestors.push(self.ancestors.len());
				toggle.set_active(&mut self.doc, true);
			}
			self.bind(node, EventKind::Click, Action::Refilter { scroll: true });
			self.ancestors.push(toggle);
		}
	}

	fn bind_filter_bar(&mut self) {
		for control in [self.refs.order, self.refs.visibility].into_iter().flatten() {
			self.bind(control, EventKind::Click, Action::AdjustLayout);
			self.bind(control, EventKind::Click, Action::Refilter { scroll: true });
		}
		if let Some(control) = self.refs.inheritance {
			self.bind(control, EventKind::Click, Action::AdjustLayout);
			self.bind(control, EventKind::Click, Action::ResetAncestors);
			self.bind(control, EventKind::Click, Action::Refilter { scroll: true });
		}
		if let Some(control) = self.refs.linearization {
			self.bind(control, EventKind::Click, Action::UpdateAncestorsVisibility);
			self.bind(control, EventKind::Click, Action::AdjustLayout);
		}
	}
}
