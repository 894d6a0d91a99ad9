//! Page controller.
//!
//! A [`Page`] owns the document tree of one generated documentation page together with the
//! state the page script keeps in memory: node handles for the filter bar, the cycling and
//! ancestor buttons, the validated member registry, cached open heights and the handler
//! registration list. It is built once per document; every interaction goes through
//! [`Page::dispatch`].

mod buttons;
mod events;
mod filter;
mod frame;
mod init;
mod layout;
mod members;

use std::collections::HashMap;
use std::time::Duration;

pub use self::buttons::{CyclingButton, ToggleButton};
pub use self::events::{Action, Binding, Event, EventKind, EventOutcome, Key};
pub use self::filter::{
	FilterParams, FilterReport, HideReason, MemberOrdering, MemberQuery, QueryDomain, Verdict,
	decide, excluded_ancestors,
};
pub use self::frame::{CrossOriginFrame, EmbeddingFrame, FrameError, HostFrame, TopLevel};
pub use self::layout::{EstimatedLayout, LayoutBox, LayoutMetrics};
pub use self::members::{MemberEntry, MemberSchemaError, MemberVisibility, QualifiedName};
use crate::core_api::error::{DocpageError, Result};
use crate::dom::{Document, NodeId};

/// Tunables of the page behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
	/// Height of a collapsed member comment.
	pub closed_height: f32,
	/// Comments taller than this become expandable.
	pub openable_threshold: f32,
	/// Margin subtracted from the viewport width when sizing the filter box.
	pub filter_margin: f32,
	/// Margin subtracted from the client width when the viewport width is unknown.
	pub client_margin: f32,
	/// Duration recorded for expand/collapse and slide transitions.
	pub transition_duration: Duration,
	/// Ancestors whose toggles start inactive, unless the page documents them.
	pub default_hidden_ancestors: Vec<String>,
	/// Entry fields matched by the filter text.
	pub query_domains: QueryDomain,
}

impl Default for PageOptions {
	fn default() -> Self {
		Self {
			closed_height: 17.0,
			openable_threshold: 27.0,
			filter_margin: 26.0,
			client_margin: 10.0,
			transition_duration: Duration::from_millis(100),
			default_hidden_ancestors: vec!["scala.Any".to_string(), "scala.AnyRef".to_string()],
			query_domains: QueryDomain::default(),
		}
	}
}

/// A presentational transition the host may animate; the state change itself is immediate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
	/// Animated element.
	pub node: NodeId,
	/// What changes.
	pub kind: TransitionKind,
	/// How long the animation should take.
	pub duration: Duration,
}

/// Kinds of transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionKind {
	/// Inline height interpolation.
	Height {
		/// Starting height.
		from: f32,
		/// Final height.
		to: f32,
	},
	/// Slide open or closed.
	Slide {
		/// Whether the element is being revealed.
		opening: bool,
	},
}

/// Handles to the well-known elements of a page.
#[derive(Debug, Clone)]
struct PageRefs {
	template: Option<NodeId>,
	filter_box: NodeId,
	filter_input: NodeId,
	member_bar: Option<NodeId>,
	definition: Option<NodeId>,
	comment: Option<NodeId>,
	ancestors_bar: Option<NodeId>,
	all_members: Option<NodeId>,
	inherited_members: Option<NodeId>,
	visibility: Option<NodeId>,
	order: Option<NodeId>,
	inheritance: Option<NodeId>,
	linearization: Option<NodeId>,
}

impl PageRefs {
	fn resolve(doc: &Document) -> Result<Self> {
		let filter_box = doc
			.find_by_id("textfilter")
			.ok_or(DocpageError::MissingElement("#textfilter"))?;
		let filter_input = doc
			.descendants_with_tag(filter_box, "input")
			.into_iter()
			.next()
			.ok_or(DocpageError::MissingElement("#textfilter input"))?;
		Ok(Self {
			template: doc.find_by_id("template"),
			filter_box,
			filter_input,
			member_bar: doc.find_by_id("mbrsel"),
			definition: doc.find_by_id("definition"),
			comment: doc.find_by_id("comment"),
			ancestors_bar: doc.find_by_id("ancestors"),
			all_members: doc.find_by_id("allMembers"),
			inherited_members: doc.find_by_id("inheritedMembers"),
			visibility: doc.find_by_id("visibility"),
			order: doc.find_by_id("order"),
			inheritance: doc.find_by_id("inheritance"),
			linearization: doc.find_by_id("linearization"),
		})
	}
}

/// Controller for one documentation page.
pub struct Page {
	doc: Document,
	options: PageOptions,
	layout: Box<dyn LayoutMetrics>,
	frame: Box<dyn HostFrame>,
	refs: PageRefs,
	buttons: Vec<CyclingButton>,
	ancestors: Vec<ToggleButton>,
	default_ancestors: Vec<usize>,
	members: HashMap<NodeId, MemberEntry>,
	open_heights: HashMap<NodeId, f32>,
	bindings: Vec<Binding>,
	focused: Option<NodeId>,
	filter_text_selected: bool,
	scroll_y: f32,
	transitions: Vec<Transition>,
}

impl std::fmt::Debug for Page {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Page")
			.field("options", &self.options)
			.field("members", &self.members.len())
			.field("bindings", &self.bindings.len())
			.field("focused", &self.focused)
			.field("scroll_y", &self.scroll_y)
			.finish_non_exhaustive()
	}
}

impl Page {
	/// Take over a parsed document and run the load sequence.
	///
	/// Fails when the page has no `#textfilter` box with an `input`; every other well-known
	/// element is optional and the behavior attached to it is skipped when it is absent.
	pub fn new(
		doc: Document,
		options: PageOptions,
		layout: Box<dyn LayoutMetrics>,
		frame: Box<dyn HostFrame>,
	) -> Result<Self> {
		let refs = PageRefs::resolve(&doc)?;
		let mut page = Self {
			doc,
			options,
			layout,
			frame,
			refs,
			buttons: Vec::new(),
			ancestors: Vec::new(),
			default_ancestors: Vec::new(),
			members: HashMap::new(),
			open_heights: HashMap::new(),
			bindings: Vec::new(),
			focused: None,
			filter_text_selected: false,
			scroll_y: 0.0,
			transitions: Vec::new(),
		};
		page.ready();
		Ok(page)
	}

	/// The document tree.
	pub fn document(&self) -> &Document {
		&self.doc
	}

	/// Give up the controller, keeping the mutated document.
	pub fn into_document(self) -> Document {
		self.doc
	}

	/// Options the page was built with.
	pub fn options(&self) -> &PageOptions {
		&self.options
	}

	/// The embedding frame.
	pub fn frame(&self) -> &dyn HostFrame {
		self.frame.as_ref()
	}

	/// Registered member entry rendered by `node`.
	pub fn member(&self, node: NodeId) -> Option<&MemberEntry> {
		self.members.get(&node)
	}

	/// All registered member entries, flat and grouped copies alike, in document order.
	pub fn members(&self) -> Vec<&MemberEntry> {
		let mut entries: Vec<&MemberEntry> = self.members.values().collect();
		entries.sort_by_key(|entry| entry.node);
		entries
	}

	/// Nodes rendering the member with the given qualified name.
	pub fn member_nodes(&self, name: &str) -> Vec<NodeId> {
		self.members()
			.into_iter()
			.filter(|entry| entry.name.as_str() == name && self.doc.is_attached(entry.node))
			.map(|entry| entry.node)
			.collect()
	}

	/// The filter input element.
	pub fn filter_input(&self) -> NodeId {
		self.refs.filter_input
	}

	/// Current filter text.
	pub fn filter_text(&self) -> &str {
		self.doc.attr(self.refs.filter_input, "value").unwrap_or("")
	}

	/// Replace the filter text without filtering.
	pub fn set_filter_text(&mut self, text: &str) {
		self.doc.set_attr(self.refs.filter_input, "value", text);
	}

	/// Element with keyboard focus.
	pub fn focused(&self) -> Option<NodeId> {
		self.focused
	}

	/// Whether the filter text is selected, as it is right after the box gains focus.
	pub fn is_filter_text_selected(&self) -> bool {
		self.filter_text_selected
	}

	/// Vertical scroll offset requested by the last scrolling filter pass.
	pub fn scroll_y(&self) -> f32 {
		self.scroll_y
	}

	/// Transitions recorded so far.
	pub fn transitions(&self) -> &[Transition] {
		&self.transitions
	}

	/// Drain the recorded transitions.
	pub fn take_transitions(&mut self) -> Vec<Transition> {
		std::mem::take(&mut self.transitions)
	}

	/// Element of a named filter-bar control: `visibility`, `order`, `inheritance` or
	/// `linearization`.
	pub fn control(&self, name: &str) -> Option<NodeId> {
		match name {
			"visibility" => self.refs.visibility,
			"order" => self.refs.order,
			"inheritance" => self.refs.inheritance,
			"linearization" => self.refs.linearization,
			_ => None,
		}
	}

	/// Cycling buttons of the page.
	pub fn cycling_buttons(&self) -> &[CyclingButton] {
		&self.buttons
	}

	/// Ancestor toggles in page order.
	pub fn ancestor_toggles(&self) -> &[ToggleButton] {
		&self.ancestors
	}

	/// Element of the ancestor toggle with the given name.
	pub fn ancestor_toggle(&self, name: &str) -> Option<NodeId> {
		self.ancestors
			.iter()
			.find(|toggle| toggle.name() == Some(name))
			.map(ToggleButton::node)
	}

	/// Whether the ancestor toggle with the given name is active.
	pub fn is_ancestor_active(&self, name: &str) -> Option<bool> {
		self.ancestors
			.iter()
			.find(|toggle| toggle.name() == Some(name))
			.map(|toggle| toggle.is_active(&self.doc))
	}

	/// Whether protected members are hidden (the visibility control shows its `public` face).
	pub fn privacy_hidden(&self) -> bool {
		self.refs
			.visibility
			.is_some_and(|control| self.face_showing(control, "public"))
	}

	/// Current ordering (alphabetic when the order control shows its `alpha` face).
	pub fn ordering(&self) -> MemberOrdering {
		let alphabetic = self
			.refs
			.order
			.is_some_and(|control| self.face_showing(control, "alpha"));
		if alphabetic {
			MemberOrdering::Alphabetic
		} else {
			MemberOrdering::Inheritance
		}
	}

	/// The `.all`/`.members` flat groups of the page.
	pub fn flat_groups(&self) -> Vec<NodeId> {
		self.refs
			.all_members
			.map(|all| self.doc.children_with_class(all, "members"))
			.unwrap_or_default()
	}

	/// The inherited-members section.
	pub fn inherited_section(&self) -> Option<NodeId> {
		self.refs.inherited_members
	}

	/// Whether an element with `class` under `control` is showing.
	fn face_showing(&self, control: NodeId, class: &str) -> bool {
		self.doc
			.descendants_with_class(control, class)
			.into_iter()
			.any(|face| self.doc.is_rendered(face))
	}
}
