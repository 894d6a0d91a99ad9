//! Event delivery.
//!
//! Handlers are kept in an explicit registration list of [`Binding`]s. Dispatch bubbles from
//! the target up to the document root and, at each node, runs that node's bindings for the
//! event kind in registration order. Every handler runs to completion before dispatch returns.

use std::iter;

use super::{Page, Transition, TransitionKind};
use crate::dom::NodeId;

/// Keys the filter box distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
	/// Clears the filter text.
	Escape,
	/// Any printable character.
	Char(char),
	/// Anything else.
	Other,
}

/// A user or host event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
	/// A key was released over `target`.
	KeyUp {
		/// Element with keyboard focus.
		target: NodeId,
		/// Released key.
		key: Key,
	},
	/// A key was pressed over `target`.
	KeyDown {
		/// Element with keyboard focus.
		target: NodeId,
	},
	/// `target` received focus.
	Focus {
		/// Focused element.
		target: NodeId,
	},
	/// `target` was clicked.
	Click {
		/// Clicked element.
		target: NodeId,
	},
	/// A pointer button went down over `target`.
	MouseDown {
		/// Element under the pointer.
		target: NodeId,
	},
	/// A pointer button went up over `target`.
	MouseUp {
		/// Element under the pointer.
		target: NodeId,
	},
	/// The pointer left `target`.
	MouseOut {
		/// Element the pointer left.
		target: NodeId,
	},
	/// The viewport was resized.
	Resize {
		/// New inner width of the viewport.
		width: f32,
	},
}

/// Discriminant of an [`Event`], used to match bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// [`Event::KeyUp`].
	KeyUp,
	/// [`Event::KeyDown`].
	KeyDown,
	/// [`Event::Focus`].
	Focus,
	/// [`Event::Click`].
	Click,
	/// [`Event::MouseDown`].
	MouseDown,
	/// [`Event::MouseUp`].
	MouseUp,
	/// [`Event::MouseOut`].
	MouseOut,
	/// [`Event::Resize`].
	Resize,
}

impl Event {
	/// Kind of the event.
	pub fn kind(&self) -> EventKind {
		match self {
			Self::KeyUp { .. } => EventKind::KeyUp,
			Self::KeyDown { .. } => EventKind::KeyDown,
			Self::Focus { .. } => EventKind::Focus,
			Self::Click { .. } => EventKind::Click,
			Self::MouseDown { .. } => EventKind::MouseDown,
			Self::MouseUp { .. } => EventKind::MouseUp,
			Self::MouseOut { .. } => EventKind::MouseOut,
			Self::Resize { .. } => EventKind::Resize,
		}
	}

	/// Target element; window-level events have none.
	pub fn target(&self) -> Option<NodeId> {
		match *self {
			Self::KeyUp { target, .. }
			| Self::KeyDown { target }
			| Self::Focus { target }
			| Self::Click { target }
			| Self::MouseDown { target }
			| Self::MouseUp { target }
			| Self::MouseOut { target } => Some(target),
			Self::Resize { .. } => None,
		}
	}
}

/// What a binding does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	/// Filter-box key-up: Escape clears the text, then re-filter with scrolling.
	FilterKeyUp,
	/// Select the filter text on focus.
	SelectFilterText,
	/// Clear the filter text and re-filter.
	ClearFilter,
	/// Move focus to the filter box unless it already has it.
	FocusFilter,
	/// Expand or collapse the member whose signature was clicked.
	ToggleMember,
	/// Open or close a `.toggleContainer`.
	ToggleContainer,
	/// Mark a cycling button as pressed and suppress text selection.
	PressButton,
	/// Clear a cycling button's pressed mark.
	ReleaseButton,
	/// Advance a cycling button to its next face.
	CycleFaces,
	/// Suppress text selection.
	SuppressSelection,
	/// Flip a toggle button.
	ToggleActive,
	/// Run a filter pass.
	Refilter {
		/// Scroll the filter bar into place afterwards.
		scroll: bool,
	},
	/// Run the layout adjuster.
	AdjustLayout,
	/// Reset the ancestor toggles after the inheritance control changed.
	ResetAncestors,
	/// Show or hide the ancestor bar after the linearization control changed.
	UpdateAncestorsVisibility,
}

/// One registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
	/// Element the handler is attached to; window-level handlers use the document root.
	pub node: NodeId,
	/// Event kind the handler listens for.
	pub kind: EventKind,
	/// Handler behavior.
	pub action: Action,
}

/// Result of dispatching an event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventOutcome {
	/// Number of handlers that ran.
	pub handled: usize,
	/// Whether a handler suppressed the default behavior (text selection).
	pub default_prevented: bool,
}

impl Page {
	/// Register a handler.
	pub(crate) fn bind(&mut self, node: NodeId, kind: EventKind, action: Action) {
		self.bindings.push(Binding { node, kind, action });
	}

	/// The registration list, in order.
	pub fn bindings(&self) -> &[Binding] {
		&self.bindings
	}

	/// Deliver an event.
	pub fn dispatch(&mut self, event: Event) -> EventOutcome {
		if let Event::Resize { width } = event {
			self.layout.set_viewport_width(width);
		}
		let target = event.target().unwrap_or_else(|| self.doc.root());
		let kind = event.kind();
		let path: Vec<NodeId> = iter::once(target).chain(self.doc.ancestors(target)).collect();

		let mut outcome = EventOutcome::default();
		for current in path {
			let actions: Vec<Action> = self
				.bindings
				.iter()
				.filter(|binding| binding.node == current && binding.kind == kind)
				.map(|binding| binding.action)
				.collect();
			for action in actions {
				self.run_action(action, current, &event, &mut outcome);
				outcome.handled += 1;
			}
		}
		outcome
	}

	/// Press, release and click `target`, the way a pointer click arrives.
	pub fn click(&mut self, target: NodeId) -> EventOutcome {
		let down = self.dispatch(Event::MouseDown { target });
		let up = self.dispatch(Event::MouseUp { target });
		let click = self.dispatch(Event::Click { target });
		EventOutcome {
			handled: down.handled + up.handled + click.handled,
			default_prevented: down.default_prevented || click.default_prevented,
		}
	}

	/// Replace the filter text and deliver the key-up that typing produces.
	pub fn type_query(&mut self, text: &str) -> EventOutcome {
		self.set_filter_text(text);
		let target = self.refs.filter_input;
		self.dispatch(Event::KeyUp {
			target,
			key: Key::Other,
		})
	}

	/// Give `target` keyboard focus, firing its focus handlers.
	pub fn focus(&mut self, target: NodeId) -> EventOutcome {
		self.focused = Some(target);
		self.filter_text_selected = false;
		self.dispatch(Event::Focus { target })
	}

	fn run_action(&mut self, action: Action, current: NodeId, event: &Event, outcome: &mut EventOutcome) {
		match action {
			Action::FilterKeyUp => {
				if let Event::KeyUp { key: Key::Escape, .. } = event {
					self.set_filter_text("");
				}
				self.filter(true);
			}
			Action::SelectFilterText => self.filter_text_selected = true,
			Action::ClearFilter => {
				self.set_filter_text("");
				self.filter(false);
			}
			Action::FocusFilter => {
				let input = self.refs.filter_input;
				if self.focused != Some(input) {
					self.focus(input);
				}
			}
			Action::ToggleMember => self.toggle_member(current),
			Action::ToggleContainer => self.toggle_container(current),
			Action::PressButton => {
				self.doc.add_class(current, "in");
				outcome.default_prevented = true;
			}
			Action::ReleaseButton => self.doc.remove_class(current, "in"),
			Action::CycleFaces => {
				if let Some(button) = self.buttons.iter().find(|button| button.node() == current) {
					button.advance(&mut self.doc);
				}
			}
			Action::SuppressSelection => outcome.default_prevented = true,
			Action::ToggleActive => {
				if let Some(toggle) = self.ancestors.iter().find(|toggle| toggle.node() == current) {
					let active = toggle.toggle(&mut self.doc);
					tracing::trace!(
						ancestor = toggle.name().unwrap_or_default(),
						active,
						"toggled ancestor"
					);
				}
			}
			Action::Refilter { scroll } => {
				self.filter(scroll);
			}
			Action::AdjustLayout => self.adjust_layout(),
			Action::ResetAncestors => self.reset_ancestors(),
			Action::UpdateAncestorsVisibility => self.update_ancestors_visibility(),
		}
	}

	/// Expand or collapse the member owning `signature`.
	fn toggle_member(&mut self, signature: NodeId) {
		let Some(member) = self.doc.parent(signature) else {
			return;
		};
		let comments = self.doc.descendants_with_class(member, "fullcomment");
		let Some(&first) = comments.first() else {
			return;
		};
		let closed = self.options.closed_height;
		let current = self.doc.px(first, "height");
		let target = if current == Some(closed) {
			match self.open_heights.get(&member) {
				Some(open) => *open,
				None => return,
			}
		} else {
			closed
		};
		for comment in comments {
			let from = self.doc.px(comment, "height").unwrap_or(target);
			self.doc.set_px(comment, "height", target);
			self.record_transition(comment, TransitionKind::Height { from, to: target });
		}
		self.doc.toggle_class(signature, "closed");
		self.doc.toggle_class(signature, "opened");
	}

	fn toggle_container(&mut self, container: NodeId) {
		self.doc.toggle_class(container, "open");
		for content in self.doc.descendants_with_class(container, "hiddenContent") {
			let opening = self.doc.is_hidden(content);
			self.doc.set_visible(content, opening);
			self.record_transition(content, TransitionKind::Slide { opening });
		}
	}

	fn record_transition(&mut self, node: NodeId, kind: TransitionKind) {
		let duration = self.options.transition_duration;
		tracing::trace!(node = node.index(), ?kind, ?duration, "transition");
		self.transitions.push(Transition { node, kind, duration });
	}

	fn reset_ancestors(&mut self) {
		let show_all = self
			.refs
			.inheritance
			.is_some_and(|control| self.face_showing(control, "show"));
		if show_all {
			for index in &self.default_ancestors {
				self.ancestors[*index].set_active(&mut self.doc, true);
			}
		} else {
			for toggle in &self.ancestors {
				toggle.set_active(&mut self.doc, false);
			}
			if let Some(first) = self.ancestors.first() {
				first.set_active(&mut self.doc, true);
			}
		}
	}

	fn update_ancestors_visibility(&mut self) {
		let Some(bar) = self.refs.ancestors_bar else {
			return;
		};
		let expanded = self
			.refs
			.linearization
			.is_some_and(|control| self.face_showing(control, "hide"));
		self.doc.set_visible(bar, expanded);
	}
}
