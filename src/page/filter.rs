//! Member filtering.
//!
//! A filter pass recomputes the visibility of every registered member entry from scratch:
//! the privacy face, the ordering face, the ancestor toggles and the filter text are read from
//! the page, turned into [`FilterParams`], and every entry is run through [`decide`].

use std::collections::HashSet;

use bitflags::bitflags;
use regex::Regex;
use serde::Serialize;

use super::Page;
use super::members::MemberEntry;
use crate::core_api::pattern::{query_terms, query_to_pattern};
use crate::dom::NodeId;

bitflags! {
	/// Fields of a member entry that the filter query is matched against.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct QueryDomain: u32 {
		/// Match against the qualified name.
		const NAMES = 1 << 0;
		/// Match against the cached comment text.
		const COMMENTS = 1 << 1;
	}
}

impl Default for QueryDomain {
	fn default() -> Self {
		Self::NAMES | Self::COMMENTS
	}
}

#[derive(Debug, Clone)]
enum Matcher {
	Everything,
	Pattern(Regex),
	Terms(Vec<String>),
}

/// Compiled filter text.
#[derive(Debug, Clone)]
pub struct MemberQuery {
	raw: String,
	matcher: Matcher,
}

impl MemberQuery {
	/// Compile filter text into a case-insensitive alternation of literal terms.
	///
	/// Falls back to plain substring matching of the terms if the pattern fails to compile.
	pub fn compile(raw: &str) -> Self {
		let pattern = query_to_pattern(raw);
		let matcher = if pattern.is_empty() {
			Matcher::Everything
		} else {
			match Regex::new(&format!("(?i){pattern}")) {
				Ok(regex) => Matcher::Pattern(regex),
				Err(err) => {
					tracing::warn!(%err, "filter query failed to compile, using substring match");
					Matcher::Terms(query_terms(raw))
				}
			}
		};
		Self {
			raw: raw.to_string(),
			matcher,
		}
	}

	/// The text the query was compiled from.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Whether the query matches everything.
	pub fn is_empty(&self) -> bool {
		matches!(self.matcher, Matcher::Everything)
	}

	/// Whether any term occurs in `text`, ignoring case.
	pub fn is_match(&self, text: &str) -> bool {
		match &self.matcher {
			Matcher::Everything => true,
			Matcher::Pattern(regex) => regex.is_match(text),
			Matcher::Terms(terms) => {
				let lowered = text.to_lowercase();
				terms.iter().any(|term| lowered.contains(term.as_str()))
			}
		}
	}

	/// Whether the entry's name or comment text matches, within the given domains.
	pub fn matches_entry(&self, entry: &MemberEntry, domains: QueryDomain) -> bool {
		if self.is_empty() {
			return true;
		}
		(domains.contains(QueryDomain::NAMES) && self.is_match(entry.name.as_str()))
			|| (domains.contains(QueryDomain::COMMENTS) && self.is_match(&entry.comment_text))
	}
}

/// How the member listing is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberOrdering {
	/// One flat alphabetic listing; the inherited section is hidden.
	Alphabetic,
	/// Own members in the flat listing, inherited members grouped per ancestor.
	Inheritance,
}

/// Why an entry was hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideReason {
	/// Protected entries are hidden by the visibility control.
	Protected,
	/// The entry's owner is an excluded ancestor.
	ExcludedOwner,
	/// Neither name nor comment matches the query.
	QueryMismatch,
}

/// Outcome of the per-entry decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
	/// The entry is shown.
	Show,
	/// The entry is hidden for the given reason.
	Hide(HideReason),
}

/// Everything a filter pass depends on.
#[derive(Debug, Clone)]
pub struct FilterParams {
	/// Compiled filter text.
	pub query: MemberQuery,
	/// Entry fields the query is matched against.
	pub domains: QueryDomain,
	/// Whether protected members are hidden.
	pub privacy_hidden: bool,
	/// Current ordering mode.
	pub ordering: MemberOrdering,
	/// Ancestor names whose members are hidden from the flat listing.
	pub excluded_owners: HashSet<String>,
}

/// Tally of a filter pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterReport {
	/// Entries left visible.
	pub members_shown: usize,
	/// Entries hidden.
	pub members_hidden: usize,
	/// Groups left visible.
	pub groups_shown: usize,
	/// Groups hidden because none of their entries is visible.
	pub groups_hidden: usize,
}

/// Decide one entry's visibility; the first matching rule wins.
pub fn decide(entry: &MemberEntry, params: &FilterParams, owner_exclusion: bool) -> Verdict {
	if params.privacy_hidden && entry.is_protected() {
		return Verdict::Hide(HideReason::Protected);
	}
	if owner_exclusion && params.excluded_owners.contains(entry.name.owner()) {
		return Verdict::Hide(HideReason::ExcludedOwner);
	}
	if !params.query.matches_entry(entry, params.domains) {
		return Verdict::Hide(HideReason::QueryMismatch);
	}
	Verdict::Show
}

/// Names of the ancestors whose members leave the flat listing.
///
/// `toggles` lists each ancestor toggle's name and active flag in page order. In alphabetic
/// mode every ancestor after the first is excluded; otherwise the inactive ones are. The first
/// ancestor is the documented type itself and is never excluded.
pub fn excluded_ancestors(ordering: MemberOrdering, toggles: &[(Option<&str>, bool)]) -> HashSet<String> {
	toggles
		.iter()
		.skip(1)
		.filter(|(_, active)| ordering == MemberOrdering::Alphabetic || !active)
		.filter_map(|(name, _)| name.map(str::to_string))
		.collect()
}

impl Page {
	/// Read the current filter parameters off the page.
	pub fn filter_params(&self) -> FilterParams {
		let ordering = self.ordering();
		let toggles: Vec<(Option<&str>, bool)> = self
			.ancestors
			.iter()
			.map(|toggle| (toggle.name(), toggle.is_active(&self.doc)))
			.collect();
		FilterParams {
			query: MemberQuery::compile(self.filter_text()),
			domains: self.options.query_domains,
			privacy_hidden: self.privacy_hidden(),
			ordering,
			excluded_owners: excluded_ancestors(ordering, &toggles),
		}
	}

	/// Recompute the visibility of every member entry and member group.
	///
	/// With `scroll` set, the viewport is moved so the filter bar keeps its place below the
	/// page comment.
	pub fn filter(&mut self, scroll: bool) -> FilterReport {
		let params = self.filter_params();
		let mut report = FilterReport::default();

		let flat_groups = self.flat_groups();

		match params.ordering {
			MemberOrdering::Alphabetic => {
				if let Some(inherited) = self.refs.inherited_members {
					self.doc.hide(inherited);
				}
				for group in flat_groups {
					self.filter_group(group, &params, true, &mut report);
				}
			}
			MemberOrdering::Inheritance => {
				if let Some(inherited) = self.refs.inherited_members {
					self.doc.show(inherited);
				}
				for group in flat_groups {
					self.filter_group(group, &params, true, &mut report);
				}
				// Grouped lists hold one ancestor's members each, so owners are never excluded there.
				for group in self.inherited_groups() {
					self.filter_group(group, &params, false, &mut report);
				}
			}
		}

		if scroll {
			self.scroll_to_filter();
		}

		tracing::debug!(
			query = params.query.as_str(),
			ordering = ?params.ordering,
			privacy_hidden = params.privacy_hidden,
			shown = report.members_shown,
			hidden = report.members_hidden,
			"filtered members"
		);
		report
	}

	/// `.members` groups nested under the ancestor containers of the inherited section.
	pub(crate) fn inherited_groups(&self) -> Vec<NodeId> {
		let Some(inherited) = self.refs.inherited_members else {
			return Vec::new();
		};
		self.doc
			.children_with_class(inherited, "parent")
			.into_iter()
			.flat_map(|parent| self.doc.children_with_class(parent, "members"))
			.collect()
	}

	/// Entry nodes of a group (`> ol > li`).
	pub(crate) fn group_entries(&self, group: NodeId) -> Vec<NodeId> {
		self.doc
			.children_with_tag(group, "ol")
			.into_iter()
			.flat_map(|list| self.doc.children_with_tag(list, "li"))
			.collect()
	}

	fn filter_group(
		&mut self,
		group: NodeId,
		params: &FilterParams,
		owner_exclusion: bool,
		report: &mut FilterReport,
	) {
		let mut any_visible = false;
		for node in self.group_entries(group) {
			let Some(entry) = self.members.get(&node) else {
				continue;
			};
			match decide(entry, params, owner_exclusion) {
				Verdict::Show => {
					self.doc.show(node);
					any_visible = true;
					report.members_shown += 1;
				}
				Verdict::Hide(_) => {
					self.doc.hide(node);
					report.members_hidden += 1;
				}
			}
		}
		self.doc.set_visible(group, any_visible);
		if any_visible {
			report.groups_shown += 1;
		} else {
			report.groups_hidden += 1;
		}
	}
}
