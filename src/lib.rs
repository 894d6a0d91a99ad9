//! Core library for docpage, the controller behind generated API documentation pages.
//!
//! A documentation page lists the type and value members of one class or trait, with a filter
//! box, ordering and visibility controls and a row of ancestor toggles. This crate loads such a
//! page into an owned document tree, groups inherited members under their ancestors, and keeps
//! member visibility in sync with the controls as events are replayed against it.

/// Document tree, HTML loader and serializer.
pub mod dom;

/// Page controller: initialization, filtering, buttons, layout and events.
pub mod page;

/// Core API for docpage operations.
pub mod core_api;

pub use crate::core_api::{Docpage, DocpageError, MemberListing, Result, build_listing};
pub use crate::page::{Event, MemberOrdering, Page, PageOptions, QueryDomain};
