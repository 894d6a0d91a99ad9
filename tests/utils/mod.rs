//! Shared fixtures for the page integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use docpage::dom::NodeId;
use docpage::{Docpage, Page};
use tempfile::TempDir;

/// A generated page for `pkg.Foo`, which extends `pkg.Base` and `pkg.Empty`.
///
/// The cycling buttons start on the inheritance ordering with every member visible; with
/// twenty characters per line, comments longer than twenty characters become expandable.
pub const FOO_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>pkg.Foo</title></head>
<body>
<div id="definition"><h1>Foo</h1></div>
<div id="template">
	<div id="comment" class="fullcommenttop"><p>A foo.</p>
		<div class="toggleContainer"><span class="toggle">Linear Supertypes</span>
			<div class="superTypes hiddenContent" style="display: none"><span class="extype" name="pkg.Base">Base</span>, AnyRef, Any</div>
		</div>
	</div>
	<div id="mbrsel">
		<div id="textfilter"><span class="pre"></span><span class="input"><input type="text" accesskey="/"/></span><span class="post"></span></div>
		<div id="order" class="button"><div class="inherit">By inheritance</div><div class="alpha">Alphabetic</div></div>
		<div id="ancestors">
			<span class="toggleButton" name="pkg.Foo">Foo</span>
			<span class="toggleButton" name="pkg.Base">Base</span>
			<span class="toggleButton" name="pkg.Empty">Empty</span>
			<span class="toggleButton" name="scala.AnyRef">AnyRef</span>
			<span class="toggleButton" name="scala.Any">Any</span>
		</div>
		<div id="inheritance" class="button"><div class="show">Show all</div><div class="hide">Hide all</div></div>
		<div id="linearization" class="button"><div class="hide">Hide linearization</div><div class="show">Show linearization</div></div>
		<div id="visibility" class="button"><div class="all">All</div><div class="public">Public</div></div>
	</div>
	<div id="allMembers">
		<div id="types" class="types members"><h3>Type Members</h3><ol>
			<li name="pkg.Foo#Elem" visbl="pub"><h4 class="signature">type Elem</h4></li>
			<li name="pkg.Foo.Inner" visbl="pub"><h4 class="signature">class Inner</h4></li>
		</ol></div>
		<div id="values" class="values members"><h3>Value Members</h3><ol>
			<li name="pkg.Foo#bar" visbl="pub"><h4 class="signature">def bar: <span class="extype" name="pkg.Widget">Widget</span></h4>
				<div class="fullcomment"><div class="comment cmt"><p>Returns the bar widget.</p></div></div></li>
			<li name="pkg.Foo#map" visbl="pub"><h4 class="signature">def map(n: Int = <span class="defval" name="0">...</span>)</h4>
				<div class="fullcomment useCase"><div class="comment cmt"><p>Builds a new collection.</p></div></div></li>
			<li name="pkg.Foo#flatMap" visbl="pub"><h4 class="signature">def flatMap</h4>
				<div class="fullcomment useCase"><div class="comment cmt">Flat maps.</div></div></li>
			<li name="pkg.Foo#secret" visbl="prt"><h4 class="signature">def secret</h4>
				<div class="fullcomment"><div class="comment cmt"><p>Hidden.</p></div></div></li>
			<li name="pkg.Base#baz" visbl="pub"><h4 class="signature">def baz</h4>
				<div class="fullcomment"><div class="comment cmt"><p>Computes a hash code.</p></div></div></li>
			<li name="scala.AnyRef#hashCode" visbl="pub"><h4 class="signature">def hashCode</h4>
				<div class="fullcomment"><div class="comment cmt"><p>Hash.</p></div></div></li>
			<li id="nameless" visbl="pub"><h4 class="signature">def broken</h4></li>
		</ol></div>
	</div>
	<div id="inheritedMembers">
		<div class="parent" name="pkg.Base"><h3>Inherited from Base</h3></div>
		<div class="parent" name="pkg.Empty"><h3>Inherited from Empty</h3></div>
		<div class="parent" name="scala.AnyRef"><h3>Inherited from AnyRef</h3></div>
	</div>
</div>
</body>
</html>
"#;

/// Builder used by the tests: twenty characters per seventeen-pixel line.
pub fn docpage() -> Docpage {
	Docpage::new().with_line_metrics(17.0, 20)
}

/// Load [`FOO_PAGE`] with the test builder.
pub fn open_foo() -> Page {
	docpage().parse(FOO_PAGE).unwrap()
}

/// Load [`FOO_PAGE`] with every ancestor active from the start.
pub fn open_foo_all_ancestors() -> Page {
	docpage()
		.with_default_hidden_ancestors(Vec::<String>::new())
		.parse(FOO_PAGE)
		.unwrap()
}

/// Write a page into a fresh temporary directory.
pub fn write_page(html: &str) -> (TempDir, PathBuf) {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("Foo.html");
	fs::write(&path, html).unwrap();
	(dir, path)
}

/// Whether a node is inside an ancestor container of the inherited section.
pub fn is_grouped(page: &Page, node: NodeId) -> bool {
	let doc = page.document();
	doc.ancestors(node).any(|id| doc.has_class(id, "parent"))
}

/// The flat-listing node of a member.
pub fn flat(page: &Page, name: &str) -> NodeId {
	page.member_nodes(name)
		.into_iter()
		.find(|node| !is_grouped(page, *node))
		.unwrap_or_else(|| panic!("no flat entry for {name}"))
}

/// The inheritance-grouped copy of a member.
pub fn grouped(page: &Page, name: &str) -> Option<NodeId> {
	page.member_nodes(name)
		.into_iter()
		.find(|node| is_grouped(page, *node))
}

/// Whether the node and all its ancestors are shown.
pub fn shown(page: &Page, node: NodeId) -> bool {
	page.document().is_rendered(node)
}

/// Element with the given `id`.
pub fn by_id(page: &Page, id: &str) -> NodeId {
	page.document()
		.find_by_id(id)
		.unwrap_or_else(|| panic!("no #{id} element"))
}

/// Click the face currently showing on a filter-bar control.
pub fn click_control(page: &mut Page, control: &str) {
	let node = page.control(control).unwrap();
	let doc = page.document();
	let face = doc
		.children_with_tag(node, "div")
		.into_iter()
		.find(|face| doc.is_rendered(*face))
		.unwrap_or(node);
	page.click(face);
}

/// The class of the face currently showing on a filter-bar control.
pub fn showing_face(page: &Page, control: &str) -> String {
	let node = page.control(control).unwrap();
	let doc = page.document();
	doc.children_with_tag(node, "div")
		.into_iter()
		.find(|face| doc.is_rendered(*face))
		.and_then(|face| doc.attr(face, "class"))
		.unwrap_or_default()
		.to_string()
}
