//! Load-time decoration, buttons, expand/collapse, layout and frames.
mod utils;

use std::time::Duration;

use docpage::dom::Document;
use docpage::page::{
	CrossOriginFrame, EmbeddingFrame, EstimatedLayout, Event, LayoutBox, TopLevel, TransitionKind,
};
use docpage::{Docpage, DocpageError};
use pretty_assertions::assert_eq;
use utils::*;

#[test]
fn long_comments_become_openable() {
	let page = open_foo();
	let doc = page.document();
	let bar = flat(&page, "pkg.Foo#bar");
	let comment = doc.children_with_class(bar, "fullcomment")[0];
	assert!(doc.has_class(comment, "openable"));
	assert_eq!(doc.px(comment, "height"), Some(17.0));
	assert_eq!(page.member(bar).unwrap().open_height, Some(34.0));

	let secret = flat(&page, "pkg.Foo#secret");
	let short = doc.children_with_class(secret, "fullcomment")[0];
	assert!(!doc.has_class(short, "openable"));
	assert_eq!(doc.px(short, "height"), None);

	let signature = doc.children_with_class(secret, "signature")[0];
	assert!(!doc.has_class(signature, "closed"));
}

#[test]
fn signature_click_expands_then_collapses() {
	let mut page = open_foo();
	let bar = flat(&page, "pkg.Foo#bar");
	let signature = page.document().children_with_class(bar, "signature")[0];
	let comment = page.document().children_with_class(bar, "fullcomment")[0];
	assert!(page.document().has_class(signature, "closed"));
	page.take_transitions();

	page.click(signature);
	assert_eq!(page.document().px(comment, "height"), Some(34.0));
	assert!(page.document().has_class(signature, "opened"));
	assert!(!page.document().has_class(signature, "closed"));
	let transitions = page.take_transitions();
	assert_eq!(transitions.len(), 1);
	assert_eq!(transitions[0].node, comment);
	assert_eq!(transitions[0].kind, TransitionKind::Height { from: 17.0, to: 34.0 });
	assert_eq!(transitions[0].duration, Duration::from_millis(100));

	// Clicks inside the signature bubble up to it.
	let inner = page.document().descendants_with_class(signature, "extype")[0];
	page.click(inner);
	assert_eq!(page.document().px(comment, "height"), Some(17.0));
	assert!(page.document().has_class(signature, "closed"));
	assert!(!page.document().has_class(signature, "opened"));
}

#[test]
fn grouped_copies_expand_independently() {
	let mut page = open_foo();
	let copy = grouped(&page, "pkg.Base#baz").unwrap();
	let signature = page.document().children_with_class(copy, "signature")[0];
	page.click(signature);

	let original = flat(&page, "pkg.Base#baz");
	let doc = page.document();
	let copy_comment = doc.children_with_class(copy, "fullcomment")[0];
	let original_comment = doc.children_with_class(original, "fullcomment")[0];
	assert_eq!(doc.px(copy_comment, "height"), Some(34.0));
	assert_eq!(doc.px(original_comment, "height"), Some(17.0));
}

#[test]
fn toggle_container_slides_hidden_content() {
	let mut page = open_foo();
	let doc = page.document();
	let container = doc.descendants_with_class(doc.root(), "toggleContainer")[0];
	let content = doc.descendants_with_class(container, "hiddenContent")[0];
	let label = doc.children_with_class(container, "toggle")[0];
	assert!(doc.is_hidden(content));

	page.take_transitions();
	page.click(label);
	assert!(page.document().has_class(container, "open"));
	assert!(!page.document().is_hidden(content));
	assert_eq!(
		page.take_transitions()[0].kind,
		TransitionKind::Slide { opening: true }
	);

	page.click(container);
	assert!(!page.document().has_class(container, "open"));
	assert!(page.document().is_hidden(content));
}

#[test]
fn use_cases_are_labelled_once() {
	let page = open_foo();
	let doc = page.document();

	let map = flat(&page, "pkg.Foo#map");
	let comment = doc.descendants_with_class(map, "comment")[0];
	let first = doc.first_element_child(comment).unwrap();
	assert_eq!(doc.text_content(first), "[Use Case] Builds a new collection.");

	let flat_map = flat(&page, "pkg.Foo#flatMap");
	let comment = doc.descendants_with_class(flat_map, "comment")[0];
	let first = doc.first_element_child(comment).unwrap();
	assert!(doc.is_tag(first, "p"));
	assert_eq!(doc.text_content(first), "[Use Case]");
	assert_eq!(doc.text_content(comment).matches("[Use Case]").count(), 1);

	assert!(page.member(map).unwrap().comment_text.starts_with("[Use Case] "));
}

#[test]
fn tooltips_copy_the_name() {
	let page = open_foo();
	let doc = page.document();
	let root = doc.root();
	for class in ["extype", "defval"] {
		for node in doc.descendants_with_class(root, class) {
			assert_eq!(doc.attr(node, "title"), doc.attr(node, "name"));
		}
	}
	let defval = doc.descendants_with_class(root, "defval")[0];
	assert_eq!(doc.attr(defval, "title"), Some("0"));
}

#[test]
fn title_reaches_the_embedding_frame() {
	let doc = Document::parse_html(FOO_PAGE).unwrap();
	let page = docpage()
		.open(doc, Box::new(docpage().layout()), Box::new(EmbeddingFrame::default()))
		.unwrap();
	assert_eq!(page.frame().title(), Some("pkg.Foo"));
}

#[test]
fn cross_origin_frame_is_not_fatal() {
	let doc = Document::parse_html(FOO_PAGE).unwrap();
	let page = docpage()
		.open(doc, Box::new(docpage().layout()), Box::new(CrossOriginFrame))
		.unwrap();
	assert_eq!(page.frame().title(), None);
	assert!(!page.members().is_empty());
}

#[test]
fn filter_box_takes_focus() {
	let mut page = open_foo();
	let input = page.filter_input();
	assert_eq!(page.focused(), Some(input));
	assert!(page.is_filter_text_selected());

	let signature = page.document().descendants_with_class(page.document().root(), "signature")[0];
	page.focus(signature);
	assert!(!page.is_filter_text_selected());

	page.dispatch(Event::KeyDown { target: signature });
	assert_eq!(page.focused(), Some(input));
	assert!(page.is_filter_text_selected());
}

#[test]
fn cycling_button_press_state() {
	let mut page = open_foo();
	let order = page.control("order").unwrap();
	let face = page.document().children_with_tag(order, "div")[0];

	let outcome = page.dispatch(Event::MouseDown { target: face });
	assert!(outcome.default_prevented);
	assert!(page.document().has_class(order, "in"));

	page.dispatch(Event::MouseOut { target: face });
	assert!(!page.document().has_class(order, "in"));
}

const THREE_FACES: &str = r#"<html><body>
<div id="textfilter"><input type="text"/></div>
<div id="mode" class="button"><div class="one">1</div><div class="two">2</div><div class="three">3</div></div>
</body></html>"#;

#[test]
fn three_face_button_cycles_back() {
	let mut page = Docpage::new().parse(THREE_FACES).unwrap();
	let button = page.document().find_by_id("mode").unwrap();
	let faces = page.document().children_with_tag(button, "div");
	let showing = |page: &docpage::Page| -> Vec<bool> {
		faces.iter().map(|face| page.document().is_rendered(*face)).collect()
	};
	assert_eq!(showing(&page), vec![true, false, false]);

	page.click(button);
	assert_eq!(showing(&page), vec![false, true, false]);
	page.click(button);
	assert_eq!(showing(&page), vec![false, false, true]);
	page.click(button);
	assert_eq!(showing(&page), vec![true, false, false]);
}

#[test]
fn pages_without_a_filter_box_are_rejected() {
	let err = Docpage::new()
		.parse("<html><body><div id=\"template\"></div></body></html>")
		.unwrap_err();
	assert!(matches!(err, DocpageError::MissingElement("#textfilter")));

	let err = Docpage::new()
		.parse("<html><body><div id=\"textfilter\"></div></body></html>")
		.unwrap_err();
	assert!(matches!(err, DocpageError::MissingElement("#textfilter input")));
}

const LAYOUT_PAGE: &str = r#"<html><body>
<div id="mbrsel"><span id="label">Filter</span><div id="textfilter"><input type="text"/></div></div>
<div id="comment">About.</div>
<div id="definition">Foo</div>
</body></html>"#;

fn open_layout(layout: EstimatedLayout, doc: Document) -> docpage::Page {
	Docpage::new()
		.open(doc, Box::new(layout), Box::new(TopLevel))
		.unwrap()
}

fn pinned_layout(doc: &Document, layout: EstimatedLayout) -> EstimatedLayout {
	let label = doc.find_by_id("label").unwrap();
	let bar = doc.find_by_id("mbrsel").unwrap();
	let comment = doc.find_by_id("comment").unwrap();
	layout
		.with_box(label, LayoutBox { left: 8.0, top: 0.0, width: 66.0, height: 20.0 })
		.with_box(bar, LayoutBox { left: 0.0, top: 0.0, width: 1000.0, height: 30.0 })
		.with_box(comment, LayoutBox { left: 0.0, top: 100.0, width: 1000.0, height: 50.0 })
}

#[test]
fn filter_box_fills_the_viewport() {
	let doc = Document::parse_html(LAYOUT_PAGE).unwrap();
	let layout = pinned_layout(&doc, EstimatedLayout::new(1024.0));
	let mut page = open_layout(layout, doc);
	let filter = page.document().find_by_id("textfilter").unwrap();
	let definition = page.document().find_by_id("definition").unwrap();

	assert_eq!(page.document().px(filter, "width"), Some(1024.0 - 26.0 - 74.0));
	assert_eq!(page.document().px(definition, "margin-top"), Some(30.0));

	page.dispatch(Event::Resize { width: 800.0 });
	assert_eq!(page.document().px(filter, "width"), Some(800.0 - 26.0 - 74.0));

	page.dispatch(Event::Resize { width: 50.0 });
	assert_eq!(page.document().px(filter, "width"), Some(0.0));
}

#[test]
fn client_width_is_used_without_a_viewport() {
	let doc = Document::parse_html(LAYOUT_PAGE).unwrap();
	let layout = pinned_layout(&doc, EstimatedLayout::without_viewport(600.0));
	let page = open_layout(layout, doc);
	let filter = page.document().find_by_id("textfilter").unwrap();
	assert_eq!(page.document().px(filter, "width"), Some(600.0 - 10.0 - 74.0));
}

#[test]
fn typing_scrolls_the_filter_bar_into_place() {
	let doc = Document::parse_html(LAYOUT_PAGE).unwrap();
	let layout = pinned_layout(&doc, EstimatedLayout::new(1024.0));
	let mut page = open_layout(layout, doc);
	assert_eq!(page.scroll_y(), 0.0);
	page.type_query("x");
	assert_eq!(page.scroll_y(), 120.0);
}

#[test]
fn serialized_pages_keep_member_visibility() {
	let mut page = open_foo();
	page.type_query("widget hash");
	let html = page.document().to_html();

	let visibility = |doc: &Document| -> Vec<(String, bool)> {
		doc.descendants_with_tag(doc.root(), "li")
			.into_iter()
			.filter_map(|node| Some((doc.attr(node, "name")?.to_string(), doc.is_rendered(node))))
			.collect()
	};
	let reloaded = Document::parse_html(&html).unwrap();
	assert_eq!(visibility(&reloaded), visibility(page.document()));
	assert_eq!(reloaded.to_html(), html);
}

#[test]
fn pages_load_from_disk() {
	let (_dir, path) = write_page(FOO_PAGE);
	let page = docpage().load(&path).unwrap();
	assert_eq!(page.document().title().as_deref(), Some("pkg.Foo"));
	assert!(grouped(&page, "pkg.Base#baz").is_some());

	let missing = path.with_file_name("Missing.html");
	assert!(matches!(docpage().load(missing), Err(DocpageError::Io(_))));
}
