//! Integration tests for the chainable query collection.

use sift_css::{NodeList, Sift, Target};
use sift_dom::NodeId;

const TEST_HTML2: &str = r#"<!DOCTYPE html>
<html>
	<head>
		<meta charset="utf-8">
		<title>Example HTML 5 document</title>
		<!-- Comment -->
	</head>
	<body>
		<div id="main" class=container>
			<br>
			<list class="list">
				<li id="li1">li1 text</li>
				<li id="li2"></li>
				<li id="li3">li1 text</li>
				<li id="li4" class="item">li1 text</li>
			</list>
			<hr>
			<p id="p1"></p>
			<p id="p2" />
			<p id="p3">p3 text</p>
			<h1>header1</h1>
			<h6></h6>
		</div>
	</body>
</html>"#;

/// The id of each node in the list, or its name when it has none.
fn labels(list: &NodeList<'_>) -> Vec<String> {
    let dom = list.dom();
    list.iter()
        .map(|n| dom.attr(n, "id").unwrap_or_else(|| dom.name(n)).to_string())
        .collect()
}

/// Markup of the whole document the list works on.
fn body(list: &NodeList<'_>, doc: NodeId) -> String {
    list.dom().inner_html(doc, list.config())
}

// ========== set operations ==========

#[test]
fn test_state_stack() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse(TEST_HTML2);
    let mut list = sift.query(&mut dom, &[doc]);

    let _ = list.find("body").unwrap().find("li:eq(1)").unwrap().and_self();
    assert_eq!(labels(&list), vec!["li2", "body"]);
    assert_eq!(list.depth(), 2);

    let _ = list.end().end().find("*").unwrap().first();
    assert_eq!(labels(&list), vec!["html"]);
    let _ = list.end().last();
    assert_eq!(labels(&list), vec!["h6"]);
    let _ = list.end().slice(-2, None);
    assert_eq!(labels(&list), vec!["h1", "h6"]);
    let _ = list.end().slice(3, Some(3));
    assert_eq!(labels(&list), vec!["title", "body", "main"]);

    let _ = list.end();
    assert_eq!(list.len(), 18);
    let element = list.get(7).unwrap();
    assert_eq!(list.dom().name(element), "list");
    assert_eq!(list.index(element), Some(7));
    let _ = list.eq(7);
    assert_eq!(list.first_node(), Some(element));
    let _ = list.end().eq(-11);
    assert_eq!(list.first_node(), Some(element));
    let _ = list.end().eq(18);
    assert!(list.is_empty());
}

#[test]
fn test_end_on_empty_stack_keeps_contents() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<a></a>");
    let mut list = sift.query(&mut dom, &[doc]);
    let _ = list.end().end();
    assert_eq!(list.as_slice(), &[doc]);
    let _ = list.and_self();
    assert_eq!(list.len(), 1);
}

#[test]
fn test_add_and_delete() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<a></a><b></b><c></c>");
    let [a, b, c] = [0, 1, 2].map(|i| dom.children(doc)[i]);
    let mut list = sift.query(&mut dom, &[a, b, a]);
    assert_eq!(list.to_vec(), vec![a, b]);

    let _ = list.add(&[c, b]);
    assert_eq!(list.to_vec(), vec![a, b, c]);
    let _ = list.delete(0);
    assert_eq!(list.to_vec(), vec![b, c]);
    let _ = list.delete_node(c).delete(5);
    assert_eq!(list.to_vec(), vec![b]);
    assert_eq!(list.index(a), None);
    assert_eq!(list.last_node(), Some(b));
}

// ========== text and attributes ==========

#[test]
fn test_text_and_markup_accessors() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<p>one <b>two</b></p><p>three</p>");
    let mut list = sift.select(&mut dom, doc, "p").unwrap();
    assert_eq!(list.text(), "one two");
    assert_eq!(list.text_all(), "one twothree");
    assert_eq!(list.html(), "one <b>two</b>");
    assert_eq!(list.html_all(), "one <b>two</b>three");
    assert_eq!(list.outer_html(), "<p>one <b>two</b></p>");

    let _ = list.set_text("x<y");
    assert_eq!(list.text(), "x<y");
    let _ = list.last().set_html("<i>new</i>");
    assert_eq!(list.outer_html(), "<p><i>new</i></p>");

    let _ = list.find("nothing").unwrap();
    assert_eq!(list.text(), "");
    assert_eq!(list.outer_html(), "");
}

#[test]
fn test_attributes() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<a href=x></a><a></a>");
    let mut list = sift.select(&mut dom, doc, "a").unwrap();
    assert_eq!(list.attr("href"), Some("x"));
    assert!(list.has_attr("href"));

    let _ = list.set_attr("rel", "nofollow").set_attr("hidden", sift_dom::AttrValue::Present);
    assert_eq!(
        list.outer_html_all(),
        r#"<a href="x" rel="nofollow" hidden></a><a rel="nofollow" hidden></a>"#
    );
    let _ = list.remove_attr("rel").remove_attr("href");
    assert!(!list.has_attr("href"));
    assert_eq!(list.outer_html_all(), "<a hidden></a><a hidden></a>");
}

// ========== filtering ==========

#[test]
fn test_filter_not_and_is() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse(TEST_HTML2);
    let mut list = sift.select(&mut dom, doc, "li").unwrap();
    assert!(list.is("li").unwrap());
    assert!(list.is("#li4").unwrap());
    assert!(!list.is("div").unwrap());

    let _ = list.not("#li2").unwrap();
    assert_eq!(labels(&list), vec!["li1", "li3", "li4"]);
    let _ = list.end().filter(":empty, .item").unwrap();
    assert_eq!(labels(&list), vec!["li2", "li4"]);
    assert!(list.not("[").is_err());
}

#[test]
fn test_find_nth() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse(TEST_HTML2);
    let mut list = sift.query(&mut dom, &[doc]);
    let third = list.find_nth("li", 2).unwrap();
    assert_eq!(third.and_then(|n| list.dom().attr(n, "id")), Some("li3"));
    assert_eq!(list.end().find_nth("li", 9).unwrap(), None);
}

#[test]
fn test_closest() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse(TEST_HTML2);
    let mut list = sift.select(&mut dom, doc, "li:eq(0)").unwrap();
    let name = |list: &NodeList<'_>, n: Option<NodeId>| n.map(|n| list.dom().name(n).to_string());

    let found = list.closest("div").unwrap();
    assert_eq!(name(&list, found).as_deref(), Some("div"));
    let found = list.closest("html").unwrap();
    assert_eq!(name(&list, found).as_deref(), Some("html"));
    let found = list.closest("list,body").unwrap();
    assert_eq!(name(&list, found).as_deref(), Some("list"));
    assert_eq!(list.closest("p").unwrap(), None);

    let _ = list.end().find("p:eq(1)").unwrap();
    let found = list.closest("body").unwrap();
    assert_eq!(name(&list, found).as_deref(), Some("body"));
    let _ = list.find("nothing").unwrap();
    assert_eq!(list.closest("*").unwrap(), None);
}

// ========== traversal ==========

#[test]
fn test_children_and_contents() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse(TEST_HTML2);
    let mut list = sift.select(&mut dom, doc, "list").unwrap();

    let _ = list.contents();
    assert_eq!(list.len(), 9);
    let _ = list.end().children(None).unwrap();
    assert_eq!(labels(&list), vec!["li1", "li2", "li3", "li4"]);
    let _ = list.end().children(Some("#li2,#li4")).unwrap();
    assert_eq!(labels(&list), vec!["li2", "li4"]);
    let _ = list.end().children(Some(":not(#li3)")).unwrap();
    assert_eq!(labels(&list), vec!["li1", "li2", "li4"]);
}

#[test]
fn test_parent_and_ancestors() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse(TEST_HTML2);
    let mut list = sift.select(&mut dom, doc, "li:eq(0),title").unwrap();
    let _ = list.parent(None).unwrap();
    assert_eq!(labels(&list), vec!["list", "head"]);
    let _ = list.end().parent(Some("head")).unwrap();
    assert_eq!(labels(&list), vec!["head"]);

    let _ = list.end().first().parents(None).unwrap();
    assert_eq!(labels(&list), vec!["list", "main", "body", "html"]);
    let _ = list.end().parents(Some("html,div")).unwrap();
    assert_eq!(labels(&list), vec!["main", "html"]);
    let _ = list.end().parents(Some(":not(html,div)")).unwrap();
    assert_eq!(labels(&list), vec!["list", "body"]);

    let _ = list.end().parents_until("div").unwrap();
    assert_eq!(labels(&list), vec!["list"]);
    let _ = list.end().parents_until("html").unwrap();
    assert_eq!(labels(&list), vec!["list", "main", "body"]);
    let _ = list.end().parents_until("list").unwrap();
    assert!(list.is_empty());
}

#[test]
fn test_ancestors_of_several_nodes() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse(TEST_HTML2);
    let mut list = sift.select(&mut dom, doc, "li:eq(0),p:eq(1)").unwrap();
    assert_eq!(labels(&list), vec!["li1", "p2"]);
    let _ = list.parents(None).unwrap();
    assert_eq!(list.len(), 4);
    let _ = list.end().parents(Some("body")).unwrap();
    assert_eq!(list.len(), 1);
    let _ = list.end().parents_until("body").unwrap();
    assert_eq!(labels(&list), vec!["list", "main"]);
}

#[test]
fn test_next_siblings() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse(TEST_HTML2);
    let mut list = sift.select(&mut dom, doc, "li:eq(0),p:eq(1)").unwrap();
    let _ = list.next(None).unwrap();
    assert_eq!(labels(&list), vec!["li2", "p3"]);
    let _ = list.end().next(Some("p")).unwrap();
    assert_eq!(labels(&list), vec!["p3"]);

    let _ = list.end().first().next_all(None).unwrap();
    assert_eq!(labels(&list), vec!["li2", "li3", "li4"]);
    let _ = list.end().next_all(Some("#li3")).unwrap();
    assert_eq!(labels(&list), vec!["li3"]);
    let _ = list.end().next_until("#li4").unwrap();
    assert_eq!(labels(&list), vec!["li2", "li3"]);
    let _ = list.end().next_until("#li2").unwrap();
    assert!(list.is_empty());

    let mut list = sift.select(&mut dom, doc, "li:eq(1),p:eq(2)").unwrap();
    let _ = list.next_all(None).unwrap();
    assert_eq!(labels(&list), vec!["li3", "li4", "h1", "h6"]);
    let _ = list.end().next_all(Some(":header")).unwrap();
    assert_eq!(labels(&list), vec!["h1", "h6"]);
    let _ = list.end().next_until(":header").unwrap();
    assert_eq!(labels(&list), vec!["li3", "li4"]);
}

#[test]
fn test_previous_siblings() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse(TEST_HTML2);
    let mut list = sift.select(&mut dom, doc, "li:eq(1),p:eq(2)").unwrap();
    let _ = list.prev(None).unwrap();
    assert_eq!(labels(&list), vec!["li1", "p2"]);
    let _ = list.end().prev(Some("p")).unwrap();
    assert_eq!(labels(&list), vec!["p2"]);
    let _ = list.end().prev_all(None).unwrap();
    assert_eq!(labels(&list), vec!["li1", "p2", "p1", "hr", "list", "br"]);
    let _ = list.end().prev_all(Some("list")).unwrap();
    assert_eq!(list.len(), 1);
    let _ = list.end().prev_until("hr").unwrap();
    assert_eq!(labels(&list), vec!["li1", "p2", "p1"]);

    let mut list = sift.select(&mut dom, doc, "#li3").unwrap();
    let _ = list.prev_all(None).unwrap();
    assert_eq!(labels(&list), vec!["li2", "li1"]);
    let _ = list.end().prev_all(Some("#li1")).unwrap();
    assert_eq!(labels(&list), vec!["li1"]);
    let _ = list.end().prev_until("#li1").unwrap();
    assert_eq!(labels(&list), vec!["li2"]);
    let _ = list.end().prev_until("#li2").unwrap();
    assert!(list.is_empty());
}

#[test]
fn test_siblings() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse(TEST_HTML2);
    let mut list = sift.select(&mut dom, doc, "#li3").unwrap();
    let _ = list.siblings(None).unwrap();
    assert_eq!(labels(&list), vec!["li2", "li1", "li4"]);

    let mut list = sift.select(&mut dom, doc, "li:eq(1),p:eq(2)").unwrap();
    let _ = list.siblings(None).unwrap();
    assert_eq!(list.len(), 10);
    let _ = list.end().siblings(Some(":not(p)")).unwrap();
    assert_eq!(list.len(), 8);
}

// ========== manipulation ==========

#[test]
fn test_append_distributes_copies() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<p></p><p></p><p></p>");
    let mut list = sift.select(&mut dom, doc, "p").unwrap();
    let _ = list.append("<div>text</div>");
    assert_eq!(list.outer_html_all(), "<p><div>text</div></p>".repeat(3));
    let _ = list.prepend("a").after("<br>").before("<hr>");
    assert_eq!(
        body(&list, doc),
        "<hr /><p>a<div>text</div></p><br />".repeat(3)
    );
}

#[test]
fn test_append_existing_nodes_moves_them() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("text<br/>text<br/><br/>");
    let mut list = sift.query(&mut dom, &[doc]);
    let brs = list.find("br").unwrap().detach().to_vec();
    assert_eq!(brs.len(), 3);
    assert_eq!(body(&list, doc), "texttext");
    let _ = list.end().append(&brs);
    assert_eq!(list.html(), "texttext<br /><br /><br />");
}

#[test]
fn test_replace_with() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<a></a>x<b></b>");
    let mut list = sift.select(&mut dom, doc, "a, b").unwrap();
    let _ = list.replace_with("<i></i>");
    assert_eq!(list.len(), 2);
    assert_eq!(body(&list, doc), "<i></i>x<i></i>");
}

#[test]
fn test_wrap_family() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<p/>");
    let mut list = sift.select(&mut dom, doc, "p").unwrap();
    let _ = list.wrap("<div></div>");
    assert_eq!(body(&list, doc), "<div><p /></div>");

    let (mut dom, doc) = sift.parse("<p>l</p><p><br/></p>");
    let mut list = sift.select(&mut dom, doc, "p").unwrap();
    let _ = list.wrap_inner("<b></b>");
    assert_eq!(list.outer_html_all(), "<p><b>l</b></p><p><b><br /></b></p>");

    let (mut dom, doc) = sift.parse("<p/><l>t</l><i></i><l/><b/>");
    let mut list = sift.select(&mut dom, doc, "l, i").unwrap();
    let _ = list.wrap_all("<div></div>");
    assert_eq!(
        body(&list, doc),
        "<p /><div><l>t</l><l /><i></i></div><b />"
    );
    let _ = list.unwrap();
    assert_eq!(body(&list, doc), "<p /><l>t</l><b />");
}

#[test]
fn test_unwrap_and_empty() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<div><p><b>x</b>y</p></div>");
    let mut list = sift.select(&mut dom, doc, "b").unwrap();
    let _ = list.unwrap();
    assert_eq!(body(&list, doc), "<div><b>x</b></div>");
    let _ = list.empty();
    assert_eq!(body(&list, doc), "<div><b></b></div>");
}

#[test]
fn test_remove_clears_list_and_stack() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<a></a><b></b>");
    let mut list = sift.select(&mut dom, doc, "a").unwrap();
    let _ = list.remove();
    assert!(list.is_empty());
    assert_eq!(list.depth(), 0);
    assert_eq!(body(&list, doc), "<b></b>");
}

#[test]
fn test_clone_nodes() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<a><i>x</i></a><b></b>");
    let b = dom.children(doc)[1];
    let mut list = sift.select(&mut dom, doc, "i").unwrap();
    let original = list.first_node();
    let _ = list.clone_nodes();
    assert_ne!(list.first_node(), original);
    let _ = list.append_to(b).unwrap();
    assert_eq!(body(&list, doc), "<a><i>x</i></a><b><i>x</i></b>");
}

#[test]
fn test_append_to_and_prepend_to() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<i><b></b></i>");
    let targets = dom.element_descendants(doc).collect::<Vec<_>>();
    let doc2 = sift.parse_into(&mut dom, "<br/><t/>");

    let mut list = sift.select(&mut dom, doc2, "*").unwrap();
    let _ = list.append_to(&targets).unwrap();
    assert_eq!(list.len(), 4);
    assert_eq!(body(&list, doc), "<i><b><br /><t /></b><br /><t /></i>");
    let _ = list.remove();
    assert_eq!(body(&list, doc), "<i><b></b></i>");

    let mut list = sift.select(&mut dom, doc2, "*").unwrap();
    let _ = list.append_to(&targets).unwrap();
    assert!(list.is_empty());
    let _ = list.find(".unknown").unwrap().append_to("b").unwrap();
    assert!(list.is_empty());

    let doc3 = sift.parse_into(&mut dom, "<br/><t/>");
    let mut list = sift.select(&mut dom, doc3, "*").unwrap();
    let _ = list.prepend_to(&targets).unwrap();
    assert_eq!(labels(&list), vec!["br", "br", "t", "t"]);
    assert_eq!(body(&list, doc), "<i><br /><t /><b><br /><t /></b></i>");
}

#[test]
fn test_insert_after_and_before() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<i><b></b></i>");
    let targets = dom.element_descendants(doc).collect::<Vec<_>>();
    let doc2 = sift.parse_into(&mut dom, "<br/><t/>");
    let mut list = sift.select(&mut dom, doc2, "*").unwrap();
    let _ = list.insert_after(&targets).unwrap();
    assert_eq!(body(&list, doc), "<i><b></b><br /><t /></i><br /><t />");

    let (mut dom, doc) = sift.parse("<i/><i/>");
    let targets = dom.children(doc).to_vec();
    let doc2 = sift.parse_into(&mut dom, "<p/>");
    let mut list = sift.select(&mut dom, doc2, "p").unwrap();
    let _ = list.insert_after(Target::Nodes(&targets)).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(body(&list, doc), "<i /><p /><i /><p />");

    let doc3 = sift.parse_into(&mut dom, "<s/>");
    let mut list = sift.select(&mut dom, doc3, "s").unwrap();
    let _ = list.insert_before(&targets).unwrap();
    assert_eq!(body(&list, doc), "<s /><i /><p /><s /><i /><p />");
}

#[test]
fn test_targets_by_selector_stay_in_document() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<ul><li>a</li></ul><ul></ul><b>x</b>");
    let mut list = sift.select(&mut dom, doc, "b").unwrap();
    let _ = list.append_to("ul").unwrap();
    assert_eq!(
        body(&list, doc),
        "<ul><li>a</li><b>x</b></ul><ul><b>x</b></ul>"
    );
    assert!(list.append_to("[").is_err());
}

#[test]
fn test_replace_all() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<a/><b/><c/>");
    let targets = [0, 2].map(|i| dom.children(doc)[i]);
    let doc2 = sift.parse_into(&mut dom, "<n/><m/>");
    let mut list = sift.select(&mut dom, doc2, "*").unwrap();
    let _ = list.replace_all(&targets[..]).unwrap();
    assert_eq!(list.len(), 4);
    assert_eq!(body(&list, doc), "<n /><m /><b /><n /><m />");
}

#[test]
fn test_debug_lists_nodes() {
    let mut sift = Sift::new();
    let (mut dom, doc) = sift.parse("<a></a>");
    let list = sift.select(&mut dom, doc, "a").unwrap();
    let debug = format!("{list:?}");
    assert!(debug.contains("NodeList"));
    assert_eq!((&list).into_iter().count(), 1);
}
