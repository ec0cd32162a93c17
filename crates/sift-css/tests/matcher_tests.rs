//! Integration tests for selector matching.

use sift_css::{Matcher, Sift, parse_selector};
use sift_dom::{Dom, MarkupConfig, NodeId};

const TEST_HTML: &str = r#"<div>
	<img class="class0" id="id0" src="src0">
	<img class="class1" id="id1" src="src1">
	<img class="class2" id="id2" src="src2">
</div>"#;

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

const ATTRIBUTES_HTML: &str = r#"<span t=1 disabled />
<span t=2 class="highlighted" />
<span t=3 class="high low right" id="main val" />
<span t=4 id="main" />
<span t=5 lang="ru-RU" />"#;

/// The id of each node, or its name when it has none.
fn labels(dom: &Dom, nodes: &[NodeId]) -> Vec<String> {
    nodes
        .iter()
        .map(|&n| dom.attr(n, "id").unwrap_or_else(|| dom.name(n)).to_string())
        .collect()
}

fn names(dom: &Dom, nodes: &[NodeId]) -> Vec<String> {
    nodes.iter().map(|&n| dom.name(n).to_string()).collect()
}

fn assert_counts(sift: &mut Sift, dom: &Dom, doc: NodeId, cases: &[(&str, usize)]) {
    for &(selector, expected) in cases {
        let found = sift.find(dom, doc, selector).unwrap();
        assert_eq!(found.len(), expected, "selector {selector:?}");
    }
}

// ========== combinators ==========

#[test]
fn test_universal_in_document_order() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(TEST_HTML);
    let all = sift.find(&dom, doc, "*").unwrap();
    assert_eq!(labels(&dom, &all), vec!["div", "id0", "id1", "id2"]);
}

#[test]
fn test_combinators() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(TEST_HTML);
    let children = sift.find(&dom, doc, " div > * ").unwrap();
    assert_eq!(labels(&dom, &children), vec!["id0", "id1", "id2"]);
    assert_counts(
        &mut sift,
        &dom,
        doc,
        &[
            ("div > img", 3),
            ("div img ", 3),
            ("div + img", 0),
            ("img + img", 2),
            ("img ~ img", 2),
            ("img ~ img ~ img", 1),
            ("div > img + img.class1", 1),
        ],
    );
}

#[test]
fn test_child_combinator_skips_nested() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse("<div><img><span><img></span></div>");
    let found = sift.find(&dom, doc, "div > img").unwrap();
    assert_eq!(found.len(), 1);
    let div = dom.children(doc)[0];
    assert_eq!(found, vec![dom.children(div)[0]]);
}

#[test]
fn test_sibling_combinators_at_top_level() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse("<div>\n\t<img id=\"id0\">\n</div>\n<img id=\"id1\">");
    assert!(!sift.is(&dom, doc, "*").unwrap());
    let next = sift.find(&dom, doc, "div + img").unwrap();
    assert_eq!(labels(&dom, &next), vec!["id1"]);

    let (dom, doc) = sift.parse("<div>\n\t<img id=\"id0\">\n</div>\n<br/>\n<img id=\"id1\">");
    assert!(sift.find(&dom, doc, "div + img").unwrap().is_empty());
    let later = sift.find(&dom, doc, "div ~ img").unwrap();
    assert_eq!(labels(&dom, &later), vec!["id1"]);
}

#[test]
fn test_selector_list_keeps_chain_order() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(TEST_HTML2);
    let found = sift.find(&dom, doc, "h1, li#li2, title, h1").unwrap();
    assert_eq!(names(&dom, &found), vec!["h1", "li", "title"]);
}

#[test]
fn test_empty_context_finds_nothing() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse("");
    let complex = "p.class#id[attr]:empty + next ~ #simp :first, .class";
    assert!(sift.find(&dom, doc, complex).unwrap().is_empty());
    let (dom, doc) = sift.parse("just text");
    assert!(sift.find(&dom, doc, "*").unwrap().is_empty());
}

#[test]
fn test_find_nth() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(TEST_HTML);
    let second = sift.find_nth(&dom, doc, "div > img", 1).unwrap();
    assert_eq!(second.and_then(|n| dom.attr(n, "id")), Some("id1"));
    assert_eq!(sift.find_nth(&dom, doc, "img", 3).unwrap(), None);
    let second_any = sift.find_nth(&dom, doc, "*", 1).unwrap();
    assert_eq!(second_any.and_then(|n| dom.attr(n, "class")), Some("class0"));
}

// ========== attributes ==========

#[test]
fn test_attribute_selectors() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(ATTRIBUTES_HTML);
    assert_counts(
        &mut sift,
        &dom,
        doc,
        &[
            ("span.low", 1),
            (".highlighted", 1),
            (".high", 1),
            (".main", 0),
            ("span#main", 1),
            ("#main", 1),
            ("#high", 0),
            ("[disabled]", 1),
            ("[class]", 2),
            ("[class=highlighted]", 1),
            ("[id=\"main\"]", 1),
            ("[lang=\"ru\"]", 0),
            ("[lang=\"ru-RU\"]", 1),
            ("[lang=\"ru-ru\"]", 0),
            ("[class!=highlighted]", 4),
            ("[class*=high]", 2),
            ("[class*=ight]", 2),
            ("[lang*=ru]", 1),
            ("[class*=ru]", 0),
            ("[class^=hi]", 2),
            ("[class^=low]", 0),
            ("[lang^=ru]", 1),
            ("[class$=ed]", 1),
            ("[lang$=ru]", 0),
            ("[class$=low]", 0),
            ("[class~=high]", 1),
            ("[class~=low]", 1),
            ("[class~=lo]", 0),
            ("[lang~=ru]", 0),
            ("[id|=main]", 1),
            ("[lang|=ru]", 1),
            ("[t=1][disabled]", 1),
            ("*[t=1][disabled]", 1),
            ("span[t=1][disabled]", 1),
        ],
    );

    let found = sift.find(&dom, doc, "[disabled], #main").unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(dom.outer_html(found[0], sift.config()), "<span t=\"1\" disabled />");
    assert_eq!(dom.outer_html(found[1], sift.config()), "<span t=\"4\" id=\"main\" />");
    let classes = sift.find(&dom, doc, "[class]").unwrap();
    let t: Vec<_> = classes.iter().filter_map(|&n| dom.attr(n, "t")).collect();
    assert_eq!(t, vec!["2", "3"]);
}

// ========== pseudo-classes ==========

#[test]
fn test_pseudo_classes_simple_document() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(TEST_HTML);
    let cases: &[(&str, &[&str])] = &[
        (":empty", &["id0", "id1", "id2"]),
        (":parent", &["div"]),
        (":first-child", &["id0"]),
        (":last-child", &["id2"]),
        (":only-child", &[]),
        (":header", &[]),
        (":nth-child(2)", &["id1"]),
        (":nth-child(3)", &["id2"]),
        (":nth-child(4)", &[]),
        (":nth-child(0)", &[]),
        (":nth-child(-1)", &[]),
        (":nth-last-child(0)", &[]),
        (":nth-last-child(1)", &["id2"]),
        (":nth-last-child(3)", &["id0"]),
        (":nth-last-child(4)", &[]),
        (":contains(text)", &[]),
        (":nth-of-type(-1)", &[]),
        (":nth-of-type(1)", &["id0"]),
        (":nth-of-type(3)", &["id2"]),
        (":nth-of-type(4)", &[]),
        (":only-of-type", &[]),
        (":first-of-type", &["id0"]),
        (":last-of-type", &["id2"]),
        (":nth-last-of-type(1)", &["id2"]),
        (":nth-last-of-type(3)", &["id0"]),
        (":not(img)", &["div"]),
        (":not(div)", &["id0", "id1", "id2"]),
        (":not(div > img)", &["div"]),
        (":not(div > img ~ img)", &["div", "id0"]),
        (":not(div img)", &["div"]),
        (":not(img + img)", &["div", "id0"]),
        (":not(img ~ img)", &["div", "id0"]),
        (":not(div, img.class0)", &["id1", "id2"]),
        (":has(div)", &[]),
        (":has(img)", &["div"]),
    ];
    for &(selector, expected) in cases {
        let found = sift.find(&dom, doc, selector).unwrap();
        assert_eq!(labels(&dom, &found), expected, "selector {selector:?}");
    }
}

#[test]
fn test_pseudo_classes_full_document() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(TEST_HTML2);
    assert_counts(
        &mut sift,
        &dom,
        doc,
        &[
            ("*", 18),
            (":empty", 7),
            ("*:empty", 7),
            (":empty:empty", 7),
            (":empty :empty", 0),
            ("hr:empty", 1),
            ("p:empty", 2),
            ("[id]:empty", 3),
            ("[id][id]:empty[id]", 3),
            ("#p1:empty", 1),
            (":parent", 11),
            (":parent:parent", 11),
            (":parent :parent", 10),
            (":parent ~ :parent", 5),
            (":parent :parent :parent", 8),
            (":parent + :parent", 3),
            (":parent :parent + :parent", 3),
            (":parent ~ :parent + :parent", 2),
            ("p:parent", 1),
            (":first-child", 5),
            (":first-child:first-child", 5),
            (":first-child :first-child", 3),
            (":last-child", 5),
            (":last-child :last-child", 3),
            (":only-child", 1),
            (":header", 2),
            (":nth-child(3)", 2),
            (":nth-child(4)", 2),
            (":nth-child(8)", 1),
            (":nth-child(9)", 0),
            (":nth-child()", 0),
            (":nth-child", 0),
            (":nth-last-child(1)", 5),
            (":nth-last-child(2)", 4),
            (":nth-last-child(9)", 0),
            (":contains(text)", 8),
            (":contains(example)", 0),
            (":contains(Example)", 3),
            (":contains(header)", 4),
            (":contains(some)", 0),
            (":nth-of-type(z)", 0),
            (":nth-of-type(1)", 12),
            (":nth-of-type(2)", 2),
            (":nth-of-type(3)", 2),
            (":nth-of-type(4)", 1),
            (":nth-of-type(5)", 0),
            (":only-of-type", 10),
            (":only-of-type(ertertrt)", 10),
            (":only-of-type :only-of-type", 8),
            (":only-of-type :only-of-type :only-of-type", 5),
            (":first-of-type", 12),
            (":first-of-type :first-of-type", 10),
            (":first-of-type :first-of-type :first-of-type", 7),
            (":nth-last-of-type(1)", 12),
            (":nth-last-of-type(2)", 2),
            (":nth-last-of-type(4)", 1),
            (":last-of-type", 12),
            (":last-of-type :last-of-type", 10),
            (":not(*)", 0),
            (":not(li)", 14),
            (":not(li,p)", 11),
            ("li:not(:empty)", 3),
            (":has", 5),
            (":has(li)", 1),
            (":has(p)", 1),
        ],
    );

    let second = sift.find(&dom, doc, ":nth-child(2)").unwrap();
    assert_eq!(labels(&dom, &second), vec!["title", "body", "list", "li2"]);
    let headers = sift.find(&dom, doc, ":header").unwrap();
    assert_eq!(names(&dom, &headers), vec!["h1", "h6"]);
}

#[test]
fn test_unknown_pseudo_class_needs_structural_context() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(TEST_HTML);
    assert_eq!(sift.find(&dom, doc, "img:hover").unwrap().len(), 3);
    // The lone top-level div fails, as it does for :first-child.
    assert_counts(&mut sift, &dom, doc, &[("div:hover", 0), ("div:first-child", 0)]);

    let (dom, doc) = sift.parse("<p>a</p><p>b</p>");
    assert_eq!(sift.find(&dom, doc, "p:hover").unwrap().len(), 2);
}

#[test]
fn test_nth_child_over_many_siblings() {
    let mut markup = String::from("<div>");
    for n in 1..=20 {
        let tag = if n % 2 == 0 { "b" } else { "i" };
        markup.push_str(&format!(" <{tag} n={n}>{n}</{tag}>"));
    }
    markup.push_str("</div>");

    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(&markup);
    let positions = |sift: &mut Sift, selector: &str| -> Vec<String> {
        let found = sift.find(&dom, doc, selector).unwrap();
        found.iter().filter_map(|&n| dom.attr(n, "n")).map(str::to_string).collect()
    };
    assert_eq!(positions(&mut sift, ":nth-child(odd)").len(), 10);
    assert_eq!(
        positions(&mut sift, ":nth-child(3n+1)"),
        vec!["1", "4", "7", "10", "13", "16", "19"]
    );
    assert_eq!(positions(&mut sift, ":nth-child(-n+2)"), vec!["1", "2"]);
    assert_eq!(positions(&mut sift, "div > :nth-last-child(2n+1)").len(), 10);
    assert_eq!(positions(&mut sift, "b:nth-of-type(3)"), vec!["6"]);
    assert_eq!(positions(&mut sift, "i:nth-last-of-type(1)"), vec!["19"]);
    assert_eq!(positions(&mut sift, "i:first-of-type + b"), vec!["2"]);
}

// ========== matched-set filters ==========

#[test]
fn test_set_filters() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(TEST_HTML2);
    let cases: &[(&str, &[&str])] = &[
        (":first", &["html"]),
        ("li:first", &["li1"]),
        (":last", &["h6"]),
        ("li:last", &["li4"]),
        ("nothing:last", &[]),
        (":eq(3)", &["title"]),
        ("body :eq(3)", &["li1"]),
        (":header:eq(1)", &["h6"]),
        (":lt(4)", &["html", "head", "meta", "title"]),
        ("li:gt(9)", &[]),
        (":even:even", &["html", "body", "li1", "hr", "h1"]),
        (":even:odd", &["meta", "br", "li3", "p2"]),
        (":odd:odd", &["title", "list", "li4", "p3"]),
        (":odd:even", &["head", "main", "li2", "p1", "h6"]),
    ];
    for &(selector, expected) in cases {
        let found = sift.find(&dom, doc, selector).unwrap();
        assert_eq!(labels(&dom, &found), expected, "selector {selector:?}");
    }
    assert_counts(
        &mut sift,
        &dom,
        doc,
        &[
            (":first *", 17),
            (":last *", 0),
            (":gt(4)", 13),
            (":even", 9),
            (":even *", 17),
            (":odd", 9),
            (":odd *", 14),
        ],
    );
    let after = sift.find(&dom, doc, ":gt(4)").unwrap();
    assert_eq!(labels(&dom, &after[..3]), vec!["main", "br", "list"]);
}

#[test]
fn test_set_filters_saturate_out_of_range_arguments() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse("<ul><li>a</li><li>b</li></ul>");
    assert_counts(
        &mut sift,
        &dom,
        doc,
        &[
            ("li:lt(99999999999999999999)", 2),
            ("li:gt(-9223372036854775808)", 2),
            ("li:gt(99999999999999999999)", 0),
            ("li:eq(-99999999999999999999)", 1),
        ],
    );
}

// ========== single-node tests ==========

#[test]
fn test_is_and_has() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(TEST_HTML);
    assert!(sift.is(&dom, doc, "div").unwrap());
    assert!(!sift.is(&dom, doc, "img").unwrap());
    let div = dom.children(doc)[0];
    assert!(sift.has(&dom, div, "img.class2").unwrap());
    assert!(!sift.has(&dom, div, "div").unwrap());
    assert!(!sift.has(&dom, dom.children(div)[0], "*").unwrap());
}

#[test]
fn test_matches_walks_right_to_left() {
    let config = MarkupConfig::default();
    let (dom, doc) = sift_html::parse(TEST_HTML2, &config);
    let matcher = Matcher::new(&dom, &config);
    let li2 = dom.element_by_id(doc, "li2").unwrap();

    let yes = ["li", "list > li", "body li#li2", "li + li", "br ~ list li:empty", "html *"];
    for text in yes {
        assert!(matcher.matches(li2, &parse_selector(text).unwrap()), "{text:?}");
    }
    let no = ["p", "div > li", "li + li + li", "head li", "li:first-child", "hr ~ li"];
    for text in no {
        assert!(!matcher.matches(li2, &parse_selector(text).unwrap()), "{text:?}");
    }
}

#[test]
fn test_closest_starts_with_self() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(TEST_HTML2);
    let li = dom.element_by_id(doc, "li1").unwrap();
    let name = |n: Option<NodeId>| n.map(|n| dom.name(n).to_string());
    assert_eq!(name(sift.closest(&dom, li, "div").unwrap()).as_deref(), Some("div"));
    assert_eq!(name(sift.closest(&dom, li, "html").unwrap()).as_deref(), Some("html"));
    assert_eq!(name(sift.closest(&dom, li, "list,body").unwrap()).as_deref(), Some("list"));
    assert_eq!(name(sift.closest(&dom, li, "li").unwrap()).as_deref(), Some("li"));
    assert_eq!(sift.closest(&dom, li, "p").unwrap(), None);
}

#[test]
fn test_bad_selector_is_an_error() {
    let mut sift = Sift::new();
    let (dom, doc) = sift.parse(TEST_HTML);
    assert!(sift.find(&dom, doc, "div >  [").is_err());
    assert!(sift.is(&dom, doc, "").is_err());
}
