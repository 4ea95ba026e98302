//! Small DOM toolkit over `markup5ever_rcdom`.
//!
//! The decorator only needs a handful of browser-like operations: class
//! lookups in document order, attribute access, moving children between
//! nodes, text content, and the inline `display` style. They are collected
//! here so the sweeps read like the DOM code they replace.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{parse_document, parse_fragment, ParseOpts};
use markup5ever::{local_name, namespace_url, ns, Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};

/// Parses a complete HTML document.
pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

/// Parses an HTML fragment (as if it were the content of a `<span>`) and
/// returns its top-level nodes, detached and ready to be appended elsewhere.
pub fn parse_fragment_nodes(html: &str) -> Vec<Handle> {
    parse_fragment_in(html, local_name!("span"))
}

/// Parses an HTML fragment as the content of a `context` element, the way
/// assigning `innerHTML` does.
pub fn parse_fragment_in(html: &str, context: LocalName) -> Vec<Handle> {
    let context = QualName::new(None, ns!(html), context);
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new()).one(html);
    let root = dom.document.children.borrow().first().cloned();
    match root {
        Some(root) => take_children(&root),
        None => Vec::new(),
    }
}

/// Serializes a whole document back to HTML text.
///
/// # Errors
///
/// Returns an error if the serializer fails to write or emits invalid UTF-8.
pub fn serialize_document(dom: &RcDom) -> io::Result<String> {
    write_html(&dom.document, SerializeOpts::default())
}

/// Serializes an element together with its own tag, like `outerHTML`.
///
/// # Errors
///
/// Returns an error if the serializer fails to write or emits invalid UTF-8.
pub fn outer_html(node: &Handle) -> io::Result<String> {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..SerializeOpts::default()
    };
    write_html(node, opts)
}

fn write_html(node: &Handle, opts: SerializeOpts) -> io::Result<String> {
    let handle: SerializableHandle = node.clone().into();
    let mut bytes = Vec::new();
    serialize(&mut bytes, &handle, opts)?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Creates a detached HTML element with the given attributes.
pub fn new_element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    Node::new(NodeData::Element {
        name: QualName::new(None, ns!(html), LocalName::from(tag)),
        attrs: RefCell::new(
            attrs
                .iter()
                .map(|(name, value)| attribute(name, value))
                .collect(),
        ),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

/// Creates a detached text node.
pub fn new_text(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from(text)),
    })
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: StrTendril::from(value),
    }
}

/// Returns the parent of `node`, if it is attached.
pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    parent
}

/// Removes `node` from its parent's child list.
pub fn detach(node: &Handle) {
    if let Some(parent) = parent(node) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
    node.parent.set(None);
}

/// Appends `child` as the last child of `parent`, detaching it first.
pub fn append_child(parent: &Handle, child: Handle) {
    detach(&child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Removes and returns every child of `node`, preserving order.
pub fn take_children(node: &Handle) -> Vec<Handle> {
    let children = std::mem::take(&mut *node.children.borrow_mut());
    for child in &children {
        child.parent.set(None);
    }
    children
}

/// Replaces the whole child list of `node` with `children`.
pub fn replace_children(node: &Handle, children: Vec<Handle>) {
    take_children(node);
    for child in children {
        append_child(node, child);
    }
}

/// Replaces `node` in its parent with `replacements`, in order.
///
/// A detached node is left untouched.
pub fn replace_with(node: &Handle, replacements: Vec<Handle>) {
    let Some(parent) = parent(node) else {
        return;
    };
    for replacement in &replacements {
        detach(replacement);
        replacement.parent.set(Some(Rc::downgrade(&parent)));
    }
    {
        let mut children = parent.children.borrow_mut();
        if let Some(pos) = children.iter().position(|c| Rc::ptr_eq(c, node)) {
            children.splice(pos..=pos, replacements);
        }
    }
    node.parent.set(None);
}

/// Returns the local tag name of an element node.
pub fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// Returns true if `node` is an element.
pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

/// Reads an attribute value.
pub fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Sets an attribute value, replacing an existing one.
pub fn set_attr(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        match attrs.iter_mut().find(|a| &*a.name.local == name) {
            Some(existing) => existing.value = StrTendril::from(value),
            None => attrs.push(attribute(name, value)),
        }
    }
}

/// Returns true if the element's class list contains `class`.
pub fn has_class(node: &Handle, class: &str) -> bool {
    attr(node, "class")
        .map(|classes| classes.split_ascii_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// Adds `class` to the element's class list unless already present.
pub fn add_class(node: &Handle, class: &str) {
    if !is_element(node) || has_class(node, class) {
        return;
    }
    let classes = match attr(node, "class") {
        Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
        _ => class.to_string(),
    };
    set_attr(node, "class", &classes);
}

/// Returns every descendant of `root` in document (pre-)order, excluding `root`.
///
/// The result is a snapshot: later mutations do not affect it.
pub fn descendants(root: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();
    while let Some(node) = stack.pop() {
        stack.extend(node.children.borrow().iter().rev().cloned());
        out.push(node);
    }
    out
}

/// Snapshot of the descendant elements of `root` carrying `class`, in document order.
pub fn elements_by_class(root: &Handle, class: &str) -> Vec<Handle> {
    descendants(root)
        .into_iter()
        .filter(|node| has_class(node, class))
        .collect()
}

/// First descendant element of `root` carrying `class`.
pub fn first_by_class(root: &Handle, class: &str) -> Option<Handle> {
    descendants(root)
        .into_iter()
        .find(|node| has_class(node, class))
}

/// First descendant element of `root` with the given tag name.
pub fn find_element(root: &Handle, tag: &str) -> Option<Handle> {
    descendants(root)
        .into_iter()
        .find(|node| tag_name(node) == Some(tag))
}

/// Concatenated text of all descendant text nodes.
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    if let NodeData::Text { contents } = &node.data {
        text.push_str(&contents.borrow());
    }
    for child in descendants(node) {
        if let NodeData::Text { contents } = &child.data {
            text.push_str(&contents.borrow());
        }
    }
    text
}

/// Replaces all children of `node` with a single text node.
pub fn set_text_content(node: &Handle, text: &str) {
    replace_children(node, vec![new_text(text)]);
}

/// Reads the `display` property from the element's inline `style` attribute.
pub fn inline_display(node: &Handle) -> Option<String> {
    let style = attr(node, "style")?;
    style.split(';').find_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        prop.trim()
            .eq_ignore_ascii_case("display")
            .then(|| value.trim().to_string())
    })
}

/// Sets the `display` property in the element's inline `style` attribute,
/// keeping every other declaration.
pub fn set_inline_display(node: &Handle, value: &str) {
    let mut decls: Vec<String> = attr(node, "style")
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .filter(|decl| {
            decl.split_once(':')
                .map(|(prop, _)| !prop.trim().eq_ignore_ascii_case("display"))
                .unwrap_or(true)
        })
        .map(str::to_string)
        .collect();
    decls.push(format!("display: {}", value));
    set_attr(node, "style", &format!("{};", decls.join("; ")));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(dom: &RcDom) -> Handle {
        find_element(&dom.document, "body").expect("body")
    }

    #[test]
    fn class_lookup_is_document_ordered() {
        let dom = parse_html(
            r#"<div class="x" id="a"><p class="x y" id="b"></p></div><span class="x" id="c"></span>"#,
        );
        let ids: Vec<String> = elements_by_class(&dom.document, "x")
            .iter()
            .filter_map(|n| attr(n, "id"))
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn has_class_matches_whole_tokens() {
        let dom = parse_html(r#"<div class="math-theorem-like"></div>"#);
        assert!(elements_by_class(&dom.document, "math-theorem").is_empty());
    }

    #[test]
    fn add_class_appends_once() {
        let dom = parse_html(r#"<div class="a"></div>"#);
        let div = find_element(&dom.document, "div").expect("div");
        add_class(&div, "b");
        add_class(&div, "b");
        assert_eq!(attr(&div, "class").as_deref(), Some("a b"));
    }

    #[test]
    fn moving_children_keeps_identity() {
        let dom = parse_html(r#"<div id="from"><b>1</b><i>2</i></div><div id="to"></div>"#);
        let from = find_element(&dom.document, "div").expect("from");
        let to = descendants(&dom.document)
            .into_iter()
            .find(|n| attr(n, "id").as_deref() == Some("to"))
            .expect("to");
        let bold = find_element(&from, "b").expect("b");
        for child in take_children(&from) {
            append_child(&to, child);
        }
        assert!(from.children.borrow().is_empty());
        assert_eq!(text_content(&to), "12");
        let bold_parent = parent(&bold).expect("parent");
        assert!(Rc::ptr_eq(&bold_parent, &to));
    }

    #[test]
    fn replace_with_splices_in_place() {
        let dom = parse_html("<p>a<b>b</b>c</p>");
        let p = find_element(&dom.document, "p").expect("p");
        let bold = find_element(&p, "b").expect("b");
        replace_with(&bold, vec![new_text("x"), new_element("i", &[]), new_text("y")]);
        assert_eq!(text_content(&p), "axyc");
        assert!(parent(&bold).is_none());
    }

    #[test]
    fn inline_display_round_trip() {
        let dom = parse_html(r#"<div style="color: red"></div>"#);
        let div = find_element(&dom.document, "div").expect("div");
        assert_eq!(inline_display(&div), None);
        set_inline_display(&div, "none");
        assert_eq!(inline_display(&div).as_deref(), Some("none"));
        set_inline_display(&div, "block");
        assert_eq!(inline_display(&div).as_deref(), Some("block"));
        assert_eq!(attr(&div, "style").as_deref(), Some("color: red; display: block;"));
    }

    #[test]
    fn fragment_nodes_are_detached() {
        let nodes = parse_fragment_nodes(r#"<span class="katex">x</span> tail"#);
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| parent(n).is_none()));
    }

    #[test]
    fn outer_html_includes_the_node() {
        let li = new_element("li", &[("class", "case")]);
        append_child(&li, new_text("a < b"));
        assert_eq!(outer_html(&li).expect("serialize"), r#"<li class="case">a &lt; b</li>"#);
    }

    #[test]
    fn fragment_in_block_context_closes_paragraphs() {
        let nodes = parse_fragment_in("<p>x<div>y</div></p>", LocalName::from("div"));
        let tags: Vec<Option<&str>> = nodes.iter().map(tag_name).collect();
        assert_eq!(tags, vec![Some("p"), Some("div"), Some("p")]);
    }

    #[test]
    fn serialize_keeps_text() {
        let dom = parse_html("<p>定理</p>");
        let body = body_of(&dom);
        append_child(&body, new_element("span", &[("class", "proof-endmark")]));
        let html = serialize_document(&dom).expect("serialize");
        assert!(html.contains("<p>定理</p>"));
        assert!(html.contains(r#"<span class="proof-endmark"></span>"#));
    }
}
