//! Minimal element tree the renderers write into.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Children removed by [`Document::clear_children`] are released
//! and their slots reused, so repeated renders into one document keep the
//! arena at a steady size. Ids of released nodes must not be used again.
//! Text is only ever stored as text nodes or attribute values and is escaped
//! by [`maud`] on serialization, so payload strings cannot change the page
//! structure.

use maud::Render;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

/// A recorded `scrollIntoView` call. The host decides what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: NodeId,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    classes: Vec<String>,
    /// `None` value marks a boolean attribute such as `allowfullscreen`.
    attributes: Vec<(String, Option<String>)>,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
    scroll_requests: Vec<ScrollRequest>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document whose root is an empty `body` element.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            scroll_requests: Vec::new(),
        };
        doc.root = doc.create_element("body");
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: Vec::new(),
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Number of slots in the arena, live or released.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    fn get(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.0)
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// Ids from another document, a text-node parent, and appends that would
    /// put a node inside itself are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.get(child).is_none() || self.element(parent).is_none() {
            return;
        }
        if self.is_inclusive_ancestor(child, parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Equivalent of `innerHTML = ''`. The removed subtrees are released.
    pub fn clear_children(&mut self, node: NodeId) {
        let Some(entry) = self.nodes.get_mut(node.0) else {
            return;
        };
        let mut stack = std::mem::take(&mut entry.children);
        while let Some(id) = stack.pop() {
            let released = &mut self.nodes[id.0];
            stack.append(&mut released.children);
            released.parent = None;
            released.kind = NodeKind::Text(String::new());
            self.free.push(id);
        }
    }

    /// Equivalent of `textContent = text`: replaces all children with a single
    /// text node, or with nothing when `text` is empty.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if self.element(node).is_none() {
            return;
        }
        self.clear_children(node);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node);
        }
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(entry) = self.get(node) else {
            return;
        };
        match &entry.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for child in &entry.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    /// Child nodes that are elements, in order.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|c| self.tag(*c).is_some())
            .collect()
    }

    /// Tag name, or `None` for text nodes.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.get(node)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.put_attribute(node, name, Some(value.to_string()));
    }

    /// Set a boolean attribute, rendered without a value.
    pub fn set_flag(&mut self, node: NodeId, name: &str) {
        self.put_attribute(node, name, None);
    }

    fn put_attribute(&mut self, node: NodeId, name: &str, value: Option<String>) {
        let name = name.to_ascii_lowercase();
        if name == "class" {
            if let Some(classes) = value {
                for class in classes.split_whitespace() {
                    self.add_class(node, class);
                }
            }
            return;
        }
        let Some(element) = self.element_mut(node) else {
            return;
        };
        match element.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => element.attributes.push((name, value)),
        }
    }

    /// Attribute value. Boolean attributes read as `Some("")`.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.set_attribute(node, "id", id);
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node)
            && !element.classes.iter().any(|c| c == class)
        {
            element.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node)
            .map(|e| e.classes.as_slice())
            .unwrap_or_default()
    }

    /// Depth-first lookup among nodes attached to the root.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if self.attribute(node, "id") == Some(id) {
                return Some(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        None
    }

    /// All descendant elements of `node` with the given tag, in document order.
    pub fn descendants_by_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.tag(current) == Some(tag) {
                found.push(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        found
    }

    pub fn scroll_into_view(&mut self, node: NodeId, behavior: ScrollBehavior) {
        self.scroll_requests.push(ScrollRequest {
            target: node,
            behavior,
        });
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    /// Hand the recorded scroll requests to the host and forget them.
    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.scroll_requests)
    }

    /// Borrow `node` for serialization, e.g. as a `maud` splice.
    pub fn node(&self, node: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id: node }
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.node(*child).render_to(&mut out);
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        self.node(node).render().into_string()
    }
}

/// A node of a [`Document`] rendered as HTML.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl Render for NodeRef<'_> {
    fn render_to(&self, buffer: &mut String) {
        let Some(node) = self.doc.get(self.id) else {
            return;
        };
        let data = match &node.kind {
            NodeKind::Text(text) => return text.as_str().render_to(buffer),
            NodeKind::Element(data) => data,
        };

        buffer.push('<');
        buffer.push_str(&data.tag);
        for (name, value) in &data.attributes {
            buffer.push(' ');
            buffer.push_str(name);
            if let Some(value) = value {
                buffer.push_str("=\"");
                value.as_str().render_to(buffer);
                buffer.push('"');
            }
        }
        if !data.classes.is_empty() {
            buffer.push_str(" class=\"");
            data.classes.join(" ").as_str().render_to(buffer);
            buffer.push('"');
        }
        buffer.push('>');

        if VOID_ELEMENTS.contains(&data.tag.as_str()) {
            return;
        }
        for child in &node.children {
            self.doc.node(*child).render_to(buffer);
        }
        buffer.push_str("</");
        buffer.push_str(&data.tag);
        buffer.push('>');
    }
}

#[derive(Debug, Clone)]
enum Child {
    Element(ElementBuilder),
    Text(String),
}

/// Declarative element description, materialized into a [`Document`] with
/// [`ElementBuilder::append_to`]. Dynamic strings only enter through
/// [`text`](ElementBuilder::text) and [`attr`](ElementBuilder::attr).
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
    children: Vec<Child>,
}

pub fn el(tag: &str) -> ElementBuilder {
    ElementBuilder::new(tag)
}

impl ElementBuilder {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add whitespace-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.push((name.to_string(), Some(value.into())));
        self
    }

    pub fn flag(mut self, name: &str) -> Self {
        self.attributes.push((name.to_string(), None));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Child::Text(text.into()));
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(Child::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ElementBuilder>) -> Self {
        self.children
            .extend(children.into_iter().map(Child::Element));
        self
    }

    /// Create the element (and its subtree) detached from the tree.
    pub fn build(self, doc: &mut Document) -> NodeId {
        let node = doc.create_element(&self.tag);
        for class in &self.classes {
            doc.add_class(node, class);
        }
        for (name, value) in &self.attributes {
            match value {
                Some(value) => doc.set_attribute(node, name, value),
                None => doc.set_flag(node, name),
            }
        }
        for child in self.children {
            let child_node = match child {
                Child::Element(builder) => builder.build(doc),
                Child::Text(text) => doc.create_text(&text),
            };
            doc.append_child(node, child_node);
        }
        node
    }

    pub fn append_to(self, doc: &mut Document, parent: NodeId) -> NodeId {
        let node = self.build(doc);
        doc.append_child(parent, node);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_escapes_text_and_attributes() {
        let mut doc = Document::new();
        let root = doc.root();
        el("p")
            .class("note")
            .attr("title", "\"quoted\" & <b>")
            .text("<script>alert(1)</script>")
            .append_to(&mut doc, root);

        assert_eq!(
            doc.inner_html(root),
            "<p title=\"&quot;quoted&quot; &amp; &lt;b&gt;\" class=\"note\">\
             &lt;script&gt;alert(1)&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn text_content_replaces_children() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = el("div").child(el("span").text("old")).append_to(&mut doc, root);

        doc.set_text_content(div, "new");
        assert_eq!(doc.text_content(div), "new");
        assert_eq!(doc.children(div).len(), 1);
        assert!(doc.descendants_by_tag(div, "span").is_empty());

        doc.set_text_content(div, "");
        assert!(doc.children(div).is_empty());
    }

    #[test]
    fn lookup_ignores_detached_nodes() {
        let mut doc = Document::new();
        let root = doc.root();
        let wrapper = el("div").child(el("span").attr("id", "inner")).append_to(&mut doc, root);

        assert!(doc.get_element_by_id("inner").is_some());
        doc.clear_children(wrapper);
        assert!(doc.get_element_by_id("inner").is_none());
    }

    #[test]
    fn class_list_is_deduplicated() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.set_attribute(node, "class", "a hidden a");
        assert_eq!(doc.classes(node), ["a".to_string(), "hidden".to_string()]);

        doc.remove_class(node, "hidden");
        assert!(!doc.has_class(node, "hidden"));
        assert!(doc.has_class(node, "a"));
    }

    #[test]
    fn boolean_and_void_elements_serialize() {
        let mut doc = Document::new();
        let root = doc.root();
        el("iframe").flag("allowfullscreen").append_to(&mut doc, root);
        el("br").append_to(&mut doc, root);

        assert_eq!(doc.inner_html(root), "<iframe allowfullscreen></iframe><br>");
        let iframe = doc.descendants_by_tag(root, "iframe")[0];
        assert_eq!(doc.attribute(iframe, "allowfullscreen"), Some(""));
    }

    #[test]
    fn scroll_requests_are_recorded() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.scroll_into_view(root, ScrollBehavior::Smooth);
        assert_eq!(
            doc.scroll_requests(),
            [ScrollRequest {
                target: root,
                behavior: ScrollBehavior::Smooth
            }]
        );

        let taken = doc.take_scroll_requests();
        assert_eq!(taken.len(), 1);
        assert!(doc.scroll_requests().is_empty());
    }

    #[test]
    fn cleared_slots_are_reused() {
        let mut doc = Document::new();
        let root = doc.root();
        let list = el("ul").append_to(&mut doc, root);
        let build_items = |doc: &mut Document| {
            for i in 0..10 {
                el("li").text(format!("item {i}")).append_to(doc, list);
            }
        };

        build_items(&mut doc);
        let settled = doc.arena_len();
        for _ in 0..1000 {
            doc.clear_children(list);
            build_items(&mut doc);
        }

        assert_eq!(doc.arena_len(), settled);
        assert_eq!(doc.element_children(list).len(), 10);
        assert_eq!(doc.text_content(list), (0..10).map(|i| format!("item {i}")).collect::<String>());
    }

    #[test]
    fn appending_an_ancestor_is_ignored() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = el("div").append_to(&mut doc, root);
        let inner = el("span").append_to(&mut doc, outer);

        doc.append_child(inner, outer);
        doc.append_child(outer, outer);

        assert_eq!(doc.parent(outer), Some(root));
        assert!(doc.children(inner).is_empty());
        assert_eq!(doc.inner_html(root), "<div><span></span></div>");
    }

    #[test]
    fn foreign_ids_are_ignored() {
        let mut big = Document::new();
        let big_root = big.root();
        let far = (0..5)
            .map(|_| el("div").append_to(&mut big, big_root))
            .last()
            .unwrap();

        let mut doc = Document::new();
        let root = doc.root();
        doc.append_child(root, far);
        doc.set_text_content(far, "x");
        doc.clear_children(far);

        assert!(doc.children(root).is_empty());
        assert_eq!(doc.tag(far), None);
        assert_eq!(doc.outer_html(far), "");
        assert_eq!(doc.inner_html(root), "");
    }
}
