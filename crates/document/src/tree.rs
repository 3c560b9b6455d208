//! Reference document: an arena of branch and leaf elements over a character sequence.
//!
//! Offsets count characters. Element ids stay valid until the element is
//! removed; ids of removed elements are never reused.

use crate::DocumentSink;
use crate::attributes::{AttrKey, AttrValue, AttributeSet};
use crate::error::StructuralViolation;
use crate::properties::{DocumentProperties, DocumentProperty};
use crate::spec::{Direction, ElementSpec, SpecKind};
use markup::Tag;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
enum NodeKind {
    Branch(Vec<ElementId>),
    Leaf(String),
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<ElementId>,
    attributes: AttributeSet,
    kind: NodeKind,
}

#[derive(Clone, Debug)]
struct Arena {
    nodes: Vec<Option<Node>>,
}

/// Insertion point inside one branch during an insert pass.
#[derive(Clone, Copy, Debug)]
struct Cursor {
    branch: ElementId,
    index: usize,
}

impl Arena {
    fn with_root() -> (Self, ElementId) {
        let mut arena = Arena { nodes: Vec::new() };
        let root = arena.alloc(None, AttributeSet::new(), NodeKind::Branch(Vec::new()));
        (arena, root)
    }

    fn alloc(
        &mut self,
        parent: Option<ElementId>,
        attributes: AttributeSet,
        kind: NodeKind,
    ) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Some(Node {
            parent,
            attributes,
            kind,
        }));
        id
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    fn children(&self, id: ElementId) -> &[ElementId] {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Branch(children)) => children,
            _ => &[],
        }
    }

    fn children_mut(&mut self, id: ElementId) -> Option<&mut Vec<ElementId>> {
        match self.node_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Branch(children)) => Some(children),
            _ => None,
        }
    }

    fn is_leaf(&self, id: ElementId) -> bool {
        matches!(self.node(id).map(|n| &n.kind), Some(NodeKind::Leaf(_)))
    }

    fn is_branch(&self, id: ElementId) -> bool {
        matches!(self.node(id).map(|n| &n.kind), Some(NodeKind::Branch(_)))
    }

    fn char_len(&self, id: ElementId) -> usize {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Leaf(text)) => text.chars().count(),
            Some(NodeKind::Branch(children)) => children.iter().map(|&c| self.char_len(c)).sum(),
            None => 0,
        }
    }

    fn add_child(&mut self, parent: ElementId, index: usize, child: ElementId) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(children) = self.children_mut(parent) {
            let index = index.min(children.len());
            children.insert(index, child);
        }
    }

    fn new_branch(&mut self, parent: ElementId, attributes: AttributeSet) -> ElementId {
        self.alloc(Some(parent), attributes, NodeKind::Branch(Vec::new()))
    }

    fn new_leaf(&mut self, parent: ElementId, attributes: AttributeSet, text: &str) -> ElementId {
        self.alloc(Some(parent), attributes, NodeKind::Leaf(text.to_string()))
    }

    fn leaf_text_mut(&mut self, id: ElementId) -> Option<&mut String> {
        match self.node_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Leaf(text)) => Some(text),
            _ => None,
        }
    }

    /// Move the children of `branch` from `index` on into a copy of `branch`.
    fn fracture(&mut self, branch: ElementId, index: usize) -> Option<ElementId> {
        let tail = {
            let children = self.children_mut(branch)?;
            if index >= children.len() {
                return None;
            }
            children.split_off(index)
        };
        let node = self.node(branch)?;
        let attributes = node.attributes.clone();
        let parent = node.parent;
        let copy = self.alloc(parent, attributes, NodeKind::Branch(Vec::new()));
        for &child in &tail {
            if let Some(node) = self.node_mut(child) {
                node.parent = Some(copy);
            }
        }
        if let Some(children) = self.children_mut(copy) {
            *children = tail;
        }
        Some(copy)
    }

    /// Split a leaf at character `at`, returning the new right half.
    fn split_leaf(&mut self, leaf: ElementId, at: usize) -> Option<ElementId> {
        let (parent, attributes, suffix) = {
            let node = self.node_mut(leaf)?;
            let parent = node.parent?;
            let NodeKind::Leaf(text) = &mut node.kind else {
                return None;
            };
            let byte = text.char_indices().nth(at).map(|(b, _)| b)?;
            let suffix = text.split_off(byte);
            (parent, node.attributes.clone(), suffix)
        };
        let position = self.children(parent).iter().position(|&c| c == leaf)?;
        let right = self.new_leaf(parent, attributes, &suffix);
        self.add_child(parent, position + 1, right);
        Some(right)
    }

    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(children) = self.children_mut(parent) {
            children.retain(|&c| c != id);
        }
        self.free(id);
    }

    fn free(&mut self, id: ElementId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.free(child);
        }
        if let Some(slot) = self.nodes.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Cursor path from the root to the graft point for `offset`.
    ///
    /// The graft point sits right after the character at `offset - 1`
    /// (before the first character for offset 0). A leaf straddling the
    /// point is split. Every ancestor cursor points just past the child the
    /// path descends into.
    fn graft_path(&mut self, root: ElementId, offset: usize) -> Vec<Cursor> {
        let mut path = Vec::new();
        let mut branch = root;
        let mut remaining = offset;
        loop {
            let children = self.children(branch).to_vec();
            let mut start = 0;
            let mut chosen = None;
            for (i, &child) in children.iter().enumerate() {
                let len = self.char_len(child);
                if remaining == 0 || (remaining > start && remaining <= start + len) {
                    chosen = Some((i, child, remaining - start, len));
                    break;
                }
                start += len;
            }
            let Some((i, child, local, len)) = chosen else {
                path.push(Cursor {
                    branch,
                    index: children.len(),
                });
                return path;
            };
            if self.is_leaf(child) {
                let index = if local == 0 {
                    i
                } else {
                    if local < len {
                        self.split_leaf(child, local);
                    }
                    i + 1
                };
                path.push(Cursor { branch, index });
                return path;
            }
            path.push(Cursor {
                branch,
                index: i + 1,
            });
            branch = child;
            remaining = local;
        }
    }
}

/// Document tree driven by element specs.
#[derive(Clone, Debug)]
pub struct HtmlDocument {
    arena: Arena,
    root: ElementId,
    length: usize,
    read_only: bool,
    properties: DocumentProperties,
}

impl Default for HtmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlDocument {
    pub fn new() -> Self {
        let (arena, root) = Arena::with_root();
        Self {
            arena,
            root,
            length: 0,
            read_only: false,
            properties: DocumentProperties::default(),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// A read-only document rejects every insert and removal.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.arena.children(id)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.arena.node(id).and_then(|n| n.parent)
    }

    pub fn attributes(&self, id: ElementId) -> Option<&AttributeSet> {
        self.arena.node(id).map(|n| &n.attributes)
    }

    pub fn name(&self, id: ElementId) -> Option<Tag> {
        self.attributes(id).and_then(AttributeSet::name)
    }

    pub fn is_leaf(&self, id: ElementId) -> bool {
        self.arena.is_leaf(id)
    }

    pub fn leaf_text(&self, id: ElementId) -> Option<&str> {
        match self.arena.node(id).map(|n| &n.kind) {
            Some(NodeKind::Leaf(text)) => Some(text),
            _ => None,
        }
    }

    /// Replace one attribute of an element in place.
    pub fn set_attribute(&mut self, id: ElementId, key: AttrKey, value: AttrValue) -> bool {
        match self.arena.node_mut(id) {
            Some(node) => {
                node.attributes.insert(key, value);
                true
            }
            None => false,
        }
    }

    pub fn is_attached(&self, id: ElementId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn start_offset(&self, id: ElementId) -> Option<usize> {
        if !self.is_attached(id) {
            return None;
        }
        let mut offset = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            for &sibling in self.arena.children(parent) {
                if sibling == current {
                    break;
                }
                offset += self.arena.char_len(sibling);
            }
            current = parent;
        }
        Some(offset)
    }

    pub fn end_offset(&self, id: ElementId) -> Option<usize> {
        Some(self.start_offset(id)? + self.arena.char_len(id))
    }

    /// Leaf holding the character at `offset`.
    pub fn leaf_at(&self, offset: usize) -> Option<ElementId> {
        if offset >= self.length {
            return None;
        }
        let mut branch = self.root;
        let mut remaining = offset;
        'descend: loop {
            for &child in self.arena.children(branch) {
                let len = self.arena.char_len(child);
                if remaining < len {
                    if self.arena.is_leaf(child) {
                        return Some(child);
                    }
                    branch = child;
                    continue 'descend;
                }
                remaining -= len;
            }
            return None;
        }
    }

    /// Elements in document order (pre-order, root excluded).
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.arena.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.arena.children(next).iter().rev().copied());
        }
        out
    }

    pub fn elements_named(&self, tag: Tag) -> Vec<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.name(id) == Some(tag))
            .collect()
    }

    pub fn text(&self) -> String {
        self.descendants(self.root)
            .into_iter()
            .filter_map(|id| self.leaf_text(id))
            .collect()
    }

    /// Replace the whole tree with the structure described by `specs`.
    ///
    /// Elements still open at the end are closed implicitly.
    pub fn create(&mut self, specs: &[ElementSpec]) -> Result<(), StructuralViolation> {
        if self.read_only {
            return Err(StructuralViolation::NotEditable { offset: 0 });
        }
        let (mut arena, root) = Arena::with_root();
        let mut stack = vec![root];
        for (index, spec) in specs.iter().enumerate() {
            let parent = *stack.last().unwrap_or(&root);
            match spec.kind {
                SpecKind::OpenTag => {
                    let branch = arena.new_branch(parent, spec.attributes.clone());
                    arena.add_child(parent, usize::MAX, branch);
                    stack.push(branch);
                }
                SpecKind::CloseTag => {
                    if stack.len() <= 1 {
                        return Err(StructuralViolation::UnbalancedClose { index });
                    }
                    stack.pop();
                }
                SpecKind::ContentRun => {
                    let leaf = arena.new_leaf(parent, spec.attributes.clone(), spec.text());
                    arena.add_child(parent, usize::MAX, leaf);
                }
            }
        }
        self.length = arena.char_len(root);
        self.arena = arena;
        self.root = root;
        log::debug!(
            target: "document.tree",
            "created {} elements from {} specs ({} chars)",
            self.arena.nodes.len() - 1,
            specs.len(),
            self.length
        );
        Ok(())
    }

    /// Graft `specs` at `offset`.
    ///
    /// The sequence first pops out of the elements enclosing the offset
    /// (close specs split them, moving the remainder into a copy placed
    /// after), then builds new structure. Join directions reuse the
    /// neighbouring element instead of creating one.
    pub fn insert(&mut self, offset: usize, specs: &[ElementSpec]) -> Result<(), StructuralViolation> {
        if offset > self.length {
            return Err(StructuralViolation::OffsetOutOfBounds {
                offset,
                len: self.length,
            });
        }
        if self.read_only {
            return Err(StructuralViolation::NotEditable { offset });
        }
        let mut work = self.arena.clone();
        let mut stack = work.graft_path(self.root, offset);
        let locked = stack.iter().any(|cursor| {
            work.node(cursor.branch)
                .is_some_and(|n| n.attributes.html("contenteditable") == Some("false"))
        });
        if locked {
            return Err(StructuralViolation::NotEditable { offset });
        }

        let mut fractured = Vec::new();
        for (index, spec) in specs.iter().enumerate() {
            match spec.kind {
                SpecKind::CloseTag => {
                    if stack.len() <= 1 {
                        return Err(StructuralViolation::UnbalancedClose { index });
                    }
                    let Some(top) = stack.pop() else {
                        return Err(StructuralViolation::UnbalancedClose { index });
                    };
                    let Some(parent) = stack.last() else {
                        return Err(StructuralViolation::UnbalancedClose { index });
                    };
                    if let Some(copy) = work.fracture(top.branch, top.index) {
                        work.add_child(parent.branch, parent.index, copy);
                        fractured.push(top.branch);
                    }
                }
                SpecKind::OpenTag => {
                    let Some(top) = stack.last_mut() else {
                        return Err(StructuralViolation::UnbalancedClose { index });
                    };
                    let siblings = work.children(top.branch);
                    let joined = match spec.direction {
                        Direction::JoinNext => siblings
                            .get(top.index)
                            .copied()
                            .filter(|&c| work.is_branch(c))
                            .map(|c| (c, 0, true)),
                        Direction::JoinPrevious => top
                            .index
                            .checked_sub(1)
                            .and_then(|p| siblings.get(p).copied())
                            .filter(|&c| work.is_branch(c))
                            .map(|c| (c, work.children(c).len(), false)),
                        Direction::Originate => None,
                    };
                    let cursor = match joined {
                        Some((branch, at, advance)) => {
                            if advance {
                                top.index += 1;
                            }
                            Cursor { branch, index: at }
                        }
                        None => {
                            let parent = top.branch;
                            let branch = work.new_branch(parent, spec.attributes.clone());
                            work.add_child(parent, top.index, branch);
                            top.index += 1;
                            Cursor { branch, index: 0 }
                        }
                    };
                    stack.push(cursor);
                }
                SpecKind::ContentRun => {
                    let Some(top) = stack.last_mut() else {
                        return Err(StructuralViolation::UnbalancedClose { index });
                    };
                    let siblings = work.children(top.branch);
                    let neighbour = match spec.direction {
                        Direction::JoinPrevious => top
                            .index
                            .checked_sub(1)
                            .and_then(|p| siblings.get(p).copied()),
                        Direction::JoinNext => siblings.get(top.index).copied(),
                        Direction::Originate => None,
                    };
                    if let Some(leaf) = neighbour
                        && let Some(text) = work.leaf_text_mut(leaf)
                    {
                        if spec.direction == Direction::JoinPrevious {
                            text.push_str(spec.text());
                        } else {
                            text.insert_str(0, spec.text());
                        }
                        continue;
                    }
                    let parent = top.branch;
                    let leaf = work.new_leaf(parent, spec.attributes.clone(), spec.text());
                    work.add_child(parent, top.index, leaf);
                    top.index += 1;
                }
            }
        }

        // Pop order is deepest first, so emptied parents are seen after their children.
        for branch in fractured {
            if work.node(branch).is_some() && work.children(branch).is_empty() {
                work.detach(branch);
            }
        }

        let before = self.length;
        self.length = work.char_len(self.root);
        self.arena = work;
        log::debug!(
            target: "document.tree",
            "inserted {} specs at {offset}: {before} -> {} chars",
            specs.len(),
            self.length
        );
        Ok(())
    }

    /// Remove an element and its subtree.
    pub fn remove_element(&mut self, id: ElementId) -> Result<(), StructuralViolation> {
        if id == self.root || !self.is_attached(id) {
            return Err(StructuralViolation::DetachedElement);
        }
        if self.read_only {
            let offset = self.start_offset(id).unwrap_or(0);
            return Err(StructuralViolation::NotEditable { offset });
        }
        self.arena.detach(id);
        self.length = self.arena.char_len(self.root);
        Ok(())
    }
}

impl DocumentSink for HtmlDocument {
    fn len(&self) -> usize {
        self.length
    }

    fn has_structure(&self) -> bool {
        !self.arena.children(self.root).is_empty()
    }

    fn create(&mut self, specs: &[ElementSpec]) -> Result<(), StructuralViolation> {
        HtmlDocument::create(self, specs)
    }

    fn insert(&mut self, offset: usize, specs: &[ElementSpec]) -> Result<(), StructuralViolation> {
        HtmlDocument::insert(self, offset, specs)
    }

    fn put_property(&mut self, property: DocumentProperty) {
        if self.read_only {
            log::debug!(target: "document.tree", "read-only; dropping property {property:?}");
            return;
        }
        log::trace!(target: "document.tree", "property {property:?}");
        self.properties.apply(property);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(tag: Tag) -> ElementSpec {
        ElementSpec::open(AttributeSet::named(tag))
    }

    fn text(s: &str) -> ElementSpec {
        ElementSpec::content(AttributeSet::named(Tag::Content), s)
    }

    fn close() -> ElementSpec {
        ElementSpec::close()
    }

    fn paragraph_doc() -> HtmlDocument {
        let mut doc = HtmlDocument::new();
        doc.create(&[
            open(Tag::Html),
            open(Tag::Body),
            open(Tag::P),
            text("hello"),
            close(),
            close(),
            close(),
        ])
        .expect("create");
        doc
    }

    #[test]
    fn create_builds_nested_structure() {
        let doc = paragraph_doc();
        assert_eq!(doc.len(), 5);
        let p = doc.elements_named(Tag::P)[0];
        assert_eq!(doc.start_offset(p), Some(0));
        assert_eq!(doc.end_offset(p), Some(5));
        let leaf = doc.leaf_at(2).expect("leaf");
        assert_eq!(doc.leaf_text(leaf), Some("hello"));
        assert_eq!(doc.parent(leaf), Some(p));
        assert_eq!(doc.leaf_at(5), None);
    }

    #[test]
    fn create_rejects_stray_close() {
        let mut doc = paragraph_doc();
        let err = doc.create(&[close()]).expect_err("unbalanced");
        assert_eq!(err, StructuralViolation::UnbalancedClose { index: 0 });
        assert_eq!(doc.len(), 5);
    }

    #[test]
    fn insert_text_inside_paragraph_splits_leaf() {
        let mut doc = paragraph_doc();
        doc.insert(2, &[text("XY")]).expect("insert");
        assert_eq!(doc.text(), "heXYllo");
        let p = doc.elements_named(Tag::P)[0];
        assert_eq!(doc.children(p).len(), 3);
    }

    #[test]
    fn insert_joins_previous_run() {
        let mut doc = paragraph_doc();
        doc.insert(5, &[text("!").with_direction(Direction::JoinPrevious)])
            .expect("insert");
        let p = doc.elements_named(Tag::P)[0];
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text(), "hello!");
    }

    #[test]
    fn close_fractures_enclosing_paragraph() {
        let mut doc = paragraph_doc();
        doc.insert(2, &[close(), open(Tag::P), text("mid"), close(), open(Tag::P).with_direction(Direction::JoinNext)])
            .expect("insert");
        let ps = doc.elements_named(Tag::P);
        assert_eq!(ps.len(), 3);
        let texts: Vec<String> = ps
            .iter()
            .map(|&p| {
                doc.children(p)
                    .iter()
                    .filter_map(|&c| doc.leaf_text(c))
                    .collect()
            })
            .collect();
        assert_eq!(texts, ["he", "mid", "llo"]);
        assert_eq!(doc.text(), "hemidllo");
    }

    #[test]
    fn close_past_root_is_rejected_and_rolled_back() {
        let mut doc = paragraph_doc();
        let err = doc
            .insert(2, &[close(), close(), close(), close()])
            .expect_err("root pop");
        assert_eq!(err, StructuralViolation::UnbalancedClose { index: 3 });
        assert_eq!(doc.text(), "hello");
        let p = doc.elements_named(Tag::P)[0];
        assert_eq!(doc.children(p).len(), 1);
    }

    #[test]
    fn offset_past_end_is_rejected() {
        let mut doc = paragraph_doc();
        let err = doc.insert(9, &[text("x")]).expect_err("bounds");
        assert_eq!(err, StructuralViolation::OffsetOutOfBounds { offset: 9, len: 5 });
    }

    #[test]
    fn non_editable_regions_refuse_inserts() {
        let mut doc = paragraph_doc();
        let p = doc.elements_named(Tag::P)[0];
        doc.set_attribute(p, AttrKey::html("contenteditable"), AttrValue::str("false"));
        let err = doc.insert(1, &[text("x")]).expect_err("locked");
        assert_eq!(err, StructuralViolation::NotEditable { offset: 1 });

        let mut frozen = paragraph_doc();
        frozen.set_read_only(true);
        assert!(frozen.insert(0, &[text("x")]).is_err());
    }

    #[test]
    fn remove_element_drops_subtree() {
        let mut doc = paragraph_doc();
        let p = doc.elements_named(Tag::P)[0];
        doc.remove_element(p).expect("remove");
        assert_eq!(doc.len(), 0);
        assert!(!doc.is_attached(p));
        assert_eq!(doc.remove_element(p), Err(StructuralViolation::DetachedElement));
        assert_eq!(
            doc.remove_element(doc.root()),
            Err(StructuralViolation::DetachedElement)
        );
    }

    #[test]
    fn insert_into_empty_document() {
        let mut doc = HtmlDocument::new();
        doc.insert(0, &[open(Tag::P), text("a"), close()]).expect("insert");
        assert_eq!(doc.text(), "a");
        assert!(doc.has_structure());
    }

    #[test]
    fn read_only_document_keeps_its_properties() {
        let mut doc = paragraph_doc();
        doc.put_property(DocumentProperty::Title("kept".into()));
        doc.set_read_only(true);
        doc.put_property(DocumentProperty::Title("dropped".into()));
        assert_eq!(doc.properties().title.as_deref(), Some("kept"));
    }
}
