//! Markup edits against an [`HtmlDocument`].
//!
//! Each edit turns an element and a position relative to it into a graft
//! point, runs one assembly pass over the fragment and flushes it.

use crate::balancer::is_paragraph;
use crate::config::AssemblyConfig;
use crate::engine::{AssemblyEngine, GraftPoint};
use crate::error::AssemblyError;
use css::StyleSheet;
use document::{ElementId, HtmlDocument, StructuralViolation};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
pub struct Editor {
    config: AssemblyConfig,
    sheet: Option<Rc<RefCell<StyleSheet>>>,
}

impl Editor {
    pub fn new(config: AssemblyConfig) -> Self {
        Self {
            config,
            sheet: None,
        }
    }

    /// Style rules found while editing are imported into `sheet`.
    pub fn with_style_sheet(mut self, sheet: Rc<RefCell<StyleSheet>>) -> Self {
        self.sheet = Some(sheet);
        self
    }

    fn engine(&self) -> AssemblyEngine {
        let engine = AssemblyEngine::new(self.config.clone());
        match &self.sheet {
            Some(sheet) => engine.with_rule_importer(Box::new(Rc::clone(sheet))),
            None => engine,
        }
    }

    /// Assemble a whole document into `doc`.
    pub fn parse_document(&self, doc: &mut HtmlDocument, markup: &str) -> Result<(), AssemblyError> {
        let mut engine = self.engine();
        engine.begin(0, 0, 0, None);
        engine.assemble(markup, doc)
    }

    /// Insert `markup` as the first content of `elem`.
    pub fn insert_after_start(
        &self,
        doc: &mut HtmlDocument,
        elem: ElementId,
        markup: &str,
    ) -> Result<(), AssemblyError> {
        let (start, _) = inner_bounds(doc, elem)?;
        self.splice(doc, elem, start, markup)
    }

    /// Insert `markup` as the last content of `elem`.
    pub fn insert_before_end(
        &self,
        doc: &mut HtmlDocument,
        elem: ElementId,
        markup: &str,
    ) -> Result<(), AssemblyError> {
        let (_, end) = inner_bounds(doc, elem)?;
        self.splice(doc, elem, end, markup)
    }

    /// Insert `markup` right before `elem`, as its sibling.
    pub fn insert_before_start(
        &self,
        doc: &mut HtmlDocument,
        elem: ElementId,
        markup: &str,
    ) -> Result<(), AssemblyError> {
        let (parent, start, _) = outer_bounds(doc, elem)?;
        self.splice(doc, parent, start, markup)
    }

    /// Insert `markup` right after `elem`, as its sibling.
    pub fn insert_after_end(
        &self,
        doc: &mut HtmlDocument,
        elem: ElementId,
        markup: &str,
    ) -> Result<(), AssemblyError> {
        let (parent, _, end) = outer_bounds(doc, elem)?;
        self.splice(doc, parent, end, markup)
    }

    /// Replace the children of `elem` with `markup`.
    pub fn set_inner_html(
        &self,
        doc: &mut HtmlDocument,
        elem: ElementId,
        markup: &str,
    ) -> Result<(), AssemblyError> {
        inner_bounds(doc, elem)?;
        let before = doc.children(elem).len();
        self.insert_after_start(doc, elem, markup)?;
        // The old children now trail the new content.
        let children = doc.children(elem).to_vec();
        let added = children.len().saturating_sub(before);
        for child in &children[added..] {
            doc.remove_element(*child)?;
        }
        Ok(())
    }

    /// Replace `elem` itself with `markup`.
    pub fn set_outer_html(
        &self,
        doc: &mut HtmlDocument,
        elem: ElementId,
        markup: &str,
    ) -> Result<(), AssemblyError> {
        self.insert_after_end(doc, elem, markup)?;
        doc.remove_element(elem)?;
        Ok(())
    }

    fn splice(
        &self,
        doc: &mut HtmlDocument,
        container: ElementId,
        offset: usize,
        markup: &str,
    ) -> Result<(), AssemblyError> {
        let graft = graft_point(doc, container, offset)?;
        let mut engine = self.engine();
        engine.begin_at(graft);
        engine.assemble(markup, doc)
    }
}

fn inner_bounds(doc: &HtmlDocument, elem: ElementId) -> Result<(usize, usize), AssemblyError> {
    let (Some(start), Some(end)) = (doc.start_offset(elem), doc.end_offset(elem)) else {
        return Err(AssemblyError::ElementNotFound);
    };
    if doc.is_leaf(elem) {
        return Err(StructuralViolation::LeafTarget.into());
    }
    Ok((start, end))
}

fn outer_bounds(
    doc: &HtmlDocument,
    elem: ElementId,
) -> Result<(ElementId, usize, usize), AssemblyError> {
    let (Some(start), Some(end)) = (doc.start_offset(elem), doc.end_offset(elem)) else {
        return Err(AssemblyError::ElementNotFound);
    };
    let parent = doc
        .parent(elem)
        .ok_or(StructuralViolation::DetachedElement)?;
    Ok((parent, start, end))
}

/// Pop and push depths that move from the character before `offset` into
/// `container`: climb from the container to the nearest ancestor that also
/// holds that character, then count the levels from the character's leaf up to it.
pub(crate) fn graft_point(
    doc: &HtmlDocument,
    container: ElementId,
    offset: usize,
) -> Result<GraftPoint, AssemblyError> {
    let in_paragraph = doc.name(container).is_some_and(is_paragraph)
        || doc
            .children(container)
            .iter()
            .any(|child| doc.is_leaf(*child));
    let last = offset.saturating_sub(1);
    let Some(leaf) = doc.leaf_at(last) else {
        return Ok(GraftPoint {
            offset,
            in_paragraph,
            ..GraftPoint::default()
        });
    };

    let no_common = StructuralViolation::NoCommonParent { offset };
    let mut common = container;
    let mut push_depth = 0;
    loop {
        let (Some(start), Some(end)) = (doc.start_offset(common), doc.end_offset(common)) else {
            return Err(AssemblyError::ElementNotFound);
        };
        if start <= last && last < end {
            break;
        }
        common = doc.parent(common).ok_or(no_common)?;
        push_depth += 1;
    }

    let mut pop_depth: usize = 0;
    let mut current = leaf;
    while current != common {
        current = doc.parent(current).ok_or(no_common)?;
        pop_depth += 1;
    }
    // The document's own path already ends in the leaf's parent.
    let pop_depth = pop_depth.saturating_sub(1);
    log::debug!(
        target: "assembly.engine",
        "graft at {offset}: pop {pop_depth}, push {push_depth}"
    );
    Ok(GraftPoint {
        offset,
        pop_depth,
        push_depth,
        boundary: None,
        in_paragraph,
    })
}
