//! Block nesting and implied paragraphs.
//!
//! Text never lands directly in a non-paragraph block: the first run with no
//! enclosing paragraph opens one implied block, which stays open until a
//! block boundary. Explicit blocks close the implied one before opening.

use crate::buffer::SpecBuffer;
use document::{AttrKey, AttrValue, AttributeSet, ElementSpec};
use markup::{Tag, TagName};

/// Tags whose content is inline: text goes straight into them.
pub fn is_paragraph(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::P
            | Tag::H1
            | Tag::H2
            | Tag::H3
            | Tag::H4
            | Tag::H5
            | Tag::H6
            | Tag::Dt
            | Tag::Implied
    )
}

pub fn implied_attributes() -> AttributeSet {
    AttributeSet::named(Tag::Implied).with(AttrKey::Implied, AttrValue::Flag(true))
}

#[derive(Debug, Default)]
pub struct BlockBalancer {
    open: Vec<TagName>,
    implied: Option<AttributeSet>,
    graft_in_paragraph: bool,
}

impl BlockBalancer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that the graft point of this pass already lies in a paragraph.
    pub fn set_graft_in_paragraph(&mut self, in_paragraph: bool) {
        self.graft_in_paragraph = in_paragraph;
    }

    pub fn in_paragraph(&self) -> bool {
        match self.open.last() {
            Some(top) => is_paragraph(top.tag()),
            None => self.graft_in_paragraph,
        }
    }

    pub fn implied_open(&self) -> bool {
        self.implied.is_some()
    }

    /// Whether text may be appended without synthesizing a container.
    pub fn accepts_text(&self) -> bool {
        self.implied_open() || self.in_paragraph()
    }

    /// Explicit blocks currently open in this pass.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn is_open(&self, tag: &TagName) -> bool {
        self.open.iter().any(|open| open == tag)
    }

    pub fn open_block(&mut self, buf: &mut SpecBuffer, tag: &TagName, attrs: AttributeSet) {
        self.close_implied(buf);
        // A paragraph cannot hold another block.
        if tag.tag().breaks_flow()
            && let Some(top) = self.open.last()
            && matches!(top.tag(), Tag::P | Tag::Implied)
        {
            buf.push(ElementSpec::close());
            self.open.pop();
        }
        buf.push(ElementSpec::open(attrs));
        self.open.push(tag.clone());
    }

    /// Close `tag` and anything opened inside it, returning the closed
    /// blocks outermost first. Closing a block that is not open is ignored.
    pub fn close_block(&mut self, buf: &mut SpecBuffer, tag: &TagName) -> Vec<TagName> {
        let Some(index) = self.open.iter().rposition(|open| open == tag) else {
            log::trace!(target: "assembly.actions", "ignoring close of unopened block {tag}");
            return Vec::new();
        };
        self.close_implied(buf);
        for _ in index..self.open.len() {
            buf.push(ElementSpec::close());
        }
        self.open.split_off(index)
    }

    /// Open an implied block with `attrs` unless text can already be
    /// appended. Returns whether one was opened.
    pub fn ensure_paragraph(&mut self, buf: &mut SpecBuffer, attrs: AttributeSet) -> bool {
        if self.accepts_text() {
            return false;
        }
        self.open_implied(buf, attrs);
        true
    }

    pub fn open_implied(&mut self, buf: &mut SpecBuffer, attrs: AttributeSet) {
        self.close_implied(buf);
        buf.push(ElementSpec::open(attrs.clone()));
        self.implied = Some(attrs);
    }

    /// Close the implied block, if one is open.
    pub fn close_implied(&mut self, buf: &mut SpecBuffer) -> bool {
        if self.implied.take().is_some() {
            buf.push(ElementSpec::close());
            return true;
        }
        false
    }

    /// Close everything this pass opened.
    pub fn close_all(&mut self, buf: &mut SpecBuffer) {
        self.close_implied(buf);
        for _ in 0..self.open.len() {
            buf.push(ElementSpec::close());
        }
        self.open.clear();
    }

    pub fn reset(&mut self) {
        self.open.clear();
        self.implied = None;
        self.graft_in_paragraph = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use document::SpecKind;

    fn kinds(buf: &SpecBuffer) -> Vec<SpecKind> {
        buf.specs().iter().map(|s| s.kind).collect()
    }

    #[test]
    fn implied_paragraph_opens_once() {
        let mut buf = SpecBuffer::new(false);
        let mut blocks = BlockBalancer::new();
        assert!(blocks.ensure_paragraph(&mut buf, implied_attributes()));
        assert!(!blocks.ensure_paragraph(&mut buf, implied_attributes()));
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.specs()[0].name(), Some(Tag::Implied));
    }

    #[test]
    fn explicit_block_supersedes_implied() {
        let mut buf = SpecBuffer::new(false);
        let mut blocks = BlockBalancer::new();
        blocks.ensure_paragraph(&mut buf, implied_attributes());
        let p = TagName::known(Tag::P);
        blocks.open_block(&mut buf, &p, AttributeSet::named(Tag::P));
        assert!(!blocks.implied_open());
        assert!(blocks.in_paragraph());
        assert_eq!(blocks.close_block(&mut buf, &p), [p.clone()]);
        assert_eq!(
            kinds(&buf),
            [
                SpecKind::OpenTag,
                SpecKind::CloseTag,
                SpecKind::OpenTag,
                SpecKind::CloseTag
            ]
        );
    }

    #[test]
    fn closing_outer_block_closes_inner_ones() {
        let mut buf = SpecBuffer::new(false);
        let mut blocks = BlockBalancer::new();
        let div = TagName::known(Tag::Div);
        blocks.open_block(&mut buf, &div, AttributeSet::named(Tag::Div));
        blocks.open_block(&mut buf, &TagName::known(Tag::Ul), AttributeSet::named(Tag::Ul));
        blocks.ensure_paragraph(&mut buf, implied_attributes());
        let closed = blocks.close_block(&mut buf, &div);
        assert_eq!(closed, [div.clone(), TagName::known(Tag::Ul)]);
        assert_eq!(blocks.depth(), 0);
        let opens = buf.specs().iter().filter(|s| s.kind == SpecKind::OpenTag).count();
        let closes = buf.specs().iter().filter(|s| s.kind == SpecKind::CloseTag).count();
        assert_eq!(opens, closes);
    }

    #[test]
    fn stray_closes_are_tolerated() {
        let mut buf = SpecBuffer::new(false);
        let mut blocks = BlockBalancer::new();
        assert!(blocks.close_block(&mut buf, &TagName::known(Tag::Div)).is_empty());
        assert!(!blocks.close_implied(&mut buf));
        assert!(buf.is_empty());
    }

    #[test]
    fn new_paragraph_closes_open_paragraph() {
        let mut buf = SpecBuffer::new(false);
        let mut blocks = BlockBalancer::new();
        let p = TagName::known(Tag::P);
        blocks.open_block(&mut buf, &p, AttributeSet::named(Tag::P));
        blocks.open_block(&mut buf, &p, AttributeSet::named(Tag::P));
        assert_eq!(blocks.depth(), 1);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn graft_paragraph_suppresses_implied() {
        let mut buf = SpecBuffer::new(false);
        let mut blocks = BlockBalancer::new();
        blocks.set_graft_in_paragraph(true);
        assert!(!blocks.ensure_paragraph(&mut buf, implied_attributes()));
        blocks.open_block(&mut buf, &TagName::known(Tag::Div), AttributeSet::named(Tag::Div));
        assert!(blocks.ensure_paragraph(&mut buf, implied_attributes()));
    }
}
