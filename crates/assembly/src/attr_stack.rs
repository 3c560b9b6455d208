use document::AttributeSet;
use markup::TagName;

/// Character attributes in effect for text, one frame per open character tag.
///
/// The base frame is never popped.
#[derive(Debug, Default)]
pub struct AttributeStack {
    base: AttributeSet,
    frames: Vec<(TagName, AttributeSet)>,
}

impl AttributeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &AttributeSet {
        self.frames.last().map_or(&self.base, |(_, attrs)| attrs)
    }

    /// Enter a character tag: the new frame is the current one overlaid with `attrs`.
    pub fn push(&mut self, tag: &TagName, attrs: &AttributeSet) {
        let frame = self.current().merged(attrs);
        self.frames.push((tag.clone(), frame));
    }

    /// Leave a character tag, also dropping frames opened inside it and left unclosed.
    /// A tag with no open frame is ignored.
    pub fn pop(&mut self, tag: &TagName) -> bool {
        match self.frames.iter().rposition(|(open, _)| open == tag) {
            Some(index) => {
                self.frames.truncate(index);
                true
            }
            None => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use document::{AttrKey, AttrValue};
    use markup::Tag;

    fn css(name: &str, value: &str) -> AttributeSet {
        AttributeSet::new().with(AttrKey::css(name), AttrValue::str(value))
    }

    #[test]
    fn frames_accumulate_and_unwind() {
        let mut stack = AttributeStack::new();
        let b = TagName::known(Tag::B);
        let i = TagName::known(Tag::I);
        stack.push(&b, &css("font-weight", "bold"));
        stack.push(&i, &css("font-style", "italic"));
        assert_eq!(stack.current().css("font-weight"), Some("bold"));
        assert_eq!(stack.current().css("font-style"), Some("italic"));
        assert!(stack.pop(&i));
        assert_eq!(stack.current().css("font-style"), None);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn never_pops_below_base() {
        let mut stack = AttributeStack::new();
        assert!(!stack.pop(&TagName::known(Tag::B)));
        assert!(stack.current().is_empty());
    }

    #[test]
    fn misnested_close_drops_inner_frames() {
        let mut stack = AttributeStack::new();
        let b = TagName::known(Tag::B);
        stack.push(&b, &css("font-weight", "bold"));
        stack.push(&TagName::known(Tag::I), &css("font-style", "italic"));
        assert!(stack.pop(&b));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn unknown_tags_match_by_name() {
        let mut stack = AttributeStack::new();
        stack.push(&TagName::parse("blink"), &AttributeSet::new());
        assert!(!stack.pop(&TagName::parse("marquee")));
        assert!(stack.pop(&TagName::parse("BLINK")));
    }
}
