use crate::attributes::AttributeSet;
use markup::Tag;
use std::fmt;
use std::sync::Arc;

/// Content of a run that stands in for a non-text element (images, controls, hidden markers).
pub const PLACEHOLDER: char = ' ';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecKind {
    OpenTag,
    CloseTag,
    ContentRun,
}

/// How a spec attaches to the structure already at the insertion point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Originate,
    JoinPrevious,
    JoinNext,
}

/// One instruction of the flat build sequence handed to a document.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementSpec {
    pub kind: SpecKind,
    pub direction: Direction,
    pub attributes: AttributeSet,
    content: Option<Arc<str>>,
}

impl ElementSpec {
    pub fn open(attributes: AttributeSet) -> Self {
        Self {
            kind: SpecKind::OpenTag,
            direction: Direction::Originate,
            attributes,
            content: None,
        }
    }

    pub fn close() -> Self {
        Self {
            kind: SpecKind::CloseTag,
            direction: Direction::Originate,
            attributes: AttributeSet::new(),
            content: None,
        }
    }

    /// Content run; `text` is copied so later buffer reuse cannot alias it.
    pub fn content(attributes: AttributeSet, text: &str) -> Self {
        Self {
            kind: SpecKind::ContentRun,
            direction: Direction::Originate,
            attributes,
            content: Some(Arc::from(text)),
        }
    }

    /// Single placeholder character run.
    pub fn placeholder(attributes: AttributeSet) -> Self {
        let mut buf = [0u8; 4];
        Self::content(attributes, PLACEHOLDER.encode_utf8(&mut buf))
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Extend a content run; structural specs are left untouched.
    pub fn push_text(&mut self, more: &str) {
        if let Some(current) = &self.content {
            let mut joined = String::with_capacity(current.len() + more.len());
            joined.push_str(current);
            joined.push_str(more);
            self.content = Some(Arc::from(joined));
        }
    }

    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Content length in characters; structural specs have none.
    pub fn len(&self) -> usize {
        self.content.as_deref().map_or(0, |s| s.chars().count())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn name(&self) -> Option<Tag> {
        self.attributes.name()
    }
}

impl fmt::Display for ElementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SpecKind::OpenTag => "open",
            SpecKind::CloseTag => "close",
            SpecKind::ContentRun => "content",
        };
        f.write_str(kind)?;
        match self.direction {
            Direction::Originate => {}
            Direction::JoinPrevious => f.write_str(" join-previous")?,
            Direction::JoinNext => f.write_str(" join-next")?,
        }
        if let Some(tag) = self.name() {
            write!(f, " {}", tag.name())?;
        }
        if let Some(text) = &self.content {
            write!(f, " {text:?}")?;
        }
        Ok(())
    }
}
