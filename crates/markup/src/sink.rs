//! Event interface between a tokenizer and a document assembler.

use crate::tag::TagName;
use std::sync::Arc;

/// Markup attribute in encounter order: canonical lowercase name and optional value.
pub type RawAttribute = (Arc<str>, Option<String>);

/// Ordered callback stream produced by a tokenizer.
///
/// Invariants:
/// - Callbacks arrive exactly once each, in document order.
/// - `pos` is the byte offset of the construct in the source text.
/// - `end_of_input` is the last callback of a pass.
pub trait MarkupSink {
    fn open_tag(&mut self, tag: &TagName, attrs: &[RawAttribute], pos: usize);

    fn close_tag(&mut self, tag: &TagName, pos: usize);

    fn text(&mut self, text: &str, pos: usize);

    fn comment(&mut self, text: &str, pos: usize);

    fn end_of_input(&mut self) {}
}

/// Look up an attribute by name, ignoring ASCII case.
pub fn find_attribute<'a>(attrs: &'a [RawAttribute], name: &str) -> Option<&'a RawAttribute> {
    attrs.iter().find(|(k, _)| k.eq_ignore_ascii_case(name))
}

/// Value of an attribute; a present attribute without a value yields `Some("")`.
pub fn attribute_value<'a>(attrs: &'a [RawAttribute], name: &str) -> Option<&'a str> {
    find_attribute(attrs, name).map(|(_, v)| v.as_deref().unwrap_or(""))
}

/// Build an attribute list from string pairs (mostly useful in tests and fixtures).
pub fn attributes<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<RawAttribute> {
    pairs
        .into_iter()
        .map(|(k, v)| (Arc::from(k.to_ascii_lowercase()), Some(v.to_string())))
        .collect()
}

/// Sink that records every callback; handy for tokenizer tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<MarkupEvent>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupEvent {
    Open {
        name: String,
        attrs: Vec<(String, Option<String>)>,
        pos: usize,
    },
    Close {
        name: String,
        pos: usize,
    },
    Text(String),
    Comment(String),
    End,
}

impl MarkupSink for RecordingSink {
    fn open_tag(&mut self, tag: &TagName, attrs: &[RawAttribute], pos: usize) {
        self.events.push(MarkupEvent::Open {
            name: tag.as_str().to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            pos,
        });
    }

    fn close_tag(&mut self, tag: &TagName, pos: usize) {
        self.events.push(MarkupEvent::Close {
            name: tag.as_str().to_string(),
            pos,
        });
    }

    fn text(&mut self, text: &str, _pos: usize) {
        self.events.push(MarkupEvent::Text(text.to_string()));
    }

    fn comment(&mut self, text: &str, _pos: usize) {
        self.events.push(MarkupEvent::Comment(text.to_string()));
    }

    fn end_of_input(&mut self) {
        self.events.push(MarkupEvent::End);
    }
}
