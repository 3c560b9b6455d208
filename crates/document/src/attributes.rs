//! Immutable attribute sets with copy-on-write updates.

use crate::forms::FormModel;
use markup::Tag;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Attribute key. Reserved structural keys sort before markup and CSS keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrKey {
    /// Element identity (`AttrValue::Tag`).
    Name,
    /// Backing form-control model (`AttrValue::Model`).
    Model,
    /// Marks the placeholder that closes a hidden element.
    EndTag,
    /// Comment text carried by a `Tag::Comment` placeholder.
    Comment,
    /// The element was synthesized rather than written in the markup.
    Implied,
    /// Original name of an element retained under the preserve-unknown policy.
    Unrecognized,
    /// Whitespace in the element's content is significant.
    PreserveWhitespace,
    /// The run is a forced line break.
    HardBreak,
    /// A character-level tag in effect for a run, holding that tag's own attributes.
    Markup(Tag),
    /// Markup attribute, canonical lowercase name.
    Html(Arc<str>),
    /// Translated CSS longhand property.
    Css(Arc<str>),
}

impl AttrKey {
    pub fn html(name: &str) -> Self {
        AttrKey::Html(Arc::from(name))
    }

    pub fn css(name: &str) -> Self {
        AttrKey::Css(Arc::from(name))
    }
}

#[derive(Clone, Debug)]
pub enum AttrValue {
    Str(Arc<str>),
    Tag(Tag),
    Flag(bool),
    Set(AttributeSet),
    Model(FormModel),
}

impl AttrValue {
    pub fn str(value: &str) -> Self {
        AttrValue::Str(Arc::from(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Str(a), AttrValue::Str(b)) => a == b,
            (AttrValue::Tag(a), AttrValue::Tag(b)) => a == b,
            (AttrValue::Flag(a), AttrValue::Flag(b)) => a == b,
            (AttrValue::Set(a), AttrValue::Set(b)) => a == b,
            // Models are stateful objects: equal only when they are the same object.
            (AttrValue::Model(a), AttrValue::Model(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Ordered attribute map shared by reference; mutation clones only when shared.
#[derive(Clone, Default)]
pub struct AttributeSet {
    map: Rc<BTreeMap<AttrKey, AttrValue>>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute set naming an element.
    pub fn named(tag: Tag) -> Self {
        Self::new().with(AttrKey::Name, AttrValue::Tag(tag))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, key: &AttrKey) -> Option<&AttrValue> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &AttrKey) -> bool {
        self.map.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, &AttrValue)> {
        self.map.iter()
    }

    pub fn insert(&mut self, key: AttrKey, value: AttrValue) {
        Rc::make_mut(&mut self.map).insert(key, value);
    }

    pub fn remove(&mut self, key: &AttrKey) -> Option<AttrValue> {
        if !self.map.contains_key(key) {
            return None;
        }
        Rc::make_mut(&mut self.map).remove(key)
    }

    /// Copy with one entry added or replaced.
    pub fn with(mut self, key: AttrKey, value: AttrValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Copy of `self` overlaid with every entry of `other` (other wins).
    pub fn merged(&self, other: &AttributeSet) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut out = self.clone();
        let map = Rc::make_mut(&mut out.map);
        for (k, v) in other.iter() {
            map.insert(k.clone(), v.clone());
        }
        out
    }

    pub fn name(&self) -> Option<Tag> {
        match self.map.get(&AttrKey::Name) {
            Some(AttrValue::Tag(tag)) => Some(*tag),
            _ => None,
        }
    }

    pub fn is_named(&self, tag: Tag) -> bool {
        self.name() == Some(tag)
    }

    pub fn flag(&self, key: &AttrKey) -> bool {
        matches!(self.map.get(key), Some(AttrValue::Flag(true)))
    }

    pub fn string(&self, key: &AttrKey) -> Option<&str> {
        self.map.get(key).and_then(AttrValue::as_str)
    }

    pub fn html(&self, name: &str) -> Option<&str> {
        self.string(&AttrKey::html(name))
    }

    pub fn css(&self, property: &str) -> Option<&str> {
        self.string(&AttrKey::css(property))
    }

    pub fn model(&self) -> Option<&FormModel> {
        match self.map.get(&AttrKey::Model) {
            Some(AttrValue::Model(model)) => Some(model),
            _ => None,
        }
    }

    pub fn ptr_eq(&self, other: &AttributeSet) -> bool {
        Rc::ptr_eq(&self.map, &other.map)
    }
}

impl PartialEq for AttributeSet {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.map == other.map
    }
}

impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.map.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_on_write_leaves_original_untouched() {
        let base = AttributeSet::named(Tag::P);
        let shared = base.clone();
        assert!(base.ptr_eq(&shared));
        let changed = shared.with(AttrKey::html("align"), AttrValue::str("left"));
        assert!(!base.contains(&AttrKey::html("align")));
        assert_eq!(changed.html("align"), Some("left"));
        assert_eq!(changed.name(), Some(Tag::P));
    }

    #[test]
    fn merge_prefers_overlay() {
        let a = AttributeSet::new()
            .with(AttrKey::css("color"), AttrValue::str("red"))
            .with(AttrKey::css("font-size"), AttrValue::str("small"));
        let b = AttributeSet::new().with(AttrKey::css("color"), AttrValue::str("blue"));
        let merged = a.merged(&b);
        assert_eq!(merged.css("color"), Some("blue"));
        assert_eq!(merged.css("font-size"), Some("small"));
        assert_eq!(a.css("color"), Some("red"));
        assert!(a.merged(&AttributeSet::new()).ptr_eq(&a));
    }

    #[test]
    fn equality_is_structural() {
        let a = AttributeSet::named(Tag::B);
        let b = AttributeSet::named(Tag::B);
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_ne!(a, AttributeSet::named(Tag::I));
    }
}
