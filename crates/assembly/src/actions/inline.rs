use crate::state::AssemblyState;
use document::{AttrKey, AttrValue, AttributeSet};
use markup::{RawAttribute, Tag, TagName, attribute_value};

/// Frame for a character tag: its styling at the top level and its markup
/// attributes nested under the tag, so `<b>` inside `<a>` keeps the href.
fn character_frame(translated: &AttributeSet, tag: Tag) -> AttributeSet {
    let mut frame = AttributeSet::new();
    let mut markup = AttributeSet::new();
    for (key, value) in translated.iter() {
        match key {
            AttrKey::Html(_) => markup.insert(key.clone(), value.clone()),
            _ => frame.insert(key.clone(), value.clone()),
        }
    }
    if tag != Tag::Unknown {
        frame.insert(AttrKey::Markup(tag), AttrValue::Set(markup));
    }
    frame
}

pub(super) fn start_character(state: &mut AssemblyState, tag: &TagName, raw: &[RawAttribute]) {
    let translated = state.translator.translate(tag.tag(), raw);
    let frame = character_frame(&translated, tag.tag());
    state.chars.push(tag, &frame);
}

pub(super) fn end_character(state: &mut AssemblyState, tag: &TagName) {
    if !state.chars.pop(tag) {
        log::trace!(target: "assembly.actions", "ignoring close of unopened {tag}");
    }
}

/// Anchors without a reference do nothing at all, start or end.
pub(super) fn start_anchor(state: &mut AssemblyState, tag: &TagName, raw: &[RawAttribute]) {
    if attribute_value(raw, "href").is_none() {
        state.anchors.push(false);
        return;
    }
    start_character(state, tag, raw);
    state.anchors.push(true);
    state.empty_anchor = true;
}

pub(super) fn end_anchor(state: &mut AssemblyState) {
    if state.anchors.pop() != Some(true) {
        return;
    }
    if state.empty_anchor {
        state.add_special(AttributeSet::named(Tag::Content));
    }
    end_character(state, &TagName::known(Tag::A));
}

pub(super) fn special(state: &mut AssemblyState, tag: Tag, raw: &[RawAttribute]) {
    let attrs = state.element_attributes(tag, raw);
    state.add_special(attrs);
}

pub(super) fn start_hidden(state: &mut AssemblyState, tag: Tag, raw: &[RawAttribute]) {
    special(state, tag, raw);
    if tag.is_void() {
        return;
    }
    state.hidden.push(tag);
    if tag == Tag::Script {
        state.in_script = true;
    }
}

/// Marks the end of a hidden element with a second placeholder.
pub(super) fn end_hidden(state: &mut AssemblyState, tag: Tag) {
    let Some(index) = state.hidden.iter().rposition(|open| *open == tag) else {
        return;
    };
    state.hidden.truncate(index);
    state.in_script = state.hidden.contains(&Tag::Script);
    let attrs = AttributeSet::named(tag).with(AttrKey::EndTag, AttrValue::Flag(true));
    state.add_special(attrs);
}
