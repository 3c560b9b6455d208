use crate::balancer::implied_attributes;
use crate::category::{Category, category_of};
use crate::forms::FormModelFactory;
use crate::state::{AssemblyState, hard_break, preformatted_attributes};
use document::{AttrKey, AttrValue, AttributeSet};
use markup::{RawAttribute, Tag, TagName};

const ISINDEX_PROMPT: &str = "This is a searchable index.  Enter search keywords: ";

pub(super) fn block_attributes(state: &AssemblyState, tag: &TagName, raw: &[RawAttribute]) -> AttributeSet {
    if tag.is_unknown() {
        return state
            .translator
            .translate(Tag::Unknown, raw)
            .with(AttrKey::Name, AttrValue::Tag(Tag::Unknown))
            .with(AttrKey::Unrecognized, AttrValue::str(tag.as_str()));
    }
    state.element_attributes(tag.tag(), raw)
}

pub(super) fn start(state: &mut AssemblyState, tag: &TagName, raw: &[RawAttribute]) {
    let attrs = block_attributes(state, tag, raw);
    open(state, tag, attrs);
}

pub(super) fn open(state: &mut AssemblyState, tag: &TagName, attrs: AttributeSet) {
    state.blocks.open_block(&mut state.buffer, tag, attrs);
    state.last_was_space = false;
}

/// Close `tag` and every block opened inside it. Returns whether the block was open.
pub(super) fn end(state: &mut AssemblyState, tag: &TagName) -> bool {
    let closed = state.blocks.close_block(&mut state.buffer, tag);
    for name in &closed {
        leave_scope(state, name.tag());
    }
    if closed.is_empty() {
        return false;
    }
    state.last_was_space = false;
    true
}

/// Undo the pass state a block set up when it opened.
fn leave_scope(state: &mut AssemblyState, tag: Tag) {
    match (tag, category_of(tag)) {
        (Tag::Form, _) => state.radios.leave_form(),
        (Tag::Fieldset, _) => {
            state.fieldsets.pop();
        }
        (_, Category::Head) => state.in_head = state.in_head.saturating_sub(1),
        (_, Category::Preformatted) => {
            state.pre_depth = state.pre_depth.saturating_sub(1);
            state.pre_newline = false;
        }
        _ => {}
    }
}

pub(super) fn start_preformatted(state: &mut AssemblyState, tag: &TagName, raw: &[RawAttribute]) {
    start(state, tag, raw);
    state
        .blocks
        .open_implied(&mut state.buffer, preformatted_attributes());
    state.pre_depth += 1;
    state.pre_newline = false;
}

pub(super) fn end_preformatted(state: &mut AssemblyState, tag: &TagName) {
    if !state.blocks.is_open(tag) {
        return;
    }
    state.pre_newline = false;
    state.add_content_with("\n", hard_break());
    end(state, tag);
}

/// Whitespace is kept; every line break ends the current implied block.
pub(super) fn preformatted_text(state: &mut AssemblyState, text: &str) {
    let mut rest = text;
    while !rest.is_empty() {
        let cut = rest.find('\n').map_or(rest.len(), |i| i + 1);
        let (line, tail) = rest.split_at(cut);
        if state.pre_newline {
            state
                .blocks
                .open_implied(&mut state.buffer, preformatted_attributes());
            state.pre_newline = false;
        }
        state.add_content(line);
        state.pre_newline = line.ends_with('\n');
        rest = tail;
    }
}

/// Prompt line of a searchable index: an implied block holding an implied
/// paragraph with the prompt control and a line break.
pub(super) fn isindex(state: &mut AssemblyState, raw: &[RawAttribute]) {
    let mut attrs = state.element_attributes(Tag::Isindex, raw);
    if attrs.html("prompt").is_none() {
        attrs.insert(AttrKey::html("prompt"), AttrValue::str(ISINDEX_PROMPT));
    }
    if let Some(model) = FormModelFactory::create(Tag::Isindex, &attrs) {
        attrs.insert(AttrKey::Model, AttrValue::Model(model));
    }
    open(state, &TagName::known(Tag::Implied), implied_attributes());
    state.blocks.open_implied(&mut state.buffer, implied_attributes());
    state.add_special(attrs);
    state.add_content_with("\n", hard_break());
    state.blocks.close_implied(&mut state.buffer);
}
