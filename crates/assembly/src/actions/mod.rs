//! Per-category tag actions.
//!
//! Every action receives the pass state explicitly; nothing is captured.
//! `start`/`end` dispatch on the tag's category, text and comments are
//! routed by the modes the actions set.

mod block;
mod form;
mod head;
mod inline;

use crate::category::{Category, category_of};
use crate::state::{AssemblyState, Capture};
use crate::whitespace;
use document::{AttrKey, AttrValue, AttributeSet, DocumentProperty};
use markup::{RawAttribute, Tag, TagName};

fn resolve(state: &AssemblyState, tag: &TagName) -> Category {
    match category_of(tag.tag()) {
        Category::Unknown if state.config.preserve_unknown_tags => Category::Block,
        Category::Unknown => Category::Character,
        category => category,
    }
}

pub(crate) fn start(state: &mut AssemblyState, tag: &TagName, raw: &[RawAttribute]) {
    let category = resolve(state, tag);
    log::trace!(target: "assembly.actions", "start {tag} as {category:?}");
    match category {
        Category::Block | Category::Paragraph => block::start(state, tag, raw),
        Category::Head => {
            block::start(state, tag, raw);
            state.in_head += 1;
        }
        Category::Preformatted => block::start_preformatted(state, tag, raw),
        Category::Isindex => block::isindex(state, raw),
        Category::Character => inline::start_character(state, tag, raw),
        Category::Anchor => inline::start_anchor(state, tag, raw),
        Category::Special => inline::special(state, tag.tag(), raw),
        Category::Hidden => inline::start_hidden(state, tag.tag(), raw),
        Category::Form => form::start(state, tag, raw),
        Category::Title => head::start_title(state, raw),
        Category::Style => head::start_style(state),
        Category::Base => head::base(state, raw),
        Category::Link => head::link(state, raw),
        Category::Meta => head::meta(state, raw),
        Category::Map => head::start_map(state, raw),
        Category::Area => head::area(state, raw),
        Category::Unknown => {}
    }
}

pub(crate) fn end(state: &mut AssemblyState, tag: &TagName) {
    let category = resolve(state, tag);
    log::trace!(target: "assembly.actions", "end {tag} as {category:?}");
    match category {
        Category::Block | Category::Paragraph | Category::Head => {
            block::end(state, tag);
        }
        Category::Preformatted => block::end_preformatted(state, tag),
        Category::Character => inline::end_character(state, tag),
        Category::Anchor => inline::end_anchor(state),
        Category::Hidden => inline::end_hidden(state, tag.tag()),
        Category::Form => form::end(state, tag),
        Category::Title => head::end_title(state),
        Category::Style => head::end_style(state),
        Category::Map => head::end_map(state),
        // Void categories have nothing to close.
        Category::Special
        | Category::Isindex
        | Category::Base
        | Category::Link
        | Category::Meta
        | Category::Area
        | Category::Unknown => {}
    }
}

pub(crate) fn text(state: &mut AssemblyState, text: &str) {
    if let Some(capture) = state.capture.as_mut() {
        capture_text(capture, text);
        return;
    }
    if state.in_script {
        add_comment_run(state, text);
        return;
    }
    if state.select.is_some() || state.in_head > 0 {
        log::trace!(target: "assembly.actions", "dropping {} bytes of text", text.len());
        return;
    }
    if state.pre_depth > 0 {
        block::preformatted_text(state, text);
        return;
    }
    if !state.config.collapse_whitespace {
        state.add_content(text);
        return;
    }
    let collapsed = whitespace::collapse(text);
    let mut run = collapsed.as_str();
    if state.last_was_space {
        run = run.strip_prefix(' ').unwrap_or(run);
    }
    if run.is_empty() || (whitespace::is_blank(run) && !state.blocks.accepts_text()) {
        return;
    }
    state.add_content(run);
}

pub(crate) fn comment(state: &mut AssemblyState, text: &str) {
    if state.capture.is_some() {
        return;
    }
    let in_block = state.grafted || state.blocks.depth() > 0 || state.blocks.accepts_text();
    if in_block {
        add_comment_run(state, text);
    } else {
        state.publish(DocumentProperty::AdditionalComment(text.to_string()));
    }
}

/// Close whatever the input left open so the pass is balanced.
pub(crate) fn finish(state: &mut AssemblyState) {
    if let Some(capture) = state.capture.take() {
        finish_capture(state, capture);
    }
    head::end_map(state);
    state.select = None;
    state.in_script = false;
    state.hidden.clear();
    state.anchors.clear();
    state.chars.clear();
    state.fieldsets.clear();
    state.in_head = 0;
    state.pre_depth = 0;
    state.pre_newline = false;
    state.blocks.close_all(&mut state.buffer);
}

fn add_comment_run(state: &mut AssemblyState, text: &str) {
    let attrs = AttributeSet::named(Tag::Comment).with(AttrKey::Comment, AttrValue::str(text));
    state.add_special(attrs);
}

fn capture_text(capture: &mut Capture, text: &str) {
    match capture {
        Capture::Title(buf) | Capture::Style(buf) => buf.push_str(text),
        Capture::TextArea(model) => model.append(text),
        Capture::Option { text: buf, .. }
        | Capture::Button { text: buf, .. }
        | Capture::Legend { text: buf, .. } => buf.push_str(text),
    }
}

/// Hand captured text to its destination.
pub(crate) fn finish_capture(state: &mut AssemblyState, capture: Capture) {
    match capture {
        Capture::Title(text) => state.publish(DocumentProperty::Title(whitespace::normalize(&text))),
        Capture::Style(text) => head::import_style(state, &text),
        Capture::TextArea(_) => {}
        Capture::Option {
            model,
            index,
            text,
            labelled,
        } => {
            if !labelled {
                model.set_option_label(index, &whitespace::normalize(&text));
            }
        }
        Capture::Button { model, text } => {
            let label = whitespace::normalize(&text);
            if !label.is_empty() {
                model.set_label(label);
            }
        }
        Capture::Legend {
            model,
            attributes,
            text,
        } => model.set_legend(&whitespace::normalize(&text), attributes),
    }
}

/// Finish the active capture if `matches` accepts it; otherwise leave it running.
pub(crate) fn end_capture(state: &mut AssemblyState, matches: impl Fn(&Capture) -> bool) -> bool {
    match state.capture.take() {
        Some(capture) if matches(&capture) => {
            finish_capture(state, capture);
            true
        }
        other => {
            state.capture = other;
            false
        }
    }
}
