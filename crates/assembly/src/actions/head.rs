//! Title, style, base, link, meta and image-map actions. Apart from the
//! placeholders of title, link and meta these publish document properties
//! or feed the rule importer instead of emitting structure.

use super::{end_capture, inline};
use crate::state::{AssemblyState, Capture};
use document::{DocumentProperty, ImageMap};
use markup::{RawAttribute, Tag, attribute_value};

pub(super) fn start_title(state: &mut AssemblyState, raw: &[RawAttribute]) {
    inline::start_hidden(state, Tag::Title, raw);
    state.capture = Some(Capture::Title(String::new()));
}

pub(super) fn end_title(state: &mut AssemblyState) {
    end_capture(state, |c| matches!(c, Capture::Title(_)));
    inline::end_hidden(state, Tag::Title);
}

pub(super) fn start_style(state: &mut AssemblyState) {
    state.capture = Some(Capture::Style(String::new()));
}

pub(super) fn end_style(state: &mut AssemblyState) {
    end_capture(state, |c| matches!(c, Capture::Style(_)));
}

pub(super) fn import_style(state: &mut AssemblyState, text: &str) {
    let Some(importer) = state.importer.as_mut() else {
        log::debug!(target: "assembly.actions", "no rule importer; dropping style block");
        return;
    };
    if let Err(err) = importer.import_rules(text, state.base.as_ref()) {
        log::warn!(target: "assembly.actions", "style block not imported: {err}");
    }
}

/// Sets the base for later references, resolved against the previous base.
pub(super) fn base(state: &mut AssemblyState, raw: &[RawAttribute]) {
    if let Some(href) = attribute_value(raw, "href")
        && let Some(url) = state.resolve(href)
    {
        state.base = Some(url.clone());
        state.publish(DocumentProperty::Base(url));
    }
    if let Some(target) = attribute_value(raw, "target") {
        state.publish(DocumentProperty::BaseTarget(target.to_string()));
    }
}

pub(super) fn link(state: &mut AssemblyState, raw: &[RawAttribute]) {
    inline::start_hidden(state, Tag::Link, raw);
    let is_stylesheet = attribute_value(raw, "rel").is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    });
    let is_css = attribute_value(raw, "type")
        .is_none_or(|ty| ty.trim().eq_ignore_ascii_case("text/css"));
    if !is_stylesheet || !is_css {
        return;
    }
    let Some(url) = attribute_value(raw, "href").and_then(|href| state.resolve(href)) else {
        return;
    };
    match state.importer.as_mut() {
        Some(importer) => {
            if let Err(err) = importer.import_linked(&url) {
                log::warn!(target: "assembly.actions", "linked sheet not imported: {err}");
            }
        }
        None => log::debug!(target: "assembly.actions", "no rule importer for {url}"),
    }
}

pub(super) fn meta(state: &mut AssemblyState, raw: &[RawAttribute]) {
    inline::start_hidden(state, Tag::Meta, raw);
    let Some(content) = attribute_value(raw, "content") else {
        return;
    };
    let equiv = attribute_value(raw, "http-equiv").map(|v| v.trim().to_ascii_lowercase());
    match equiv.as_deref() {
        Some("default-style") => state.publish(DocumentProperty::DefaultStyle(content.to_string())),
        Some("content-style-type") => {
            state.publish(DocumentProperty::ContentStyleType(content.to_string()))
        }
        _ => {}
    }
}

pub(super) fn start_map(state: &mut AssemblyState, raw: &[RawAttribute]) {
    end_map(state);
    let name = attribute_value(raw, "name").unwrap_or("").to_string();
    state.map = Some(ImageMap {
        name,
        areas: Vec::new(),
    });
}

pub(super) fn area(state: &mut AssemblyState, raw: &[RawAttribute]) {
    if state.map.is_none() {
        return;
    }
    let attrs = state.element_attributes(Tag::Area, raw);
    if let Some(map) = state.map.as_mut() {
        map.areas.push(attrs);
    }
}

pub(super) fn end_map(state: &mut AssemblyState) {
    if let Some(map) = state.map.take() {
        state.publish(DocumentProperty::ImageMap(map));
    }
}
