//! Form controls: each keeps the specs of its base category and carries its
//! model under `AttrKey::Model`. Options feed the enclosing select's model.

use super::{block, end_capture};
use crate::forms::FormModelFactory;
use crate::state::{AssemblyState, Capture, SelectScope};
use document::forms::OptionEntry;
use document::{AttrKey, AttrValue, FormModel};
use markup::{RawAttribute, Tag, TagName};

pub(super) fn start(state: &mut AssemblyState, tag: &TagName, raw: &[RawAttribute]) {
    match tag.tag() {
        Tag::Form => {
            block::start(state, tag, raw);
            state.radios.enter_form();
        }
        Tag::Fieldset => start_fieldset(state, tag, raw),
        Tag::Legend => start_legend(state, raw),
        Tag::Option => start_option(state, raw),
        Tag::Optgroup => start_optgroup(state, raw),
        Tag::Input | Tag::Select | Tag::Textarea | Tag::Button => control(state, tag.tag(), raw),
        other => log::trace!(target: "assembly.forms", "no form action for {other}"),
    }
}

pub(super) fn end(state: &mut AssemblyState, tag: &TagName) {
    match tag.tag() {
        Tag::Form | Tag::Fieldset => {
            block::end(state, tag);
        }
        Tag::Legend => {
            end_capture(state, |c| matches!(c, Capture::Legend { .. }));
        }
        Tag::Option => {
            end_capture(state, |c| matches!(c, Capture::Option { .. }));
        }
        Tag::Optgroup => {
            end_capture(state, |c| matches!(c, Capture::Option { .. }));
            if let Some(select) = state.select.as_mut() {
                select.group_depth = select.group_depth.saturating_sub(1);
            }
        }
        Tag::Select => {
            end_capture(state, |c| matches!(c, Capture::Option { .. }));
            state.select = None;
        }
        Tag::Textarea => {
            end_capture(state, |c| matches!(c, Capture::TextArea(_)));
        }
        Tag::Button => {
            end_capture(state, |c| matches!(c, Capture::Button { .. }));
        }
        _ => {}
    }
}

/// Leaf controls: one placeholder carrying the model.
fn control(state: &mut AssemblyState, tag: Tag, raw: &[RawAttribute]) {
    let mut attrs = state.element_attributes(tag, raw);
    let model = FormModelFactory::create(tag, &attrs);
    if let Some(model) = &model {
        if let FormModel::Toggle(toggle) = model {
            state.radios.register(attrs.html("name"), toggle);
        }
        attrs.insert(AttrKey::Model, AttrValue::Model(model.clone()));
    }
    state.add_special(attrs);

    let Some(model) = model else {
        return;
    };
    match (tag, model) {
        (Tag::Select, model) => {
            end_capture(state, |c| matches!(c, Capture::Option { .. }));
            state.select = Some(SelectScope {
                model,
                group_depth: 0,
            });
        }
        (Tag::Textarea, FormModel::Text(buffer)) => {
            state.capture = Some(Capture::TextArea(buffer));
        }
        (Tag::Button, FormModel::Toggle(toggle)) => {
            state.capture = Some(Capture::Button {
                model: toggle,
                text: String::new(),
            });
        }
        _ => {}
    }
}

fn start_fieldset(state: &mut AssemblyState, tag: &TagName, raw: &[RawAttribute]) {
    let mut attrs = state.element_attributes(Tag::Fieldset, raw);
    if let Some(model) = FormModelFactory::create(Tag::Fieldset, &attrs) {
        if let FormModel::Fieldset(fieldset) = &model {
            state.fieldsets.push(fieldset.clone());
        }
        attrs.insert(AttrKey::Model, AttrValue::Model(model));
    }
    block::open(state, tag, attrs);
}

fn start_legend(state: &mut AssemblyState, raw: &[RawAttribute]) {
    let Some(fieldset) = state.fieldsets.last().cloned() else {
        return;
    };
    let attributes = state.element_attributes(Tag::Legend, raw);
    state.capture = Some(Capture::Legend {
        model: fieldset,
        attributes,
        text: String::new(),
    });
}

fn start_option(state: &mut AssemblyState, raw: &[RawAttribute]) {
    end_capture(state, |c| matches!(c, Capture::Option { .. }));
    let Some(select) = state.select.as_ref() else {
        log::trace!(target: "assembly.forms", "option outside select");
        return;
    };
    let attrs = state.element_attributes(Tag::Option, raw);
    let label = attrs.html("label").map(str::to_string);
    let mut entry = OptionEntry::new(attrs);
    entry.depth = select.group_depth;
    let labelled = label.is_some();
    if let Some(label) = label {
        entry.label = label;
    }
    let model = select.model.clone();
    let Some(index) = model.push_option(entry) else {
        return;
    };
    log::trace!(target: "assembly.forms", "option {index} added to {}", model.kind_name());
    state.capture = Some(Capture::Option {
        model,
        index,
        text: String::new(),
        labelled,
    });
}

fn start_optgroup(state: &mut AssemblyState, raw: &[RawAttribute]) {
    end_capture(state, |c| matches!(c, Capture::Option { .. }));
    let Some(select) = state.select.as_ref() else {
        return;
    };
    let attrs = state.element_attributes(Tag::Optgroup, raw);
    let mut entry = OptionEntry::new(attrs);
    entry.label = entry.attributes.html("label").unwrap_or("").to_string();
    entry.is_group = true;
    entry.depth = select.group_depth;
    select.model.push_option(entry);
    if let Some(select) = state.select.as_mut() {
        select.group_depth += 1;
    }
}
