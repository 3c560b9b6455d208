//! Form-control models and radio grouping.

use document::AttributeSet;
use document::FormModel;
use document::forms::{
    ComboContents, FieldsetModel, ListContents, TextBuffer, TextKind, ToggleGroup, ToggleKind,
    ToggleModel,
};
use markup::Tag;
use std::collections::HashMap;
use std::rc::Rc;

/// Builds the model backing a form-control tag.
pub struct FormModelFactory;

impl FormModelFactory {
    /// Model for `tag` with translated attributes `attrs`, or `None` when the
    /// control has no model (hidden inputs, unsupported types, other tags).
    pub fn create(tag: Tag, attrs: &AttributeSet) -> Option<FormModel> {
        let model = match tag {
            Tag::Input => Self::input(attrs),
            Tag::Button => {
                let kind = match lowercase(attrs.html("type")).as_deref() {
                    Some("reset") => ToggleKind::Reset,
                    Some("button") => ToggleKind::Button,
                    _ => ToggleKind::Submit,
                };
                Some(FormModel::Toggle(ToggleModel::new(kind, false)))
            }
            Tag::Textarea => Some(FormModel::Text(TextBuffer::new(TextKind::TextArea, ""))),
            Tag::Select => {
                let multiple = attrs.html("multiple").is_some();
                let size = attrs
                    .html("size")
                    .and_then(|s| s.trim().parse::<u32>().ok())
                    .unwrap_or(1);
                if multiple || size > 1 {
                    Some(FormModel::List(ListContents::new(multiple, size)))
                } else {
                    Some(FormModel::Combo(ComboContents::new()))
                }
            }
            Tag::Fieldset => Some(FormModel::Fieldset(FieldsetModel::new())),
            Tag::Isindex => Some(FormModel::Text(TextBuffer::new(TextKind::Isindex, ""))),
            _ => None,
        };
        if model.is_none() {
            log::trace!(target: "assembly.forms", "no model for {tag}");
        }
        model
    }

    fn input(attrs: &AttributeSet) -> Option<FormModel> {
        let value = attrs.html("value").unwrap_or("");
        let ty = lowercase(attrs.html("type"));
        let model = match ty.as_deref().unwrap_or("text") {
            "submit" => toggle(ToggleKind::Submit, false),
            "reset" => toggle(ToggleKind::Reset, false),
            "image" => toggle(ToggleKind::Image, false),
            "button" => toggle(ToggleKind::Button, false),
            "checkbox" => toggle(ToggleKind::Checkbox, attrs.html("checked").is_some()),
            "radio" => toggle(ToggleKind::Radio, attrs.html("checked").is_some()),
            "text" => FormModel::Text(TextBuffer::new(TextKind::Text, value)),
            "password" => FormModel::Text(TextBuffer::new(TextKind::Password, value)),
            // Only the path field of a file chooser has state.
            "file" => FormModel::Text(TextBuffer::new(TextKind::File, "")),
            _ => return None,
        };
        Some(model)
    }
}

fn toggle(kind: ToggleKind, selected: bool) -> FormModel {
    FormModel::Toggle(ToggleModel::new(kind, selected))
}

fn lowercase(value: Option<&str>) -> Option<String> {
    value.map(|v| v.trim().to_ascii_lowercase())
}

/// Radio groups keyed by control name, one scope per open form.
///
/// The base scope holds radios outside any form and is never left.
#[derive(Debug)]
pub struct RadioGroupRegistry {
    scopes: Vec<HashMap<String, Rc<ToggleGroup>>>,
}

impl Default for RadioGroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioGroupRegistry {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter_form(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn leave_form(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Put a radio model into the group for `name` in the innermost scope.
    /// Unnamed radios, and models that are not radios, stay ungrouped.
    pub fn register(
        &mut self,
        name: Option<&str>,
        model: &Rc<ToggleModel>,
    ) -> Option<Rc<ToggleGroup>> {
        if model.kind() != ToggleKind::Radio {
            return None;
        }
        let name = name.filter(|n| !n.is_empty())?;
        let scope = self.scopes.last_mut()?;
        let group = scope
            .entry(name.to_string())
            .or_insert_with(|| ToggleGroup::new(name));
        group.add(model);
        log::trace!(
            target: "assembly.forms",
            "radio joined group {name:?} ({} members)",
            group.len()
        );
        Some(Rc::clone(group))
    }

    pub fn reset(&mut self) {
        self.scopes.truncate(1);
        if let Some(base) = self.scopes.first_mut() {
            base.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use document::{AttrKey, AttrValue};

    fn attrs(pairs: &[(&str, &str)]) -> AttributeSet {
        pairs.iter().fold(AttributeSet::new(), |set, (k, v)| {
            set.with(AttrKey::html(k), AttrValue::str(v))
        })
    }

    #[test]
    fn input_types_map_to_models() {
        let check = |ty: &str| FormModelFactory::create(Tag::Input, &attrs(&[("type", ty)]));
        assert_eq!(check("SUBMIT").map(|m| m.kind_name()), Some("button"));
        assert_eq!(check("checkbox").map(|m| m.kind_name()), Some("checkbox"));
        assert_eq!(check("radio").map(|m| m.kind_name()), Some("radio"));
        assert_eq!(check("password").map(|m| m.kind_name()), Some("text"));
        assert!(check("hidden").is_none());
        assert!(check("telepathy").is_none());
        let plain = FormModelFactory::create(Tag::Input, &attrs(&[("value", "hi")]));
        let text = plain.as_ref().and_then(FormModel::as_text).expect("text model");
        assert_eq!(text.text(), "hi");
    }

    #[test]
    fn checked_controls_start_selected() {
        let model = FormModelFactory::create(Tag::Input, &attrs(&[("type", "checkbox"), ("checked", "")]))
            .expect("model");
        assert!(model.as_toggle().expect("toggle").is_selected());
    }

    #[test]
    fn select_shape_follows_multiple_and_size() {
        let combo = FormModelFactory::create(Tag::Select, &attrs(&[]));
        assert_eq!(combo.map(|m| m.kind_name()), Some("combo"));
        let sized = FormModelFactory::create(Tag::Select, &attrs(&[("size", "1")]));
        assert_eq!(sized.map(|m| m.kind_name()), Some("combo"));
        let list = FormModelFactory::create(Tag::Select, &attrs(&[("size", "4")]));
        assert_eq!(list.map(|m| m.kind_name()), Some("list"));
        let multi = FormModelFactory::create(Tag::Select, &attrs(&[("multiple", "")]));
        assert_eq!(multi.map(|m| m.kind_name()), Some("list"));
    }

    #[test]
    fn textarea_ignores_value_attribute() {
        let model = FormModelFactory::create(Tag::Textarea, &attrs(&[("value", "x")])).expect("model");
        assert_eq!(model.as_text().expect("text").text(), "");
        assert!(FormModelFactory::create(Tag::Div, &attrs(&[])).is_none());
    }

    #[test]
    fn radios_group_by_name_per_form() {
        let mut registry = RadioGroupRegistry::new();
        let a = ToggleModel::new(ToggleKind::Radio, false);
        let b = ToggleModel::new(ToggleKind::Radio, false);
        let c = ToggleModel::new(ToggleKind::Radio, false);
        registry.enter_form();
        let ga = registry.register(Some("g"), &a).expect("group");
        let gb = registry.register(Some("g"), &b).expect("group");
        assert!(Rc::ptr_eq(&ga, &gb));
        registry.leave_form();
        registry.enter_form();
        let gc = registry.register(Some("g"), &c).expect("group");
        assert!(!Rc::ptr_eq(&ga, &gc));
    }

    #[test]
    fn unnamed_radios_stay_alone() {
        let mut registry = RadioGroupRegistry::new();
        let a = ToggleModel::new(ToggleKind::Radio, false);
        assert!(registry.register(None, &a).is_none());
        assert!(registry.register(Some(""), &a).is_none());
        assert!(a.group().is_none());
        let check = ToggleModel::new(ToggleKind::Checkbox, false);
        assert!(registry.register(Some("g"), &check).is_none());
    }

    #[test]
    fn base_scope_survives_extra_leaves() {
        let mut registry = RadioGroupRegistry::new();
        registry.leave_form();
        registry.leave_form();
        assert_eq!(registry.depth(), 0);
        let a = ToggleModel::new(ToggleKind::Radio, false);
        assert!(registry.register(Some("g"), &a).is_some());
    }
}
