//! Stateful models backing form controls.
//!
//! Models are shared (`Rc`) between the element that carries them and the
//! assembler that keeps filling them in (option lists, captured labels).
//! Radio groups hold their members weakly; a model keeps its group alive.

use crate::attributes::AttributeSet;
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleKind {
    Button,
    Submit,
    Reset,
    Image,
    Checkbox,
    Radio,
}

impl ToggleKind {
    /// Checkboxes and radios keep a selected state; push buttons do not.
    pub fn is_persistent(self) -> bool {
        matches!(self, ToggleKind::Checkbox | ToggleKind::Radio)
    }
}

pub struct ToggleModel {
    kind: ToggleKind,
    selected: Cell<bool>,
    label: RefCell<Option<String>>,
    group: RefCell<Option<Rc<ToggleGroup>>>,
}

impl ToggleModel {
    pub fn new(kind: ToggleKind, selected: bool) -> Rc<Self> {
        Rc::new(Self {
            kind,
            selected: Cell::new(selected && kind.is_persistent()),
            label: RefCell::new(None),
            group: RefCell::new(None),
        })
    }

    pub fn kind(&self) -> ToggleKind {
        self.kind
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    /// Select or clear the model. Selecting a grouped model clears its peers.
    pub fn set_selected(self: &Rc<Self>, selected: bool) {
        if !self.kind.is_persistent() {
            return;
        }
        let group = self.group.borrow().clone();
        match group {
            Some(group) if selected => group.select(self),
            _ => self.selected.set(selected),
        }
    }

    pub fn label(&self) -> Option<String> {
        self.label.borrow().clone()
    }

    pub fn set_label(&self, label: impl Into<String>) {
        *self.label.borrow_mut() = Some(label.into());
    }

    pub fn group(&self) -> Option<Rc<ToggleGroup>> {
        self.group.borrow().clone()
    }
}

impl fmt::Debug for ToggleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleModel")
            .field("kind", &self.kind)
            .field("selected", &self.selected.get())
            .field("label", &self.label.borrow())
            .field("group", &self.group.borrow().as_ref().map(|g| g.name()))
            .finish()
    }
}

/// Mutually exclusive set of radio models.
pub struct ToggleGroup {
    name: Arc<str>,
    members: RefCell<Vec<Weak<ToggleModel>>>,
}

impl ToggleGroup {
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: Arc::from(name),
            members: RefCell::new(Vec::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enroll `model`. A model that joins already selected takes the selection.
    pub fn add(self: &Rc<Self>, model: &Rc<ToggleModel>) {
        *model.group.borrow_mut() = Some(Rc::clone(self));
        self.members.borrow_mut().push(Rc::downgrade(model));
        if model.is_selected() {
            self.select(model);
        }
    }

    pub fn members(&self) -> Vec<Rc<ToggleModel>> {
        self.members
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, model: &Rc<ToggleModel>) -> bool {
        self.members().iter().any(|m| Rc::ptr_eq(m, model))
    }

    pub fn selected(&self) -> Option<Rc<ToggleModel>> {
        self.members().into_iter().find(|m| m.is_selected())
    }

    fn select(&self, model: &Rc<ToggleModel>) {
        for member in self.members() {
            member.selected.set(Rc::ptr_eq(&member, model));
        }
        model.selected.set(true);
    }
}

impl fmt::Debug for ToggleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleGroup")
            .field("name", &self.name)
            .field("members", &self.len())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKind {
    Text,
    Password,
    File,
    TextArea,
    Isindex,
}

#[derive(Debug)]
pub struct TextBuffer {
    kind: TextKind,
    text: RefCell<String>,
}

impl TextBuffer {
    pub fn new(kind: TextKind, initial: &str) -> Rc<Self> {
        Rc::new(Self {
            kind,
            text: RefCell::new(initial.to_string()),
        })
    }

    pub fn kind(&self) -> TextKind {
        self.kind
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: &str) {
        let mut buf = self.text.borrow_mut();
        buf.clear();
        buf.push_str(text);
    }

    pub fn append(&self, text: &str) {
        self.text.borrow_mut().push_str(text);
    }
}

/// One entry of a selection list; option groups are entries too.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionEntry {
    pub label: String,
    pub value: Option<String>,
    pub selected: bool,
    pub disabled: bool,
    pub is_group: bool,
    /// Nesting depth: options inside an `<optgroup>` sit one level deeper.
    pub depth: u32,
    pub attributes: AttributeSet,
}

impl OptionEntry {
    pub fn new(attributes: AttributeSet) -> Self {
        Self {
            label: String::new(),
            value: attributes.html("value").map(str::to_string),
            selected: attributes.html("selected").is_some(),
            disabled: attributes.html("disabled").is_some(),
            is_group: false,
            depth: 0,
            attributes,
        }
    }

    /// Submitted value: the explicit value, else the label.
    pub fn effective_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.label)
    }
}

#[derive(Debug, Default)]
struct OptionList {
    entries: RefCell<Vec<OptionEntry>>,
}

impl OptionList {
    fn push(&self, entry: OptionEntry) -> usize {
        let mut entries = self.entries.borrow_mut();
        entries.push(entry);
        entries.len() - 1
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    fn set_label(&self, index: usize, label: &str) -> bool {
        match self.entries.borrow_mut().get_mut(index) {
            Some(entry) => {
                entry.label = label.to_string();
                true
            }
            None => false,
        }
    }
}

/// Multi-row selection list (`<select multiple>` or `size > 1`).
#[derive(Debug)]
pub struct ListContents {
    options: OptionList,
    multiple: bool,
    visible_rows: u32,
}

impl ListContents {
    pub fn new(multiple: bool, visible_rows: u32) -> Rc<Self> {
        Rc::new(Self {
            options: OptionList::default(),
            multiple,
            visible_rows,
        })
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn visible_rows(&self) -> u32 {
        self.visible_rows
    }

    pub fn entries(&self) -> Ref<'_, Vec<OptionEntry>> {
        self.options.entries.borrow()
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.entries()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.selected && !e.is_group)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Drop-down selection (`<select>` with a single visible row).
#[derive(Debug)]
pub struct ComboContents {
    options: OptionList,
    selected: Cell<Option<usize>>,
}

impl ComboContents {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            options: OptionList::default(),
            selected: Cell::new(None),
        })
    }

    pub fn entries(&self) -> Ref<'_, Vec<OptionEntry>> {
        self.options.entries.borrow()
    }

    /// The explicitly selected entry (last one wins), else the first option.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
            .get()
            .or_else(|| self.entries().iter().position(|e| !e.is_group))
    }
}

#[derive(Debug, Default)]
pub struct FieldsetModel {
    legend: RefCell<Option<String>>,
    legend_attributes: RefCell<Option<AttributeSet>>,
}

impl FieldsetModel {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn legend(&self) -> Option<String> {
        self.legend.borrow().clone()
    }

    pub fn legend_attributes(&self) -> Option<AttributeSet> {
        self.legend_attributes.borrow().clone()
    }

    pub fn set_legend(&self, text: &str, attributes: AttributeSet) {
        *self.legend.borrow_mut() = Some(text.to_string());
        *self.legend_attributes.borrow_mut() = Some(attributes);
    }
}

#[derive(Clone, Debug)]
pub enum FormModel {
    Toggle(Rc<ToggleModel>),
    Text(Rc<TextBuffer>),
    List(Rc<ListContents>),
    Combo(Rc<ComboContents>),
    Fieldset(Rc<FieldsetModel>),
}

impl FormModel {
    pub fn ptr_eq(&self, other: &FormModel) -> bool {
        match (self, other) {
            (FormModel::Toggle(a), FormModel::Toggle(b)) => Rc::ptr_eq(a, b),
            (FormModel::Text(a), FormModel::Text(b)) => Rc::ptr_eq(a, b),
            (FormModel::List(a), FormModel::List(b)) => Rc::ptr_eq(a, b),
            (FormModel::Combo(a), FormModel::Combo(b)) => Rc::ptr_eq(a, b),
            (FormModel::Fieldset(a), FormModel::Fieldset(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FormModel::Toggle(m) if m.kind() == ToggleKind::Radio => "radio",
            FormModel::Toggle(m) if m.kind() == ToggleKind::Checkbox => "checkbox",
            FormModel::Toggle(_) => "button",
            FormModel::Text(_) => "text",
            FormModel::List(_) => "list",
            FormModel::Combo(_) => "combo",
            FormModel::Fieldset(_) => "fieldset",
        }
    }

    pub fn as_toggle(&self) -> Option<&Rc<ToggleModel>> {
        match self {
            FormModel::Toggle(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Rc<TextBuffer>> {
        match self {
            FormModel::Text(m) => Some(m),
            _ => None,
        }
    }

    /// Whether options can be appended (list or combo).
    pub fn accepts_options(&self) -> bool {
        matches!(self, FormModel::List(_) | FormModel::Combo(_))
    }

    /// Number of option entries; zero for non-selection models.
    pub fn option_count(&self) -> usize {
        match self {
            FormModel::List(m) => m.options.len(),
            FormModel::Combo(m) => m.options.len(),
            _ => 0,
        }
    }

    /// Append an entry and return its index; `None` for non-selection models.
    pub fn push_option(&self, entry: OptionEntry) -> Option<usize> {
        match self {
            FormModel::List(m) => Some(m.options.push(entry)),
            FormModel::Combo(m) => {
                let selected = entry.selected && !entry.is_group;
                let index = m.options.push(entry);
                if selected {
                    m.selected.set(Some(index));
                }
                Some(index)
            }
            _ => None,
        }
    }

    pub fn set_option_label(&self, index: usize, label: &str) -> bool {
        match self {
            FormModel::List(m) => m.options.set_label(index, label),
            FormModel::Combo(m) => m.options.set_label(index, label),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup::Tag;

    #[test]
    fn group_keeps_single_selection() {
        let group = ToggleGroup::new("color");
        let a = ToggleModel::new(ToggleKind::Radio, true);
        let b = ToggleModel::new(ToggleKind::Radio, false);
        group.add(&a);
        group.add(&b);
        assert!(a.is_selected());
        b.set_selected(true);
        assert!(!a.is_selected());
        assert!(Rc::ptr_eq(&group.selected().expect("selection"), &b));
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn late_selected_member_takes_selection() {
        let group = ToggleGroup::new("g");
        let a = ToggleModel::new(ToggleKind::Radio, true);
        let b = ToggleModel::new(ToggleKind::Radio, true);
        group.add(&a);
        group.add(&b);
        assert!(!a.is_selected());
        assert!(b.is_selected());
    }

    #[test]
    fn dropped_members_leave_group() {
        let group = ToggleGroup::new("g");
        {
            let a = ToggleModel::new(ToggleKind::Radio, false);
            group.add(&a);
            assert_eq!(group.len(), 1);
        }
        assert!(group.is_empty());
    }

    #[test]
    fn push_buttons_never_select() {
        let b = ToggleModel::new(ToggleKind::Submit, true);
        assert!(!b.is_selected());
        b.set_selected(true);
        assert!(!b.is_selected());
    }

    #[test]
    fn combo_selection_tracks_last_selected_option() {
        let combo = ComboContents::new();
        let model = FormModel::Combo(Rc::clone(&combo));
        assert_eq!(combo.selected_index(), None);
        model.push_option(OptionEntry::new(AttributeSet::named(Tag::Option)));
        assert_eq!(combo.selected_index(), Some(0));
        let picked = AttributeSet::named(Tag::Option).with(
            crate::attributes::AttrKey::html("selected"),
            crate::attributes::AttrValue::str(""),
        );
        model.push_option(OptionEntry::new(picked));
        assert_eq!(combo.selected_index(), Some(1));
        assert!(model.set_option_label(1, "Two"));
        assert_eq!(combo.entries()[1].label, "Two");
        assert_eq!(combo.entries()[1].effective_value(), "Two");
    }

    #[test]
    fn text_models_do_not_take_options() {
        let model = FormModel::Text(TextBuffer::new(TextKind::Text, "x"));
        assert!(!model.accepts_options());
        assert_eq!(
            model.push_option(OptionEntry::new(AttributeSet::new())),
            None
        );
    }
}
