//! Mutable state of one assembly pass, handed explicitly to every action.

use crate::attr_stack::AttributeStack;
use crate::balancer::{BlockBalancer, implied_attributes};
use crate::buffer::SpecBuffer;
use crate::config::AssemblyConfig;
use crate::forms::RadioGroupRegistry;
use crate::translate::AttributeTranslator;
use css::RuleImporter;
use document::forms::{FieldsetModel, TextBuffer, ToggleModel};
use document::{AttrKey, AttrValue, AttributeSet, DocumentProperty, ElementSpec, FormModel, ImageMap};
use markup::{RawAttribute, Tag};
use std::rc::Rc;
use url::Url;

/// Destination of text that does not become document content.
#[derive(Debug)]
pub(crate) enum Capture {
    Title(String),
    Style(String),
    TextArea(Rc<TextBuffer>),
    Option {
        model: FormModel,
        index: usize,
        text: String,
        labelled: bool,
    },
    Button {
        model: Rc<ToggleModel>,
        text: String,
    },
    Legend {
        model: Rc<FieldsetModel>,
        attributes: AttributeSet,
        text: String,
    },
}

/// The select whose model receives `<option>` entries.
#[derive(Debug)]
pub(crate) struct SelectScope {
    pub model: FormModel,
    pub group_depth: u32,
}

pub(crate) fn preformatted_attributes() -> AttributeSet {
    implied_attributes().with(AttrKey::PreserveWhitespace, AttrValue::Flag(true))
}

pub(crate) fn hard_break() -> AttributeSet {
    AttributeSet::new().with(AttrKey::HardBreak, AttrValue::Flag(true))
}

pub struct AssemblyState {
    pub(crate) config: AssemblyConfig,
    pub(crate) translator: Box<dyn AttributeTranslator>,
    pub(crate) importer: Option<Box<dyn RuleImporter>>,
    pub(crate) buffer: SpecBuffer,
    pub(crate) chars: AttributeStack,
    pub(crate) blocks: BlockBalancer,
    pub(crate) radios: RadioGroupRegistry,
    pub(crate) capture: Option<Capture>,
    pub(crate) select: Option<SelectScope>,
    pub(crate) fieldsets: Vec<Rc<FieldsetModel>>,
    /// One entry per open `<a>`: whether it pushed a character frame.
    pub(crate) anchors: Vec<bool>,
    pub(crate) empty_anchor: bool,
    /// Hidden elements awaiting their end marker.
    pub(crate) hidden: Vec<Tag>,
    pub(crate) in_head: usize,
    pub(crate) in_script: bool,
    pub(crate) pre_depth: usize,
    /// A preformatted line ended; the next text starts a new implied block.
    pub(crate) pre_newline: bool,
    /// The pass grafts into existing structure rather than starting at the root.
    pub(crate) grafted: bool,
    pub(crate) last_was_space: bool,
    pub(crate) map: Option<ImageMap>,
    pub(crate) base: Option<Url>,
    pub(crate) properties: Vec<DocumentProperty>,
}

impl AssemblyState {
    pub(crate) fn new(config: AssemblyConfig, translator: Box<dyn AttributeTranslator>) -> Self {
        Self {
            buffer: SpecBuffer::new(config.coalesce_text),
            base: config.base_url.clone(),
            config,
            translator,
            importer: None,
            chars: AttributeStack::new(),
            blocks: BlockBalancer::new(),
            radios: RadioGroupRegistry::new(),
            capture: None,
            select: None,
            fieldsets: Vec::new(),
            anchors: Vec::new(),
            empty_anchor: false,
            hidden: Vec::new(),
            in_head: 0,
            in_script: false,
            pre_depth: 0,
            pre_newline: false,
            grafted: false,
            last_was_space: false,
            map: None,
            properties: Vec::new(),
        }
    }

    /// Drop every piece of pass state; configuration and collaborators stay.
    pub(crate) fn reset(&mut self) {
        self.buffer.clear();
        self.chars.clear();
        self.blocks.reset();
        self.radios.reset();
        self.capture = None;
        self.select = None;
        self.fieldsets.clear();
        self.anchors.clear();
        self.empty_anchor = false;
        self.hidden.clear();
        self.in_head = 0;
        self.in_script = false;
        self.pre_depth = 0;
        self.pre_newline = false;
        self.grafted = false;
        self.last_was_space = false;
        self.map = None;
        self.base = self.config.base_url.clone();
        self.properties.clear();
    }

    pub fn buffer(&self) -> &SpecBuffer {
        &self.buffer
    }

    pub fn blocks(&self) -> &BlockBalancer {
        &self.blocks
    }

    pub fn chars(&self) -> &AttributeStack {
        &self.chars
    }

    /// Translated attributes for `tag`, named after it.
    pub(crate) fn element_attributes(&self, tag: Tag, raw: &[RawAttribute]) -> AttributeSet {
        self.translator
            .translate(tag, raw)
            .with(AttrKey::Name, AttrValue::Tag(tag))
    }

    /// Open an implied block unless text can already be appended; inside
    /// preformatted content the block preserves whitespace.
    pub(crate) fn ensure_paragraph(&mut self) {
        let attrs = if self.pre_depth > 0 {
            preformatted_attributes()
        } else {
            implied_attributes()
        };
        self.blocks.ensure_paragraph(&mut self.buffer, attrs);
    }

    /// Append a text run under the current character attributes.
    pub(crate) fn add_content(&mut self, text: &str) {
        self.add_content_with(text, AttributeSet::new());
    }

    pub(crate) fn add_content_with(&mut self, text: &str, extra: AttributeSet) {
        if text.is_empty() {
            return;
        }
        self.ensure_paragraph();
        let attrs = self
            .chars
            .current()
            .merged(&extra)
            .with(AttrKey::Name, AttrValue::Tag(Tag::Content));
        self.buffer.push(ElementSpec::content(attrs, text));
        self.empty_anchor = false;
        self.last_was_space = text.ends_with(' ');
    }

    /// Append a one-character placeholder standing for `attrs`, which must carry a name.
    pub(crate) fn add_special(&mut self, attrs: AttributeSet) {
        self.ensure_paragraph();
        let attrs = self.chars.current().merged(&attrs);
        self.buffer.push(ElementSpec::placeholder(attrs));
        self.empty_anchor = false;
        self.last_was_space = false;
    }

    pub(crate) fn publish(&mut self, property: DocumentProperty) {
        log::trace!(target: "assembly.actions", "pending property {property:?}");
        self.properties.push(property);
    }

    /// Resolve a reference against the current base.
    pub(crate) fn resolve(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        let resolved = match &self.base {
            Some(base) => base.join(href),
            None => Url::parse(href),
        };
        match resolved {
            Ok(url) => Some(url),
            Err(err) => {
                log::warn!(target: "assembly.actions", "cannot resolve {href:?}: {err}");
                None
            }
        }
    }
}
