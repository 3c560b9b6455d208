//! Tag identity table.
//!
//! Tag names are canonical ASCII-lowercase. Names outside the table resolve to
//! `Tag::Unknown`; the original spelling is kept on `TagName` so unknown
//! elements can still be matched against their own end tags.

use std::fmt;
use std::sync::Arc;

/// Known markup tags plus the synthetic names used by the document model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    A,
    Address,
    Applet,
    Area,
    B,
    Base,
    Basefont,
    Big,
    Blockquote,
    Body,
    Br,
    Button,
    Caption,
    Center,
    Cite,
    Code,
    Dd,
    Dfn,
    Dir,
    Div,
    Dl,
    Dt,
    Em,
    Fieldset,
    Font,
    Form,
    Frame,
    Frameset,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Head,
    Hr,
    Html,
    I,
    Img,
    Input,
    Isindex,
    Kbd,
    Label,
    Legend,
    Li,
    Link,
    Map,
    Menu,
    Meta,
    Noframes,
    Noscript,
    Object,
    Ol,
    Optgroup,
    Option,
    P,
    Param,
    Pre,
    S,
    Samp,
    Script,
    Select,
    Small,
    Span,
    Strike,
    Strong,
    Style,
    Sub,
    Sup,
    Table,
    Td,
    Textarea,
    Th,
    Title,
    Tr,
    Tt,
    U,
    Ul,
    Var,
    /// Synthesized paragraph container for content that had no explicit one.
    Implied,
    /// Name of leaf elements holding text.
    Content,
    /// Name of placeholder leaves holding a markup comment.
    Comment,
    Unknown,
}

const TAG_NAMES: &[(&str, Tag)] = &[
    ("a", Tag::A),
    ("address", Tag::Address),
    ("applet", Tag::Applet),
    ("area", Tag::Area),
    ("b", Tag::B),
    ("base", Tag::Base),
    ("basefont", Tag::Basefont),
    ("big", Tag::Big),
    ("blockquote", Tag::Blockquote),
    ("body", Tag::Body),
    ("br", Tag::Br),
    ("button", Tag::Button),
    ("caption", Tag::Caption),
    ("center", Tag::Center),
    ("cite", Tag::Cite),
    ("code", Tag::Code),
    ("dd", Tag::Dd),
    ("dfn", Tag::Dfn),
    ("dir", Tag::Dir),
    ("div", Tag::Div),
    ("dl", Tag::Dl),
    ("dt", Tag::Dt),
    ("em", Tag::Em),
    ("fieldset", Tag::Fieldset),
    ("font", Tag::Font),
    ("form", Tag::Form),
    ("frame", Tag::Frame),
    ("frameset", Tag::Frameset),
    ("h1", Tag::H1),
    ("h2", Tag::H2),
    ("h3", Tag::H3),
    ("h4", Tag::H4),
    ("h5", Tag::H5),
    ("h6", Tag::H6),
    ("head", Tag::Head),
    ("hr", Tag::Hr),
    ("html", Tag::Html),
    ("i", Tag::I),
    ("img", Tag::Img),
    ("input", Tag::Input),
    ("isindex", Tag::Isindex),
    ("kbd", Tag::Kbd),
    ("label", Tag::Label),
    ("legend", Tag::Legend),
    ("li", Tag::Li),
    ("link", Tag::Link),
    ("map", Tag::Map),
    ("menu", Tag::Menu),
    ("meta", Tag::Meta),
    ("noframes", Tag::Noframes),
    ("noscript", Tag::Noscript),
    ("object", Tag::Object),
    ("ol", Tag::Ol),
    ("optgroup", Tag::Optgroup),
    ("option", Tag::Option),
    ("p", Tag::P),
    ("param", Tag::Param),
    ("pre", Tag::Pre),
    ("s", Tag::S),
    ("samp", Tag::Samp),
    ("script", Tag::Script),
    ("select", Tag::Select),
    ("small", Tag::Small),
    ("span", Tag::Span),
    ("strike", Tag::Strike),
    ("strong", Tag::Strong),
    ("style", Tag::Style),
    ("sub", Tag::Sub),
    ("sup", Tag::Sup),
    ("table", Tag::Table),
    ("td", Tag::Td),
    ("textarea", Tag::Textarea),
    ("th", Tag::Th),
    ("title", Tag::Title),
    ("tr", Tag::Tr),
    ("tt", Tag::Tt),
    ("u", Tag::U),
    ("ul", Tag::Ul),
    ("var", Tag::Var),
];

impl Tag {
    /// Resolve a tag name, ignoring ASCII case. Synthetic names never resolve.
    pub fn from_name(name: &str) -> Tag {
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            let folded = name.to_ascii_lowercase();
            return Self::lookup(&folded);
        }
        Self::lookup(name)
    }

    fn lookup(name: &str) -> Tag {
        TAG_NAMES
            .binary_search_by(|(candidate, _)| (*candidate).cmp(name))
            .map(|idx| TAG_NAMES[idx].1)
            .unwrap_or(Tag::Unknown)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Implied => "p-implied",
            Tag::Content => "content",
            Tag::Comment => "comment",
            Tag::Unknown => "unknown",
            known => TAG_NAMES
                .iter()
                .find(|(_, tag)| *tag == known)
                .map(|(name, _)| *name)
                .unwrap_or("unknown"),
        }
    }

    /// Whether the element forms a structural block in the document tree.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Tag::Address
                | Tag::Blockquote
                | Tag::Body
                | Tag::Caption
                | Tag::Center
                | Tag::Dd
                | Tag::Dir
                | Tag::Div
                | Tag::Dl
                | Tag::Dt
                | Tag::Fieldset
                | Tag::Form
                | Tag::Frameset
                | Tag::H1
                | Tag::H2
                | Tag::H3
                | Tag::H4
                | Tag::H5
                | Tag::H6
                | Tag::Head
                | Tag::Html
                | Tag::Implied
                | Tag::Li
                | Tag::Menu
                | Tag::Noframes
                | Tag::Ol
                | Tag::P
                | Tag::Pre
                | Tag::Table
                | Tag::Td
                | Tag::Th
                | Tag::Tr
                | Tag::Ul
        )
    }

    /// Whether the element interrupts the inline flow (blocks plus line-level leaves).
    pub fn breaks_flow(self) -> bool {
        self.is_block() || matches!(self, Tag::Br | Tag::Hr | Tag::Isindex | Tag::Frame)
    }

    pub fn is_preformatted(self) -> bool {
        matches!(self, Tag::Pre | Tag::Textarea)
    }

    /// Elements that never have content or an end tag.
    pub fn is_void(self) -> bool {
        matches!(
            self,
            Tag::Area
                | Tag::Base
                | Tag::Basefont
                | Tag::Br
                | Tag::Frame
                | Tag::Hr
                | Tag::Img
                | Tag::Input
                | Tag::Isindex
                | Tag::Link
                | Tag::Meta
                | Tag::Param
        )
    }

    /// Elements whose body is delivered as a single text run without tag recognition.
    pub fn raw_text(self) -> Option<RawTextKind> {
        match self {
            Tag::Script | Tag::Style => Some(RawTextKind::Raw),
            Tag::Textarea | Tag::Title => Some(RawTextKind::Escapable),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawTextKind {
    /// Body is passed through verbatim.
    Raw,
    /// Body has entities decoded but no tags.
    Escapable,
}

/// A tag as it appeared in the markup: resolved identity plus canonical name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagName {
    tag: Tag,
    name: Arc<str>,
}

impl TagName {
    pub fn parse(raw: &str) -> Self {
        let name: Arc<str> = if raw.bytes().any(|b| b.is_ascii_uppercase()) {
            Arc::from(raw.to_ascii_lowercase())
        } else {
            Arc::from(raw)
        };
        Self {
            tag: Tag::from_name(&name),
            name,
        }
    }

    pub fn known(tag: Tag) -> Self {
        Self {
            tag,
            name: Arc::from(tag.name()),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn is_unknown(&self) -> bool {
        self.tag == Tag::Unknown
    }
}

impl From<Tag> for TagName {
    fn from(tag: Tag) -> Self {
        TagName::known(tag)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_for_binary_search() {
        assert!(TAG_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(Tag::from_name("BODY"), Tag::Body);
        assert_eq!(Tag::from_name("TextArea"), Tag::Textarea);
        assert_eq!(Tag::from_name("blink"), Tag::Unknown);
    }

    #[test]
    fn synthetic_names_do_not_resolve_from_markup() {
        assert_eq!(Tag::from_name("p-implied"), Tag::Unknown);
        assert_eq!(Tag::from_name("content"), Tag::Unknown);
        assert_eq!(Tag::Implied.name(), "p-implied");
    }

    #[test]
    fn unknown_tag_name_keeps_spelling() {
        let name = TagName::parse("X-Widget");
        assert!(name.is_unknown());
        assert_eq!(name.as_str(), "x-widget");
    }

    #[test]
    fn category_properties() {
        assert!(Tag::Pre.is_block());
        assert!(Tag::Pre.is_preformatted());
        assert!(Tag::Br.breaks_flow());
        assert!(!Tag::Br.is_block());
        assert!(Tag::Img.is_void());
        assert!(!Tag::B.breaks_flow());
        assert_eq!(Tag::Style.raw_text(), Some(RawTextKind::Raw));
    }
}
