use markup::Tag;

/// Behavior class of a tag during assembly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Block,
    Paragraph,
    Character,
    Special,
    Hidden,
    Preformatted,
    Form,
    Isindex,
    Style,
    Title,
    Base,
    Anchor,
    Link,
    Meta,
    Head,
    Map,
    Area,
    /// Not in the tag table; resolved against the unknown-tag policy.
    Unknown,
}

pub fn category_of(tag: Tag) -> Category {
    match tag {
        Tag::Blockquote
        | Tag::Body
        | Tag::Caption
        | Tag::Center
        | Tag::Dd
        | Tag::Dir
        | Tag::Div
        | Tag::Dl
        | Tag::Frameset
        | Tag::Html
        | Tag::Li
        | Tag::Menu
        | Tag::Noframes
        | Tag::Noscript
        | Tag::Ol
        | Tag::Table
        | Tag::Td
        | Tag::Th
        | Tag::Tr
        | Tag::Ul => Category::Block,
        Tag::P | Tag::Dt | Tag::H1 | Tag::H2 | Tag::H3 | Tag::H4 | Tag::H5 | Tag::H6 => {
            Category::Paragraph
        }
        Tag::Address
        | Tag::B
        | Tag::Basefont
        | Tag::Big
        | Tag::Cite
        | Tag::Code
        | Tag::Dfn
        | Tag::Em
        | Tag::Font
        | Tag::I
        | Tag::Kbd
        | Tag::Label
        | Tag::S
        | Tag::Samp
        | Tag::Small
        | Tag::Span
        | Tag::Strike
        | Tag::Strong
        | Tag::Sub
        | Tag::Sup
        | Tag::Tt
        | Tag::U
        | Tag::Var => Category::Character,
        Tag::Br | Tag::Frame | Tag::Hr | Tag::Img | Tag::Object => Category::Special,
        Tag::Applet | Tag::Param | Tag::Script => Category::Hidden,
        Tag::Pre => Category::Preformatted,
        Tag::Button
        | Tag::Fieldset
        | Tag::Form
        | Tag::Input
        | Tag::Legend
        | Tag::Optgroup
        | Tag::Option
        | Tag::Select
        | Tag::Textarea => Category::Form,
        Tag::Isindex => Category::Isindex,
        Tag::Style => Category::Style,
        Tag::Title => Category::Title,
        Tag::Base => Category::Base,
        Tag::A => Category::Anchor,
        Tag::Link => Category::Link,
        Tag::Meta => Category::Meta,
        Tag::Head => Category::Head,
        Tag::Map => Category::Map,
        Tag::Area => Category::Area,
        Tag::Implied | Tag::Content | Tag::Comment | Tag::Unknown => Category::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representative_tags() {
        assert_eq!(category_of(Tag::Body), Category::Block);
        assert_eq!(category_of(Tag::H3), Category::Paragraph);
        assert_eq!(category_of(Tag::Strong), Category::Character);
        assert_eq!(category_of(Tag::Img), Category::Special);
        assert_eq!(category_of(Tag::Script), Category::Hidden);
        assert_eq!(category_of(Tag::Select), Category::Form);
        assert_eq!(category_of(Tag::A), Category::Anchor);
        assert_eq!(category_of(Tag::Unknown), Category::Unknown);
    }

    #[test]
    fn synthetic_names_never_dispatch_as_markup() {
        for tag in [Tag::Implied, Tag::Content, Tag::Comment] {
            assert_eq!(category_of(tag), Category::Unknown);
        }
    }
}
