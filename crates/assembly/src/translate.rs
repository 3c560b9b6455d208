//! Raw markup attributes to document attributes.

use css::{Declaration, attribute_declarations, character_declarations, expand_shorthand, parse_declarations};
use document::{AttrKey, AttrValue, AttributeSet};
use markup::{RawAttribute, Tag};

/// Converts the attributes of one tag into document attributes.
///
/// Implementations must be pure: the same tag and attributes always yield
/// the same set, whatever order distinct attribute names arrive in. Values
/// that cannot be read are replaced by a default or dropped, never reported.
pub trait AttributeTranslator {
    fn translate(&self, tag: Tag, raw: &[RawAttribute]) -> AttributeSet;
}

/// Default translator: markup attributes are kept under `AttrKey::Html`,
/// presentational attributes and the `style` attribute become CSS longhands.
///
/// Precedence, lowest first: the tag's own styling (`<b>` is bold),
/// presentational attributes, then inline style.
#[derive(Clone, Copy, Debug, Default)]
pub struct CssTranslator;

impl AttributeTranslator for CssTranslator {
    fn translate(&self, tag: Tag, raw: &[RawAttribute]) -> AttributeSet {
        let mut out = AttributeSet::new();
        for (name, value) in raw {
            let key = AttrKey::Html(name.clone());
            if out.contains(&key) {
                continue;
            }
            out.insert(key, AttrValue::str(value.as_deref().unwrap_or("")));
        }

        let mut css = character_declarations(tag);
        // Sorted by name so the result does not depend on attribute order.
        let mut presentational: Vec<&RawAttribute> =
            raw.iter().filter(|(name, _)| &**name != "style").collect();
        presentational.sort_by(|a, b| a.0.cmp(&b.0));
        presentational.dedup_by(|a, b| a.0 == b.0);
        for (name, value) in presentational {
            css.extend(attribute_declarations(tag, name, value.as_deref()));
        }
        if let Some((_, Some(style))) = raw.iter().find(|(name, _)| &**name == "style") {
            css.extend(parse_declarations(style));
        }
        apply_declarations(&mut out, &css);
        out
    }
}

/// Later declarations win unless an earlier one for the same property was `!important`.
fn apply_declarations(out: &mut AttributeSet, declarations: &[Declaration]) {
    let mut important: Vec<String> = Vec::new();
    for decl in declarations {
        for longhand in expand_shorthand(decl) {
            if important.contains(&longhand.name) && !longhand.important {
                continue;
            }
            if longhand.important {
                important.push(longhand.name.clone());
            }
            out.insert(AttrKey::css(&longhand.name), AttrValue::str(&longhand.value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup::attributes;

    #[test]
    fn keeps_markup_attributes() {
        let got = CssTranslator.translate(Tag::A, &attributes([("href", "x.html"), ("title", "t")]));
        assert_eq!(got.html("href"), Some("x.html"));
        assert_eq!(got.html("title"), Some("t"));
        assert_eq!(got.name(), None);
    }

    #[test]
    fn inline_style_beats_presentational_hint() {
        let raw = attributes([("style", "text-align: right"), ("align", "center")]);
        let got = CssTranslator.translate(Tag::P, &raw);
        assert_eq!(got.css("text-align"), Some("right"));
    }

    #[test]
    fn shorthand_in_style_expands() {
        let raw = attributes([("style", "margin: 1px 2px; color: red !important; color: blue")]);
        let got = CssTranslator.translate(Tag::Div, &raw);
        assert_eq!(got.css("margin-left"), Some("2px"));
        assert_eq!(got.css("margin-top"), Some("1px"));
        assert_eq!(got.css("color"), Some("red"));
        assert_eq!(got.css("margin"), None);
    }

    #[test]
    fn character_tags_translate_to_css() {
        assert_eq!(CssTranslator.translate(Tag::B, &[]).css("font-weight"), Some("bold"));
        let font = CssTranslator.translate(Tag::Font, &attributes([("size", "nonsense"), ("color", "red")]));
        assert_eq!(font.css("font-size"), Some("medium"));
        assert_eq!(font.css("color"), Some("#ff0000"));
    }

    #[test]
    fn translation_ignores_attribute_order() {
        let a = CssTranslator.translate(Tag::Td, &attributes([("bgcolor", "red"), ("width", "10")]));
        let b = CssTranslator.translate(Tag::Td, &attributes([("width", "10"), ("bgcolor", "red")]));
        assert_eq!(a, b);
    }
}
