//! Translation of presentational markup into CSS declarations.
//!
//! Malformed values never raise: a value that cannot be read is either
//! replaced by the documented default (font sizes, table borders) or dropped.

use crate::syntax::Declaration;
use crate::values::{font_size_keyword, parse_color, parse_length};
use markup::Tag;

/// Border width used for `<table border>` / `<img border>` when the value is missing or unreadable.
pub const DEFAULT_BORDER_WIDTH: &str = "1px";

/// Declarations implied by a presentational attribute on `tag`.
pub fn attribute_declarations(tag: Tag, name: &str, value: Option<&str>) -> Vec<Declaration> {
    let raw = value.unwrap_or("").trim();
    match name {
        "align" => align(tag, raw),
        "valign" if matches!(tag, Tag::Td | Tag::Th | Tag::Tr) => {
            keyword(raw, &["top", "middle", "bottom", "baseline"])
                .map(|v| vec![Declaration::new("vertical-align", v)])
                .unwrap_or_default()
        }
        "bgcolor" => color("background-color", raw),
        "color" if matches!(tag, Tag::Font | Tag::Basefont) => color("color", raw),
        "text" if tag == Tag::Body => color("color", raw),
        "background" if !raw.is_empty() => {
            vec![Declaration::new("background-image", format!("url({raw})"))]
        }
        "face" if matches!(tag, Tag::Font | Tag::Basefont) && !raw.is_empty() => {
            vec![Declaration::new("font-family", raw)]
        }
        "size" if matches!(tag, Tag::Font | Tag::Basefont) => {
            vec![Declaration::new("font-size", font_size_keyword(raw))]
        }
        "width" | "height"
            if matches!(
                tag,
                Tag::Img | Tag::Table | Tag::Td | Tag::Th | Tag::Hr | Tag::Applet | Tag::Object
            ) =>
        {
            parse_length(raw)
                .map(|len| vec![Declaration::new(name, len.to_css())])
                .unwrap_or_default()
        }
        "border" if matches!(tag, Tag::Table | Tag::Img) => {
            let width = parse_length(raw)
                .map(|len| len.to_css())
                .unwrap_or_else(|| DEFAULT_BORDER_WIDTH.to_string());
            ["top", "right", "bottom", "left"]
                .iter()
                .map(|side| Declaration::new(format!("border-{side}-width"), width.clone()))
                .collect()
        }
        "nowrap" if matches!(tag, Tag::Td | Tag::Th) => {
            vec![Declaration::new("white-space", "nowrap")]
        }
        "clear" if tag == Tag::Br => keyword(raw, &["left", "right", "all", "none"])
            .map(|v| {
                let v = if v == "all" { "both" } else { v };
                vec![Declaration::new("clear", v)]
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Declarations a character-level tag contributes by itself.
pub fn character_declarations(tag: Tag) -> Vec<Declaration> {
    let (name, value) = match tag {
        Tag::B | Tag::Strong => ("font-weight", "bold"),
        Tag::I | Tag::Em | Tag::Cite | Tag::Var | Tag::Dfn => ("font-style", "italic"),
        Tag::U => ("text-decoration", "underline"),
        Tag::S | Tag::Strike => ("text-decoration", "line-through"),
        Tag::Tt | Tag::Code | Tag::Kbd | Tag::Samp => ("font-family", "monospace"),
        Tag::Sub => ("vertical-align", "sub"),
        Tag::Sup => ("vertical-align", "super"),
        Tag::Big => ("font-size", "larger"),
        Tag::Small => ("font-size", "smaller"),
        _ => return Vec::new(),
    };
    vec![Declaration::new(name, value)]
}

fn align(tag: Tag, raw: &str) -> Vec<Declaration> {
    match tag {
        Tag::Img | Tag::Applet | Tag::Object | Tag::Table => {
            match keyword(raw, &["left", "right"]) {
                Some(side) => vec![Declaration::new("float", side)],
                None => Vec::new(),
            }
        }
        Tag::Hr | Tag::Caption => Vec::new(),
        _ if tag.is_block() => keyword(raw, &["left", "right", "center", "justify"])
            .map(|v| vec![Declaration::new("text-align", v)])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn color(property: &str, raw: &str) -> Vec<Declaration> {
    match parse_color(raw) {
        Some(c) => vec![Declaration::new(property, c.to_hex())],
        None => {
            log::trace!(target: "css.presentational", "dropping unreadable color {raw:?}");
            Vec::new()
        }
    }
}

fn keyword<'a>(raw: &str, allowed: &[&'a str]) -> Option<&'a str> {
    allowed
        .iter()
        .copied()
        .find(|candidate| candidate.eq_ignore_ascii_case(raw))
}
