//! Shorthand property expansion.
//!
//! Expansion is purely syntactic: each shorthand maps to the longhands it
//! sets, in a fixed order. Values that cannot be classified are dropped from
//! the expansion rather than guessed.

use crate::syntax::Declaration;
use crate::values::{is_border_style, is_border_width, parse_color};

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Expand `decl` into longhand declarations; non-shorthands are returned as-is.
pub fn expand_shorthand(decl: &Declaration) -> Vec<Declaration> {
    let value = decl.value.trim();
    let mut out = match decl.name.as_str() {
        "margin" | "padding" => expand_box(value, |side| format!("{}-{side}", decl.name)),
        "border-width" => expand_box(value, |side| format!("border-{side}-width")),
        "border-style" => expand_box(value, |side| format!("border-{side}-style")),
        "border-color" => expand_box(value, |side| format!("border-{side}-color")),
        "border" => SIDES
            .iter()
            .flat_map(|side| expand_border_side(value, side))
            .collect(),
        "border-top" | "border-right" | "border-bottom" | "border-left" => {
            expand_border_side(value, &decl.name["border-".len()..])
        }
        "font" => expand_font(value),
        "background" => expand_background(value),
        "list-style" => expand_list_style(value),
        _ => vec![Declaration {
            name: decl.name.clone(),
            value: value.to_string(),
            important: false,
        }],
    };
    for d in &mut out {
        d.important = decl.important;
    }
    out
}

fn expand_box(value: &str, name: impl Fn(&str) -> String) -> Vec<Declaration> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let [top, right, bottom, left] = match parts.as_slice() {
        [a] => [*a, *a, *a, *a],
        [a, b] => [*a, *b, *a, *b],
        [a, b, c] => [*a, *b, *c, *b],
        [a, b, c, d] => [*a, *b, *c, *d],
        _ => return Vec::new(),
    };
    SIDES
        .iter()
        .zip([top, right, bottom, left])
        .map(|(side, v)| Declaration::new(name(side), v))
        .collect()
}

fn expand_border_side(value: &str, side: &str) -> Vec<Declaration> {
    let mut width = None;
    let mut style = None;
    let mut color = None;
    for token in value.split_whitespace() {
        if style.is_none() && is_border_style(token) {
            style = Some(token);
        } else if width.is_none() && is_border_width(token) {
            width = Some(token);
        } else if color.is_none() && parse_color(token).is_some() {
            color = Some(token);
        }
    }
    [("width", width), ("style", style), ("color", color)]
        .into_iter()
        .filter_map(|(part, v)| v.map(|v| Declaration::new(format!("border-{side}-{part}"), v)))
        .collect()
}

fn expand_font(value: &str) -> Vec<Declaration> {
    let mut out = Vec::new();
    let mut tokens = value.split_whitespace().peekable();
    while let Some(token) = tokens.peek().copied() {
        let lower = token.to_ascii_lowercase();
        let name = match lower.as_str() {
            "italic" | "oblique" => "font-style",
            "small-caps" => "font-variant",
            "bold" | "bolder" | "lighter" => "font-weight",
            w if w.len() == 3 && w.ends_with("00") && w.starts_with(|c: char| c.is_ascii_digit()) => {
                "font-weight"
            }
            "normal" => {
                tokens.next();
                continue;
            }
            _ => break,
        };
        out.push(Declaration::new(name, token));
        tokens.next();
    }
    let Some(size) = tokens.next() else {
        return out;
    };
    match size.split_once('/') {
        Some((size, line_height)) => {
            out.push(Declaration::new("font-size", size));
            out.push(Declaration::new("line-height", line_height));
        }
        None => out.push(Declaration::new("font-size", size)),
    }
    let family = tokens.collect::<Vec<_>>().join(" ");
    if !family.is_empty() {
        out.push(Declaration::new("font-family", family));
    }
    out
}

fn expand_background(value: &str) -> Vec<Declaration> {
    let mut out = Vec::new();
    let mut position = Vec::new();
    for token in value.split_whitespace() {
        let lower = token.to_ascii_lowercase();
        if lower.starts_with("url(") {
            out.push(Declaration::new("background-image", token));
        } else if matches!(
            lower.as_str(),
            "repeat" | "repeat-x" | "repeat-y" | "no-repeat"
        ) {
            out.push(Declaration::new("background-repeat", token));
        } else if matches!(lower.as_str(), "scroll" | "fixed") {
            out.push(Declaration::new("background-attachment", token));
        } else if parse_color(token).is_some() {
            out.push(Declaration::new("background-color", token));
        } else {
            position.push(token);
        }
    }
    if !position.is_empty() {
        out.push(Declaration::new("background-position", position.join(" ")));
    }
    out
}

fn expand_list_style(value: &str) -> Vec<Declaration> {
    value
        .split_whitespace()
        .map(|token| {
            let lower = token.to_ascii_lowercase();
            let name = if lower.starts_with("url(") {
                "list-style-image"
            } else if lower == "inside" || lower == "outside" {
                "list-style-position"
            } else {
                "list-style-type"
            };
            Declaration::new(name, token)
        })
        .collect()
}
