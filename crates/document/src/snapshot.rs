use crate::attributes::{AttrKey, AttrValue, AttributeSet};
use crate::tree::{ElementId, HtmlDocument};
use std::fmt::{self, Write};

/// Deterministic line dump of a document for golden tests.
/// Not a stable format.
///
/// Branches render as `<name ...>`, leaves as their quoted text followed by
/// the element name. Attribute keys appear in their sort order; translated
/// CSS is grouped into one `style=[...]` entry.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotOptions {
    pub include_css: bool,
    pub include_markup: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            include_css: true,
            include_markup: true,
        }
    }
}

#[derive(Debug)]
pub struct DocumentSnapshot {
    lines: Vec<String>,
}

impl DocumentSnapshot {
    pub fn new(doc: &HtmlDocument, options: SnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk(doc, doc.root(), 0, &options, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DocumentSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn walk(
    doc: &HtmlDocument,
    id: ElementId,
    depth: usize,
    options: &SnapshotOptions,
    out: &mut Vec<String>,
) {
    const INDENT_STEP: usize = 2;
    let mut line = " ".repeat(depth * INDENT_STEP);
    if id == doc.root() {
        line.push_str("#document");
    } else if let Some(text) = doc.leaf_text(id) {
        line.push('"');
        write_escaped(&mut line, text);
        line.push('"');
        if let Some(attrs) = doc.attributes(id) {
            line.push(' ');
            line.push_str(attrs.name().map_or("?", |t| t.name()));
            write_attributes(&mut line, attrs, options);
        }
    } else if let Some(attrs) = doc.attributes(id) {
        line.push('<');
        line.push_str(attrs.name().map_or("?", |t| t.name()));
        write_attributes(&mut line, attrs, options);
        line.push('>');
    }
    out.push(line);
    for &child in doc.children(id) {
        walk(doc, child, depth + 1, options, out);
    }
}

fn write_attributes(out: &mut String, attrs: &AttributeSet, options: &SnapshotOptions) {
    let mut style = Vec::new();
    for (key, value) in attrs.iter() {
        match key {
            AttrKey::Name => {}
            AttrKey::Css(name) => {
                if options.include_css {
                    style.push((name, value));
                }
            }
            AttrKey::Markup(tag) => {
                if options.include_markup {
                    let _ = write!(out, " +{}", tag.name());
                }
            }
            AttrKey::Implied => write_flag(out, "implied", value),
            AttrKey::PreserveWhitespace => write_flag(out, "pre", value),
            AttrKey::HardBreak => write_flag(out, "br", value),
            AttrKey::EndTag => write_flag(out, "endtag", value),
            AttrKey::Model => {
                if let AttrValue::Model(model) = value {
                    let _ = write!(out, " model={}", model.kind_name());
                }
            }
            AttrKey::Unrecognized => write_pair(out, "unrecognized", value),
            AttrKey::Comment => write_pair(out, "comment", value),
            AttrKey::Html(name) => write_pair(out, name, value),
        }
    }
    if !style.is_empty() {
        out.push_str(" style=[");
        for (i, (name, value)) in style.iter().enumerate() {
            if i != 0 {
                out.push_str("; ");
            }
            out.push_str(name);
            out.push_str(": ");
            write_escaped(out, value.as_str().unwrap_or(""));
        }
        out.push(']');
    }
}

fn write_flag(out: &mut String, label: &str, value: &AttrValue) {
    if matches!(value, AttrValue::Flag(true)) {
        out.push_str(" +");
        out.push_str(label);
    }
}

fn write_pair(out: &mut String, label: &str, value: &AttrValue) {
    out.push(' ');
    out.push_str(label);
    match value {
        AttrValue::Str(s) => {
            out.push_str("=\"");
            write_escaped(out, s);
            out.push('"');
        }
        AttrValue::Tag(tag) => {
            out.push('=');
            out.push_str(tag.name());
        }
        _ => {}
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() && !ch.is_ascii_control() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}
