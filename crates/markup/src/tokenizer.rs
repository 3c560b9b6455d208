//! Simplified markup tokenizer that drives a `MarkupSink`.
//!
//! Supported tag-name characters (ASCII only): `[A-Za-z0-9:_-]`; attribute
//! names use the same class. Doctypes and processing instructions are skipped.
//!
//! Known limitations (intentional):
//! - Not an HTML5 tokenizer state machine; there is no parse-error recovery
//!   beyond skipping unrecognized bytes.
//! - Raw-text close tags accept only ASCII whitespace before `>`.
//! - A start tag written with `/>` on a non-void element is reported as an
//!   open immediately followed by a close.

use crate::entities::decode_entities;
use crate::sink::{MarkupSink, RawAttribute};
use crate::tag::{RawTextKind, TagName};
use memchr::memchr;
use std::sync::Arc;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

/// Find `</name` followed by optional whitespace and `>`; returns (start, end) byte offsets.
fn find_close_tag(haystack: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let name = name.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    while i + 2 + name.len() <= len {
        let rel = memchr(b'<', &bytes[i..])?;
        i += rel;
        if i + 2 + name.len() > len {
            return None;
        }
        if bytes[i + 1] == b'/' && starts_with_ignore_ascii_case_at(bytes, i + 2, name) {
            let mut k = i + 2 + name.len();
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Tokenize `input` and deliver the events to `sink`, finishing with `end_of_input`.
pub fn tokenize_into<S: MarkupSink + ?Sized>(input: &str, sink: &mut S) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    // Slices are only cut at ASCII structural bytes, so every endpoint is a UTF-8 boundary.
    while i < len {
        if bytes[i] != b'<' {
            let start = i;
            i = memchr(b'<', &bytes[i..]).map_or(len, |rel| i + rel);
            emit_text(sink, &input[start..i], start);
            continue;
        }
        if input[i..].starts_with(COMMENT_START) {
            let body_start = i + COMMENT_START.len();
            match input[body_start..].find(COMMENT_END) {
                Some(rel) => {
                    sink.comment(&input[body_start..body_start + rel], i);
                    i = body_start + rel + COMMENT_END.len();
                }
                None => {
                    sink.comment(&input[body_start..], i);
                    i = len;
                }
            }
            continue;
        }
        if i + 1 < len && (bytes[i + 1] == b'!' || bytes[i + 1] == b'?') {
            // doctype or processing instruction
            i = memchr(b'>', &bytes[i..]).map_or(len, |rel| i + rel + 1);
            continue;
        }
        if i + 1 < len && bytes[i + 1] == b'/' {
            i = scan_end_tag(input, i, sink);
            continue;
        }
        if i + 1 < len && bytes[i + 1].is_ascii_alphabetic() {
            i = scan_start_tag(input, i, sink);
            continue;
        }
        // A stray '<' is text.
        emit_text(sink, "<", i);
        i += 1;
    }
    sink.end_of_input();
}

fn emit_text<S: MarkupSink + ?Sized>(sink: &mut S, raw: &str, pos: usize) {
    if raw.is_empty() {
        return;
    }
    let decoded = decode_entities(raw);
    sink.text(&decoded, pos);
}

fn scan_end_tag<S: MarkupSink + ?Sized>(input: &str, start: usize, sink: &mut S) -> usize {
    let bytes = input.as_bytes();
    let name_start = start + 2;
    let mut j = name_start;
    while j < bytes.len() && is_name_byte(bytes[j]) {
        j += 1;
    }
    let name_end = j;
    j = memchr(b'>', &bytes[j..]).map_or(bytes.len(), |rel| j + rel + 1);
    if name_end > name_start {
        sink.close_tag(&TagName::parse(&input[name_start..name_end]), start);
    }
    j
}

fn scan_start_tag<S: MarkupSink + ?Sized>(input: &str, start: usize, sink: &mut S) -> usize {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let name_start = start + 1;
    let mut k = name_start;
    while k < len && is_name_byte(bytes[k]) {
        k += 1;
    }
    let name = TagName::parse(&input[name_start..k]);
    let mut attributes: Vec<RawAttribute> = Vec::new();
    let mut self_closing = false;

    loop {
        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if k >= len {
            break;
        }
        match bytes[k] {
            b'>' => {
                k += 1;
                break;
            }
            b'/' if k + 1 < len && bytes[k + 1] == b'>' => {
                self_closing = true;
                k += 2;
                break;
            }
            b'/' => {
                k += 1;
                continue;
            }
            _ => {}
        }
        let attr_start = k;
        while k < len && is_name_byte(bytes[k]) {
            k += 1;
        }
        if attr_start == k {
            k += 1;
            continue;
        }
        let attr_name = input[attr_start..k].to_ascii_lowercase();
        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        let mut value = None;
        if k < len && bytes[k] == b'=' {
            k += 1;
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote = bytes[k];
                let value_start = k + 1;
                k = memchr(quote, &bytes[value_start..]).map_or(len, |rel| value_start + rel);
                value = Some(decode_entities(&input[value_start..k]));
                if k < len {
                    k += 1;
                }
            } else {
                let value_start = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                        break;
                    }
                    k += 1;
                }
                value = Some(decode_entities(&input[value_start..k]));
            }
        }
        // First occurrence wins for duplicated attribute names.
        if !attributes.iter().any(|(n, _)| **n == *attr_name) {
            attributes.push((Arc::from(attr_name), value));
        }
    }

    log::trace!(target: "markup.tokenizer", "start tag <{name}> at {start}");
    sink.open_tag(&name, &attributes, start);
    let tag = name.tag();
    if tag.is_void() {
        return k;
    }
    if self_closing {
        sink.close_tag(&name, start);
        return k;
    }
    let Some(kind) = tag.raw_text() else {
        return k;
    };
    let body = &input[k..];
    let (body_end, resume) = match find_close_tag(body, name.as_str()) {
        Some((rel_start, rel_end)) => (k + rel_start, k + rel_end),
        // A missing close tag turns the remainder into the element body.
        None => (len, len),
    };
    let raw = &input[k..body_end];
    if !raw.is_empty() {
        match kind {
            RawTextKind::Raw => sink.text(raw, k),
            RawTextKind::Escapable => emit_text(sink, raw, k),
        }
    }
    sink.close_tag(&name, body_end);
    resume
}
