/// Decode a small, fixed set of character references.
///
/// Contract:
/// - Named references come from `NAMED` and must be semicolon-terminated.
/// - Numeric references (`&#65;`, `&#x41;`) decode only when terminated and
///   naming a valid scalar value; anything else passes through unchanged.
use memchr::memchr;

const NAMED: &[(&str, char)] = &[
    ("amp", '&'),
    ("apos", '\''),
    ("copy", '\u{00A9}'),
    ("gt", '>'),
    ("hellip", '\u{2026}'),
    ("laquo", '\u{00AB}'),
    ("lt", '<'),
    ("mdash", '\u{2014}'),
    ("nbsp", '\u{00A0}'),
    ("ndash", '\u{2013}'),
    ("quot", '"'),
    ("raquo", '\u{00BB}'),
    ("reg", '\u{00AE}'),
    ("shy", '\u{00AD}'),
];

// Longest name in `NAMED` plus slack; bounds the scan on adversarial input.
const MAX_NAME_LEN: usize = 8;
const MAX_DIGITS: usize = 7;

pub fn decode_entities(s: &str) -> String {
    let bytes = s.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return s.to_string();
    };
    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut i = first;
    while i < bytes.len() {
        let Some(rel) = memchr(b'&', &bytes[i..]) else {
            out.push_str(&s[i..]);
            break;
        };
        let amp = i + rel;
        out.push_str(&s[i..amp]);
        match decode_reference(s, amp) {
            Some((ch, consumed)) => {
                out.push(ch);
                i = amp + consumed;
            }
            None => {
                out.push('&');
                i = amp + 1;
            }
        }
    }
    out
}

/// Decode the reference starting at `amp`; returns the character and the byte length consumed.
fn decode_reference(s: &str, amp: usize) -> Option<(char, usize)> {
    let rest = &s.as_bytes()[amp + 1..];
    if let Some(numeric) = rest.strip_prefix(b"#") {
        let (digits, radix, prefix) = match numeric.first() {
            Some(b'x') | Some(b'X') => (&numeric[1..], 16, 3),
            _ => (numeric, 10, 2),
        };
        let len = digits
            .iter()
            .take(MAX_DIGITS + 1)
            .take_while(|b| b.is_ascii_hexdigit() && (radix == 16 || b.is_ascii_digit()))
            .count();
        if len == 0 || len > MAX_DIGITS || digits.get(len) != Some(&b';') {
            return None;
        }
        let text = std::str::from_utf8(&digits[..len]).ok()?;
        let ch = u32::from_str_radix(text, radix).ok().and_then(char::from_u32)?;
        return Some((ch, prefix + len + 1));
    }
    let semi = rest.iter().take(MAX_NAME_LEN + 1).position(|b| *b == b';')?;
    let name = std::str::from_utf8(&rest[..semi]).ok()?;
    NAMED
        .binary_search_by(|(candidate, _)| (*candidate).cmp(name))
        .ok()
        .map(|idx| (NAMED[idx].1, semi + 2))
}
