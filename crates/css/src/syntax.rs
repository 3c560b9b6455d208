// A single CSS property: "color: red"
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            important: false,
        }
    }
}

/// Compound selector: optional type, optional id, any number of classes.
/// `*` is the compound with nothing set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Specificity(pub u16, pub u16, pub u16); // (id, class, type)

impl Selector {
    pub fn specificity(&self) -> Specificity {
        Specificity(
            u16::from(self.id.is_some()),
            self.classes.len().min(u16::MAX as usize) as u16,
            u16::from(self.tag.is_some()),
        )
    }

    pub fn matches(&self, name: &str, id: Option<&str>, classes: &[&str]) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(name)
        {
            return false;
        }
        if let Some(want) = &self.id
            && id != Some(want.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| classes.contains(&c.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

/// Raised when a stylesheet cannot be split into blocks at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxError {
    UnbalancedBraces,
}

// input: "div, #id { color: red; } .note { font: 12px serif }"
// output: Stylesheet with one rule per block; at-rules and complex selectors are skipped.
pub fn parse_stylesheet(input: &str) -> Result<Stylesheet, SyntaxError> {
    let text = strip_comments(input);
    let mut rules = Vec::new();
    let mut prelude_start = 0;
    let mut depth = 0usize;
    let mut block_start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    block_start = i;
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    return Err(SyntaxError::UnbalancedBraces);
                }
                depth -= 1;
                if depth == 0 {
                    let prelude = text[prelude_start..block_start].trim();
                    let body = &text[block_start + 1..i];
                    if let Some(rule) = parse_rule(prelude, body) {
                        rules.push(rule);
                    }
                    prelude_start = i + 1;
                }
            }
            ';' if depth == 0 => {
                // statement at-rule such as @import or @charset
                prelude_start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(SyntaxError::UnbalancedBraces);
    }
    Ok(Stylesheet { rules })
}

fn parse_rule(prelude: &str, body: &str) -> Option<Rule> {
    if prelude.starts_with('@') {
        log::trace!(target: "css.syntax", "skipping at-rule {prelude}");
        return None;
    }
    let selectors = prelude
        .split(',')
        .filter_map(parse_selector)
        .collect::<Vec<_>>();
    if selectors.is_empty() {
        return None;
    }
    let declarations = parse_declarations(body);
    if declarations.is_empty() {
        return None;
    }
    Some(Rule {
        selectors,
        declarations,
    })
}

fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

// input: "color: red; font-size: 12px !important"
// output: [color: red, font-size: 12px (important)]
pub fn parse_declarations(input: &str) -> Vec<Declaration> {
    input
        .split(';')
        .filter_map(|pair| {
            let (n, v) = pair.split_once(':')?;
            let name = n.trim().to_ascii_lowercase();
            if name.is_empty() {
                return None;
            }
            let mut value = v.trim();
            let mut important = false;
            if let Some(idx) = value.to_ascii_lowercase().rfind("!important") {
                value = value[..idx].trim_end();
                important = true;
            }
            if value.is_empty() {
                return None;
            }
            Some(Declaration {
                name,
                value: value.to_string(),
                important,
            })
        })
        .collect()
}

// input: "p.note#intro", ".a.b", "*"
// output: compound selector; descendant/child combinators are unsupported
fn parse_selector(s: &str) -> Option<Selector> {
    let s = s.trim();
    if s.is_empty() || s.contains(|c: char| c.is_whitespace() || c == '>' || c == '+' || c == '~')
    {
        return None;
    }
    let mut selector = Selector::default();
    let mut rest = s;
    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else {
        let end = rest.find(['.', '#']).unwrap_or(rest.len());
        if end > 0 {
            let tag = &rest[..end];
            if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                return None;
            }
            selector.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[end..];
    }
    while !rest.is_empty() {
        let marker = rest.as_bytes()[0];
        let body = &rest[1..];
        let end = body.find(['.', '#']).unwrap_or(body.len());
        let part = &body[..end];
        if part.is_empty() {
            return None;
        }
        match marker {
            b'#' => selector.id = Some(part.to_string()),
            b'.' => selector.classes.push(part.to_string()),
            _ => return None,
        }
        rest = &body[end..];
    }
    Some(selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rules_and_skips_at_rules() {
        let sheet = parse_stylesheet(
            "@import url(x.css);\n/* c */ p, .note { color: red; margin: 0 }\n@media print { p { color: black } }\nh1#t { font-weight: bold !important }",
        )
        .expect("stylesheet");
        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(sheet.rules[0].selectors.len(), 2);
        assert_eq!(sheet.rules[0].declarations[1], Declaration::new("margin", "0"));
        let h1 = &sheet.rules[1];
        assert_eq!(h1.selectors[0].tag.as_deref(), Some("h1"));
        assert_eq!(h1.selectors[0].id.as_deref(), Some("t"));
        assert!(h1.declarations[0].important);
        assert_eq!(h1.declarations[0].value, "bold");
    }

    #[test]
    fn unbalanced_braces_are_reported() {
        assert_eq!(
            parse_stylesheet("p { color: red"),
            Err(SyntaxError::UnbalancedBraces)
        );
        assert_eq!(parse_stylesheet("}"), Err(SyntaxError::UnbalancedBraces));
    }

    #[test]
    fn compound_selector_matching_and_specificity() {
        let sel = parse_selector("p.a.b").expect("selector");
        assert!(sel.matches("P", None, &["b", "a", "c"]));
        assert!(!sel.matches("p", None, &["a"]));
        assert_eq!(sel.specificity(), Specificity(0, 2, 1));
        assert!(parse_selector("div p").is_none());
        assert_eq!(parse_selector("*"), Some(Selector::default()));
    }
}
