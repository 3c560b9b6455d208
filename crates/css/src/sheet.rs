//! Rule store fed by the assembler (`<style>` bodies and linked sheets).

use crate::shorthand::expand_shorthand;
use crate::syntax::{Declaration, Rule, Specificity, SyntaxError, parse_stylesheet};
use std::cell::RefCell;
use std::cmp::Ordering::Equal;
use std::fmt;
use std::rc::Rc;
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleImportError {
    Syntax(SyntaxError),
    /// The collaborator does not load external sheets.
    LinkUnsupported(Url),
}

impl fmt::Display for RuleImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleImportError::Syntax(SyntaxError::UnbalancedBraces) => {
                f.write_str("stylesheet has unbalanced braces")
            }
            RuleImportError::LinkUnsupported(url) => {
                write!(f, "linked stylesheet {url} cannot be loaded")
            }
        }
    }
}

impl std::error::Error for RuleImportError {}

impl From<SyntaxError> for RuleImportError {
    fn from(err: SyntaxError) -> Self {
        RuleImportError::Syntax(err)
    }
}

/// Receiver of style rules discovered while assembling a document.
///
/// Failures are reported to the caller but never abort a parse pass.
pub trait RuleImporter {
    /// Import the body of a `<style>` element, resolving relative references against `base`.
    fn import_rules(&mut self, text: &str, base: Option<&Url>) -> Result<(), RuleImportError>;

    /// Import an external sheet named by `<link rel=stylesheet>`.
    fn import_linked(&mut self, href: &Url) -> Result<(), RuleImportError> {
        Err(RuleImportError::LinkUnsupported(href.clone()))
    }
}

#[derive(Clone, Debug)]
struct SheetRule {
    rule: Rule,
    base: Option<Url>,
}

/// Ordered collection of imported rules.
///
/// Linked sheets are recorded, not fetched: the embedder drains
/// `pending_links` and feeds the loaded text back through `import_rules`.
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    rules: Vec<SheetRule>,
    pending_links: Vec<Url>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().map(|r| &r.rule)
    }

    /// Base URL the `index`-th rule was imported with.
    pub fn rule_base(&self, index: usize) -> Option<&Url> {
        self.rules.get(index).and_then(|r| r.base.as_ref())
    }

    pub fn pending_links(&self) -> &[Url] {
        &self.pending_links
    }

    pub fn take_pending_links(&mut self) -> Vec<Url> {
        std::mem::take(&mut self.pending_links)
    }

    /// Winning longhand declarations for an element, cascaded by importance,
    /// specificity and then source order.
    pub fn matching_declarations(
        &self,
        name: &str,
        id: Option<&str>,
        classes: &[&str],
    ) -> Vec<Declaration> {
        struct Candidate {
            decl: Declaration,
            specificity: Specificity,
            order: usize,
        }

        let mut candidates = Vec::new();
        for (order, sheet_rule) in self.rules.iter().enumerate() {
            let best = sheet_rule
                .rule
                .selectors
                .iter()
                .filter(|sel| sel.matches(name, id, classes))
                .map(|sel| sel.specificity())
                .max();
            let Some(specificity) = best else {
                continue;
            };
            for decl in &sheet_rule.rule.declarations {
                candidates.extend(expand_shorthand(decl).into_iter().map(|decl| Candidate {
                    decl,
                    specificity,
                    order,
                }));
            }
        }
        candidates.sort_by(|a, b| match a.decl.name.cmp(&b.decl.name) {
            Equal => match a.decl.important.cmp(&b.decl.important) {
                Equal => match a.specificity.cmp(&b.specificity) {
                    Equal => a.order.cmp(&b.order),
                    other => other,
                },
                other => other,
            },
            other => other,
        });
        let mut winners: Vec<Declaration> = Vec::new();
        for candidate in candidates {
            match winners.last_mut() {
                Some(last) if last.name == candidate.decl.name => *last = candidate.decl,
                _ => winners.push(candidate.decl),
            }
        }
        winners
    }
}

impl RuleImporter for StyleSheet {
    fn import_rules(&mut self, text: &str, base: Option<&Url>) -> Result<(), RuleImportError> {
        let parsed = parse_stylesheet(text)?;
        log::debug!(
            target: "css.sheet",
            "imported {} rules (base {:?})",
            parsed.rules.len(),
            base.map(Url::as_str)
        );
        self.rules.extend(parsed.rules.into_iter().map(|rule| SheetRule {
            rule,
            base: base.cloned(),
        }));
        Ok(())
    }

    fn import_linked(&mut self, href: &Url) -> Result<(), RuleImportError> {
        log::debug!(target: "css.sheet", "queued linked stylesheet {href}");
        self.pending_links.push(href.clone());
        Ok(())
    }
}

/// Shared sheet, so an embedder can keep a handle while the assembler imports into it.
impl RuleImporter for Rc<RefCell<StyleSheet>> {
    fn import_rules(&mut self, text: &str, base: Option<&Url>) -> Result<(), RuleImportError> {
        self.borrow_mut().import_rules(text, base)
    }

    fn import_linked(&mut self, href: &Url) -> Result<(), RuleImportError> {
        self.borrow_mut().import_linked(href)
    }
}
