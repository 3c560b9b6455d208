use document::{AttrKey, Direction, ElementSpec, SpecKind};
use markup::Tag;

/// Ordered spec sequence for one flush cycle.
#[derive(Debug, Default)]
pub struct SpecBuffer {
    specs: Vec<ElementSpec>,
    coalesce_text: bool,
}

impl SpecBuffer {
    pub fn new(coalesce_text: bool) -> Self {
        Self {
            specs: Vec::new(),
            coalesce_text,
        }
    }

    pub fn push(&mut self, spec: ElementSpec) {
        log::trace!(target: "assembly.engine", "spec {spec}");
        if self.coalesce_text
            && let Some(last) = self.specs.last_mut()
            && can_merge(last, &spec)
        {
            last.push_text(spec.text());
            return;
        }
        self.specs.push(spec);
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &[ElementSpec] {
        &self.specs
    }

    /// Drain the buffer, leaving it empty for the next cycle.
    pub fn take(&mut self) -> Vec<ElementSpec> {
        std::mem::take(&mut self.specs)
    }

    pub fn clear(&mut self) {
        self.specs.clear();
    }
}

fn is_text_run(spec: &ElementSpec) -> bool {
    spec.kind == SpecKind::ContentRun
        && spec.direction == Direction::Originate
        && spec.name() == Some(Tag::Content)
        && !spec.attributes.flag(&AttrKey::HardBreak)
}

fn can_merge(last: &ElementSpec, next: &ElementSpec) -> bool {
    is_text_run(last) && is_text_run(next) && last.attributes == next.attributes
}
