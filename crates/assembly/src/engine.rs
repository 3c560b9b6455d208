//! Event-driven document assembly.
//!
//! One pass: `begin`/`begin_at`, markup events through [`MarkupSink`], then
//! `flush` into a [`DocumentSink`]. Flushing may also happen mid-pass; the
//! target offset then advances past what was delivered.

use crate::actions;
use crate::config::AssemblyConfig;
use crate::error::AssemblyError;
use crate::state::AssemblyState;
use crate::translate::{AttributeTranslator, CssTranslator};
use css::RuleImporter;
use document::{AttributeSet, Direction, DocumentSink, ElementSpec, SpecKind};
use markup::{MarkupSink, RawAttribute, Tag, TagName, tokenize_into};

/// Where and how a pass splices into an existing document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraftPoint {
    pub offset: usize,
    /// Ancestor levels of the existing tree to leave before the new content.
    pub pop_depth: usize,
    /// Levels to re-enter after popping.
    pub push_depth: usize,
    /// When set, only the first element with this tag (and its content) is assembled.
    pub boundary: Option<Tag>,
    /// The graft point already lies inside a paragraph.
    pub in_paragraph: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Boundary {
    Unbounded,
    Seeking(Tag),
    Inside { tag: Tag, depth: usize },
    Done,
}

pub struct AssemblyEngine {
    state: AssemblyState,
    graft: GraftPoint,
    offset: usize,
    boundary: Boundary,
}

impl AssemblyEngine {
    pub fn new(config: AssemblyConfig) -> Self {
        Self {
            state: AssemblyState::new(config, Box::new(CssTranslator)),
            graft: GraftPoint::default(),
            offset: 0,
            boundary: Boundary::Unbounded,
        }
    }

    pub fn with_translator(mut self, translator: Box<dyn AttributeTranslator>) -> Self {
        self.state.translator = translator;
        self
    }

    pub fn with_rule_importer(mut self, importer: Box<dyn RuleImporter>) -> Self {
        self.state.importer = Some(importer);
        self
    }

    /// Start a pass at `offset`, closing `pop_depth` and reopening
    /// `push_depth` levels of the existing tree first.
    pub fn begin(&mut self, offset: usize, pop_depth: usize, push_depth: usize, boundary: Option<Tag>) {
        self.begin_at(GraftPoint {
            offset,
            pop_depth,
            push_depth,
            boundary,
            in_paragraph: false,
        });
    }

    pub fn begin_at(&mut self, graft: GraftPoint) {
        log::debug!(
            target: "assembly.engine",
            "begin at {} (pop {}, push {}, boundary {:?})",
            graft.offset,
            graft.pop_depth,
            graft.push_depth,
            graft.boundary
        );
        self.state.reset();
        self.state.grafted = graft.pop_depth > 0 || graft.push_depth > 0;
        self.state.blocks.set_graft_in_paragraph(graft.in_paragraph);
        self.offset = graft.offset;
        self.boundary = match graft.boundary {
            Some(tag) => Boundary::Seeking(tag),
            None => Boundary::Unbounded,
        };
        self.graft = graft;
        if self.boundary == Boundary::Unbounded {
            self.emit_graft();
        }
    }

    fn emit_graft(&mut self) {
        for _ in 0..self.graft.pop_depth {
            self.state
                .buffer
                .push(ElementSpec::close().with_direction(Direction::JoinPrevious));
        }
        for _ in 0..self.graft.push_depth {
            self.state
                .buffer
                .push(ElementSpec::open(AttributeSet::new()).with_direction(Direction::JoinNext));
        }
    }

    /// Offset the next flush splices at.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Specs assembled since the last flush.
    pub fn pending(&self) -> &[ElementSpec] {
        self.state.buffer().specs()
    }

    pub fn state(&self) -> &AssemblyState {
        &self.state
    }

    /// Deliver pending specs, then pending properties. An empty buffer makes
    /// no structural call. When the document rejects the specs nothing is
    /// delivered; buffer and properties are cleared either way.
    pub fn flush(&mut self, doc: &mut dyn DocumentSink) -> Result<(), AssemblyError> {
        let properties = std::mem::take(&mut self.state.properties);
        if self.state.buffer.is_empty() {
            log::trace!(target: "assembly.engine", "flush with nothing pending");
            for property in properties {
                doc.put_property(property);
            }
            return Ok(());
        }
        let specs = self.state.buffer.take();
        let growth: usize = specs
            .iter()
            .filter(|spec| spec.kind == SpecKind::ContentRun)
            .map(ElementSpec::len)
            .sum();
        let result = if self.offset == 0 && !doc.has_structure() {
            log::debug!(target: "assembly.engine", "create with {} specs", specs.len());
            doc.create(&specs)
        } else {
            log::debug!(
                target: "assembly.engine",
                "insert {} specs at {}",
                specs.len(),
                self.offset
            );
            doc.insert(self.offset, &specs)
        };
        match result {
            Ok(()) => {
                self.offset = self.offset.saturating_add(growth);
                for property in properties {
                    doc.put_property(property);
                }
                Ok(())
            }
            Err(err) => {
                log::warn!(
                    target: "assembly.engine",
                    "document rejected {} specs, dropping {} properties: {err}",
                    specs.len(),
                    properties.len()
                );
                Err(AssemblyError::Structural(err))
            }
        }
    }

    /// Drop everything assembled in this pass without delivering it.
    pub fn abort(&mut self) {
        log::debug!(
            target: "assembly.engine",
            "abort with {} specs pending",
            self.state.buffer.len()
        );
        self.state.reset();
        self.graft = GraftPoint {
            offset: self.offset,
            ..GraftPoint::default()
        };
        self.boundary = Boundary::Unbounded;
    }

    /// Tokenize `input` as one pass from the current graft point and flush it.
    pub fn assemble(&mut self, input: &str, doc: &mut dyn DocumentSink) -> Result<(), AssemblyError> {
        tokenize_into(input, self);
        self.flush(doc)
    }

    fn accepts_events(&self) -> bool {
        matches!(self.boundary, Boundary::Unbounded | Boundary::Inside { .. })
    }
}

impl MarkupSink for AssemblyEngine {
    fn open_tag(&mut self, tag: &TagName, attrs: &[RawAttribute], pos: usize) {
        match self.boundary {
            Boundary::Seeking(boundary) if tag.tag() == boundary => {
                log::trace!(target: "assembly.engine", "boundary {tag} found at {pos}");
                self.emit_graft();
                self.boundary = Boundary::Inside {
                    tag: boundary,
                    depth: 1,
                };
            }
            Boundary::Inside { tag: boundary, depth } if tag.tag() == boundary => {
                self.boundary = Boundary::Inside {
                    tag: boundary,
                    depth: depth + 1,
                };
            }
            Boundary::Unbounded | Boundary::Inside { .. } => {}
            Boundary::Seeking(_) | Boundary::Done => return,
        }
        log::trace!(target: "assembly.engine", "open {tag} at {pos}");
        actions::start(&mut self.state, tag, attrs);
    }

    fn close_tag(&mut self, tag: &TagName, pos: usize) {
        if !self.accepts_events() {
            return;
        }
        log::trace!(target: "assembly.engine", "close {tag} at {pos}");
        actions::end(&mut self.state, tag);
        if let Boundary::Inside { tag: boundary, depth } = self.boundary
            && tag.tag() == boundary
        {
            self.boundary = if depth <= 1 {
                Boundary::Done
            } else {
                Boundary::Inside {
                    tag: boundary,
                    depth: depth - 1,
                }
            };
        }
    }

    fn text(&mut self, text: &str, pos: usize) {
        if !self.accepts_events() {
            return;
        }
        log::trace!(target: "assembly.engine", "text of {} bytes at {pos}", text.len());
        actions::text(&mut self.state, text);
    }

    fn comment(&mut self, text: &str, pos: usize) {
        if !self.accepts_events() {
            return;
        }
        log::trace!(target: "assembly.engine", "comment at {pos}");
        actions::comment(&mut self.state, text);
    }

    fn end_of_input(&mut self) {
        if let Boundary::Seeking(tag) = self.boundary {
            log::debug!(target: "assembly.engine", "boundary {tag} never opened");
            return;
        }
        actions::finish(&mut self.state);
    }
}
