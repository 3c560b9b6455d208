//! Element specs, attribute sets and form models shared by the assembler,
//! plus a reference document tree that consumes spec sequences.

pub mod attributes;
mod error;
pub mod forms;
mod properties;
#[cfg(any(test, feature = "snapshot"))]
pub mod snapshot;
mod spec;
mod tree;

pub use attributes::{AttrKey, AttrValue, AttributeSet};
pub use error::StructuralViolation;
pub use forms::FormModel;
pub use properties::{DocumentProperties, DocumentProperty, ImageMap};
pub use spec::{Direction, ElementSpec, PLACEHOLDER, SpecKind};
pub use tree::{ElementId, HtmlDocument};

/// Receiver of assembled build sequences.
///
/// `create` replaces the whole document; `insert` grafts a sequence at an
/// offset. Either call must leave the document unchanged when it fails.
pub trait DocumentSink {
    /// Current length in characters.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any element exists yet.
    fn has_structure(&self) -> bool;

    fn create(&mut self, specs: &[ElementSpec]) -> Result<(), StructuralViolation>;

    fn insert(&mut self, offset: usize, specs: &[ElementSpec]) -> Result<(), StructuralViolation>;

    fn put_property(&mut self, property: DocumentProperty);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DocumentCall {
    Create(Vec<ElementSpec>),
    Insert { offset: usize, specs: Vec<ElementSpec> },
    Property(DocumentProperty),
}

/// Sink that records every call and tracks length from content runs.
#[derive(Debug, Default)]
pub struct RecordingDocument {
    pub calls: Vec<DocumentCall>,
    length: usize,
}

impl RecordingDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every spec handed over, in call order.
    pub fn all_specs(&self) -> Vec<ElementSpec> {
        self.calls
            .iter()
            .flat_map(|call| match call {
                DocumentCall::Create(specs) | DocumentCall::Insert { specs, .. } => specs.clone(),
                DocumentCall::Property(_) => Vec::new(),
            })
            .collect()
    }

    pub fn properties(&self) -> Vec<&DocumentProperty> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DocumentCall::Property(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

fn content_len(specs: &[ElementSpec]) -> usize {
    specs.iter().map(ElementSpec::len).sum()
}

impl DocumentSink for RecordingDocument {
    fn len(&self) -> usize {
        self.length
    }

    fn has_structure(&self) -> bool {
        self.calls
            .iter()
            .any(|c| !matches!(c, DocumentCall::Property(_)))
    }

    fn create(&mut self, specs: &[ElementSpec]) -> Result<(), StructuralViolation> {
        self.length = content_len(specs);
        self.calls.push(DocumentCall::Create(specs.to_vec()));
        Ok(())
    }

    fn insert(&mut self, offset: usize, specs: &[ElementSpec]) -> Result<(), StructuralViolation> {
        if offset > self.length {
            return Err(StructuralViolation::OffsetOutOfBounds {
                offset,
                len: self.length,
            });
        }
        self.length += content_len(specs);
        self.calls.push(DocumentCall::Insert {
            offset,
            specs: specs.to_vec(),
        });
        Ok(())
    }

    fn put_property(&mut self, property: DocumentProperty) {
        self.calls.push(DocumentCall::Property(property));
    }
}
