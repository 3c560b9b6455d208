use std::fmt;

/// A build sequence or edit the document refuses. The document is left unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructuralViolation {
    OffsetOutOfBounds { offset: usize, len: usize },
    /// The target region is marked non-editable.
    NotEditable { offset: usize },
    /// A close spec would leave the document root.
    UnbalancedClose { index: usize },
    /// No branch encloses the requested edit point.
    NoCommonParent { offset: usize },
    /// The operation needs a branch but was given a leaf.
    LeafTarget,
    /// The element is not (or no longer) attached under the root.
    DetachedElement,
}

impl fmt::Display for StructuralViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralViolation::OffsetOutOfBounds { offset, len } => {
                write!(f, "offset {offset} is past the end of the document ({len})")
            }
            StructuralViolation::NotEditable { offset } => {
                write!(f, "region at offset {offset} is not editable")
            }
            StructuralViolation::UnbalancedClose { index } => {
                write!(f, "close spec #{index} has no open element")
            }
            StructuralViolation::NoCommonParent { offset } => {
                write!(f, "no enclosing element at offset {offset}")
            }
            StructuralViolation::LeafTarget => f.write_str("operation requires a branch element"),
            StructuralViolation::DetachedElement => f.write_str("element is not attached"),
        }
    }
}

impl std::error::Error for StructuralViolation {}
