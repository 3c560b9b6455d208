use document::StructuralViolation;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssemblyError {
    /// The document refused the assembled sequence; it is unchanged.
    Structural(StructuralViolation),
    /// The edit target is not an element of the document.
    ElementNotFound,
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyError::Structural(err) => write!(f, "structural violation: {err}"),
            AssemblyError::ElementNotFound => f.write_str("element is not part of the document"),
        }
    }
}

impl std::error::Error for AssemblyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssemblyError::Structural(err) => Some(err),
            AssemblyError::ElementNotFound => None,
        }
    }
}

impl From<StructuralViolation> for AssemblyError {
    fn from(err: StructuralViolation) -> Self {
        AssemblyError::Structural(err)
    }
}
