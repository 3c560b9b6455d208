//! Markup vocabulary and the tokenizer side of the assembly pipeline.

mod entities;
mod sink;
mod tag;
mod tokenizer;

pub use crate::entities::decode_entities;
pub use crate::sink::{
    MarkupEvent, MarkupSink, RawAttribute, RecordingSink, attribute_value, attributes,
    find_attribute,
};
pub use crate::tag::{RawTextKind, Tag, TagName};
pub use crate::tokenizer::tokenize_into;
