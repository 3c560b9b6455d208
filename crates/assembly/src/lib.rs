//! Incremental assembly of markup events into a document.
//!
//! The engine consumes tokenizer callbacks, turns them into element specs
//! through per-category tag actions, and either creates a document from the
//! specs or splices them into an existing one.

mod actions;
pub mod attr_stack;
pub mod balancer;
pub mod buffer;
pub mod category;
mod config;
pub mod edit;
mod engine;
mod error;
pub mod forms;
mod state;
pub mod translate;
mod whitespace;

pub use attr_stack::AttributeStack;
pub use balancer::BlockBalancer;
pub use buffer::SpecBuffer;
pub use category::{Category, category_of};
pub use config::AssemblyConfig;
pub use edit::Editor;
pub use engine::{AssemblyEngine, GraftPoint};
pub use error::AssemblyError;
pub use forms::{FormModelFactory, RadioGroupRegistry};
pub use state::AssemblyState;
pub use translate::{AttributeTranslator, CssTranslator};
