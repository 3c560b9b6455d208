pub mod presentational;
pub mod shorthand;
pub mod sheet;
pub mod syntax;
pub mod values;

// Re-exports so other crates can just use `css::...` nicely.
pub use presentational::{attribute_declarations, character_declarations};
pub use sheet::{RuleImportError, RuleImporter, StyleSheet};
pub use shorthand::expand_shorthand;
pub use syntax::{Declaration, Rule, Selector, Stylesheet, parse_declarations, parse_stylesheet};
pub use values::{Color, Length, font_size_keyword, parse_color, parse_length};
