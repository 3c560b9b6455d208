use url::Url;

#[derive(Clone, Debug)]
pub struct AssemblyConfig {
    /// Keep unrecognized elements as blocks marked with their original name
    /// instead of treating them as inline markup.
    pub preserve_unknown_tags: bool,
    /// Merge adjacent text runs with identical attributes inside one flush.
    pub coalesce_text: bool,
    /// Collapse whitespace runs outside preformatted regions and drop
    /// whitespace-only text that is not inside a paragraph.
    pub collapse_whitespace: bool,
    /// Base for resolving `<base>` and `<link>` references.
    pub base_url: Option<Url>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            preserve_unknown_tags: false,
            coalesce_text: false,
            collapse_whitespace: true,
            base_url: None,
        }
    }
}
